/// Time helpers
use chrono::{DateTime, NaiveTime, Utc};

/// Midnight of the UTC calendar day containing `now`
///
/// This is a calendar boundary, not a rolling window: at 00:05 UTC it
/// returns 00:00 UTC of the same day.
pub fn start_of_utc_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}
