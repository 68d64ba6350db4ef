/// Aggregate statistics over both collections
use botkeeper_core::{start_of_utc_day, RecordStore, Result, Stats, UserFilter};
use chrono::{DateTime, Utc};

/// Compute the counters reported by `GET /stats`
///
/// "Recent" and "active" are measured from midnight UTC of the day `now`
/// falls on. The four counts are independent reads, so they run
/// concurrently and are not a consistent snapshot.
pub async fn collect_stats(store: &dyn RecordStore, now: DateTime<Utc>) -> Result<Stats> {
    let since = start_of_utc_day(now);

    let (total_users, total_interactions, recent_users_24h, active_users_24h) = tokio::try_join!(
        store.count_users(UserFilter::All),
        store.count_interactions(),
        store.count_users(UserFilter::JoinedSince(since)),
        store.count_users(UserFilter::ActiveSince(since)),
    )?;

    Ok(Stats {
        total_users,
        total_interactions,
        recent_users_24h,
        active_users_24h,
        timestamp: now,
    })
}
