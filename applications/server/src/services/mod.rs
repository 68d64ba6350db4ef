/// Business logic services
pub mod stats;
pub mod store;

pub use stats::collect_stats;
pub use store::{open_mongo, open_store};
