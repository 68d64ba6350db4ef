//! Botkeeper Storage
//!
//! Document store backends for the `users` and `interactions` collections.
//!
//! # Backends
//!
//! - **`MongoStore`**: MongoDB through the official driver. The driver owns
//!   connection pooling; one store is shared by every request.
//! - **`MemoryStore`**: process-local collections with the same semantics,
//!   used by tests and for running the service without a database.
//!
//! # Example
//!
//! ```rust,no_run
//! use botkeeper_core::RecordStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = botkeeper_storage::connect("mongodb://localhost:27017", "botkeeper").await?;
//! botkeeper_storage::ensure_indexes(&store).await?;
//!
//! let count = store.count_users(botkeeper_core::UserFilter::All).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod memory;

// Vertical slices
pub mod interactions;
pub mod users;

pub use context::MongoStore;
pub use error::StorageError;
pub use memory::MemoryStore;

use mongodb::{options::ClientOptions, Client};

const APP_NAME: &str = "botkeeper";

/// Create a MongoDB-backed store
///
/// Only parses the connection string and builds the client; the driver
/// connects lazily, so an unreachable server is not an error here.
///
/// # Arguments
///
/// * `uri` - MongoDB connection string (e.g., `mongodb://localhost:27017`)
/// * `database` - Name of the database holding both collections
///
/// # Errors
///
/// Returns an error if the connection string is invalid or SRV lookup fails
pub async fn connect(uri: &str, database: &str) -> error::Result<MongoStore> {
    let mut options = ClientOptions::parse(uri).await?;
    options.app_name = Some(APP_NAME.to_string());

    let client = Client::with_options(options)?;
    tracing::debug!("MongoDB client created for database {}", database);

    Ok(MongoStore::new(client, database))
}

/// Create the indexes both collections rely on
///
/// The unique index on `users.userId` is what keeps concurrent
/// create-or-touch calls from producing duplicate users. The store also runs
/// this lazily before its first upsert and after each successful ping.
pub async fn ensure_indexes(store: &MongoStore) -> error::Result<()> {
    store.ensure_indexes().await
}
