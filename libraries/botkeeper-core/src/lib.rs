//! Botkeeper Core
//!
//! Domain types, the storage trait and error handling shared by the
//! Botkeeper storage backends and the HTTP service.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Interaction`, `NewUser`, `NewInteraction`, `Stats`
//! - **Core Trait**: `RecordStore`, the single store dependency handed to every handler
//! - **Error Handling**: Unified `RecordError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use botkeeper_core::types::{NewUser, UserId};
//!
//! let user = NewUser::new(UserId::new("42")).with_first_name("Ann");
//! assert_eq!(user.user_id.as_str(), "42");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod time;
pub mod types;

// Re-export commonly used types
pub use error::{RecordError, Result};
pub use storage::RecordStore;
pub use time::start_of_utc_day;

pub use types::{
    Interaction, NewInteraction, NewUser, Stats, User, UserFilter, UserId, UserUpsert,
    INTERACTION_HISTORY_LIMIT,
};
