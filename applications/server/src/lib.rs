//! Botkeeper Server Library
//!
//! HTTP service recording chat-bot users and their interactions in a
//! document store.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod router;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{ServerConfig, StorageBackend};
pub use error::{Result, ServerError};
pub use router::create_router;
pub use state::AppState;
