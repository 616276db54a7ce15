//! # Bookdesk Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The remote booking service HTTP client
//! - SQLite-backed persistence for the overlay and the booking cache
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `bookdesk-core`
//! - Depends on `bookdesk-domain` and `bookdesk-core`
//! - Contains all "impure" code (I/O, wire formats)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use api::BookingApiClient;
pub use config::BookdeskConfig;
pub use errors::InfraError;
pub use http::HttpClient;
pub use storage::{SqliteCacheRepository, SqliteOverlayRepository, SqliteStateStore};
