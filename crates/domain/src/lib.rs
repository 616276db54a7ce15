//! # Bookdesk Domain
//!
//! Business domain types and models for the Bookdesk scheduling core.
//!
//! This crate contains:
//! - Booking, schedule-block, and slot data types
//! - The overlay (modified record) and cache entry models
//! - Domain error types and Result definitions
//! - Domain constants (storage keys, defaults)
//!
//! ## Architecture
//! - No dependencies on other Bookdesk crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
