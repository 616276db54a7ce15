//! # Bookdesk Core
//!
//! Pure scheduling logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Timezone conversion and dual-zone display helpers
//! - Time-slot generation and availability annotation
//! - The overlay store and reconciliation merge
//! - The cache invalidation state machine
//! - Port/adapter interfaces (traits) implemented by `bookdesk-infra`
//!
//! ## Architecture Principles
//! - Only depends on `bookdesk-domain`
//! - No database or HTTP code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod availability;
pub mod cache;
pub mod clock;
pub mod overlay;
pub mod ports;
pub mod reconcile;
pub mod service;
pub mod slots;
pub mod timezone;

// Re-export specific items to avoid ambiguity
pub use availability::annotate_slots;
pub use cache::{BookingCacheService, CacheState};
pub use clock::{Clock, MockClock, SystemClock};
pub use overlay::ModifiedRecordStore;
pub use ports::{BookingsApi, CacheRepository, OverlayRepository};
pub use reconcile::{check_conflicts, merge_with_api_bookings};
pub use service::{BookingService, BulkDeleteOutcome, DeleteFailure};
pub use slots::generate_slots;
