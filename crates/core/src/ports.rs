//! Infrastructure port interfaces
//!
//! Implemented by `bookdesk-infra`: the remote booking service client and
//! the persisted key-value state underneath the overlay and the cache.

use async_trait::async_trait;
use bookdesk_domain::{
    Booking, BookingDraft, BookingPatch, BookingWindow, CachedBookings, ModifiedRecord, Result,
    ScheduleBlock,
};

/// Remote JSON-over-HTTP booking service operations this core consumes.
///
/// The exact wire shape is owned by the collaborator service; implementors
/// translate it to domain types.
#[async_trait]
pub trait BookingsApi: Send + Sync {
    /// Fetch all bookings for a resource within an instant window.
    async fn fetch_bookings(
        &self,
        resource_id: &str,
        window: BookingWindow,
    ) -> Result<Vec<Booking>>;

    /// Fetch the recurring weekly schedule blocks for a resource.
    async fn fetch_schedule_blocks(&self, resource_id: &str) -> Result<Vec<ScheduleBlock>>;

    /// Create a booking.
    async fn create_booking(&self, draft: &BookingDraft) -> Result<Booking>;

    /// Partially update a booking; status changes are the supported path
    /// for cancel/reactivate/tentative mutations.
    async fn update_booking(&self, id: &str, patch: &BookingPatch) -> Result<()>;

    /// Delete a booking by identifier.
    async fn delete_booking(&self, id: &str) -> Result<()>;
}

/// Persistence for the overlay of client-applied booking mutations.
///
/// Loading is lenient: corrupted persisted elements are skipped and logged
/// by the implementation, never surfaced to callers.
#[async_trait]
pub trait OverlayRepository: Send + Sync {
    async fn load(&self) -> Result<Vec<ModifiedRecord>>;
    async fn save(&self, records: &[ModifiedRecord]) -> Result<()>;
}

/// Persistence for the last-fetched booking collection and its validity
/// flag.
#[async_trait]
pub trait CacheRepository: Send + Sync {
    async fn load(&self) -> Result<Option<CachedBookings>>;
    async fn save(&self, cache: &CachedBookings) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}
