//! Store of client-applied booking mutations awaiting server confirmation
//!
//! Each mutating operation loads the persisted record list, applies the
//! change, and saves the whole list back before returning, so a crash never
//! leaves a half-applied overlay. At most one record exists per booking id.
//! Every successful mutation also invalidates the booking cache, keeping
//! the merged view coherent on the next read.

use std::sync::Arc;

use bookdesk_domain::{
    BookdeskError, Booking, BookingStatus, ModifiedRecord, OverlayStats, Result,
};
use tracing::{debug, info, warn};

use crate::cache::BookingCacheService;
use crate::clock::Clock;
use crate::ports::OverlayRepository;

/// Persisted overlay of locally modified bookings.
pub struct ModifiedRecordStore {
    repo: Arc<dyn OverlayRepository>,
    cache: Arc<BookingCacheService>,
    clock: Arc<dyn Clock>,
}

impl ModifiedRecordStore {
    pub fn new(
        repo: Arc<dyn OverlayRepository>,
        cache: Arc<BookingCacheService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { repo, cache, clock }
    }

    /// All current overlay records.
    pub async fn list(&self) -> Result<Vec<ModifiedRecord>> {
        self.repo.load().await
    }

    /// The overlay record for one booking id, if present.
    pub async fn get(&self, id: &str) -> Result<Option<ModifiedRecord>> {
        Ok(self.repo.load().await?.into_iter().find(|r| r.id() == id))
    }

    /// Insert or replace the record for `booking.id`, stamped with the
    /// current clock. Invalidates the booking cache.
    pub async fn upsert(&self, booking: Booking) -> Result<ModifiedRecord> {
        if booking.id.is_empty() {
            return Err(BookdeskError::InvalidInput(
                "overlay record requires a booking id".into(),
            ));
        }

        let record = ModifiedRecord::new(booking, self.clock.now());
        let mut records = self.repo.load().await?;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.repo.save(&records).await?;
        debug!(booking_id = record.id(), status = ?record.booking.status, "overlay record upserted");

        self.cache.invalidate().await?;
        Ok(record)
    }

    /// Remove the record for `id`, typically after the server confirmed the
    /// mutation. Removing an absent id is a no-op. Invalidates the booking
    /// cache when a record was actually removed.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let mut records = self.repo.load().await?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }

        self.repo.save(&records).await?;
        debug!(booking_id = id, "overlay record removed");
        self.cache.invalidate().await?;
        Ok(true)
    }

    /// Record a local cancellation of `booking`.
    pub async fn cancel(&self, booking: Booking) -> Result<ModifiedRecord> {
        self.upsert(booking.with_status(BookingStatus::Cancelled)).await
    }

    /// Record a local un-cancellation of `booking`.
    pub async fn reactivate(&self, booking: Booking) -> Result<ModifiedRecord> {
        self.upsert(booking.with_status(BookingStatus::Confirmed)).await
    }

    /// Record or clear a local tentative marker on `booking`.
    pub async fn mark_tentative(&self, booking: Booking, tentative: bool) -> Result<ModifiedRecord> {
        let status = if tentative { BookingStatus::Tentative } else { BookingStatus::Confirmed };
        self.upsert(booking.with_status(status)).await
    }

    /// Drop records that lost their booking id, which can only come from
    /// corrupted persisted data. Silent housekeeping, never an error.
    pub async fn cleanup(&self) -> Result<usize> {
        let mut records = self.repo.load().await?;
        let before = records.len();
        records.retain(|r| !r.id().is_empty());
        let dropped = before - records.len();
        if dropped == 0 {
            return Ok(0);
        }

        self.repo.save(&records).await?;
        info!(dropped, "dropped overlay records without a booking id");
        self.cache.invalidate().await?;
        Ok(dropped)
    }

    /// Tally current records by status.
    pub async fn stats(&self) -> Result<OverlayStats> {
        Ok(OverlayStats::from_records(&self.repo.load().await?))
    }

    /// Drop every record. Operator escape hatch for a wedged overlay.
    pub async fn clear(&self) -> Result<usize> {
        let records = self.repo.load().await?;
        let count = records.len();
        if count > 0 {
            self.repo.save(&[]).await?;
            warn!(count, "overlay cleared");
            self.cache.invalidate().await?;
        }
        Ok(count)
    }
}
