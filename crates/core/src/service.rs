//! Booking orchestration service
//!
//! Ties the remote booking service, the overlay store, and the cache state
//! machine together behind one facade. Reads go through the cache when it
//! is valid and always end with an overlay merge; status mutations are
//! two-phase (overlay first, then the remote call) so a refused remote
//! mutation still holds locally.

use std::sync::Arc;

use bookdesk_domain::constants::FETCH_BOOKINGS_FAILED_MSG;
use bookdesk_domain::{
    BookdeskError, Booking, BookingDraft, BookingPatch, BookingStatus, BookingWindow,
    ConflictCheck, RejectionKind, Result, SyncOutcome, TimeSlot,
};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::availability::annotate_slots;
use crate::cache::BookingCacheService;
use crate::clock::Clock;
use crate::overlay::ModifiedRecordStore;
use crate::ports::BookingsApi;
use crate::reconcile::{check_conflicts, merge_with_api_bookings};
use crate::slots::generate_slots;
use crate::timezone::{parse_zone, resolve_local};

/// Per-id results of a bulk delete. Ids are independent; one failure never
/// aborts the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteOutcome {
    pub deleted: Vec<String>,
    pub failed: Vec<DeleteFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFailure {
    pub id: String,
    pub error: String,
}

/// Facade over fetch, merge, availability, and booking mutations.
pub struct BookingService {
    api: Arc<dyn BookingsApi>,
    overlay: Arc<ModifiedRecordStore>,
    cache: Arc<BookingCacheService>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(
        api: Arc<dyn BookingsApi>,
        overlay: Arc<ModifiedRecordStore>,
        cache: Arc<BookingCacheService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { api, overlay, cache, clock }
    }

    pub fn overlay(&self) -> &ModifiedRecordStore {
        &self.overlay
    }

    pub fn cache(&self) -> &BookingCacheService {
        &self.cache
    }

    /// The merged booking list for a resource and window, served from the
    /// cache when it is valid and fetched otherwise.
    pub async fn bookings(
        &self,
        resource_id: &str,
        window: BookingWindow,
    ) -> Result<Vec<Booking>> {
        let raw = match self.cache.cached().await? {
            Some(cached) => {
                debug!(count = cached.len(), "serving bookings from valid cache");
                cached
            }
            None => self.fetch_and_store(resource_id, window).await?,
        };
        self.merged(raw).await
    }

    /// Force a fresh fetch, bypassing cache validity.
    pub async fn refresh(
        &self,
        resource_id: &str,
        window: BookingWindow,
    ) -> Result<Vec<Booking>> {
        let raw = self.fetch_and_store(resource_id, window).await?;
        self.merged(raw).await
    }

    /// The merged view over whatever is stored, valid or stale. `None` when
    /// nothing was ever fetched.
    pub async fn cached_bookings(&self) -> Result<Option<Vec<Booking>>> {
        match self.cache.stale().await? {
            Some(raw) => Ok(Some(self.merged(raw).await?)),
            None => Ok(None),
        }
    }

    /// Page-navigation / window-focus hook: refetch only when the cache is
    /// invalid. Returns the refreshed merged list, or `None` when the cache
    /// was still valid and nothing was fetched.
    pub async fn on_visibility_signal(
        &self,
        resource_id: &str,
        window: BookingWindow,
    ) -> Result<Option<Vec<Booking>>> {
        if !self.cache.needs_refetch().await? {
            debug!("visibility signal ignored, cache still valid");
            return Ok(None);
        }
        Ok(Some(self.refresh(resource_id, window).await?))
    }

    /// Candidate slots for one civil date, annotated past/booked/available
    /// against the merged booking list for that resource.
    pub async fn available_slots(
        &self,
        resource_id: &str,
        date: NaiveDate,
        zone: &str,
        interval_minutes: u32,
        slot_duration_minutes: u32,
    ) -> Result<Vec<TimeSlot>> {
        let blocks = self.api.fetch_schedule_blocks(resource_id).await?;
        let slots = generate_slots(&blocks, date.weekday(), interval_minutes);
        if slots.is_empty() {
            return Ok(Vec::new());
        }

        let window = civil_day_window(date, zone)?;
        let bookings: Vec<Booking> = self
            .bookings(resource_id, window)
            .await?
            .into_iter()
            .filter(|b| b.resource_id == resource_id)
            .collect();

        annotate_slots(&slots, date, zone, &bookings, slot_duration_minutes, self.clock.now())
    }

    /// Whole-range conflict check against the merged booking list.
    pub async fn check_range(
        &self,
        resource_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ConflictCheck> {
        let window = BookingWindow::new(start, end)?;
        let bookings = self.bookings(resource_id, window).await?;
        Ok(check_conflicts(resource_id, start, end, &bookings))
    }

    /// Create a booking after a conflict precheck.
    ///
    /// A conflicting range is refused outright. A precheck that cannot run
    /// because the fetch failed is logged and skipped; the remote service
    /// remains the final arbiter.
    pub async fn create_booking(&self, draft: &BookingDraft) -> Result<Booking> {
        if draft.start >= draft.end {
            return Err(BookdeskError::InvalidInput(format!(
                "draft start {} must precede end {}",
                draft.start, draft.end
            )));
        }

        match self.check_range(&draft.resource_id, draft.start, draft.end).await {
            Ok(check) if !check.available => {
                return Err(BookdeskError::InvalidInput(format!(
                    "requested range conflicts with {} existing booking(s)",
                    check.conflicts.len()
                )));
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "conflict precheck unavailable, deferring to the remote service");
            }
        }

        let created = self.api.create_booking(draft).await?;
        info!(booking_id = %created.id, resource_id = %created.resource_id, "booking created");
        self.cache.invalidate().await?;
        Ok(created)
    }

    /// Cancel a booking, two-phase.
    pub async fn cancel_booking(&self, booking: Booking) -> Result<SyncOutcome> {
        self.push_status(booking, BookingStatus::Cancelled).await
    }

    /// Undo a cancellation, two-phase.
    pub async fn reactivate_booking(&self, booking: Booking) -> Result<SyncOutcome> {
        self.push_status(booking, BookingStatus::Confirmed).await
    }

    /// Set or clear a booking's tentative marker, two-phase.
    pub async fn set_tentative(&self, booking: Booking, tentative: bool) -> Result<SyncOutcome> {
        let status = if tentative { BookingStatus::Tentative } else { BookingStatus::Confirmed };
        self.push_status(booking, status).await
    }

    /// Delete bookings one by one; each id succeeds or fails independently.
    pub async fn delete_bookings(&self, ids: &[String]) -> Result<BulkDeleteOutcome> {
        let mut outcome = BulkDeleteOutcome::default();
        for id in ids {
            match self.api.delete_booking(id).await {
                Ok(()) => {
                    // A pending overlay record for a deleted booking is moot.
                    self.overlay.remove(id).await?;
                    outcome.deleted.push(id.clone());
                }
                Err(e) => {
                    warn!(booking_id = %id, error = %e, "delete failed, continuing with remaining ids");
                    outcome.failed.push(DeleteFailure { id: id.clone(), error: e.to_string() });
                }
            }
        }

        if !outcome.deleted.is_empty() {
            self.cache.invalidate().await?;
            info!(
                deleted = outcome.deleted.len(),
                failed = outcome.failed.len(),
                "bulk delete finished"
            );
        }
        Ok(outcome)
    }

    /// Overlay first, then the remote patch. A time-restriction refusal is
    /// absorbed into `LocalOnly` with the overlay record kept; any other
    /// failure propagates, also with the record kept for a later retry.
    async fn push_status(&self, booking: Booking, status: BookingStatus) -> Result<SyncOutcome> {
        let id = booking.id.clone();
        self.overlay.upsert(booking.with_status(status)).await?;

        match self.api.update_booking(&id, &BookingPatch::status(status)).await {
            Ok(()) => {
                self.overlay.remove(&id).await?;
                info!(booking_id = %id, ?status, "status change confirmed by remote service");
                Ok(SyncOutcome::Confirmed)
            }
            Err(BookdeskError::MutationRejected {
                kind: RejectionKind::TimeRestriction,
                message,
            }) => {
                warn!(
                    booking_id = %id,
                    ?status,
                    reason = %message,
                    "remote service refused the status change, keeping it local"
                );
                Ok(SyncOutcome::LocalOnly { reason: message })
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_and_store(
        &self,
        resource_id: &str,
        window: BookingWindow,
    ) -> Result<Vec<Booking>> {
        match self.api.fetch_bookings(resource_id, window).await {
            Ok(fresh) => {
                debug!(resource_id, count = fresh.len(), "bookings fetched");
                self.cache.store(fresh.clone()).await?;
                Ok(fresh)
            }
            Err(e) => {
                warn!(resource_id, error = %e, "{FETCH_BOOKINGS_FAILED_MSG}");
                match self.cache.stale().await? {
                    Some(stale) => {
                        warn!(count = stale.len(), "falling back to stale cached bookings");
                        Ok(stale)
                    }
                    None => Err(e),
                }
            }
        }
    }

    async fn merged(&self, raw: Vec<Booking>) -> Result<Vec<Booking>> {
        let overlay = self.overlay.list().await?;
        Ok(merge_with_api_bookings(raw, &overlay, |r| Some(r.booking.clone())))
    }
}

/// The instant window covering one civil date in a zone.
fn civil_day_window(date: NaiveDate, zone: &str) -> Result<BookingWindow> {
    let tz = parse_zone(zone)?;
    let next = date
        .succ_opt()
        .ok_or_else(|| BookdeskError::Internal(format!("date {date} has no successor")))?;

    let start = resolve_local(&tz, date.and_time(NaiveTime::MIN))?;
    let end = resolve_local(&tz, next.and_time(NaiveTime::MIN))?;
    BookingWindow::new(start, end)
}
