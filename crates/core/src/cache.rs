//! Cache invalidation state machine for fetched booking collections
//!
//! Two states govern reuse of the last-fetched collection: `Valid` (may be
//! reused) and `Invalid` (must refetch on next read). Staleness is purely
//! event-driven: overlay mutations invalidate, a successful fresh fetch
//! validates, an explicit clear drops the collection. There is no
//! time-based expiry. The machine hydrates lazily from its repository on
//! first access and persists every transition.

use std::sync::Arc;

use bookdesk_domain::{Booking, CachedBookings, Result};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::ports::CacheRepository;

/// Reuse-vs-refetch state of the cached booking collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// The cached collection may be reused without refetching.
    Valid,
    /// The next read must refetch. Initial state on first load.
    Invalid,
}

#[derive(Debug, Clone)]
struct CacheSlot {
    bookings: Option<Vec<Booking>>,
    valid: bool,
}

/// Persisted booking-collection cache with event-driven validity.
pub struct BookingCacheService {
    repo: Arc<dyn CacheRepository>,
    // Hydrated lazily on first access; None until then. The lock is never
    // held across an await.
    slot: Mutex<Option<CacheSlot>>,
}

impl BookingCacheService {
    pub fn new(repo: Arc<dyn CacheRepository>) -> Self {
        Self { repo, slot: Mutex::new(None) }
    }

    async fn snapshot(&self) -> Result<CacheSlot> {
        if let Some(slot) = self.slot.lock().clone() {
            return Ok(slot);
        }

        let slot = match self.repo.load().await? {
            Some(cached) => CacheSlot { bookings: Some(cached.bookings), valid: cached.valid },
            None => CacheSlot { bookings: None, valid: false },
        };
        debug!(valid = slot.valid, hydrated = slot.bookings.is_some(), "booking cache hydrated");
        *self.slot.lock() = Some(slot.clone());
        Ok(slot)
    }

    /// Current state of the machine.
    pub async fn state(&self) -> Result<CacheState> {
        let slot = self.snapshot().await?;
        Ok(if slot.valid && slot.bookings.is_some() { CacheState::Valid } else { CacheState::Invalid })
    }

    /// True when the next read must go to the remote service. Used by
    /// page-navigation and window-focus signals, which refetch only from
    /// the `Invalid` state.
    pub async fn needs_refetch(&self) -> Result<bool> {
        Ok(self.state().await? == CacheState::Invalid)
    }

    /// The reusable collection, present only in the `Valid` state.
    pub async fn cached(&self) -> Result<Option<Vec<Booking>>> {
        let slot = self.snapshot().await?;
        Ok(if slot.valid { slot.bookings } else { None })
    }

    /// The stored collection regardless of validity. A fetch failure keeps
    /// the stale collection available for display.
    pub async fn stale(&self) -> Result<Option<Vec<Booking>>> {
        Ok(self.snapshot().await?.bookings)
    }

    /// Record a successful fresh fetch: store the raw collection and enter
    /// `Valid`. The only transition that sets the validity flag.
    pub async fn store(&self, bookings: Vec<Booking>) -> Result<()> {
        let cached = CachedBookings { bookings: bookings.clone(), valid: true };
        self.repo.save(&cached).await?;
        *self.slot.lock() = Some(CacheSlot { bookings: Some(bookings), valid: true });
        debug!(count = cached.bookings.len(), "booking cache stored and validated");
        Ok(())
    }

    /// Force `Invalid`, keeping the stale collection readable. Fired by
    /// every overlay mutation and every attempted remote mutation.
    pub async fn invalidate(&self) -> Result<()> {
        let slot = self.snapshot().await?;
        if slot.valid {
            debug!("booking cache invalidated");
        }
        let bookings = slot.bookings;
        self.repo
            .save(&CachedBookings { bookings: bookings.clone().unwrap_or_default(), valid: false })
            .await?;
        *self.slot.lock() = Some(CacheSlot { bookings, valid: false });
        Ok(())
    }

    /// Operator-facing clear: drop the stored collection and force
    /// `Invalid`.
    pub async fn clear(&self) -> Result<()> {
        self.repo.clear().await?;
        *self.slot.lock() = Some(CacheSlot { bookings: None, valid: false });
        info!("booking cache cleared");
        Ok(())
    }
}
