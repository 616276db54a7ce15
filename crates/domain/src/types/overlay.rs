//! Overlay and cache entry models
//!
//! The overlay holds client-applied booking mutations the remote service is
//! not guaranteed to reflect (cancellations past a threshold, tentative
//! markers). It is merged deterministically with fetched server data; the
//! local record always wins for its booking id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::booking::{Booking, BookingStatus};

/// A booking-shaped value stored in the overlay, stamped at mutation time.
///
/// At most one record exists per booking id; a later mutation overwrites the
/// earlier record rather than accumulating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedRecord {
    pub booking: Booking,
    pub updated_at: DateTime<Utc>,
}

impl ModifiedRecord {
    pub fn new(booking: Booking, updated_at: DateTime<Utc>) -> Self {
        Self { booking, updated_at }
    }

    pub fn id(&self) -> &str {
        &self.booking.id
    }
}

/// Operator-facing counts over the current overlay records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStats {
    pub total: usize,
    pub cancelled: usize,
    pub tentative: usize,
    pub confirmed: usize,
}

impl OverlayStats {
    /// Tally records by status.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ModifiedRecord>,
    {
        let mut stats = Self::default();
        for record in records {
            stats.total += 1;
            match record.booking.status {
                BookingStatus::Cancelled => stats.cancelled += 1,
                BookingStatus::Tentative => stats.tentative += 1,
                BookingStatus::Confirmed => stats.confirmed += 1,
            }
        }
        stats
    }
}

/// Outcome of a two-phase optimistic mutation.
///
/// The overlay is written first; the remote call may then confirm the
/// mutation or refuse it inside the time-restriction window. Callers use
/// the distinction to render a "pending sync" indicator instead of silently
/// conflating the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SyncOutcome {
    /// Remote service accepted the mutation; the overlay entry was released.
    Confirmed,
    /// Only the local overlay holds the mutation.
    LocalOnly { reason: String },
}

impl SyncOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

/// Last-fetched raw server collection plus its validity flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedBookings {
    pub bookings: Vec<Booking>,
    pub valid: bool,
}
