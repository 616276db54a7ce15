//! Booking data types
//!
//! A booking is a reservation of a resource for a half-open instant range
//! `[start, end)`. Status is a closed variant; the `is_canceled` /
//! `is_temporary` flags the remote service exposes are derived from it and
//! cannot drift out of sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{BookdeskError, Result};

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

impl BookingStatus {
    /// Derived flag matching the remote service's `is_canceled` field.
    pub fn is_canceled(self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Derived flag matching the remote service's `is_temporary` field.
    pub fn is_temporary(self) -> bool {
        matches!(self, Self::Tentative)
    }
}

/// Bookable location; carries the fixed IANA timezone all wall-clock
/// computations for its resources run in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    /// IANA zone name, e.g. `Asia/Hong_Kong`.
    pub timezone: String,
}

/// A reservation of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub resource_id: String,
    pub service_id: Option<String>,
    pub location: Location,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub notes: Option<String>,
}

impl Booking {
    /// Validate the start-before-end invariant.
    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(BookdeskError::InvalidInput(format!(
                "booking {} start {} must precede end {}",
                self.id, self.start, self.end
            )));
        }
        Ok(())
    }

    pub fn is_canceled(&self) -> bool {
        self.status.is_canceled()
    }

    pub fn is_temporary(&self) -> bool {
        self.status.is_temporary()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Half-open overlap test against `[start, end)`. Touching boundaries
    /// (`self.end == start` or `self.start == end`) do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }

    /// Copy this booking with a different status. Used to synthesize
    /// client-only mutations for the overlay.
    pub fn with_status(&self, status: BookingStatus) -> Self {
        Self { status, ..self.clone() }
    }
}

/// Instant window a booking listing is fetched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BookingWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(BookdeskError::InvalidInput(format!(
                "window start {start} must precede end {end}"
            )));
        }
        Ok(Self { start, end })
    }
}

/// Fields for creating a booking via the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub resource_id: String,
    pub service_id: Option<String>,
    pub location_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub notes: Option<String>,
}

/// Partial update for a booking. `None` fields are left untouched by the
/// remote service; status changes are the supported mutation path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BookingPatch {
    pub fn status(status: BookingStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.start.is_none() && self.end.is_none() && self.notes.is_none()
    }
}

/// Result of a whole-range conflict check at booking-creation time.
///
/// Unlike per-slot annotation (which is binary), this carries every
/// overlapping booking so an operator can review the full list before
/// overriding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheck {
    pub available: bool,
    pub conflicts: Vec<Booking>,
}
