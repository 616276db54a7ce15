//! Wire types for the remote booking service.
//!
//! The service exposes booking lifecycle as two boolean flags
//! (`isCanceled`, `isTemporary`); the conversions here collapse them into
//! the closed [`BookingStatus`] variant and expand it back when writing. A
//! cancelled booking wins over a tentative one when both flags are set.

use bookdesk_domain::{
    BookdeskError, Booking, BookingDraft, BookingPatch, BookingStatus, Location, Result,
    ScheduleBlock,
};
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    pub id: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: String,
    pub resource_id: String,
    #[serde(default)]
    pub service_id: Option<String>,
    pub location: LocationDto,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub is_canceled: bool,
    #[serde(default)]
    pub is_temporary: bool,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingDto {
    pub fn into_domain(self) -> Booking {
        let status = status_from_flags(self.is_canceled, self.is_temporary);
        Booking {
            id: self.id,
            resource_id: self.resource_id,
            service_id: self.service_id,
            location: Location { id: self.location.id, timezone: self.location.timezone },
            start: self.start,
            end: self.end,
            status,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            notes: self.notes,
        }
    }
}

/// Payload for creating a booking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreateDto {
    pub resource_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    pub location_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_canceled: bool,
    pub is_temporary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&BookingDraft> for BookingCreateDto {
    fn from(draft: &BookingDraft) -> Self {
        Self {
            resource_id: draft.resource_id.clone(),
            service_id: draft.service_id.clone(),
            location_id: draft.location_id.clone(),
            start: draft.start,
            end: draft.end,
            is_canceled: draft.status.is_canceled(),
            is_temporary: draft.status.is_temporary(),
            customer_name: draft.customer_name.clone(),
            customer_email: draft.customer_email.clone(),
            notes: draft.notes.clone(),
        }
    }
}

/// Partial update payload; absent fields are left untouched by the service.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatchDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_canceled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_temporary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&BookingPatch> for BookingPatchDto {
    fn from(patch: &BookingPatch) -> Self {
        let (is_canceled, is_temporary) = match patch.status {
            Some(status) => (Some(status.is_canceled()), Some(status.is_temporary())),
            None => (None, None),
        };
        Self {
            is_canceled,
            is_temporary,
            start: patch.start,
            end: patch.end,
            notes: patch.notes.clone(),
        }
    }
}

/// Weekly schedule block as served by the booking service. `dayOfWeek` is
/// zero-based from Monday.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBlockDto {
    pub resource_id: String,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

impl ScheduleBlockDto {
    pub fn into_domain(self) -> Result<ScheduleBlock> {
        let weekday = Weekday::try_from(self.day_of_week).map_err(|_| {
            BookdeskError::Conversion(format!("day of week {} out of range", self.day_of_week))
        })?;
        Ok(ScheduleBlock {
            resource_id: self.resource_id,
            weekday,
            start_time: parse_wall_clock(&self.start_time)?,
            end_time: parse_wall_clock(&self.end_time)?,
        })
    }
}

/// Error body the booking service attaches to rejections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

pub(crate) fn status_from_flags(is_canceled: bool, is_temporary: bool) -> BookingStatus {
    if is_canceled {
        BookingStatus::Cancelled
    } else if is_temporary {
        BookingStatus::Tentative
    } else {
        BookingStatus::Confirmed
    }
}

fn parse_wall_clock(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| BookdeskError::Conversion(format!("malformed wall-clock time '{value}': {e}")))
}
