//! Weekly schedule blocks and candidate time slots

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::constants::WALL_CLOCK_FORMAT;
use crate::errors::{BookdeskError, Result};

/// A recurring weekly availability window for a resource.
///
/// Blocks do not prevent other blocks from overlapping them on the same
/// weekday; duplicates simply expand into duplicate candidate slots, which
/// callers de-duplicate if they need set semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBlock {
    pub resource_id: String,
    pub weekday: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl ScheduleBlock {
    /// Validate the within-day start-before-end invariant.
    pub fn validate(&self) -> Result<()> {
        if self.start_time >= self.end_time {
            return Err(BookdeskError::InvalidInput(format!(
                "schedule block for {} on {} has start {} at or after end {}",
                self.resource_id, self.weekday, self.start_time, self.end_time
            )));
        }
        Ok(())
    }
}

/// Availability tri-state of a candidate slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotAvailability {
    Available,
    Booked,
    Past,
}

/// A candidate wall-clock start time with its derived availability.
///
/// Ephemeral: regenerated on every query, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub availability: SlotAvailability,
}

impl TimeSlot {
    /// Wall-clock label for presentation, e.g. `"09:30"`.
    pub fn label(&self) -> String {
        self.start.format(WALL_CLOCK_FORMAT).to_string()
    }

    pub fn is_available(&self) -> bool {
        self.availability == SlotAvailability::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_validation() {
        let block = ScheduleBlock {
            resource_id: "room-a".into(),
            weekday: Weekday::Mon,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        };
        assert!(block.validate().is_ok());

        let inverted = ScheduleBlock { end_time: block.start_time, ..block.clone() };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn slot_label_is_wall_clock() {
        let slot = TimeSlot {
            start: NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
            availability: SlotAvailability::Available,
        };
        assert_eq!(slot.label(), "09:05");
        assert!(slot.is_available());
    }
}
