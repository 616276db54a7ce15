//! Candidate slot generation from recurring weekly schedule blocks
//!
//! Generation is a raw expansion: blocks are processed in input order and
//! overlapping or duplicate blocks for the same weekday produce duplicate
//! candidate start times. Callers that need set semantics de-duplicate by
//! start time themselves; the expansion never imposes them, since a
//! multi-block schedule may legitimately repeat a start time.

use bookdesk_domain::ScheduleBlock;
use chrono::{Duration, NaiveTime, Weekday};
use tracing::warn;

/// Expand the schedule blocks for `weekday` into candidate slot start times.
///
/// Each block steps from its start to its end (exclusive) in fixed
/// `interval_minutes` increments. A trailing remainder shorter than the
/// interval is dropped; no partial slot is emitted. An empty result means
/// "no availability", not an error.
pub fn generate_slots(
    blocks: &[ScheduleBlock],
    weekday: Weekday,
    interval_minutes: u32,
) -> Vec<NaiveTime> {
    if interval_minutes == 0 {
        warn!(%weekday, "slot interval of zero minutes, returning empty expansion");
        return Vec::new();
    }
    let step = Duration::minutes(i64::from(interval_minutes));

    let mut slots = Vec::new();
    for block in blocks.iter().filter(|b| b.weekday == weekday) {
        let mut cursor = block.start_time;
        // NaiveTime addition wraps at midnight, so the bound is checked on
        // the remaining span rather than on `cursor + step`.
        while block.end_time.signed_duration_since(cursor) >= step {
            slots.push(cursor);
            cursor += step;
        }
        // A block ending exactly at its own start contributes nothing; a
        // block whose duration is not a multiple of the interval silently
        // drops the remainder.
    }
    slots
}
