//! Availability annotation for generated candidate slots
//!
//! Marks each candidate slot as past, booked, or available against the
//! merged booking list for the same resource and date. Per-slot results are
//! binary: the first conflicting booking wins. The whole-range variant that
//! returns every conflict lives in [`crate::reconcile::check_conflicts`].

use bookdesk_domain::{Booking, Result, SlotAvailability, TimeSlot};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::timezone::{parse_zone, resolve_local};

/// Annotate candidate slots for `date` in the resource's zone.
///
/// Cancelled bookings never conflict and are excluded up front. A slot is
/// `Past` when its wall-clock start is at or before `now` expressed in the
/// resource's local civil time (matching the booking service's semantics);
/// otherwise `Booked` when its half-open instant range overlaps any
/// remaining booking; otherwise `Available`.
pub fn annotate_slots(
    slots: &[NaiveTime],
    date: NaiveDate,
    zone: &str,
    bookings: &[Booking],
    slot_duration_minutes: u32,
    now: DateTime<Utc>,
) -> Result<Vec<TimeSlot>> {
    let tz = parse_zone(zone)?;
    let now_local = now.with_timezone(&tz).naive_local();
    let duration = Duration::minutes(i64::from(slot_duration_minutes));

    let active: Vec<&Booking> = bookings.iter().filter(|b| !b.is_canceled()).collect();

    let mut annotated = Vec::with_capacity(slots.len());
    for &slot in slots {
        let local_start = date.and_time(slot);

        let availability = if local_start <= now_local {
            SlotAvailability::Past
        } else {
            let slot_start = resolve_local(&tz, local_start)?;
            let slot_end = slot_start + duration;
            if active.iter().any(|b| b.overlaps(slot_start, slot_end)) {
                SlotAvailability::Booked
            } else {
                SlotAvailability::Available
            }
        };

        annotated.push(TimeSlot { start: slot, availability });
    }
    Ok(annotated)
}
