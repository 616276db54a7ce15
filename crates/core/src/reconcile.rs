//! Reconciliation of server bookings with the local overlay
//!
//! The merged list is what the rest of the application treats as ground
//! truth. An overlay record represents an intent the server has not durably
//! confirmed, so it always shadows the server row with the same id; this
//! rule is also what makes the fetch/mutate race safe without locking (a
//! fetch that resolves after an overlay write cannot clobber the intent).

use std::collections::HashSet;

use bookdesk_domain::{Booking, ConflictCheck, ModifiedRecord};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Merge a freshly fetched server collection with the overlay.
///
/// `transform` normalizes each overlay record to the presentation shape of
/// server bookings and may drop a record by returning `None`; transformed
/// records without an identifier are dropped too. Server-derived rows come
/// first (the primary, fresher source for anything not locally overridden),
/// then the transformed overlay rows. Reapplying the same overlay to the
/// merged output is a fixpoint.
pub fn merge_with_api_bookings<F>(
    server: Vec<Booking>,
    overlay: &[ModifiedRecord],
    transform: F,
) -> Vec<Booking>
where
    F: Fn(&ModifiedRecord) -> Option<Booking>,
{
    let overlay_ids: HashSet<&str> = overlay.iter().map(ModifiedRecord::id).collect();

    // The local record always wins: drop the server row it shadows.
    let mut merged: Vec<Booking> =
        server.into_iter().filter(|b| !overlay_ids.contains(b.id.as_str())).collect();

    for record in overlay {
        match transform(record) {
            Some(booking) if !booking.id.is_empty() => merged.push(booking),
            Some(_) => {
                debug!(overlay_id = record.id(), "transformed overlay record lost its id, dropped");
            }
            None => {
                debug!(overlay_id = record.id(), "transform dropped overlay record");
            }
        }
    }
    merged
}

/// Whole-range conflict check used at booking-creation time.
///
/// Unlike per-slot annotation this returns every overlapping booking, so an
/// operator can review the complete list before overriding. Cancelled
/// bookings and bookings of other resources never conflict.
pub fn check_conflicts(
    resource_id: &str,
    proposed_start: DateTime<Utc>,
    proposed_end: DateTime<Utc>,
    existing: &[Booking],
) -> ConflictCheck {
    let conflicts: Vec<Booking> = existing
        .iter()
        .filter(|b| b.resource_id == resource_id && !b.is_canceled())
        .filter(|b| b.overlaps(proposed_start, proposed_end))
        .cloned()
        .collect();

    ConflictCheck { available: conflicts.is_empty(), conflicts }
}

#[cfg(test)]
mod tests {
    use bookdesk_domain::{BookingStatus, Location};
    use chrono::{Duration, TimeZone};

    use super::*;

    fn booking(id: &str, resource: &str, start_h: u32, status: BookingStatus) -> Booking {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, start_h, 0, 0).unwrap();
        Booking {
            id: id.into(),
            resource_id: resource.into(),
            service_id: None,
            location: Location { id: "loc-1".into(), timezone: "Asia/Hong_Kong".into() },
            start,
            end: start + Duration::minutes(30),
            status,
            customer_name: None,
            customer_email: None,
            notes: None,
        }
    }

    fn record(id: &str, status: BookingStatus) -> ModifiedRecord {
        ModifiedRecord::new(booking(id, "room-a", 10, status), Utc::now())
    }

    fn identity(record: &ModifiedRecord) -> Option<Booking> {
        Some(record.booking.clone())
    }

    #[test]
    fn overlay_record_shadows_server_row() {
        let server = vec![
            booking("x", "room-a", 10, BookingStatus::Confirmed),
            booking("y", "room-a", 11, BookingStatus::Confirmed),
        ];
        let overlay = vec![record("x", BookingStatus::Cancelled)];

        let merged = merge_with_api_bookings(server, &overlay, identity);

        assert_eq!(merged.len(), 2);
        let x: Vec<&Booking> = merged.iter().filter(|b| b.id == "x").collect();
        assert_eq!(x.len(), 1);
        assert_eq!(x[0].status, BookingStatus::Cancelled);
    }

    #[test]
    fn server_rows_come_first() {
        let server = vec![booking("y", "room-a", 11, BookingStatus::Confirmed)];
        let overlay = vec![record("x", BookingStatus::Tentative)];

        let merged = merge_with_api_bookings(server, &overlay, identity);
        assert_eq!(merged[0].id, "y");
        assert_eq!(merged[1].id, "x");
    }

    #[test]
    fn merge_is_idempotent() {
        let server = vec![
            booking("x", "room-a", 10, BookingStatus::Confirmed),
            booking("y", "room-a", 11, BookingStatus::Confirmed),
        ];
        let overlay = vec![record("x", BookingStatus::Cancelled), record("z", BookingStatus::Tentative)];

        let once = merge_with_api_bookings(server, &overlay, identity);
        let twice = merge_with_api_bookings(once.clone(), &overlay, identity);
        assert_eq!(once, twice);
    }

    #[test]
    fn transform_can_drop_records() {
        let overlay = vec![record("x", BookingStatus::Cancelled), record("y", BookingStatus::Confirmed)];

        let merged = merge_with_api_bookings(Vec::new(), &overlay, |r| {
            if r.id() == "x" {
                None
            } else {
                Some(r.booking.clone())
            }
        });
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "y");
    }

    #[test]
    fn transformed_record_without_id_is_dropped() {
        let overlay = vec![record("x", BookingStatus::Confirmed)];
        let merged = merge_with_api_bookings(Vec::new(), &overlay, |r| {
            let mut b = r.booking.clone();
            b.id = String::new();
            Some(b)
        });
        assert!(merged.is_empty());
    }

    #[test]
    fn conflict_check_returns_full_list() {
        let day = |h| Utc.with_ymd_and_hms(2026, 3, 2, h, 0, 0).unwrap();
        let existing = vec![
            booking("a", "room-a", 10, BookingStatus::Confirmed),
            booking("b", "room-a", 10, BookingStatus::Confirmed),
            booking("c", "room-a", 10, BookingStatus::Cancelled),
            booking("d", "room-b", 10, BookingStatus::Confirmed),
            booking("e", "room-a", 12, BookingStatus::Confirmed),
        ];

        let check = check_conflicts("room-a", day(10), day(11), &existing);
        assert!(!check.available);
        let ids: Vec<&str> = check.conflicts.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn conflict_check_boundaries_are_exclusive() {
        let day = |h| Utc.with_ymd_and_hms(2026, 3, 2, h, 0, 0).unwrap();
        let existing = vec![booking("a", "room-a", 10, BookingStatus::Confirmed)];

        // Existing is 10:00-10:30; a range starting exactly at 10:30 is free.
        let check = check_conflicts("room-a", day(10) + Duration::minutes(30), day(11), &existing);
        assert!(check.available);
        assert!(check.conflicts.is_empty());
    }
}
