//! Domain types and models

pub mod booking;
pub mod overlay;
pub mod schedule;

pub use booking::{
    Booking, BookingDraft, BookingPatch, BookingStatus, BookingWindow, ConflictCheck, Location,
};
pub use overlay::{CachedBookings, ModifiedRecord, OverlayStats, SyncOutcome};
pub use schedule::{ScheduleBlock, SlotAvailability, TimeSlot};
