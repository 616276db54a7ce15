//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! scheduling core.

// Persisted state keys (key-value store surviving across sessions)
pub const MODIFIED_BOOKINGS_KEY: &str = "modified_bookings";
pub const BOOKINGS_CACHE_KEY: &str = "bookings_cache";
pub const BOOKINGS_CACHE_VALID_KEY: &str = "bookings_cache_valid";

// Slot generation defaults
pub const DEFAULT_SLOT_INTERVAL_MINUTES: u32 = 30;
pub const DEFAULT_SLOT_DURATION_MINUTES: u32 = 30;

// Wall-clock formats used at the presentation boundary
pub const WALL_CLOCK_FORMAT: &str = "%H:%M";
pub const CIVIL_DATE_FORMAT: &str = "%Y-%m-%d";

// User-facing fetch failure message (stale cache stays displayable)
pub const FETCH_BOOKINGS_FAILED_MSG: &str = "Failed to fetch bookings";
