//! Shared fixtures for booking service tests: an in-memory booking API with
//! programmable failure modes, in-memory repositories, and a canned Hong
//! Kong resource.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bookdesk_core::{
    BookingCacheService, BookingService, BookingsApi, CacheRepository, MockClock,
    ModifiedRecordStore, OverlayRepository,
};
use bookdesk_domain::{
    BookdeskError, Booking, BookingDraft, BookingPatch, BookingStatus, BookingWindow,
    CachedBookings, Location, ModifiedRecord, RejectionKind, Result, ScheduleBlock,
};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc, Weekday};
use parking_lot::Mutex;

pub const ZONE: &str = "Asia/Hong_Kong";
pub const RESOURCE: &str = "room-a";

/// How the mock API answers `update_booking`.
#[derive(Debug, Clone)]
pub enum UpdateBehavior {
    Accept,
    TimeRestriction(String),
    NetworkError(String),
}

#[derive(Default)]
pub struct MockApi {
    pub bookings: Mutex<Vec<Booking>>,
    pub blocks: Mutex<Vec<ScheduleBlock>>,
    pub fail_fetch: AtomicBool,
    pub fetch_calls: AtomicUsize,
    pub update_behavior: Mutex<Option<UpdateBehavior>>,
    pub updates: Mutex<Vec<(String, BookingPatch)>>,
    pub created: Mutex<Vec<BookingDraft>>,
    pub delete_fail_ids: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookingsApi for MockApi {
    async fn fetch_bookings(&self, _resource_id: &str, _window: BookingWindow) -> Result<Vec<Booking>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(BookdeskError::Network("connection refused".into()));
        }
        Ok(self.bookings.lock().clone())
    }

    async fn fetch_schedule_blocks(&self, _resource_id: &str) -> Result<Vec<ScheduleBlock>> {
        Ok(self.blocks.lock().clone())
    }

    async fn create_booking(&self, draft: &BookingDraft) -> Result<Booking> {
        self.created.lock().push(draft.clone());
        Ok(Booking {
            id: format!("created-{}", self.created.lock().len()),
            resource_id: draft.resource_id.clone(),
            service_id: draft.service_id.clone(),
            location: Location { id: draft.location_id.clone(), timezone: ZONE.into() },
            start: draft.start,
            end: draft.end,
            status: draft.status,
            customer_name: draft.customer_name.clone(),
            customer_email: draft.customer_email.clone(),
            notes: draft.notes.clone(),
        })
    }

    async fn update_booking(&self, id: &str, patch: &BookingPatch) -> Result<()> {
        self.updates.lock().push((id.to_string(), patch.clone()));
        match self.update_behavior.lock().clone().unwrap_or(UpdateBehavior::Accept) {
            UpdateBehavior::Accept => Ok(()),
            UpdateBehavior::TimeRestriction(message) => Err(BookdeskError::MutationRejected {
                kind: RejectionKind::TimeRestriction,
                message,
            }),
            UpdateBehavior::NetworkError(message) => Err(BookdeskError::Network(message)),
        }
    }

    async fn delete_booking(&self, id: &str) -> Result<()> {
        if self.delete_fail_ids.lock().iter().any(|f| f == id) {
            return Err(BookdeskError::Network("delete failed".into()));
        }
        self.deleted.lock().push(id.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryOverlayRepo {
    records: Mutex<Vec<ModifiedRecord>>,
}

#[async_trait]
impl OverlayRepository for MemoryOverlayRepo {
    async fn load(&self) -> Result<Vec<ModifiedRecord>> {
        Ok(self.records.lock().clone())
    }

    async fn save(&self, records: &[ModifiedRecord]) -> Result<()> {
        *self.records.lock() = records.to_vec();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCacheRepo {
    stored: Mutex<Option<CachedBookings>>,
}

#[async_trait]
impl CacheRepository for MemoryCacheRepo {
    async fn load(&self) -> Result<Option<CachedBookings>> {
        Ok(self.stored.lock().clone())
    }

    async fn save(&self, cache: &CachedBookings) -> Result<()> {
        *self.stored.lock() = Some(cache.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.stored.lock() = None;
        Ok(())
    }
}

pub struct Fixture {
    pub service: BookingService,
    pub api: Arc<MockApi>,
    pub cache: Arc<BookingCacheService>,
    pub overlay: Arc<ModifiedRecordStore>,
    pub clock: Arc<MockClock>,
}

pub fn fixture() -> Fixture {
    let api = Arc::new(MockApi::default());
    let cache = Arc::new(BookingCacheService::new(Arc::new(MemoryCacheRepo::default())));
    let clock = Arc::new(MockClock::new(now()));
    let overlay = Arc::new(ModifiedRecordStore::new(
        Arc::new(MemoryOverlayRepo::default()),
        cache.clone(),
        clock.clone(),
    ));
    let service =
        BookingService::new(api.clone(), overlay.clone(), cache.clone(), clock.clone());
    Fixture { service, api, cache, overlay, clock }
}

/// 2026-03-01, the day before the Monday the fixtures book on.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
}

/// Instant of an HK wall-clock hour on Monday 2026-03-02.
pub fn hk_monday(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap() - Duration::hours(8)
}

pub fn window() -> BookingWindow {
    BookingWindow::new(hk_monday(0, 0), hk_monday(0, 0) + Duration::days(1)).unwrap()
}

pub fn booking(id: &str, start: DateTime<Utc>, status: BookingStatus) -> Booking {
    Booking {
        id: id.into(),
        resource_id: RESOURCE.into(),
        service_id: None,
        location: Location { id: "loc-hk".into(), timezone: ZONE.into() },
        start,
        end: start + Duration::minutes(30),
        status,
        customer_name: Some("Dana Reyes".into()),
        customer_email: None,
        notes: None,
    }
}

pub fn monday_block(start: (u32, u32), end: (u32, u32)) -> ScheduleBlock {
    ScheduleBlock {
        resource_id: RESOURCE.into(),
        weekday: Weekday::Mon,
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
    }
}

pub fn draft(start: DateTime<Utc>, minutes: i64) -> BookingDraft {
    BookingDraft {
        resource_id: RESOURCE.into(),
        service_id: None,
        location_id: "loc-hk".into(),
        start,
        end: start + Duration::minutes(minutes),
        status: BookingStatus::Confirmed,
        customer_name: Some("Dana Reyes".into()),
        customer_email: None,
        notes: None,
    }
}
