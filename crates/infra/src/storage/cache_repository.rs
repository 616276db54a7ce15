//! SQLite-backed cache repository.
//!
//! The booking collection lives under one key; validity is the presence of
//! a separate marker key. Invalidation deletes the marker and leaves the
//! collection in place, which is what keeps stale data readable.

use async_trait::async_trait;
use bookdesk_core::CacheRepository;
use bookdesk_domain::constants::{BOOKINGS_CACHE_KEY, BOOKINGS_CACHE_VALID_KEY};
use bookdesk_domain::{Booking, CachedBookings, Result};
use tracing::warn;

use super::kv::SqliteStateStore;
use crate::errors::InfraError;

const VALID_MARKER: &str = "1";

pub struct SqliteCacheRepository {
    store: SqliteStateStore,
}

impl SqliteCacheRepository {
    pub fn new(store: SqliteStateStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CacheRepository for SqliteCacheRepository {
    async fn load(&self) -> Result<Option<CachedBookings>> {
        let Some(raw) = self.store.get(BOOKINGS_CACHE_KEY).await? else {
            return Ok(None);
        };

        let bookings: Vec<Booking> = match serde_json::from_str(&raw) {
            Ok(bookings) => bookings,
            Err(e) => {
                warn!(error = %e, "persisted booking cache is corrupted, discarding");
                self.clear().await?;
                return Ok(None);
            }
        };

        let valid = self.store.get(BOOKINGS_CACHE_VALID_KEY).await?.is_some();
        Ok(Some(CachedBookings { bookings, valid }))
    }

    async fn save(&self, cache: &CachedBookings) -> Result<()> {
        let raw = serde_json::to_string(&cache.bookings).map_err(|e| InfraError::from(e).0)?;
        self.store.set(BOOKINGS_CACHE_KEY, &raw).await?;

        if cache.valid {
            self.store.set(BOOKINGS_CACHE_VALID_KEY, VALID_MARKER).await
        } else {
            self.store.delete(BOOKINGS_CACHE_VALID_KEY).await.map(|_| ())
        }
    }

    async fn clear(&self) -> Result<()> {
        self.store.delete(BOOKINGS_CACHE_KEY).await?;
        self.store.delete(BOOKINGS_CACHE_VALID_KEY).await?;
        Ok(())
    }
}
