//! SQLite-backed overlay repository.
//!
//! Records are persisted as one JSON array under a fixed key. Loading is
//! lenient element-wise: a corrupted element is skipped and logged rather
//! than poisoning the whole overlay, so one bad record never blocks every
//! pending mutation.

use async_trait::async_trait;
use bookdesk_core::OverlayRepository;
use bookdesk_domain::constants::MODIFIED_BOOKINGS_KEY;
use bookdesk_domain::{ModifiedRecord, Result};
use tracing::warn;

use super::kv::SqliteStateStore;
use crate::errors::InfraError;

pub struct SqliteOverlayRepository {
    store: SqliteStateStore,
}

impl SqliteOverlayRepository {
    pub fn new(store: SqliteStateStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OverlayRepository for SqliteOverlayRepository {
    async fn load(&self) -> Result<Vec<ModifiedRecord>> {
        let Some(raw) = self.store.get(MODIFIED_BOOKINGS_KEY).await? else {
            return Ok(Vec::new());
        };

        let elements: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(elements) => elements,
            Err(e) => {
                warn!(error = %e, "persisted overlay is not a JSON array, treating as empty");
                return Ok(Vec::new());
            }
        };

        let mut records = Vec::with_capacity(elements.len());
        for element in elements {
            match serde_json::from_value::<ModifiedRecord>(element) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(error = %e, "skipping corrupted overlay record");
                }
            }
        }
        Ok(records)
    }

    async fn save(&self, records: &[ModifiedRecord]) -> Result<()> {
        let raw = serde_json::to_string(records).map_err(|e| InfraError::from(e).0)?;
        self.store.set(MODIFIED_BOOKINGS_KEY, &raw).await
    }
}
