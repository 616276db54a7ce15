//! SQLite-backed persistence.

pub mod cache_repository;
pub mod kv;
pub mod overlay_repository;

pub use cache_repository::SqliteCacheRepository;
pub use kv::SqliteStateStore;
pub use overlay_repository::SqliteOverlayRepository;
