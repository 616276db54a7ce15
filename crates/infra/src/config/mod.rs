//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from a TOML file
//! 3. Probes multiple paths for config files
//!
//! ## Environment Variables
//! - `BOOKDESK_API_BASE_URL`: Base URL of the remote booking service
//! - `BOOKDESK_API_TIMEOUT_SECONDS`: Per-request timeout (optional)
//! - `BOOKDESK_API_MAX_ATTEMPTS`: Retry attempts per request (optional)
//! - `BOOKDESK_DB_PATH`: State database file path
//! - `BOOKDESK_DB_POOL_SIZE`: Connection pool size (optional)
//!
//! ## File Locations
//! The loader probes `./bookdesk.toml`, `./config.toml`, then the same two
//! names in the parent directory.

use std::path::{Path, PathBuf};

use bookdesk_domain::{BookdeskError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_MAX_ATTEMPTS: usize = 3;
const DEFAULT_POOL_SIZE: u32 = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_attempts")]
    pub max_attempts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookdeskConfig {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
}

/// Load configuration with automatic fallback strategy.
///
/// # Errors
/// Returns `BookdeskError::Config` when neither the environment nor a
/// probed config file yields a complete configuration.
pub fn load() -> Result<BookdeskConfig> {
    match load_from_env() {
        Ok(config) => {
            info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            debug!(error = ?e, "environment configuration incomplete, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables. The two required
/// variables are `BOOKDESK_API_BASE_URL` and `BOOKDESK_DB_PATH`.
pub fn load_from_env() -> Result<BookdeskConfig> {
    let base_url = env_var("BOOKDESK_API_BASE_URL")?;
    let db_path = env_var("BOOKDESK_DB_PATH")?;

    let timeout_seconds = env_parsed("BOOKDESK_API_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS)?;
    let max_attempts = env_parsed("BOOKDESK_API_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
    let pool_size = env_parsed("BOOKDESK_DB_POOL_SIZE", DEFAULT_POOL_SIZE)?;

    Ok(BookdeskConfig {
        api: ApiConfig { base_url, timeout_seconds, max_attempts },
        database: DatabaseConfig { path: db_path, pool_size },
    })
}

/// Load configuration from a TOML file. If `path` is `None`, probes the
/// standard locations.
pub fn load_from_file(path: Option<PathBuf>) -> Result<BookdeskConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BookdeskError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BookdeskError::Config("no config file found in any of the standard locations".into())
        })?,
    };

    let contents = std::fs::read_to_string(&config_path).map_err(|e| {
        BookdeskError::Config(format!("failed to read {}: {e}", config_path.display()))
    })?;
    let config: BookdeskConfig = toml::from_str(&contents).map_err(|e| {
        BookdeskError::Config(format!("invalid config file {}: {e}", config_path.display()))
    })?;

    info!(path = %config_path.display(), "configuration loaded from file");
    Ok(config)
}

fn probe_config_paths() -> Option<PathBuf> {
    const CANDIDATES: [&str; 4] =
        ["bookdesk.toml", "config.toml", "../bookdesk.toml", "../config.toml"];

    CANDIDATES.iter().map(Path::new).find(|p| p.exists()).map(Path::to_path_buf)
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| BookdeskError::Config(format!("missing environment variable {name}")))
}

fn env_parsed<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| BookdeskError::Config(format!("invalid value for {name}: {e}"))),
        Err(_) => Ok(default),
    }
}

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

const fn default_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

const fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}
