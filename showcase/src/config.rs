//! Configuration for the showcase.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::auth::{DEFAULT_ADMIN_EMAIL, DEFAULT_LATENCY_MS};
use crate::storage::DEFAULT_TOKEN_KEY;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Default location of the token file
pub const DEFAULT_TOKEN_STORE_PATH: &str = ".tamil-tours/local-storage.json";

/// Log filter used when `RUST_LOG` is unset or unparseable
pub const DEFAULT_LOG_FILTER: &str = "tamil_tours_showcase=info,tamil_tours_runtime=info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseConfig {
    /// Alternative seed fixture; the bundled one is used when unset
    pub seed_path: Option<PathBuf>,
    /// Token persistence
    pub storage: StorageConfig,
    /// Mock authentication
    pub auth: AuthConfig,
    /// Log filter directives, from `RUST_LOG`
    pub log_level: String,
}

/// Token persistence configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the key/value pairs
    pub path: PathBuf,
    /// Key the token is stored under
    pub key: String,
}

/// Mock authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Simulated gateway delay in milliseconds (default: 1000)
    pub latency_ms: u64,
    /// Email granted the admin role
    pub admin_email: String,
    /// How long sign-in and registration may take in milliseconds (default: 5000)
    pub timeout_ms: u64,
}

impl AuthConfig {
    /// Simulated gateway delay
    #[must_use]
    pub const fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Wait bound for sign-in and registration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ShowcaseConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    ///
    /// Unparseable numbers fall back to their defaults.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            seed_path: lookup("TOUR_SEED_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            storage: StorageConfig {
                path: lookup("TOKEN_STORE_PATH")
                    .map_or_else(|| PathBuf::from(DEFAULT_TOKEN_STORE_PATH), PathBuf::from),
                key: lookup("TOKEN_STORAGE_KEY").unwrap_or_else(|| DEFAULT_TOKEN_KEY.to_string()),
            },
            auth: AuthConfig {
                latency_ms: lookup("AUTH_LATENCY_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_LATENCY_MS),
                admin_email: lookup("ADMIN_EMAIL")
                    .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
                timeout_ms: lookup("AUTH_TIMEOUT_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5000),
            },
            log_level: lookup("RUST_LOG")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Tracing filter built from `log_level`
    ///
    /// Directives that do not parse are logged against the default filter
    /// instead.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    }
}
