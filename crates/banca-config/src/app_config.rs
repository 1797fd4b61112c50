//! Application configuration structures.

use banca_core::{BancaError, BancaResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Local database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Remote store configuration.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Notification bus configuration.
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl AppConfig {
    /// Validates the configuration at startup.
    pub fn validate(&self) -> BancaResult<()> {
        if self.database.url.is_empty() {
            return Err(BancaError::Configuration(
                "database.url must not be empty".to_string(),
            ));
        }
        Url::parse(&self.remote.base_url).map_err(|e| {
            BancaError::Configuration(format!(
                "remote.base_url '{}' is not a valid URL: {}",
                self.remote.base_url, e
            ))
        })?;
        if self.cache.max_entries == 0 {
            return Err(BancaError::Configuration(
                "cache.max_entries must be greater than zero".to_string(),
            ));
        }
        if self.cache.shards == 0 {
            return Err(BancaError::Configuration(
                "cache.shards must be greater than zero".to_string(),
            ));
        }
        if self.notifications.buffer_size == 0 {
            return Err(BancaError::Configuration(
                "notifications.buffer_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "banca".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// REST server host.
    pub host: String,
    /// REST server port.
    pub port: u16,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Enable CORS.
    pub cors_enabled: bool,
    /// CORS allowed origins.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    /// Returns the REST server address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Local database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL.
    pub url: String,
    /// Minimum pool connections.
    pub min_connections: u32,
    /// Maximum pool connections.
    pub max_connections: u32,
    /// Connection acquire timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Idle connection timeout in seconds.
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://banca.db?mode=rwc".to_string(),
            min_connections: 1,
            max_connections: 5,
            connect_timeout_secs: 5,
            idle_timeout_secs: 600,
        }
    }
}

/// Remote store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the authoritative remote API.
    pub base_url: String,
    /// Per-request timeout in seconds. On timeout the operation reports
    /// the remote store as unavailable rather than blocking.
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl RemoteConfig {
    /// Returns the request timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries; insertion beyond this evicts the
    /// least-recently-used entry.
    pub max_entries: usize,
    /// Staleness window in seconds. Entries not refreshed within the window
    /// are removed by the next sweep.
    pub staleness_secs: u64,
    /// Interval between background sweeps, in seconds.
    pub sweep_interval_secs: u64,
    /// Number of lock shards for the backing map.
    pub shards: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10,
            staleness_secs: 60,
            sweep_interval_secs: 60,
            shards: 8,
        }
    }
}

impl CacheConfig {
    /// Returns the staleness window as a `Duration`.
    #[must_use]
    pub const fn staleness_window(&self) -> Duration {
        Duration::from_secs(self.staleness_secs)
    }

    /// Returns the sweep interval as a `Duration`.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Notification bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Per-subscriber buffer size. On overflow the oldest buffered events
    /// are dropped for the lagging subscriber.
    pub buffer_size: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { buffer_size: 256 }
    }
}
