//! hashbatch configuration.
//!
//! All configuration is driven by environment variables and read once at
//! startup.

use std::env;
use std::num::NonZeroUsize;

/// Default initial capacity of a pooled byte buffer (1 MiB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024 * 1024;

/// Default initial capacity of a pooled item batch.
pub const DEFAULT_BATCH_CAPACITY: usize = 100;

/// Configuration error raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        /// Environment variable name.
        key: &'static str,
        /// The rejected raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Sizing of the buffer and batch pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum idle entries per pool, one per expected concurrent worker.
    pub pool_size: usize,
    /// Initial capacity of a freshly allocated byte buffer.
    pub buffer_capacity: usize,
    /// Initial capacity of a freshly allocated item batch.
    pub batch_capacity: usize,
    /// Fill both pools at construction instead of on first use.
    pub prefill: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            prefill: true,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashBatchConfig {
    /// Bind address.
    pub listen_addr: String,
    /// Path of the hashing endpoint.
    pub endpoint_path: String,
    /// Log level filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Pool sizing.
    pub pools: PoolConfig,
}

impl Default for HashBatchConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:6060".to_owned(),
            endpoint_path: "/foo".to_owned(),
            log_level: "info".to_owned(),
            pools: PoolConfig::default(),
        }
    }
}

impl HashBatchConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            listen_addr: lookup("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            endpoint_path: lookup("ENDPOINT_PATH").unwrap_or(defaults.endpoint_path),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            pools: PoolConfig {
                pool_size: parse_usize(&lookup, "POOL_SIZE", defaults.pools.pool_size)?,
                buffer_capacity: parse_usize(
                    &lookup,
                    "BUFFER_CAPACITY",
                    defaults.pools.buffer_capacity,
                )?,
                batch_capacity: parse_usize(
                    &lookup,
                    "BATCH_CAPACITY",
                    defaults.pools.batch_capacity,
                )?,
                prefill: parse_bool(&lookup, "POOL_PREFILL", defaults.pools.prefill)?,
            },
        })
    }
}

/// One pooled entry per available CPU, falling back to a single entry.
fn default_pool_size() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

fn parse_usize(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: usize,
) -> Result<usize, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<usize>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::InvalidValue {
                key,
                reason: e.to_string(),
                value,
            }),
        },
    }
}

fn parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key,
                value,
                reason: "expected a boolean".to_owned(),
            }),
        },
    }
}
