//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VOIDSHOP_STORAGE` - `sqlite` (default) or `memory`
//! - `VOIDSHOP_DATABASE_URL` - `SQLite` connection string
//!   (default: `sqlite://voidshop.db?mode=rwc`)
//! - `VOIDSHOP_MAX_CONNECTIONS` - Pool size for file databases (default: 5)
//! - `VOIDSHOP_CURRENCY` - ISO 4217 display currency (default: USD)

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use voidshop_core::CurrencyCode;

const DEFAULT_DATABASE_URL: &str = "sqlite://voidshop.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: &str = "5";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the stores keep their state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Persist to `SQLite`; state survives restarts.
    #[default]
    Sqlite,
    /// Keep everything in process memory; state is lost on exit.
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            _ => Err(format!("expected sqlite or memory, got {s}")),
        }
    }
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Storage backend for the catalog and cart
    pub storage: StorageBackend,
    /// `SQLite` connection URL (ignored for in-memory storage)
    pub database_url: String,
    /// Maximum pool size for file-backed databases
    pub max_connections: u32,
    /// Currency used to format prices
    pub currency: CurrencyCode,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Sqlite,
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            max_connections: 5,
            currency: CurrencyCode::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = parse_var(&lookup, "VOIDSHOP_STORAGE", "sqlite")?;
        let database_url = get_or_default(&lookup, "VOIDSHOP_DATABASE_URL", DEFAULT_DATABASE_URL);
        let max_connections: u32 =
            parse_var(&lookup, "VOIDSHOP_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let currency = parse_var(&lookup, "VOIDSHOP_CURRENCY", "USD")?;

        if max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "VOIDSHOP_MAX_CONNECTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            storage,
            database_url,
            max_connections,
            currency,
        })
    }

    /// Returns a copy using in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            storage: StorageBackend::Memory,
            ..Self::default()
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Get and parse a variable, falling back to `default` when unset.
fn parse_var<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    get_or_default(lookup, key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
