//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `JBLINX_STORE_PATH` - JSON file backing the key-value store (default: .jblinx/store.json)
//! - `JBLINX_CART_KEY` - Store key for the cart (default: cart)
//! - `JBLINX_CATALOG_PATH` - JSON catalog replacing the built-in product list
//! - `JBLINX_CURRENCY` - Display currency code (default: USD)
//! - `JBLINX_CART_CUES` - Ring the terminal bell on cart changes (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use jblinx_core::CurrencyCode;
use thiserror::Error;

use crate::cart::DEFAULT_CART_KEY;

const DEFAULT_STORE_PATH: &str = ".jblinx/store.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// File backing the key-value store
    pub store_path: PathBuf,
    /// Store key the cart is persisted under
    pub cart_key: String,
    /// Optional catalog file; the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
    /// Whether cart changes produce audio cues
    pub cues_enabled: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            cart_key: DEFAULT_CART_KEY.to_string(),
            catalog_path: None,
            currency: CurrencyCode::default(),
            cues_enabled: true,
            sentry_dsn: None,
            sentry_environment: None,
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

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store_path = get("JBLINX_STORE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from);
        let cart_key = get("JBLINX_CART_KEY").unwrap_or_else(|| DEFAULT_CART_KEY.to_string());
        let catalog_path = get("JBLINX_CATALOG_PATH").map(PathBuf::from);

        let currency = get("JBLINX_CURRENCY")
            .map(|v| v.parse::<CurrencyCode>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("JBLINX_CURRENCY".to_string(), e))?
            .unwrap_or_default();

        let cues_enabled = get("JBLINX_CART_CUES")
            .map(|v| parse_bool("JBLINX_CART_CUES", &v))
            .transpose()?
            .unwrap_or(true);

        Ok(Self {
            store_path,
            cart_key,
            catalog_path,
            currency,
            cues_enabled,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a boolean flag (`true/false`, `1/0`, `yes/no`, `on/off`).
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
