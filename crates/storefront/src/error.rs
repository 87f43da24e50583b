//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for callers that drive the storefront
//! (the CLI), plus the Sentry helpers the cart uses to report failures that
//! are not propagated as errors.

use thiserror::Error;

use crate::cart::InputError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::contact::ContactError;
use crate::preferences::PreferencesError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Key-value store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Add-to-cart input was rejected.
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// Preference update was rejected.
    #[error("Preferences error: {0}")]
    Preferences(#[from] PreferencesError),

    /// Contact form failed validation.
    #[error("Contact form error: {0}")]
    Contact(#[from] ContactError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// actions leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "add", Some(&[("product_id", "connectx")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

/// Report a write that the store rejected.
///
/// The in-memory state has already changed, so this is logged and sent to
/// Sentry rather than returned as an error.
pub fn capture_persistence_failure(key: &str, err: &StoreError) {
    let event_id = sentry::capture_error(err);
    tracing::error!(
        key,
        error = %err,
        sentry_event_id = %event_id,
        "Failed to persist state"
    );
}
