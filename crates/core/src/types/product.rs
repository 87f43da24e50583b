//! Catalog product record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A purchasable product as listed in the static catalog.
///
/// The JSON shape matches the site's product table, so a catalog file is an
/// object keyed by product id whose values deserialize into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier (e.g. `connectx`).
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// List price in the store currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Marketing description.
    pub description: String,
    /// Bullet-point feature list.
    #[serde(default)]
    pub features: Vec<String>,
    /// Product image URL.
    pub image: String,
    /// Whether a 3D preview is available.
    #[serde(default, rename = "model3d")]
    pub has_3d_preview: bool,
}
