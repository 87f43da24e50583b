//! Static product catalog.
//!
//! The catalog is read-only reference data. The cart reads it only when a
//! product is first added; rows keep their own snapshot afterwards.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use jblinx_core::{Product, ProductId};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

/// Errors loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog key {key} does not match product id {id}")]
    MismatchedId { key: String, id: String },
    #[error("product {0} has a negative price")]
    NegativePrice(String),
}

/// Read-only mapping from product id to product.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: BTreeMap<ProductId, Product>,
}

impl Catalog {
    /// Build a catalog from a list of products. Later duplicates replace
    /// earlier ones.
    #[must_use]
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    /// The product line shipped with the site.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new([
            Product {
                id: ProductId::new("connectx"),
                name: "ConnectX".to_string(),
                price: Decimal::from(299),
                description: "A comprehensive communication platform that streamlines team \
                              collaboration with real-time messaging, file sharing, and video \
                              conferencing."
                    .to_string(),
                features: vec![
                    "Real-time messaging with read receipts".to_string(),
                    "HD video conferencing with screen sharing".to_string(),
                    "Secure file sharing and storage".to_string(),
                    "Integrations with popular tools".to_string(),
                    "Advanced team management".to_string(),
                    "Cross-platform availability".to_string(),
                ],
                image: "https://images.unsplash.com/photo-1563986768609-322da13575f3?ixlib=rb-4.0.3&auto=format&fit=crop&w=1470&q=80".to_string(),
                has_3d_preview: true,
            },
            Product {
                id: ProductId::new("datalinx"),
                name: "DataLinx Analytics".to_string(),
                price: Decimal::from(399),
                description: "Powerful data visualization and analytics tool for business \
                              intelligence with interactive dashboards and predictive analytics."
                    .to_string(),
                features: vec![
                    "Interactive dashboards and reports".to_string(),
                    "Predictive analytics with AI integration".to_string(),
                    "Custom report generation".to_string(),
                    "Data cleaning and transformation".to_string(),
                    "Real-time analytics".to_string(),
                    "Export to multiple formats".to_string(),
                ],
                image: "https://images.unsplash.com/photo-1551288049-bebda4e38f71?ixlib=rb-4.0.3&auto=format&fit=crop&w=1470&q=80".to_string(),
                has_3d_preview: true,
            },
            Product {
                id: ProductId::new("securelinx"),
                name: "SecureLinx".to_string(),
                price: Decimal::from(349),
                description: "Advanced security solution for protecting digital assets and \
                              data with encryption, threat detection, and automated backups."
                    .to_string(),
                features: vec![
                    "End-to-end encryption".to_string(),
                    "Advanced threat detection".to_string(),
                    "Automated backups".to_string(),
                    "Security audit trails".to_string(),
                    "Multi-factor authentication".to_string(),
                    "Compliance management".to_string(),
                ],
                image: "https://images.unsplash.com/photo-1563986768494-4dee2763ff3f?ixlib=rb-4.0.3&auto=format&fit=crop&w=1470&q=80".to_string(),
                has_3d_preview: true,
            },
        ])
    }

    /// Parse a catalog from JSON shaped as `{ "<id>": { product }, ... }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a key differs from its
    /// product's `id`, or a price is negative.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let entries: BTreeMap<String, Product> = serde_json::from_str(raw)?;

        for (key, product) in &entries {
            if key != product.id.as_str() {
                return Err(CatalogError::MismatchedId {
                    key: key.clone(),
                    id: product.id.to_string(),
                });
            }
            if product.price.is_sign_negative() && !product.price.is_zero() {
                return Err(CatalogError::NegativePrice(key.clone()));
            }
        }

        Ok(Self::new(entries.into_values()))
    }

    /// Load a catalog file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails [`Self::from_json`].
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        info!(path = %path.display(), products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    /// Whether the catalog lists `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.products.contains_key(id)
    }

    /// All products ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 3);

        let connectx = catalog.get("connectx").unwrap();
        assert_eq!(connectx.name, "ConnectX");
        assert_eq!(connectx.price, Decimal::from(299));
        assert_eq!(connectx.features.len(), 6);

        assert_eq!(catalog.get("datalinx").unwrap().price, Decimal::from(399));
        assert_eq!(catalog.get("securelinx").unwrap().price, Decimal::from(349));
        assert!(!catalog.contains("unknown"));
    }

    #[test]
    fn test_from_json() {
        let raw = r#"{
            "widget": {
                "id": "widget",
                "name": "Widget",
                "price": 50,
                "description": "A widget",
                "image": "widget.png"
            }
        }"#;

        let catalog = Catalog::from_json(raw).unwrap();
        assert_eq!(catalog.get("widget").unwrap().price, Decimal::from(50));
    }

    #[test]
    fn test_from_json_rejects_mismatched_key() {
        let raw = r#"{
            "widget": {"id": "gadget", "name": "G", "price": 1, "description": "", "image": ""}
        }"#;

        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::MismatchedId { .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_negative_price() {
        let raw = r#"{
            "widget": {"id": "widget", "name": "W", "price": -1, "description": "", "image": ""}
        }"#;

        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::NegativePrice(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
