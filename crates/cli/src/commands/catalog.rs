//! Catalog commands.

use jblinx_core::Price;
use jblinx_storefront::{AppError, StorefrontConfig};

use super::{emit, load_catalog};

/// List every product with its price.
pub fn list(config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(config)?;

    if catalog.is_empty() {
        emit(["No products available"])?;
        return Ok(());
    }

    emit(catalog.iter().map(|product| {
        format!(
            "{:<12} {:<24} {}",
            product.id,
            product.name,
            Price::new(product.price, config.currency)
        )
    }))?;
    Ok(())
}

/// Show one product in full.
pub fn show(config: &StorefrontConfig, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(config)?;
    let product = catalog
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut lines = vec![
        format!("{} ({})", product.name, product.id),
        Price::new(product.price, config.currency).to_string(),
        String::new(),
        product.description.clone(),
    ];
    if !product.features.is_empty() {
        lines.push(String::new());
        lines.extend(product.features.iter().map(|f| format!("  - {f}")));
    }
    if product.has_3d_preview {
        lines.push(String::new());
        lines.push("3D preview available".to_string());
    }

    emit(lines)?;
    Ok(())
}
