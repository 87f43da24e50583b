//! Cart commands.
//!
//! Each invocation loads the cart from the store, applies one operation and
//! prints the resulting cart state.

use jblinx_storefront::cart::{
    AddToCartRequest, CartManager, CartUpdate, CartView, EMPTY_CART_MESSAGE, Persistence,
};
use jblinx_storefront::cues::TerminalBell;
use jblinx_storefront::{AppError, FileStore, StorefrontConfig};
use tracing::{info, warn};

use super::{emit, load_catalog, open_store};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn manager(config: &StorefrontConfig) -> Result<CartManager<FileStore>, Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let catalog = load_catalog(config)?;
    let manager = CartManager::load_with_key(store, catalog, config.cart_key.as_str());

    Ok(if config.cues_enabled {
        manager.with_cues(TerminalBell)
    } else {
        manager
    })
}

fn render(view: &CartView) -> Vec<String> {
    if view.is_empty() {
        return vec![EMPTY_CART_MESSAGE.to_string(), format!("Total: {}", view.subtotal)];
    }

    let mut lines = Vec::with_capacity(view.items.len() * 2 + 1);
    for item in &view.items {
        lines.push(format!("{} ({})", item.title, item.id));
        lines.push(format!("  {}", item.line_summary()));
    }
    lines.push(format!(
        "Total: {} ({} item{})",
        view.subtotal,
        view.item_count,
        if view.item_count == 1 { "" } else { "s" }
    ));
    lines
}

/// Print the outcome of a mutation, failing if it could not be saved.
fn report(manager: &CartManager<FileStore>, config: &StorefrontConfig, update: CartUpdate) -> CommandResult {
    if let Some(toast) = update.notification() {
        emit([toast.message])?;
    }
    emit(render(&manager.view(config.currency)))?;

    match update.persistence {
        Persistence::Saved => Ok(()),
        Persistence::Failed(e) => {
            warn!("Cart changed for this run but was not saved");
            Err(AppError::from(e).into())
        }
    }
}

/// Print the cart.
pub fn show(config: &StorefrontConfig) -> CommandResult {
    let manager = manager(config)?;
    emit(render(&manager.view(config.currency)))?;
    Ok(())
}

/// Add one unit of `product`, at `price` or the catalog price.
pub fn add(config: &StorefrontConfig, product: &str, price: Option<&str>) -> CommandResult {
    let mut manager = manager(config)?;

    let not_found = || AppError::NotFound(format!("product {product} is not in the catalog"));

    let catalog_price = manager
        .catalog()
        .get(product)
        .map(|p| p.price.to_string())
        .ok_or_else(not_found)?;
    let request =
        AddToCartRequest::from_attributes(Some(product), Some(price.unwrap_or(&catalog_price)))
            .map_err(AppError::from)?;

    let update = manager.add_request(&request).ok_or_else(not_found)?;
    info!(product, "Added to cart");
    report(&manager, config, update)
}

/// Add one unit to a line already in the cart.
pub fn increase(config: &StorefrontConfig, product: &str) -> CommandResult {
    let mut manager = manager(config)?;
    match manager.increase(product) {
        Some(update) => report(&manager, config, update),
        None => not_in_cart(&manager, config, product),
    }
}

/// Take one unit off a line.
pub fn decrease(config: &StorefrontConfig, product: &str) -> CommandResult {
    let mut manager = manager(config)?;
    match manager.decrease(product) {
        Some(update) => report(&manager, config, update),
        None => not_in_cart(&manager, config, product),
    }
}

/// Drop a line.
pub fn remove(config: &StorefrontConfig, product: &str) -> CommandResult {
    let mut manager = manager(config)?;
    match manager.remove(product) {
        Some(update) => report(&manager, config, update),
        None => not_in_cart(&manager, config, product),
    }
}

fn not_in_cart(manager: &CartManager<FileStore>, config: &StorefrontConfig, product: &str) -> CommandResult {
    warn!(product, "Product is not in the cart; nothing changed");
    emit(render(&manager.view(config.currency)))?;
    Ok(())
}
