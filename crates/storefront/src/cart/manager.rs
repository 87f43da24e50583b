//! Cart controller: state, persistence and side effects.

use jblinx_core::{CurrencyCode, Price};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use super::{AddToCartRequest, Cart, CartEvent, CartView};
use crate::catalog::Catalog;
use crate::cues::{Cue, CueSink, SilentCues};
use crate::error::{add_breadcrumb, capture_persistence_failure};
use crate::notify::Notification;
use crate::store::{KeyValueStore, StoreError};

/// Store key the cart is persisted under unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Outcome of writing the cart after a mutation.
#[derive(Debug)]
pub enum Persistence {
    Saved,
    /// The store rejected the write. The mutation is still applied in
    /// memory.
    Failed(StoreError),
}

impl Persistence {
    /// Whether the write went through.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Derived totals at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    pub item_count: u64,
    pub total: Decimal,
}

impl CartSummary {
    fn of(cart: &Cart) -> Self {
        Self {
            item_count: cart.total_item_count(),
            total: cart.total_price(),
        }
    }

    /// Total formatted for display in `currency`.
    #[must_use]
    pub fn formatted_total(&self, currency: CurrencyCode) -> String {
        Price::new(self.total, currency).display()
    }
}

/// Result of a mutation that changed the cart.
#[derive(Debug)]
pub struct CartUpdate {
    pub event: CartEvent,
    pub summary: CartSummary,
    pub persistence: Persistence,
}

impl CartUpdate {
    /// Toast to show for this update, if any.
    #[must_use]
    pub fn notification(&self) -> Option<Notification> {
        Notification::for_cart_event(&self.event)
    }
}

/// Owns the cart and keeps the store in sync with it.
///
/// Every mutating operation returns `None` when it was a no-op (unknown
/// product, row not in cart) and `Some(CartUpdate)` otherwise. A mutation
/// that applied is always written back to the store under the cart key.
pub struct CartManager<S> {
    cart: Cart,
    catalog: Catalog,
    store: S,
    storage_key: String,
    cues: Box<dyn CueSink>,
}

impl<S: KeyValueStore> CartManager<S> {
    /// Load the cart from `store` under [`DEFAULT_CART_KEY`].
    pub fn load(store: S, catalog: Catalog) -> Self {
        Self::load_with_key(store, catalog, DEFAULT_CART_KEY)
    }

    /// Load the cart from `store` under `storage_key`.
    ///
    /// A missing, unreadable or unparsable value yields an empty cart.
    pub fn load_with_key(store: S, catalog: Catalog, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();

        let cart = match store.get(&storage_key) {
            Ok(Some(raw)) => Cart::from_persisted(&raw).unwrap_or_else(|e| {
                warn!(key = %storage_key, error = %e, "Persisted cart is unreadable, starting empty");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(key = %storage_key, error = %e, "Failed to read persisted cart, starting empty");
                Cart::new()
            }
        };

        debug!(
            key = %storage_key,
            rows = cart.len(),
            items = cart.total_item_count(),
            "Cart loaded"
        );

        Self {
            cart,
            catalog,
            store,
            storage_key,
            cues: Box::new(SilentCues),
        }
    }

    /// Replace the cue sink.
    #[must_use]
    pub fn with_cues(mut self, cues: impl CueSink + 'static) -> Self {
        self.cues = Box::new(cues);
        self
    }

    /// Current cart state.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Catalog used to resolve product ids.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the manager and return its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.cart.total_item_count()
    }

    /// Sum of `price * quantity`.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    /// Snapshot of the derived totals.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::of(&self.cart)
    }

    /// Display model of the current cart.
    #[must_use]
    pub fn view(&self, currency: CurrencyCode) -> CartView {
        CartView::from_cart(&self.cart, currency)
    }

    /// Add one unit of `product_id` at `price`.
    ///
    /// Unknown products are ignored. If the product is already in the cart
    /// its quantity goes up and the stored price is kept.
    #[instrument(skip(self), fields(key = %self.storage_key))]
    pub fn add(&mut self, product_id: &str, price: Decimal) -> Option<CartUpdate> {
        let Some(product) = self.catalog.get(product_id) else {
            debug!("Ignoring add for product not in catalog");
            return None;
        };

        let event = self.cart.add(product, price);
        if let CartEvent::Added {
            price_locked: true, ..
        } = &event
        {
            debug!(%price, "Existing row keeps its original price");
        }

        Some(self.commit(event, Some(Cue::Add)))
    }

    /// Add from a validated add-to-cart trigger.
    pub fn add_request(&mut self, request: &AddToCartRequest) -> Option<CartUpdate> {
        self.add(request.product_id.as_str(), request.price)
    }

    /// Add one unit to a row already in the cart.
    #[instrument(skip(self), fields(key = %self.storage_key))]
    pub fn increase(&mut self, product_id: &str) -> Option<CartUpdate> {
        let event = self.cart.increase(product_id)?;
        Some(self.commit(event, Some(Cue::Add)))
    }

    /// Take one unit off a row; a row at quantity 1 is removed instead.
    #[instrument(skip(self), fields(key = %self.storage_key))]
    pub fn decrease(&mut self, product_id: &str) -> Option<CartUpdate> {
        match self.cart.get(product_id)?.quantity {
            1 => self.remove(product_id),
            _ => {
                let event = self.cart.decrease(product_id)?;
                Some(self.commit(event, None))
            }
        }
    }

    /// Remove a row entirely.
    #[instrument(skip(self), fields(key = %self.storage_key))]
    pub fn remove(&mut self, product_id: &str) -> Option<CartUpdate> {
        let event = self.cart.remove(product_id)?;
        Some(self.commit(event, Some(Cue::Remove)))
    }

    fn commit(&mut self, event: CartEvent, cue: Option<Cue>) -> CartUpdate {
        add_breadcrumb(
            "cart",
            event.action(),
            Some(&[("product_id", event.product_id().as_str())]),
        );

        let persistence = match self.persist() {
            Ok(()) => Persistence::Saved,
            Err(e) => {
                capture_persistence_failure(&self.storage_key, &e);
                Persistence::Failed(e)
            }
        };

        if let Some(cue) = cue {
            if let Err(e) = self.cues.play(cue) {
                debug!(?cue, error = %e, "Cue playback failed");
            }
        }

        let summary = self.summary();
        info!(
            action = event.action(),
            product_id = %event.product_id(),
            items = summary.item_count,
            total = %summary.total,
            saved = persistence.is_saved(),
            "Cart updated"
        );

        CartUpdate {
            event,
            summary,
            persistence,
        }
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let raw = self.cart.to_persisted()?;
        self.store.set(&self.storage_key, &raw)
    }
}
