//! Shopping cart state.
//!
//! [`Cart`] is the pure data structure: an ordered list of line items, unique
//! by product id, every row holding `quantity >= 1`. It knows nothing about
//! persistence; [`CartManager`] owns a cart together with its store and
//! catalog and performs the persist-after-every-mutation bookkeeping.

mod manager;
mod request;
mod view;

pub use manager::{CartManager, CartSummary, CartUpdate, DEFAULT_CART_KEY, Persistence};
pub use request::{AddToCartRequest, InputError};
pub use view::{CartItemView, CartView, EMPTY_CART_MESSAGE};

use jblinx_core::price::round_cents;
use jblinx_core::{Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A single cart row.
///
/// `name`, `price` and `image` are a snapshot taken when the row was created;
/// later catalog changes never reach rows already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    pub image: String,
}

impl CartItem {
    /// `price * quantity` for this row, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// What a successful cart mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// `add` created a row or incremented an existing one.
    Added {
        id: ProductId,
        name: String,
        quantity: u32,
        /// The row already existed with a different price than the one
        /// supplied, which was ignored.
        price_locked: bool,
    },
    /// `increase` bumped a row.
    Increased { id: ProductId, quantity: u32 },
    /// `decrease` lowered a row that stays in the cart.
    Decreased { id: ProductId, quantity: u32 },
    /// A row left the cart (explicit remove, or decrease from 1).
    Removed { id: ProductId },
}

impl CartEvent {
    /// Product the event applies to.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        match self {
            Self::Added { id, .. }
            | Self::Increased { id, .. }
            | Self::Decreased { id, .. }
            | Self::Removed { id } => id,
        }
    }

    /// Short verb used in logs and breadcrumbs.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Added { .. } => "add",
            Self::Increased { .. } => "increase",
            Self::Decreased { .. } => "decrease",
            Self::Removed { .. } => "remove",
        }
    }
}

/// Ordered, id-unique list of cart rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rows in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Row for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id.as_str() == id)
    }

    /// Number of distinct rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id.as_str() == id)
    }

    /// Add one unit of `product`.
    ///
    /// An existing row is incremented and keeps its stored price; `price`
    /// only applies to a newly created row.
    pub fn add(&mut self, product: &Product, price: Decimal) -> CartEvent {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return CartEvent::Added {
                id: item.id.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
                price_locked: item.price != price,
            };
        }

        self.items.push(CartItem {
            id: product.id.clone(),
            name: product.name.clone(),
            price,
            quantity: 1,
            image: product.image.clone(),
        });

        CartEvent::Added {
            id: product.id.clone(),
            name: product.name.clone(),
            quantity: 1,
            price_locked: false,
        }
    }

    /// Add one unit to an existing row. `None` if `id` is not in the cart.
    pub fn increase(&mut self, id: &str) -> Option<CartEvent> {
        let item = self.items.iter_mut().find(|item| item.id.as_str() == id)?;
        item.quantity = item.quantity.saturating_add(1);
        Some(CartEvent::Increased {
            id: item.id.clone(),
            quantity: item.quantity,
        })
    }

    /// Take one unit off a row, removing it when it would reach zero.
    /// `None` if `id` is not in the cart.
    pub fn decrease(&mut self, id: &str) -> Option<CartEvent> {
        let item = self.items.iter_mut().find(|item| item.id.as_str() == id)?;
        if item.quantity > 1 {
            item.quantity -= 1;
            return Some(CartEvent::Decreased {
                id: item.id.clone(),
                quantity: item.quantity,
            });
        }
        self.remove(id)
    }

    /// Delete a row. `None` if `id` is not in the cart.
    pub fn remove(&mut self, id: &str) -> Option<CartEvent> {
        let index = self.position(id)?;
        let item = self.items.remove(index);
        Some(CartEvent::Removed { id: item.id })
    }

    /// Sum of quantities over all rows.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` over all rows.
    ///
    /// Saturates instead of overflowing, so a row carrying an absurd price
    /// (from an old store or a direct [`Cart::add`]) cannot make the cart
    /// unreadable.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Total price with exactly two decimals, e.g. `"299.00"`.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        format!("{:.2}", round_cents(self.total_price()))
    }

    /// Serialize to the persisted JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be represented as a JSON number.
    pub fn to_persisted(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Parse the persisted JSON array.
    ///
    /// Rows that break the cart invariants are repaired instead of failing
    /// the whole load: zero-quantity and negative-price rows are dropped and
    /// duplicate ids are folded into the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a JSON array of cart rows.
    pub fn from_persisted(raw: &str) -> Result<Self, serde_json::Error> {
        let rows: Vec<CartItem> = serde_json::from_str(raw)?;
        let total = rows.len();

        let mut cart = Self::new();
        let mut repaired = 0usize;

        for row in rows {
            if row.quantity == 0 || (row.price.is_sign_negative() && !row.price.is_zero()) {
                repaired += 1;
                continue;
            }
            match cart.items.iter_mut().find(|item| item.id == row.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(row.quantity);
                    repaired += 1;
                }
                None => cart.items.push(row),
            }
        }

        if repaired > 0 {
            warn!(
                rows = total,
                repaired,
                kept = cart.items.len(),
                "Persisted cart violated invariants and was normalized"
            );
        }

        Ok(cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            price: Decimal::from(price),
            description: String::new(),
            features: Vec::new(),
            image: format!("{id}.png"),
            has_3d_preview: false,
        }
    }

    #[test]
    fn test_add_new_row() {
        let mut cart = Cart::new();
        let event = cart.add(&product("connectx", 299), Decimal::from(299));

        assert_eq!(cart.len(), 1);
        let item = &cart.items()[0];
        assert_eq!(item.id.as_str(), "connectx");
        assert_eq!(item.name, "CONNECTX");
        assert_eq!(item.image, "connectx.png");
        assert_eq!(item.quantity, 1);
        assert_eq!(cart.formatted_total(), "299.00");
        assert!(matches!(
            event,
            CartEvent::Added {
                quantity: 1,
                price_locked: false,
                ..
            }
        ));
    }

    #[test]
    fn test_add_twice_increments_single_row() {
        let mut cart = Cart::new();
        let x = product("x", 50);
        cart.add(&x, Decimal::from(50));
        cart.add(&x, Decimal::from(50));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total_item_count(), 2);
        assert_eq!(cart.formatted_total(), "100.00");
    }

    #[test]
    fn test_add_existing_keeps_first_price() {
        let mut cart = Cart::new();
        let x = product("x", 50);
        cart.add(&x, Decimal::from(50));
        let event = cart.add(&x, Decimal::from(75));

        assert_eq!(cart.items()[0].price, Decimal::from(50));
        assert!(matches!(
            event,
            CartEvent::Added {
                price_locked: true,
                quantity: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_add_uses_supplied_price_not_catalog() {
        let mut cart = Cart::new();
        cart.add(&product("x", 50), Decimal::from(40));
        assert_eq!(cart.items()[0].price, Decimal::from(40));
    }

    #[test]
    fn test_increase_and_missing() {
        let mut cart = Cart::new();
        cart.add(&product("a", 10), Decimal::from(10));

        assert_eq!(
            cart.increase("a"),
            Some(CartEvent::Increased {
                id: ProductId::new("a"),
                quantity: 2
            })
        );
        assert_eq!(cart.increase("b"), None);
    }

    #[test]
    fn test_decrease_from_one_removes_row() {
        let mut cart = Cart::new();
        cart.add(&product("a", 100), Decimal::from(100));

        let event = cart.decrease("a");
        assert_eq!(
            event,
            Some(CartEvent::Removed {
                id: ProductId::new("a")
            })
        );
        assert!(cart.is_empty());
        assert_eq!(cart.total_item_count(), 0);
        assert_eq!(cart.formatted_total(), "0.00");
    }

    #[test]
    fn test_decrease_above_one() {
        let mut cart = Cart::new();
        let a = product("a", 100);
        cart.add(&a, Decimal::from(100));
        cart.add(&a, Decimal::from(100));

        assert_eq!(
            cart.decrease("a"),
            Some(CartEvent::Decreased {
                id: ProductId::new("a"),
                quantity: 1
            })
        );
        assert_eq!(cart.get("a").unwrap().quantity, 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(&product("a", 1), Decimal::from(1));

        assert!(cart.remove("a").is_some());
        let snapshot = cart.clone();
        assert_eq!(cart.remove("a"), None);
        assert_eq!(cart, snapshot);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut cart = Cart::new();
        for id in ["a", "b", "c"] {
            cart.add(&product(id, 1), Decimal::from(1));
        }
        cart.remove("b");

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_total_price_with_cents() {
        let mut cart = Cart::new();
        let a = product("a", 0);
        cart.add(&a, Decimal::new(1999, 2));
        cart.add(&a, Decimal::new(1999, 2));
        cart.add(&product("b", 0), Decimal::new(5, 1));

        assert_eq!(cart.total_price(), Decimal::new(4048, 2));
        assert_eq!(cart.formatted_total(), "40.48");
    }

    #[test]
    fn test_persisted_shape() {
        let mut cart = Cart::new();
        cart.add(&product("connectx", 299), Decimal::from(299));

        let raw = cart.to_persisted().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let row = &value[0];
        assert_eq!(row["id"], "connectx");
        assert_eq!(row["quantity"], 1);
        assert_eq!(row["price"].as_f64(), Some(299.0));
        assert_eq!(row["image"], "connectx.png");
    }

    #[test]
    fn test_persisted_roundtrip_preserves_order_and_values() {
        let mut cart = Cart::new();
        cart.add(&product("b", 0), Decimal::new(1999, 2));
        cart.add(&product("a", 0), Decimal::from(5));
        cart.increase("a");

        let reloaded = Cart::from_persisted(&cart.to_persisted().unwrap()).unwrap();
        assert_eq!(reloaded, cart);
    }

    #[test]
    fn test_from_persisted_accepts_site_format() {
        let raw = r#"[{"id":"connectx","name":"ConnectX","price":299,"quantity":3,"image":"c.png"}]"#;
        let cart = Cart::from_persisted(raw).unwrap();
        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(cart.formatted_total(), "897.00");
    }

    #[test]
    fn test_from_persisted_normalizes_invalid_rows() {
        let raw = r#"[
            {"id":"a","name":"A","price":10,"quantity":1,"image":""},
            {"id":"z","name":"Z","price":10,"quantity":0,"image":""},
            {"id":"n","name":"N","price":-3,"quantity":1,"image":""},
            {"id":"a","name":"A","price":99,"quantity":2,"image":""}
        ]"#;

        let cart = Cart::from_persisted(raw).unwrap();
        assert_eq!(cart.len(), 1);
        let a = cart.get("a").unwrap();
        assert_eq!(a.quantity, 3);
        assert_eq!(a.price, Decimal::from(10));
    }

    #[test]
    fn test_from_persisted_rejects_garbage() {
        assert!(Cart::from_persisted("not json").is_err());
        assert!(Cart::from_persisted("{}").is_err());
        assert!(Cart::from_persisted(r#"[{"id":"a"}]"#).is_err());
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let mut cart = Cart::new();
        cart.add(&product("datalinx", 399), Decimal::from(399));
        cart.add(&product("connectx", 0), Decimal::MAX);
        cart.increase("connectx");

        assert_eq!(cart.get("connectx").unwrap().line_total(), Decimal::MAX);
        assert_eq!(cart.total_price(), Decimal::MAX);
        assert_eq!(cart.total_item_count(), 3);
        assert!(!cart.formatted_total().is_empty());
    }
}
