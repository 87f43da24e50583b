//! Cart display data for the rendering layer.
//!
//! The renderer re-draws the whole sidebar from a [`CartView`] after every
//! mutation; nothing here is stored.

use jblinx_core::{CurrencyCode, Price};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{Cart, CartItem};

/// Message shown in place of line items when the cart is empty.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty";

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: String,
}

impl CartItemView {
    fn from_item(item: &CartItem, currency: CurrencyCode) -> Self {
        Self {
            id: item.id.to_string(),
            title: item.name.clone(),
            quantity: item.quantity,
            price: format_price(item.price, currency),
            line_price: format_price(item.line_total(), currency),
            image: item.image.clone(),
        }
    }

    /// Sidebar price line, e.g. `$299.00 × 2 = $598.00`.
    #[must_use]
    pub fn line_summary(&self) -> String {
        format!("{} × {} = {}", self.price, self.quantity, self.line_price)
    }
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self::empty_in(CurrencyCode::default())
    }

    fn empty_in(currency: CurrencyCode) -> Self {
        Self {
            items: Vec::new(),
            subtotal: format_price(Decimal::ZERO, currency),
            item_count: 0,
        }
    }

    /// Build the view for `cart`, formatting prices in `currency`.
    #[must_use]
    pub fn from_cart(cart: &Cart, currency: CurrencyCode) -> Self {
        if cart.is_empty() {
            return Self::empty_in(currency);
        }

        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView::from_item(item, currency))
                .collect(),
            subtotal: format_price(cart.total_price(), currency),
            item_count: cart.total_item_count(),
        }
    }

    /// Whether there is nothing to list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self::from_cart(cart, CurrencyCode::default())
    }
}

fn format_price(amount: Decimal, currency: CurrencyCode) -> String {
    Price::new(amount, currency).display()
}
