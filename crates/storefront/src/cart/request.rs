//! Add-to-cart input validation.

use jblinx_core::{Price, PriceError, ProductId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Why an add-to-cart trigger was rejected before reaching the cart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("missing product id")]
    MissingProduct,
    #[error("missing price")]
    MissingPrice,
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),
    #[error("price must be greater than zero")]
    ZeroPrice,
}

/// A validated add-to-cart trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub price: Decimal,
}

impl AddToCartRequest {
    /// Build a request from the raw product and price attributes of the
    /// triggering control.
    ///
    /// # Errors
    ///
    /// Returns an error if either attribute is missing or blank, or the price
    /// is not a positive number.
    pub fn from_attributes(product: Option<&str>, price: Option<&str>) -> Result<Self, InputError> {
        let product = product
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(InputError::MissingProduct)?;

        let price = price
            .filter(|p| !p.trim().is_empty())
            .ok_or(InputError::MissingPrice)?;
        let price = Price::parse_amount(price)?;
        if price.is_zero() {
            return Err(InputError::ZeroPrice);
        }

        Ok(Self {
            product_id: ProductId::new(product),
            price,
        })
    }
}
