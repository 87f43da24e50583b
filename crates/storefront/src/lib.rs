//! JBLinx Storefront library.
//!
//! The stateful part of the storefront: the shopping cart and everything it
//! touches, kept free of any rendering technology so it can be driven from
//! the CLI or embedded elsewhere.
//!
//! # Modules
//!
//! - [`cart`] - Cart state, the [`cart::CartManager`] controller and the display model
//! - [`catalog`] - Read-only product catalog
//! - [`store`] - String key-value persistence (memory and file backed)
//! - [`preferences`] - Dark mode and theme palette persisted in the same store
//! - [`contact`] - Contact form validation
//! - [`notify`] / [`cues`] - Toasts and audio cues derived from cart events
//! - [`config`] / [`error`] - Environment configuration and error types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod contact;
pub mod cues;
pub mod error;
pub mod notify;
pub mod preferences;
pub mod store;

pub use cart::{Cart, CartEvent, CartItem, CartManager, CartUpdate, Persistence};
pub use catalog::Catalog;
pub use config::StorefrontConfig;
pub use error::{AppError, Result};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
