//! Integration tests for the JBLinx storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p jblinx-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Invariants over random operation sequences
//! - `cart_persistence` - Store round-trips, reloads and write failures
//! - `preferences` - Preferences sharing a file store with the cart
//!
//! This library holds the fixtures those tests share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use jblinx_core::{Product, ProductId};
use jblinx_storefront::cues::{Cue, CueError, CueSink};
use jblinx_storefront::{Catalog, KeyValueStore, MemoryStore, StoreError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

/// Product ids available in [`test_catalog`].
pub const PRODUCT_IDS: [&str; 4] = ["a", "b", "connectx", "x"];

/// Build a catalog product with a placeholder description and image.
#[must_use]
pub fn product(id: &str, name: &str, price: Decimal) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price,
        description: format!("{name} description"),
        features: Vec::new(),
        image: format!("https://cdn.example.com/{id}.jpg"),
        has_3d_preview: false,
    }
}

/// Small catalog used across tests.
#[must_use]
pub fn test_catalog() -> Catalog {
    Catalog::new([
        product("a", "Alpha", Decimal::from(100)),
        product("b", "Beta", Decimal::new(1999, 2)),
        product("connectx", "ConnectX", Decimal::from(299)),
        product("x", "Xeno", Decimal::from(50)),
    ])
}

/// Cue sink that records what was played.
#[derive(Debug, Clone, Default)]
pub struct RecordingCues {
    played: Rc<RefCell<Vec<Cue>>>,
}

impl RecordingCues {
    /// Cues played so far.
    #[must_use]
    pub fn played(&self) -> Vec<Cue> {
        self.played.borrow().clone()
    }
}

impl CueSink for RecordingCues {
    fn play(&self, cue: Cue) -> Result<(), CueError> {
        self.played.borrow_mut().push(cue);
        Ok(())
    }
}

/// Memory store whose writes can be switched off from the outside.
#[derive(Debug, Clone, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: Rc<Cell<bool>>,
}

impl FlakyStore {
    /// Handle that turns write failures on and off.
    #[must_use]
    pub fn switch(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.failing)
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.failing.get() {
            return Err(StoreError::QuotaExceeded {
                limit: 0,
                requested: key.len() + value.len(),
            });
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key)
    }
}

/// One cart operation, as generated for sequence tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOp {
    Add { id: String, price: Decimal },
    Increase(String),
    Decrease(String),
    Remove(String),
}

/// Generate `len` random operations from `seed`.
///
/// Ids include one that is not in [`test_catalog`] so no-op paths are
/// exercised too.
#[must_use]
#[allow(clippy::indexing_slicing)]
pub fn random_ops(seed: u64, len: usize) -> Vec<CartOp> {
    const IDS: [&str; 5] = ["a", "b", "connectx", "x", "missing"];

    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let id = IDS[rng.random_range(0..IDS.len())].to_string();
            match rng.random_range(0..4) {
                0 => CartOp::Add {
                    id,
                    price: Decimal::new(rng.random_range(1..100_000), 2),
                },
                1 => CartOp::Increase(id),
                2 => CartOp::Decrease(id),
                _ => CartOp::Remove(id),
            }
        })
        .collect()
}
