//! Cart invariants over arbitrary operation sequences, plus the reference
//! scenarios for add/decrease/remove.

use std::collections::HashSet;

use rust_decimal::Decimal;

use jblinx_integration_tests::{CartOp, PRODUCT_IDS, RecordingCues, random_ops, test_catalog};
use jblinx_storefront::cart::DEFAULT_CART_KEY;
use jblinx_storefront::cues::Cue;
use jblinx_storefront::{Cart, CartEvent, CartManager, KeyValueStore, MemoryStore};

fn fresh() -> CartManager<MemoryStore> {
    CartManager::load(MemoryStore::new(), test_catalog())
}

fn persisted(manager: &CartManager<MemoryStore>) -> Option<Cart> {
    manager
        .store()
        .get(DEFAULT_CART_KEY)
        .expect("memory store read")
        .map(|raw| Cart::from_persisted(&raw).expect("persisted cart parses"))
}

fn assert_invariants(cart: &Cart) {
    let mut seen = HashSet::new();
    for item in cart.items() {
        assert!(item.quantity >= 1, "row {} has quantity 0", item.id);
        assert!(seen.insert(item.id.clone()), "duplicate row {}", item.id);
    }

    let quantities: u64 = cart.items().iter().map(|i| u64::from(i.quantity)).sum();
    assert_eq!(cart.total_item_count(), quantities);

    let total: Decimal = cart
        .items()
        .iter()
        .map(|i| i.price * Decimal::from(i.quantity))
        .sum();
    assert_eq!(cart.total_price(), total);
}

// =============================================================================
// Sequence Properties
// =============================================================================

#[test]
fn test_random_sequences_preserve_invariants() {
    for seed in 0..64 {
        let mut manager = fresh();

        for op in random_ops(seed, 200) {
            let before = manager.cart().clone();
            let before_count = before.total_item_count();

            let update = match &op {
                CartOp::Add { id, price } => manager.add(id, *price),
                CartOp::Increase(id) => manager.increase(id),
                CartOp::Decrease(id) => manager.decrease(id),
                CartOp::Remove(id) => manager.remove(id),
            };

            let cart = manager.cart();
            assert_invariants(cart);

            let id = match &op {
                CartOp::Add { id, .. }
                | CartOp::Increase(id)
                | CartOp::Decrease(id)
                | CartOp::Remove(id) => id.as_str(),
            };
            let in_catalog = manager.catalog().contains(id);
            let row_before = before.get(id).map(|i| u64::from(i.quantity));

            let expected_count = match (&op, row_before) {
                (CartOp::Add { .. }, _) if in_catalog => before_count + 1,
                (CartOp::Increase(_), Some(_)) => before_count + 1,
                (CartOp::Decrease(_), Some(_)) => before_count - 1,
                (CartOp::Remove(_), Some(q)) => before_count - q,
                _ => before_count,
            };
            assert_eq!(
                cart.total_item_count(),
                expected_count,
                "seed {seed}, op {op:?}"
            );

            match update {
                Some(update) => {
                    assert!(update.persistence.is_saved());
                    assert_eq!(update.summary.item_count, cart.total_item_count());
                    assert_eq!(persisted(&manager).as_ref(), Some(manager.cart()));
                }
                None => assert_eq!(manager.cart(), &before, "no-op changed state"),
            }
        }
    }
}

#[test]
fn test_no_row_ever_reaches_zero() {
    let mut manager = fresh();
    for id in PRODUCT_IDS {
        manager.add(id, Decimal::ONE);
    }

    for _ in 0..3 {
        for id in PRODUCT_IDS {
            manager.decrease(id);
            assert_invariants(manager.cart());
        }
    }

    assert!(manager.cart().is_empty());
    assert_eq!(persisted(&manager), Some(Cart::new()));
}

// =============================================================================
// Reference Scenarios
// =============================================================================

#[test]
fn test_add_to_empty_cart() {
    let mut manager = fresh();
    manager.add("connectx", Decimal::from(299));

    let items = manager.cart().items();
    assert_eq!(items.len(), 1);
    let row = items.first().expect("one row");
    assert_eq!(row.id.as_str(), "connectx");
    assert_eq!(row.quantity, 1);
    assert_eq!(row.price, Decimal::from(299));
    assert_eq!(manager.cart().formatted_total(), "299.00");
}

#[test]
fn test_decrease_last_unit_empties_cart() {
    let mut manager = fresh();
    manager.add("a", Decimal::from(100));

    manager.decrease("a");
    assert!(manager.cart().is_empty());
    assert_eq!(manager.total_item_count(), 0);
}

#[test]
fn test_add_same_product_twice() {
    let mut manager = fresh();
    manager.add("x", Decimal::from(50));
    manager.add("x", Decimal::from(50));

    let items = manager.cart().items();
    assert_eq!(items.len(), 1);
    let row = items.first().expect("one row");
    assert_eq!(row.quantity, 2);
    assert_eq!(row.price, Decimal::from(50));
    assert_eq!(manager.cart().formatted_total(), "100.00");
}

#[test]
fn test_remove_missing_is_noop() {
    let mut manager = fresh();
    manager.add("a", Decimal::from(100));
    let before = manager.cart().clone();

    assert!(manager.remove("b").is_none());
    assert!(manager.remove("missing").is_none());
    assert_eq!(manager.cart(), &before);
}

#[test]
fn test_price_locked_at_first_add() {
    let mut manager = fresh();
    manager.add("a", Decimal::from(100));
    let update = manager.add("a", Decimal::from(80)).expect("known product");

    assert!(matches!(
        update.event,
        CartEvent::Added {
            price_locked: true,
            quantity: 2,
            ..
        }
    ));
    assert_eq!(manager.total_price(), Decimal::from(200));
}

#[test]
fn test_cue_sequence() {
    let cues = RecordingCues::default();
    let mut manager = fresh().with_cues(cues.clone());

    manager.add("a", Decimal::from(100));
    manager.add("a", Decimal::from(100));
    manager.decrease("a");
    manager.increase("missing");
    manager.remove("a");

    assert_eq!(cues.played(), vec![Cue::Add, Cue::Add, Cue::Remove]);
}
