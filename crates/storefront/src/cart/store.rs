//! Cart state and the store that owns it.
//!
//! [`CartState`] is pure bookkeeping: an ordered map of lines, keyed by
//! product ID, with derived totals. [`CartStore`] wraps it together with
//! a [`CartStorage`] adapter and writes the state through after every
//! mutation. Storage failures never surface to callers - the in-memory
//! state stays authoritative for the session.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use gridline_core::{Price, Product, ProductId};

use super::storage::CartStorage;

/// One cart entry: a product reference and how many units of it.
///
/// Invariant: `quantity >= 1` for every line held in a [`CartState`].
/// A line whose quantity reaches zero is removed, never retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Total price of this line (`unit price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The set of lines a session intends to purchase.
///
/// Lines are keyed by product ID (at most one line per product) and
/// iterate in the order each product was first added, which is the
/// order the cart page displays them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    lines: IndexMap<ProductId, CartLine>,
}

impl CartState {
    /// Rebuild a state from persisted lines.
    ///
    /// Re-establishes the invariants regardless of what the durable copy
    /// contains: zero-quantity lines are dropped and duplicate product
    /// IDs are merged into the earliest line.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut state = Self::default();
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            state
                .lines
                .entry(line.product.id.clone())
                .and_modify(|existing| existing.quantity += line.quantity)
                .or_insert(line);
        }
        state
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line if the product is already in the
    /// cart, otherwise appends a new line with quantity 1.
    pub fn add(&mut self, product: Product) {
        self.lines
            .entry(product.id.clone())
            .and_modify(|line| line.quantity += 1)
            .or_insert(CartLine {
                product,
                quantity: 1,
            });
    }

    /// Set the quantity of the line for `product_id`.
    ///
    /// A quantity of zero removes the line. If no line matches, this is
    /// a no-op rather than an error.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
        } else if let Some(line) = self.lines.get_mut(product_id) {
            line.quantity = quantity;
        }
    }

    /// Remove the line for `product_id`, if present.
    pub fn remove(&mut self, product_id: &ProductId) {
        // shift_remove keeps the remaining lines in display order
        self.lines.shift_remove(product_id);
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price * quantity` across all lines, unrounded.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.values().map(CartLine::line_total).sum()
    }

    /// Total unit count across all lines (not the number of lines).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.values().map(|line| line.quantity).sum()
    }

    /// Lines in display order (first-add order).
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The cart store: owned state plus its durable mirror.
///
/// All mutations run synchronously to completion and write the new
/// state through to storage before returning. A failed write is logged
/// and swallowed; the caller never sees it.
#[derive(Debug)]
pub struct CartStore<S> {
    state: CartState,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Open a store, rehydrating from storage.
    ///
    /// Absent or unreadable persisted state falls back to an empty cart.
    pub fn open(storage: S) -> Self {
        let state = storage.load().unwrap_or_default();
        Self { state, storage }
    }

    /// Add one unit of `product` to the cart.
    ///
    /// No stock check is performed here; the product detail page is
    /// responsible for gating out-of-stock items.
    pub fn add_item(&mut self, product: Product) {
        self.state.add(product);
        self.persist();
    }

    /// Set the quantity of the line for `product_id` (zero removes it).
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        self.state.set_quantity(product_id, quantity);
        self.persist();
    }

    /// Remove the line for `product_id`, if present.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.state.remove(product_id);
        self.persist();
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.state.clear();
        self.persist();
    }

    /// Sum of `price * quantity` across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.state.subtotal()
    }

    /// Total unit count across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.state.item_count()
    }

    /// Lines in display order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.state.lines()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Current state, for inspection.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Mirror the in-memory state to storage, fire-and-forget.
    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.state) {
            tracing::warn!("Failed to persist cart: {e}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::storage::{InMemoryStorage, StorageError};
    use super::*;

    fn product(id: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::new(price.parse().unwrap()),
            image: String::new(),
            category: "racing-tees".to_owned(),
            description: String::new(),
            in_stock: true,
        }
    }

    fn price(s: &str) -> Price {
        Price::new(s.parse().unwrap())
    }

    fn empty_store() -> CartStore<InMemoryStorage> {
        CartStore::open(InMemoryStorage::default())
    }

    #[test]
    fn test_repeated_add_increments_single_line() {
        let mut store = empty_store();
        for _ in 0..5 {
            store.add_item(product("1", "10.00"));
        }

        assert_eq!(store.state().len(), 1);
        let line = store.lines().next().unwrap();
        assert_eq!(line.quantity, 5);
        assert_eq!(store.item_count(), 5);
    }

    #[test]
    fn test_subtotal_tracks_line_contributions() {
        let mut store = empty_store();
        store.add_item(product("1", "10.00"));
        store.add_item(product("2", "20.00"));
        assert_eq!(store.subtotal(), price("30.00"));
        assert_eq!(store.item_count(), 2);

        store.update_quantity(&ProductId::new("2"), 3);
        assert_eq!(store.subtotal(), price("70.00"));

        store.remove_item(&ProductId::new("2"));
        assert_eq!(store.subtotal(), price("10.00"));
    }

    #[test]
    fn test_update_to_zero_equals_remove() {
        let mut a = empty_store();
        let mut b = empty_store();
        for store in [&mut a, &mut b] {
            store.add_item(product("1", "10.00"));
            store.add_item(product("2", "20.00"));
        }

        a.update_quantity(&ProductId::new("1"), 0);
        b.remove_item(&ProductId::new("1"));
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_unknown_product_id_is_noop() {
        let mut store = empty_store();
        store.add_item(product("1", "10.00"));
        let before = store.state().clone();

        store.update_quantity(&ProductId::new("missing"), 7);
        store.remove_item(&ProductId::new("missing"));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = empty_store();
        store.add_item(product("1", "10.00"));
        store.remove_item(&ProductId::new("1"));
        let once = store.state().clone();
        store.remove_item(&ProductId::new("1"));
        assert_eq!(store.state(), &once);
    }

    #[test]
    fn test_clear_zeroes_totals() {
        let mut store = empty_store();
        store.add_item(product("1", "10.00"));
        store.add_item(product("2", "20.00"));
        store.clear_cart();

        assert!(store.is_empty());
        assert_eq!(store.subtotal(), Price::zero());
        assert_eq!(store.item_count(), 0);
    }

    #[test]
    fn test_single_product_scenario() {
        // add P1 twice -> one line, qty 2, subtotal 20
        let mut store = empty_store();
        store.add_item(product("p1", "10.00"));
        store.add_item(product("p1", "10.00"));
        assert_eq!(store.state().len(), 1);
        assert_eq!(store.item_count(), 2);
        assert_eq!(store.subtotal(), price("20.00"));

        store.update_quantity(&ProductId::new("p1"), 1);
        assert_eq!(store.subtotal(), price("10.00"));

        store.remove_item(&ProductId::new("p1"));
        assert_eq!(store.subtotal(), Price::zero());
        assert_eq!(store.item_count(), 0);
    }

    #[test]
    fn test_out_of_stock_product_can_still_be_added() {
        // The store deliberately performs no stock validation.
        let mut store = empty_store();
        let mut p = product("1", "10.00");
        p.in_stock = false;
        store.add_item(p);
        assert_eq!(store.item_count(), 1);
    }

    #[test]
    fn test_lines_iterate_in_first_add_order() {
        let mut store = empty_store();
        store.add_item(product("b", "1.00"));
        store.add_item(product("a", "2.00"));
        store.add_item(product("b", "1.00"));

        let order: Vec<_> = store.lines().map(|l| l.product.id.as_str()).collect();
        assert_eq!(order, ["b", "a"]);
    }

    #[test]
    fn test_every_mutation_persists() {
        let storage = InMemoryStorage::default();
        let mut store = CartStore::open(storage.clone());

        store.add_item(product("1", "10.00"));
        assert_eq!(storage.snapshot().unwrap().item_count(), 1);

        store.update_quantity(&ProductId::new("1"), 4);
        assert_eq!(storage.snapshot().unwrap().item_count(), 4);

        store.clear_cart();
        assert!(storage.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_reopen_restores_persisted_state() {
        let storage = InMemoryStorage::default();
        {
            let mut store = CartStore::open(storage.clone());
            store.add_item(product("1", "10.00"));
            store.add_item(product("2", "20.00"));
        }

        let reopened = CartStore::open(storage);
        assert_eq!(reopened.item_count(), 2);
        assert_eq!(reopened.subtotal(), price("30.00"));
    }

    #[test]
    fn test_storage_failure_is_swallowed() {
        /// Adapter whose writes always fail.
        #[derive(Debug)]
        struct BrokenStorage;

        impl CartStorage for BrokenStorage {
            fn load(&self) -> Option<CartState> {
                None
            }

            fn save(&self, _state: &CartState) -> Result<(), StorageError> {
                Err(StorageError::Io(std::io::Error::other("disk on fire")))
            }
        }

        // Mutations still apply in memory even though every save fails.
        let mut store = CartStore::open(BrokenStorage);
        store.add_item(product("1", "10.00"));
        store.add_item(product("1", "10.00"));
        assert_eq!(store.item_count(), 2);
        assert_eq!(store.subtotal(), price("20.00"));
    }

    #[test]
    fn test_from_lines_reestablishes_invariants() {
        let lines = vec![
            CartLine {
                product: product("1", "10.00"),
                quantity: 2,
            },
            CartLine {
                product: product("2", "5.00"),
                quantity: 0,
            },
            CartLine {
                product: product("1", "10.00"),
                quantity: 3,
            },
        ];

        let state = CartState::from_lines(lines);
        assert_eq!(state.len(), 1);
        assert_eq!(state.item_count(), 5);
        assert!(state.lines().all(|line| line.quantity >= 1));
    }
}
