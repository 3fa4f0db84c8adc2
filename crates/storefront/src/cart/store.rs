//! The cart store: sole authority over cart contents and their persistence.
//!
//! A `CartStore` is loaded from its durable slot at the start of a request,
//! mutated in memory, and written back wholesale after every mutation.
//! Persistence failures are logged and never surfaced; the in-memory
//! sequence stays authoritative for the rest of the request either way.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use adas_kitchen_backend::docstore::MenuItem;
use adas_kitchen_core::{MenuItemId, Price};

/// Errors raised by a durable cart slot.
#[derive(Debug, Error)]
pub enum SlotError {
    /// The backing session store failed.
    #[error("session storage error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Any other storage backend failure.
    #[error("cart storage error: {0}")]
    Storage(String),
}

/// A durable key-value slot holding one serialized cart sequence.
///
/// The storefront backs this with the visitor's server-side session
/// ([`super::SessionSlot`]); tests use an in-memory implementation.
pub trait CartSlot {
    /// Read the serialized payload, `None` if the slot was never written.
    fn read(&self) -> impl Future<Output = Result<Option<String>, SlotError>> + Send;

    /// Overwrite the slot with a new payload.
    fn write(&self, payload: &str) -> impl Future<Output = Result<(), SlotError>> + Send;

    /// Delete the slot.
    fn clear(&self) -> impl Future<Output = Result<(), SlotError>> + Send;
}

/// One line of the cart: a denormalized snapshot of a menu item at the time
/// it was added, plus the chosen quantity.
///
/// The snapshot is not re-synced against the catalog; only the availability
/// reconciliation looks at live data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub quantity: u32,
    /// Per-line ceiling; quantities are clamped to this on every mutation.
    pub stock: u32,
}

impl CartLineItem {
    /// Line total (`price x quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Catalog attributes captured when a dish is added to the cart.
#[derive(Debug, Clone)]
pub struct LineItemDraft {
    pub id: MenuItemId,
    pub name: String,
    pub price: Price,
    pub image: Option<String>,
    pub category: Option<String>,
    /// Ceiling from the catalog; `None` (or zero) falls back to the
    /// configured default ceiling.
    pub stock: Option<u32>,
}

impl From<&MenuItem> for LineItemDraft {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            image: item.image.clone(),
            category: item.category.clone(),
            stock: item.stock,
        }
    }
}

// =============================================================================
// CartStore
// =============================================================================

/// An ordered, id-unique sequence of cart lines bound to a durable slot.
///
/// Insertion order is preserved for display (first added, first shown).
/// After any mutation, every line satisfies `1 <= quantity <= stock`.
pub struct CartStore<S: CartSlot> {
    slot: S,
    items: Vec<CartLineItem>,
    default_stock: u32,
}

impl<S: CartSlot> CartStore<S> {
    /// Rehydrate a cart from its slot.
    ///
    /// An absent, unreadable, or unparsable slot yields an empty cart; the
    /// failure is logged but never surfaced.
    pub async fn load(slot: S, default_stock: u32) -> Self {
        let items = match slot.read().await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!(error = %e, "stored cart did not parse, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                error!(error = %e, "failed to read cart slot, starting empty");
                Vec::new()
            }
        };

        Self {
            slot,
            items,
            default_stock,
        }
    }

    /// Add `quantity` of a dish.
    ///
    /// An existing line's quantity is incremented and clamped to its stock
    /// ceiling; a new line is inserted at the end with the catalog's ceiling
    /// (or the configured default when the catalog declares none). Adding
    /// zero is a no-op.
    pub async fn add(&mut self, draft: LineItemDraft, quantity: u32) {
        if quantity == 0 {
            return;
        }

        self.upsert(line_from_draft(draft, quantity, self.default_stock));
        self.persist().await;
    }

    /// Remove a line. No-op if the id is not in the cart.
    pub async fn remove(&mut self, id: &MenuItemId) {
        let before = self.items.len();
        self.items.retain(|item| item.id != *id);

        if self.items.len() != before {
            self.persist().await;
        }
    }

    /// Set a line's quantity.
    ///
    /// Zero delegates to [`Self::remove`]; anything above the line's stock
    /// ceiling clamps to it. No-op if the id is not in the cart.
    pub async fn set_quantity(&mut self, id: &MenuItemId, quantity: u32) {
        if quantity == 0 {
            self.remove(id).await;
            return;
        }

        let Some(item) = self.items.iter_mut().find(|item| item.id == *id) else {
            return;
        };

        item.quantity = quantity.min(item.stock);
        self.persist().await;
    }

    /// Empty the cart (and persist the empty sequence).
    pub async fn clear(&mut self) {
        self.items.clear();
        self.persist().await;
    }

    /// Merge a batch of lines using the same add-with-clamping semantics as
    /// [`Self::add`], with a single persistence write at the end.
    ///
    /// Returns the number of lines merged.
    pub async fn merge_lines(&mut self, lines: Vec<CartLineItem>) -> usize {
        let mut merged = 0;
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            self.upsert(line);
            merged += 1;
        }

        if merged > 0 {
            self.persist().await;
        }
        merged
    }

    /// Fold one line into the sequence with add-with-clamping semantics.
    fn upsert(&mut self, line: CartLineItem) {
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == line.id) {
            existing.quantity = existing
                .quantity
                .saturating_add(line.quantity)
                .min(existing.stock);
        } else {
            let mut line = line;
            line.quantity = line.quantity.min(line.stock);
            self.items.push(line);
        }
    }

    // =========================================================================
    // Read-only accessors
    // =========================================================================

    /// The lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct lines (not quantity-weighted).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of `price x quantity` across all lines, regardless of live
    /// availability (the availability-aware subtotal lives in
    /// [`super::availability`]).
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Whether a dish is in the cart.
    #[must_use]
    pub fn contains(&self, id: &MenuItemId) -> bool {
        self.items.iter().any(|item| item.id == *id)
    }

    /// Quantity of a dish, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, id: &MenuItemId) -> u32 {
        self.items
            .iter()
            .find(|item| item.id == *id)
            .map_or(0, |item| item.quantity)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Write the full sequence back to the slot, logging (not surfacing)
    /// failures - the in-memory cart stays authoritative either way.
    async fn persist(&self) {
        let payload = match serde_json::to_string(&self.items) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.slot.write(&payload).await {
            error!(error = %e, "failed to persist cart, continuing with in-memory state");
        }
    }
}

/// Materialize a draft into a line, applying the default stock ceiling.
///
/// A declared ceiling of zero is treated the same as an undeclared one,
/// matching how earlier tooling read the field.
fn line_from_draft(draft: LineItemDraft, quantity: u32, default_stock: u32) -> CartLineItem {
    let stock = draft.stock.filter(|s| *s > 0).unwrap_or(default_stock);
    CartLineItem {
        id: draft.id,
        name: draft.name,
        price: draft.price,
        image: draft.image,
        category: draft.category,
        quantity,
        stock,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// In-memory slot shared between store instances, for round-trip tests.
    #[derive(Clone, Default)]
    pub(crate) struct MemorySlot {
        data: Arc<Mutex<Option<String>>>,
    }

    impl CartSlot for MemorySlot {
        async fn read(&self) -> Result<Option<String>, SlotError> {
            Ok(self.data.lock().unwrap().clone())
        }

        async fn write(&self, payload: &str) -> Result<(), SlotError> {
            *self.data.lock().unwrap() = Some(payload.to_owned());
            Ok(())
        }

        async fn clear(&self) -> Result<(), SlotError> {
            *self.data.lock().unwrap() = None;
            Ok(())
        }
    }

    /// Slot whose writes always fail, for persistence-failure tests.
    #[derive(Clone, Default)]
    pub(crate) struct FailingSlot;

    impl CartSlot for FailingSlot {
        async fn read(&self) -> Result<Option<String>, SlotError> {
            Ok(None)
        }

        async fn write(&self, _payload: &str) -> Result<(), SlotError> {
            Err(SlotError::Storage("quota exceeded".to_owned()))
        }

        async fn clear(&self) -> Result<(), SlotError> {
            Err(SlotError::Storage("quota exceeded".to_owned()))
        }
    }

    pub(crate) fn draft(id: &str, price_minor: i64, stock: Option<u32>) -> LineItemDraft {
        LineItemDraft {
            id: MenuItemId::new(id),
            name: id.to_owned(),
            price: Price::from_minor(price_minor),
            image: None,
            category: None,
            stock,
        }
    }

    pub(crate) async fn store_with(
        lines: &[(&str, i64, u32, Option<u32>)],
    ) -> CartStore<MemorySlot> {
        let mut store = CartStore::load(MemorySlot::default(), 100).await;
        for (id, price, quantity, stock) in lines {
            store.add(draft(id, *price, *stock), *quantity).await;
        }
        store
    }

    #[tokio::test]
    async fn test_add_new_line() {
        let mut store = CartStore::load(MemorySlot::default(), 100).await;
        store.add(draft("jollof", 1200, Some(5)), 3).await;

        assert_eq!(store.line_count(), 1);
        assert_eq!(store.quantity_of(&MenuItemId::new("jollof")), 3);
        assert_eq!(store.total(), Price::from_minor(3600));
    }

    #[tokio::test]
    async fn test_add_existing_increments_and_clamps() {
        let mut store = CartStore::load(MemorySlot::default(), 100).await;
        store.add(draft("jollof", 1200, Some(5)), 3).await;
        store.add(draft("jollof", 1200, Some(5)), 4).await;

        // 3 + 4 = 7 clamps to the stock ceiling of 5
        assert_eq!(store.line_count(), 1);
        assert_eq!(store.quantity_of(&MenuItemId::new("jollof")), 5);
        assert_eq!(store.total(), Price::from_minor(6000));
    }

    #[tokio::test]
    async fn test_add_initial_quantity_clamps_to_stock() {
        let mut store = CartStore::load(MemorySlot::default(), 100).await;
        store.add(draft("suya", 800, Some(2)), 10).await;

        assert_eq!(store.quantity_of(&MenuItemId::new("suya")), 2);
    }

    #[tokio::test]
    async fn test_add_zero_is_noop() {
        let mut store = CartStore::load(MemorySlot::default(), 100).await;
        store.add(draft("jollof", 1200, Some(5)), 0).await;

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_default_stock_ceiling_applies() {
        let mut store = CartStore::load(MemorySlot::default(), 100).await;
        store.add(draft("moi-moi", 400, None), 250).await;

        assert_eq!(store.quantity_of(&MenuItemId::new("moi-moi")), 100);

        // A declared ceiling of zero behaves like an undeclared one
        store.add(draft("dodo", 300, Some(0)), 150).await;
        assert_eq!(store.quantity_of(&MenuItemId::new("dodo")), 100);
    }

    #[tokio::test]
    async fn test_set_quantity_clamps() {
        let mut store = store_with(&[("jollof", 1200, 2, Some(5))]).await;
        store.set_quantity(&MenuItemId::new("jollof"), 9).await;

        assert_eq!(store.quantity_of(&MenuItemId::new("jollof")), 5);
    }

    #[tokio::test]
    async fn test_set_quantity_zero_removes() {
        let mut store = store_with(&[("jollof", 1200, 3, Some(5))]).await;
        store.set_quantity(&MenuItemId::new("jollof"), 0).await;

        assert!(store.is_empty());
        assert_eq!(store.line_count(), 0);
    }

    #[tokio::test]
    async fn test_set_quantity_absent_is_noop() {
        let mut store = store_with(&[("jollof", 1200, 3, Some(5))]).await;
        store.set_quantity(&MenuItemId::new("ghost"), 2).await;

        assert_eq!(store.line_count(), 1);
        assert_eq!(store.quantity_of(&MenuItemId::new("jollof")), 3);
    }

    #[tokio::test]
    async fn test_remove_and_remove_absent() {
        let mut store = store_with(&[("a", 1000, 2, None), ("b", 500, 1, None)]).await;

        store.remove(&MenuItemId::new("a")).await;
        assert_eq!(store.line_count(), 1);

        store.remove(&MenuItemId::new("a")).await;
        assert_eq!(store.line_count(), 1);
        assert!(store.contains(&MenuItemId::new("b")));
    }

    #[tokio::test]
    async fn test_totals_independent_of_insertion_order() {
        let forward = store_with(&[("a", 1000, 2, None), ("b", 550, 3, None)]).await;
        let backward = store_with(&[("b", 550, 3, None), ("a", 1000, 2, None)]).await;

        assert_eq!(forward.total(), Price::from_minor(3650));
        assert_eq!(forward.total(), backward.total());
        assert_eq!(forward.total_quantity(), 5);
        assert_eq!(forward.line_count(), 2);
    }

    #[tokio::test]
    async fn test_insertion_order_preserved() {
        let store = store_with(&[("c", 100, 1, None), ("a", 100, 1, None), ("b", 100, 1, None)])
            .await;

        let ids: Vec<&str> = store.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_round_trip_persistence() {
        let slot = MemorySlot::default();
        let mut store = CartStore::load(slot.clone(), 100).await;
        store.add(draft("jollof", 1200, Some(5)), 3).await;
        store.add(draft("suya", 800, None), 1).await;
        store.set_quantity(&MenuItemId::new("suya"), 2).await;

        let reloaded = CartStore::load(slot, 100).await;
        assert_eq!(reloaded.items(), store.items());
    }

    #[tokio::test]
    async fn test_unparsable_slot_falls_back_to_empty() {
        let slot = MemorySlot::default();
        slot.write("not json at all").await.unwrap();

        let store = CartStore::load(slot, 100).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_memory_authoritative() {
        let mut store = CartStore::load(FailingSlot, 100).await;
        store.add(draft("jollof", 1200, Some(5)), 2).await;

        assert_eq!(store.quantity_of(&MenuItemId::new("jollof")), 2);
        assert_eq!(store.total(), Price::from_minor(2400));
    }

    #[tokio::test]
    async fn test_clear_persists_empty() {
        let slot = MemorySlot::default();
        let mut store = CartStore::load(slot.clone(), 100).await;
        store.add(draft("jollof", 1200, Some(5)), 2).await;
        store.clear().await;

        assert!(store.is_empty());
        let reloaded = CartStore::load(slot, 100).await;
        assert!(reloaded.is_empty());
    }

    #[tokio::test]
    async fn test_merge_lines_combines_and_clamps() {
        let mut store = store_with(&[("jollof", 1200, 4, Some(5))]).await;

        let merged = store
            .merge_lines(vec![
                CartLineItem {
                    id: MenuItemId::new("jollof"),
                    name: "jollof".to_owned(),
                    price: Price::from_minor(1200),
                    image: None,
                    category: None,
                    quantity: 3,
                    stock: 5,
                },
                CartLineItem {
                    id: MenuItemId::new("suya"),
                    name: "suya".to_owned(),
                    price: Price::from_minor(800),
                    image: None,
                    category: None,
                    quantity: 1,
                    stock: 100,
                },
            ])
            .await;

        assert_eq!(merged, 2);
        assert_eq!(store.quantity_of(&MenuItemId::new("jollof")), 5);
        assert_eq!(store.quantity_of(&MenuItemId::new("suya")), 1);
    }
}
