//! Availability reconciliation: a read-only join between cart lines and the
//! live menu catalog.
//!
//! The cart's denormalized snapshots are never re-synced; this module only
//! answers "which of these lines can be checked out right now, and for how
//! much". Lines whose dish the catalog marks unavailable stay visible (so
//! the customer can remove them or wait) but contribute nothing to the
//! subtotal, and quantity changes on them are rejected at the handler layer
//! via [`ReconciledCart::is_unavailable`].

use std::collections::HashMap;

use adas_kitchen_backend::docstore::MenuItem;
use adas_kitchen_core::{MenuItemId, Price};

use crate::config::CartPolicy;

use super::store::CartLineItem;

/// Cart lines partitioned by live availability.
///
/// Within each partition the cart's original insertion order is preserved;
/// for display the available lines come first.
#[derive(Debug, Clone, Default)]
pub struct ReconciledCart {
    pub available: Vec<CartLineItem>,
    pub unavailable: Vec<CartLineItem>,
}

/// Partition cart lines against a catalog snapshot.
///
/// A line is unavailable only when the catalog explicitly says so. Absence
/// from the snapshot does NOT count as unavailable - a partial or stale
/// catalog fetch must not zero out a customer's total.
#[must_use]
pub fn reconcile(lines: &[CartLineItem], catalog: &[MenuItem]) -> ReconciledCart {
    let by_id: HashMap<&str, bool> = catalog
        .iter()
        .map(|item| (item.id.as_str(), item.available))
        .collect();

    let mut reconciled = ReconciledCart::default();
    for line in lines {
        if by_id.get(line.id.as_str()) == Some(&false) {
            reconciled.unavailable.push(line.clone());
        } else {
            reconciled.available.push(line.clone());
        }
    }
    reconciled
}

impl ReconciledCart {
    /// Fail-open fallback when the catalog cannot be fetched: every line is
    /// treated as available and the caller surfaces a retryable error.
    #[must_use]
    pub fn assume_available(lines: &[CartLineItem]) -> Self {
        Self {
            available: lines.to_vec(),
            unavailable: Vec::new(),
        }
    }

    /// Checkout-eligible subtotal: available lines only.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.available.iter().map(CartLineItem::line_total).sum()
    }

    /// Flat delivery fee below the free-delivery threshold, zero at or
    /// above it.
    #[must_use]
    pub fn delivery_fee(&self, policy: &CartPolicy) -> Price {
        if self.subtotal() < policy.free_delivery_threshold {
            policy.delivery_fee
        } else {
            Price::ZERO
        }
    }

    /// The checkout total.
    ///
    /// Equals [`Self::subtotal`]: the delivery fee is surfaced next to the
    /// subtotal but has never been folded into the charged total.
    // TODO: fold the delivery fee into the total once the kitchen confirms
    // whether delivery should be charged at checkout or settled on handoff.
    #[must_use]
    pub fn total(&self) -> Price {
        self.subtotal()
    }

    /// Whether a line sits in the unavailable partition. Handlers use this
    /// to reject quantity changes on unavailable lines (removal is allowed).
    #[must_use]
    pub fn is_unavailable(&self, id: &MenuItemId) -> bool {
        self.unavailable.iter().any(|line| line.id == *id)
    }

    /// Total number of lines across both partitions.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.available.len() + self.unavailable.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: &str, price_minor: i64, quantity: u32) -> CartLineItem {
        CartLineItem {
            id: MenuItemId::new(id),
            name: id.to_owned(),
            price: Price::from_minor(price_minor),
            image: None,
            category: None,
            quantity,
            stock: 100,
        }
    }

    fn catalog_entry(id: &str, available: bool) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            name: id.to_owned(),
            description: None,
            price: Price::from_minor(1000),
            image: None,
            category: None,
            available,
            stock: None,
        }
    }

    fn policy() -> CartPolicy {
        CartPolicy {
            default_stock_ceiling: 100,
            delivery_fee: Price::from_minor(500),
            free_delivery_threshold: Price::from_minor(5000),
        }
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let lines = [line("a", 1000, 2), line("b", 500, 1), line("c", 700, 1)];
        let catalog = [
            catalog_entry("a", true),
            catalog_entry("b", false),
            catalog_entry("c", true),
        ];

        let reconciled = reconcile(&lines, &catalog);

        assert_eq!(reconciled.line_count(), lines.len());
        let available: Vec<&str> = reconciled.available.iter().map(|l| l.id.as_str()).collect();
        let unavailable: Vec<&str> = reconciled
            .unavailable
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(available, ["a", "c"]);
        assert_eq!(unavailable, ["b"]);
    }

    #[test]
    fn test_relative_order_preserved_in_each_partition() {
        let lines = [
            line("d", 100, 1),
            line("a", 100, 1),
            line("c", 100, 1),
            line("b", 100, 1),
        ];
        let catalog = [
            catalog_entry("a", false),
            catalog_entry("b", false),
            catalog_entry("c", true),
            catalog_entry("d", true),
        ];

        let reconciled = reconcile(&lines, &catalog);

        let available: Vec<&str> = reconciled.available.iter().map(|l| l.id.as_str()).collect();
        let unavailable: Vec<&str> = reconciled
            .unavailable
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(available, ["d", "c"]);
        assert_eq!(unavailable, ["a", "b"]);
    }

    #[test]
    fn test_subtotal_excludes_unavailable() {
        let lines = [line("a", 1000, 2), line("b", 500, 1)];
        let catalog = [catalog_entry("a", true), catalog_entry("b", false)];

        let reconciled = reconcile(&lines, &catalog);

        assert_eq!(reconciled.subtotal(), Price::from_minor(2000));
        assert!(reconciled.is_unavailable(&MenuItemId::new("b")));
        assert!(!reconciled.is_unavailable(&MenuItemId::new("a")));
    }

    #[test]
    fn test_absent_from_catalog_counts_as_available() {
        let lines = [line("a", 1000, 1), line("ghost", 300, 2)];
        let catalog = [catalog_entry("a", true)];

        let reconciled = reconcile(&lines, &catalog);

        assert_eq!(reconciled.available.len(), 2);
        assert!(reconciled.unavailable.is_empty());
        assert_eq!(reconciled.subtotal(), Price::from_minor(1600));
    }

    #[test]
    fn test_assume_available_keeps_everything() {
        let lines = [line("a", 1000, 1), line("b", 500, 2)];
        let reconciled = ReconciledCart::assume_available(&lines);

        assert_eq!(reconciled.available.len(), 2);
        assert!(reconciled.unavailable.is_empty());
        assert_eq!(reconciled.subtotal(), Price::from_minor(2000));
    }

    #[test]
    fn test_delivery_fee_below_threshold() {
        let lines = [line("a", 1000, 2)]; // $20.00 subtotal
        let reconciled = reconcile(&lines, &[]);

        assert_eq!(reconciled.delivery_fee(&policy()), Price::from_minor(500));
    }

    #[test]
    fn test_delivery_free_at_threshold() {
        let lines = [line("a", 2500, 2)]; // $50.00 subtotal, exactly at threshold
        let reconciled = reconcile(&lines, &[]);

        assert_eq!(reconciled.delivery_fee(&policy()), Price::ZERO);
    }

    #[test]
    fn test_total_equals_subtotal_without_delivery() {
        let lines = [line("a", 1000, 2)];
        let reconciled = reconcile(&lines, &[]);

        // Delivery is computed but not folded into the total
        assert_eq!(reconciled.delivery_fee(&policy()), Price::from_minor(500));
        assert_eq!(reconciled.total(), reconciled.subtotal());
    }

    #[test]
    fn test_empty_cart() {
        let reconciled = reconcile(&[], &[catalog_entry("a", false)]);

        assert_eq!(reconciled.line_count(), 0);
        assert_eq!(reconciled.subtotal(), Price::ZERO);
        assert_eq!(reconciled.total(), Price::ZERO);
    }
}
