//! Guest-cart transfer across the sign-in boundary.
//!
//! When a guest heads to checkout they are sent to the hosted sign-in page,
//! which means a fresh session on return. Immediately before that redirect
//! the cart is snapshotted into a separate durable slot; after every
//! successful authentication the snapshot (if any) is merged back into the
//! now-authenticated cart and deleted, so re-running the merge on later
//! navigations can never double-count.
//!
//! States: Idle (no snapshot) -> Pending (snapshot saved) -> Idle again
//! after [`load_and_merge`], whether or not lines were present.

use tracing::{error, warn};

use super::store::{CartLineItem, CartSlot, CartStore, SlotError};

/// Result of [`load_and_merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A snapshot existed; `item_count` lines were folded into the cart.
    Merged {
        /// Number of snapshot lines merged (distinct lines, not quantities).
        item_count: usize,
    },
    /// No snapshot existed; nothing was mutated.
    NoPending,
}

/// Snapshot the cart into the pending slot.
///
/// Called immediately before redirecting a guest to sign-in for checkout.
/// Unlike regular cart persistence this failure IS surfaced: silently
/// dropping a cart on the way to the sign-in page would lose the order, so
/// the caller aborts the redirect instead.
///
/// # Errors
///
/// Returns the slot error so the checkout redirect can be aborted.
pub async fn save_pending<S: CartSlot>(
    slot: &S,
    lines: &[CartLineItem],
) -> Result<(), SlotError> {
    let payload = serde_json::to_string(lines)
        .map_err(|e| SlotError::Storage(format!("failed to serialize pending cart: {e}")))?;
    slot.write(&payload).await
}

/// Merge the pending snapshot (if any) into the given cart and delete it.
///
/// Invoked once after every successful authentication, whether or not a
/// snapshot exists. Merging uses the same add-with-clamping semantics as a
/// normal add: quantities combine, capped by each line's stock ceiling.
/// The snapshot slot is cleared unconditionally, so a second call without a
/// new [`save_pending`] is a no-op returning [`MergeOutcome::NoPending`].
pub async fn load_and_merge<P: CartSlot, S: CartSlot>(
    pending: &P,
    store: &mut CartStore<S>,
) -> MergeOutcome {
    let raw = match pending.read().await {
        Ok(Some(raw)) => raw,
        Ok(None) => return MergeOutcome::NoPending,
        Err(e) => {
            error!(error = %e, "failed to read pending cart slot");
            return MergeOutcome::NoPending;
        }
    };

    let lines = match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
        Ok(lines) => lines,
        Err(e) => {
            warn!(error = %e, "pending cart did not parse, discarding");
            discard(pending).await;
            return MergeOutcome::NoPending;
        }
    };

    let item_count = store.merge_lines(lines).await;
    discard(pending).await;

    MergeOutcome::Merged { item_count }
}

/// Delete the snapshot. A failure here is loud: if the slot survives, the
/// next sign-in would merge the same lines again.
async fn discard<S: CartSlot>(slot: &S) {
    if let Err(e) = slot.clear().await {
        error!(error = %e, "failed to delete pending cart slot; a re-merge is possible");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use adas_kitchen_core::{MenuItemId, Price};

    use super::super::store::tests::{FailingSlot, MemorySlot, draft, store_with};
    use super::super::store::{CartSlot, CartStore};
    use super::*;

    async fn pending_with(lines: &[(&str, i64, u32, Option<u32>)]) -> MemorySlot {
        let slot = MemorySlot::default();
        let guest = store_with(lines).await;
        save_pending(&slot, guest.items()).await.unwrap();
        slot
    }

    #[tokio::test]
    async fn test_merge_into_empty_cart() {
        let pending = pending_with(&[("jollof", 1200, 2, Some(5)), ("suya", 800, 1, None)]).await;
        let mut cart = CartStore::load(MemorySlot::default(), 100).await;

        let outcome = load_and_merge(&pending, &mut cart).await;

        assert_eq!(outcome, MergeOutcome::Merged { item_count: 2 });
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.quantity_of(&MenuItemId::new("jollof")), 2);
        assert_eq!(cart.total(), Price::from_minor(3200));
    }

    #[tokio::test]
    async fn test_merge_combines_quantities_with_clamping() {
        let pending = pending_with(&[("jollof", 1200, 4, Some(5))]).await;
        let mut cart = store_with(&[("jollof", 1200, 3, Some(5))]).await;

        let outcome = load_and_merge(&pending, &mut cart).await;

        // 3 + 4 = 7 clamps to the stock ceiling of 5
        assert_eq!(outcome, MergeOutcome::Merged { item_count: 1 });
        assert_eq!(cart.quantity_of(&MenuItemId::new("jollof")), 5);
    }

    #[tokio::test]
    async fn test_second_merge_is_noop() {
        let pending = pending_with(&[("jollof", 1200, 2, Some(5))]).await;
        let mut cart = CartStore::load(MemorySlot::default(), 100).await;

        let first = load_and_merge(&pending, &mut cart).await;
        assert_eq!(first, MergeOutcome::Merged { item_count: 1 });

        let before = cart.items().to_vec();
        let second = load_and_merge(&pending, &mut cart).await;

        assert_eq!(second, MergeOutcome::NoPending);
        assert_eq!(cart.items(), before);
    }

    #[tokio::test]
    async fn test_no_snapshot_is_noop() {
        let mut cart = store_with(&[("suya", 800, 1, None)]).await;

        let outcome = load_and_merge(&MemorySlot::default(), &mut cart).await;

        assert_eq!(outcome, MergeOutcome::NoPending);
        assert_eq!(cart.line_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_snapshot_counts_as_merged_and_clears() {
        let pending = MemorySlot::default();
        save_pending(&pending, &[]).await.unwrap();
        let mut cart = CartStore::load(MemorySlot::default(), 100).await;

        let outcome = load_and_merge(&pending, &mut cart).await;
        assert_eq!(outcome, MergeOutcome::Merged { item_count: 0 });

        // The slot is gone either way
        assert_eq!(pending.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unparsable_snapshot_discarded() {
        let pending = MemorySlot::default();
        pending.write("corrupted").await.unwrap();
        let mut cart = CartStore::load(MemorySlot::default(), 100).await;

        let outcome = load_and_merge(&pending, &mut cart).await;

        assert_eq!(outcome, MergeOutcome::NoPending);
        assert!(cart.is_empty());
        assert_eq!(pending.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_failure_is_surfaced() {
        let guest = store_with(&[("jollof", 1200, 2, Some(5))]).await;

        let result = save_pending(&FailingSlot, guest.items()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let slot = MemorySlot::default();
        let first = store_with(&[("a", 100, 1, None)]).await;
        save_pending(&slot, first.items()).await.unwrap();

        let mut second = CartStore::load(MemorySlot::default(), 100).await;
        second.add(draft("b", 200, None), 2).await;
        save_pending(&slot, second.items()).await.unwrap();

        let mut cart = CartStore::load(MemorySlot::default(), 100).await;
        let outcome = load_and_merge(&slot, &mut cart).await;

        assert_eq!(outcome, MergeOutcome::Merged { item_count: 1 });
        assert!(cart.contains(&MenuItemId::new("b")));
        assert!(!cart.contains(&MenuItemId::new("a")));
    }
}
