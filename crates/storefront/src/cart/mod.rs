//! The shopping-cart subsystem.
//!
//! Three loosely-coupled pieces:
//!
//! - [`store`] - `CartStore`, the sole owner of cart contents. Rehydrates
//!   from a durable session slot at load, persists the whole serialized
//!   sequence on every mutation, and silently falls back to an empty cart
//!   when the slot is absent or unreadable.
//! - [`availability`] - a read-only join of cart lines against the live
//!   menu catalog: partitions lines into available/unavailable and computes
//!   the checkout-eligible subtotal without mutating the store.
//! - [`pending`] - the guest-cart transfer: snapshot the cart right before
//!   a guest is sent to sign in for checkout, merge it back exactly once
//!   after authentication.
//!
//! Dependent page fragments are refreshed through the `HX-Trigger:
//! cart-updated` response header rather than any in-process subscription.

pub mod availability;
pub mod pending;
pub mod session;
pub mod store;

pub use availability::ReconciledCart;
pub use pending::{MergeOutcome, load_and_merge, save_pending};
pub use session::SessionSlot;
pub use store::{CartLineItem, CartSlot, CartStore, LineItemDraft, SlotError};
