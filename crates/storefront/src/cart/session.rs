//! Session-backed durable cart slots.
//!
//! The visitor's server-side session is the durable per-browser key-value
//! storage; the cart and the pending guest snapshot each get one key in it.

use tower_sessions::Session;

use crate::models::session_keys;

use super::store::{CartSlot, SlotError};

/// A [`CartSlot`] stored under one key of a `tower_sessions` session.
#[derive(Clone)]
pub struct SessionSlot {
    session: Session,
    key: &'static str,
}

impl SessionSlot {
    /// The live cart slot (key `"cart"`).
    #[must_use]
    pub const fn cart(session: Session) -> Self {
        Self {
            session,
            key: session_keys::CART,
        }
    }

    /// The pending guest-cart slot (key `"pending_cart"`).
    #[must_use]
    pub const fn pending(session: Session) -> Self {
        Self {
            session,
            key: session_keys::PENDING_CART,
        }
    }
}

impl CartSlot for SessionSlot {
    async fn read(&self) -> Result<Option<String>, SlotError> {
        Ok(self.session.get::<String>(self.key).await?)
    }

    async fn write(&self, payload: &str) -> Result<(), SlotError> {
        Ok(self.session.insert(self.key, payload).await?)
    }

    async fn clear(&self) -> Result<(), SlotError> {
        self.session.remove::<String>(self.key).await?;
        Ok(())
    }
}
