//! Session-related types.
//!
//! Types stored in the session for authentication and cart state.

use serde::{Deserialize, Serialize};

use adas_kitchen_core::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the signed-in customer;
/// the identity provider remains the source of truth for the profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The provider's stable subject identifier.
    pub id: UserId,
    /// Verified email address.
    pub email: Email,
    /// Display name, when the profile has one.
    pub name: Option<String>,
}

/// Session keys for authentication and cart data.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the serialized cart sequence.
    pub const CART: &str = "cart";

    /// Key for the pending guest-cart snapshot.
    pub const PENDING_CART: &str = "pending_cart";

    /// Key for the OAuth state parameter (CSRF protection).
    pub const OAUTH_STATE: &str = "oauth_state";

    /// Key for the post-sign-in destination path.
    pub const RETURN_TO: &str = "return_to";
}
