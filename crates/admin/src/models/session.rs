//! Session-related types for the staff dashboards.

use serde::{Deserialize, Serialize};

use adas_kitchen_core::{Email, StaffRole, UserId};

/// Session-stored staff identity.
///
/// Only accounts whose identity-provider profile carries a staff role claim
/// ever reach the session; customers are rejected at the OAuth callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentStaff {
    /// The provider's stable subject identifier.
    pub id: UserId,
    /// Verified email address.
    pub email: Email,
    /// Display name, when the profile has one.
    pub name: Option<String>,
    /// Dashboard access level.
    pub role: StaffRole,
}

impl CurrentStaff {
    /// Whether this staff member may perform destructive operations.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == StaffRole::Admin
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current signed-in staff member.
    pub const CURRENT_STAFF: &str = "current_staff";

    /// Key for the OAuth state parameter (CSRF protection).
    pub const OAUTH_STATE: &str = "oauth_state";
}
