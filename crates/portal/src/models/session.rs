//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use ticket_portal_core::{Email, Role, UserId};

/// Session-stored user identity.
///
/// Written once at login and never edited afterwards. An admin whose role
/// changes keeps the old role until they log in again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID assigned by the ticket API.
    pub user_id: UserId,
    /// Email the user signed in with.
    pub email: Email,
    /// Role at login time.
    pub role: Role,
}

impl CurrentUser {
    #[must_use]
    pub const fn new(user_id: UserId, email: Email, role: Role) -> Self {
        Self {
            user_id,
            email,
            role,
        }
    }

    /// Whether this user may use the admin view.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The page this user lands on after login.
    #[must_use]
    pub const fn home_path(&self) -> &'static str {
        if self.is_admin() {
            "/tickets-admin"
        } else {
            "/tickets"
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
