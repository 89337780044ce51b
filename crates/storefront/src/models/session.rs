//! Session-related types.
//!
//! Types stored in the session for authentication state. The session carries
//! a strongly-typed [`CurrentUser`] validated at login, so handlers never
//! reach into untyped session fields.

use serde::{Deserialize, Serialize};

use prodavnica_core::{Email, UserId, UserRole};

use crate::models::user::User;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user and
/// address their order-confirmation email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Given name, used in the confirmation email.
    pub first_name: String,
    /// Family name, used in the confirmation email.
    pub last_name: String,
    /// Role assigned to the user.
    pub role: UserRole,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
        }
    }
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
