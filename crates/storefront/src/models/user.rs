//! User domain types.

use chrono::{DateTime, Utc};

use prodavnica_core::{Email, UserId, UserRole};

/// A storefront user (domain type).
///
/// The password hash lives in a separate table and is only handled by the
/// auth service, never carried on this type.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Role assigned to the user.
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
