//! Delivery data domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prodavnica_core::UserId;

/// Saved shipping/contact data for a user.
///
/// Checkout requires this record to exist; the orchestrator only consumes
/// its presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryInfo {
    /// Owning user.
    pub user_id: UserId,
    /// Recipient given name.
    pub first_name: String,
    /// Recipient family name.
    pub last_name: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Postal code.
    pub postal_code: String,
    /// When the record was last saved.
    pub updated_at: DateTime<Utc>,
}
