//! Delivery data repository.

use sqlx::PgPool;

use prodavnica_core::UserId;

use crate::db::RepositoryError;
use crate::models::DeliveryInfo;

#[derive(Debug, sqlx::FromRow)]
struct DeliveryRow {
    user_id: UserId,
    first_name: String,
    last_name: String,
    phone: String,
    address: String,
    city: String,
    postal_code: String,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<DeliveryRow> for DeliveryInfo {
    fn from(row: DeliveryRow) -> Self {
        Self {
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            address: row.address,
            city: row.city,
            postal_code: row.postal_code,
            updated_at: row.updated_at,
        }
    }
}

/// Fields a user submits when saving delivery data.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DeliveryForm {
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
}

impl DeliveryForm {
    /// Reject forms with any blank field.
    ///
    /// # Errors
    ///
    /// Returns the name of the first blank field.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(format!("{name} must not be empty"));
            }
        }
        Ok(())
    }
}

/// Repository for saved delivery data, one record per user.
#[derive(Clone)]
pub struct DeliveryRepository {
    pool: PgPool,
}

impl DeliveryRepository {
    /// Create a new delivery repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the saved delivery data for a user, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on database failure.
    pub async fn get(&self, user_id: UserId) -> Result<Option<DeliveryInfo>, RepositoryError> {
        let row: Option<DeliveryRow> = sqlx::query_as(
            r"
            SELECT user_id, first_name, last_name, phone, address, city,
                   postal_code, updated_at
            FROM delivery_info
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DeliveryInfo::from))
    }

    /// Insert or replace the delivery data for a user.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Validation`] for a blank field, or
    /// [`RepositoryError::Database`] on failure.
    pub async fn upsert(
        &self,
        user_id: UserId,
        form: &DeliveryForm,
    ) -> Result<DeliveryInfo, RepositoryError> {
        form.validate().map_err(RepositoryError::Validation)?;

        let row: DeliveryRow = sqlx::query_as(
            r"
            INSERT INTO delivery_info
                (user_id, first_name, last_name, phone, address, city, postal_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                city = EXCLUDED.city,
                postal_code = EXCLUDED.postal_code,
                updated_at = NOW()
            RETURNING user_id, first_name, last_name, phone, address, city,
                      postal_code, updated_at
            ",
        )
        .bind(user_id)
        .bind(form.first_name.trim())
        .bind(form.last_name.trim())
        .bind(form.phone.trim())
        .bind(form.address.trim())
        .bind(form.city.trim())
        .bind(form.postal_code.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> DeliveryForm {
        DeliveryForm {
            first_name: "Ana".to_string(),
            last_name: "Petrovic".to_string(),
            phone: "+381601234567".to_string(),
            address: "Bulevar 1".to_string(),
            city: "Beograd".to_string(),
            postal_code: "11000".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_field() {
        let mut bad = form();
        bad.city = "   ".to_string();
        let err = bad.validate().unwrap_err();
        assert!(err.contains("city"));
    }
}
