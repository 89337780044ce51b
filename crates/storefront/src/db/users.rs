//! User repository for authentication and account data.

use sqlx::PgPool;

use prodavnica_core::{Email, UserId, UserRole};

use crate::db::RepositoryError;
use crate::models::User;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    email: String,
    first_name: String,
    last_name: String,
    role: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email for user {}: {e}", self.id))
        })?;
        let role: UserRole = self.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role for user {}: {e}", self.id))
        })?;
        Ok(User {
            id: self.id,
            email,
            first_name: self.first_name,
            last_name: self.last_name,
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for user accounts and their password hashes.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user together with its password hash in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] if the email is already taken,
    /// or [`RepositoryError::Database`] on other failures.
    pub async fn create_with_password(
        &self,
        email: &Email,
        first_name: &str,
        last_name: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: UserRow = sqlx::query_as(
            r"
            INSERT INTO users (email, first_name, last_name, role)
            VALUES ($1, $2, $3, 'customer')
            RETURNING id, email, first_name, last_name, role, created_at, updated_at
            ",
        )
        .bind(email.as_str())
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict("email already registered".to_string())
            }
            _ => RepositoryError::Database(e),
        })?;

        sqlx::query("INSERT INTO user_passwords (user_id, password_hash) VALUES ($1, $2)")
            .bind(row.id)
            .bind(password_hash)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        row.into_user()
    }

    /// Look up a user and their password hash by email.
    ///
    /// Returns `None` when no account exists for the address, so callers can
    /// keep login failures indistinguishable from bad passwords.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on database failure or corrupted rows.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct UserWithHash {
            #[sqlx(flatten)]
            user: UserRow,
            password_hash: String,
        }

        let row: Option<UserWithHash> = sqlx::query_as(
            r"
            SELECT u.id, u.email, u.first_name, u.last_name, u.role,
                   u.created_at, u.updated_at, p.password_hash
            FROM users u
            JOIN user_passwords p ON p.user_id = u.id
            WHERE u.email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Ok((r.user.into_user()?, r.password_hash)))
            .transpose()
    }
}
