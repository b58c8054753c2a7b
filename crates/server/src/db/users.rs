//! User repository.
//!
//! Accounts and tokens are created by the external auth service; this
//! repository only reads them.

use foodgram_core::UserId;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::User;

/// Repository for user lookups.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, email, username, first_name, last_name, is_admin
            FROM foodgram.user
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Resolve an API token to the user that owns it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_token(&self, key: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.is_admin
            FROM foodgram.auth_token t
            JOIN foodgram.user u ON u.id = t.user_id
            WHERE t.key = $1
            ",
        )
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }
}
