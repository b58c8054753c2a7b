//! Subscription repository: which users follow which authors.

use foodgram_core::UserId;
use sqlx::PgPool;

use super::{RepositoryError, map_constraint_error};
use crate::models::User;

/// Repository for author subscriptions.
pub struct SubscriptionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubscriptionRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Subscribe `user` to `author`.
    ///
    /// Returns `false` if the subscription already existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if either user does not exist.
    /// Returns `RepositoryError::Database` for other database errors, including
    /// the self-subscription check.
    pub async fn subscribe(&self, user: UserId, author: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO foodgram.subscription (user_id, author_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(user)
        .bind(author)
        .execute(self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "already subscribed", "unknown user"))?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a subscription. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unsubscribe(&self, user: UserId, author: UserId) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM foodgram.subscription WHERE user_id = $1 AND author_id = $2")
                .bind(user)
                .bind(author)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether `user` follows `author`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_subscribed(&self, user: UserId, author: UserId) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) = sqlx::query_as(
            r"
            SELECT EXISTS (
                SELECT 1 FROM foodgram.subscription
                WHERE user_id = $1 AND author_id = $2
            )
            ",
        )
        .bind(user)
        .bind(author)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Authors `user` follows, most recent subscription first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_authors(&self, user: UserId) -> Result<Vec<User>, RepositoryError> {
        let authors = sqlx::query_as::<_, User>(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.is_admin
            FROM foodgram.subscription s
            JOIN foodgram.user u ON u.id = s.author_id
            WHERE s.user_id = $1
            ORDER BY s.created_at DESC, s.id DESC
            ",
        )
        .bind(user)
        .fetch_all(self.pool)
        .await?;

        Ok(authors)
    }
}
