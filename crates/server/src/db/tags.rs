//! Tag repository.

use foodgram_core::{HexColor, Slug, TagId};
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Tag;

/// Repository for recipe tags.
pub struct TagRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all tags, ordered by name descending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Tag>, RepositoryError> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT id, name, color, slug FROM foodgram.tag ORDER BY name DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(tags)
    }

    /// Get a tag by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: TagId) -> Result<Option<Tag>, RepositoryError> {
        let tag = sqlx::query_as::<_, Tag>(
            "SELECT id, name, color, slug FROM foodgram.tag WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(tag)
    }

    /// Insert a tag unless one with the same name, color or slug exists.
    ///
    /// Returns `true` if a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_if_missing(
        &self,
        name: &str,
        color: &HexColor,
        slug: &Slug,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO foodgram.tag (name, color, slug)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(name)
        .bind(color)
        .bind(slug)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
