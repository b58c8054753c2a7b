//! Ingredient catalog repository.

use foodgram_core::IngredientId;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Ingredient;

/// Repository for the ingredient catalog.
pub struct IngredientRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> IngredientRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List ingredients ordered by name, optionally restricted to names
    /// starting with `prefix` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, prefix: Option<&str>) -> Result<Vec<Ingredient>, RepositoryError> {
        let pattern = prefix
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}%", escape_like(&p.to_lowercase())));

        let ingredients = sqlx::query_as::<_, Ingredient>(
            r"
            SELECT id, name, measurement_unit
            FROM foodgram.ingredient
            WHERE $1::text IS NULL OR LOWER(name) LIKE $1
            ORDER BY name
            ",
        )
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(ingredients)
    }

    /// Get an ingredient by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: IngredientId) -> Result<Option<Ingredient>, RepositoryError> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, measurement_unit FROM foodgram.ingredient WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(ingredient)
    }

    /// Insert an ingredient unless the same name and unit pair exists.
    ///
    /// Returns `true` if a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_if_missing(
        &self,
        name: &str,
        measurement_unit: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO foodgram.ingredient (name, measurement_unit)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(name)
        .bind(measurement_unit)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Escape `LIKE` wildcards so user input is matched literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("flour"), "flour");
        assert_eq!(escape_like("100%_rye\\"), "100\\%\\_rye\\\\");
    }
}
