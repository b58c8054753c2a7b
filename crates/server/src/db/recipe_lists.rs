//! Per-user recipe lists: favorites and the shopping cart.
//!
//! Both lists have the same shape (`user_id`, `recipe_id`, unique per pair),
//! so one repository serves both.

use foodgram_core::{RecipeId, UserId};
use sqlx::PgPool;

use super::{RepositoryError, map_constraint_error};

/// Which per-user list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeList {
    Favorites,
    ShoppingCart,
}

impl RecipeList {
    const fn table(self) -> &'static str {
        match self {
            Self::Favorites => "foodgram.favorite_recipe",
            Self::ShoppingCart => "foodgram.shopping_cart",
        }
    }

    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}

/// Repository for adding and removing recipes on a user's list.
pub struct RecipeListRepository<'a> {
    pool: &'a PgPool,
    list: RecipeList,
}

impl<'a> RecipeListRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, list: RecipeList) -> Self {
        Self { pool, list }
    }

    /// Add a recipe to the list.
    ///
    /// Returns `false` if the recipe was already on the list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the recipe or user does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add(&self, user: UserId, recipe: RecipeId) -> Result<bool, RepositoryError> {
        let sql = format!(
            "INSERT INTO {} (user_id, recipe_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            self.list.table()
        );

        let result = sqlx::query(&sql)
            .bind(user)
            .bind(recipe)
            .execute(self.pool)
            .await
            .map_err(|e| map_constraint_error(e, "already on list", "unknown recipe"))?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a recipe from the list.
    ///
    /// Returns `false` if the recipe was not on the list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(&self, user: UserId, recipe: RecipeId) -> Result<bool, RepositoryError> {
        let sql = format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            self.list.table()
        );

        let result = sqlx::query(&sql)
            .bind(user)
            .bind(recipe)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_tables() {
        assert_eq!(RecipeList::Favorites.table(), "foodgram.favorite_recipe");
        assert_eq!(RecipeList::ShoppingCart.table(), "foodgram.shopping_cart");
    }

    #[test]
    fn test_list_labels() {
        assert_eq!(RecipeList::ShoppingCart.label(), "shopping cart");
    }
}
