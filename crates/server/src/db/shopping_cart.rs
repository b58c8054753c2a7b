//! Shopping cart ingredient source for list exports.

use foodgram_core::{IngredientLine, UserId};
use sqlx::PgPool;

use super::RepositoryError;
use crate::services::shopping_list::CartSource;

/// Reads the ingredient lines of every recipe in a user's shopping cart.
#[derive(Clone)]
pub struct ShoppingCartRepository {
    pool: PgPool,
}

impl ShoppingCartRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CartSource for ShoppingCartRepository {
    /// Lines come back in cart insertion order, then by ingredient name within a recipe.
    async fn cart_ingredient_lines(
        &self,
        user_id: UserId,
    ) -> Result<Vec<IngredientLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, IngredientLine>(
            r"
            SELECT i.name AS ingredient_name,
                   i.measurement_unit,
                   ri.amount
            FROM foodgram.shopping_cart sc
            JOIN foodgram.recipe_ingredient ri ON ri.recipe_id = sc.recipe_id
            JOIN foodgram.ingredient i ON i.id = ri.ingredient_id
            WHERE sc.user_id = $1
            ORDER BY sc.id, i.name
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}
