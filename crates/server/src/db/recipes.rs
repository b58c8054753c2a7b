//! Recipe repository.
//!
//! Recipes are loaded in two steps: the recipe rows (with author and the
//! viewer-relative flags), then tags and ingredients for all returned ids in
//! one query each.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use foodgram_core::{Email, IngredientId, RecipeId, UserId};
use sqlx::{PgPool, Postgres, Transaction};

use super::{RepositoryError, map_constraint_error};
use crate::models::{Recipe, RecipeIngredient, RecipeSummary, Tag, User, UserView};
use crate::services::recipes::ValidRecipe;

/// Shared SELECT for recipes. `$1` is the viewer id, or NULL for anonymous viewers.
const RECIPE_SELECT: &str = r"
    SELECT r.id, r.name, r.image, r.text, r.cooking_time, r.pub_date,
           EXISTS (
               SELECT 1 FROM foodgram.favorite_recipe f
               WHERE f.recipe_id = r.id AND f.user_id = $1
           ) AS is_favorited,
           EXISTS (
               SELECT 1 FROM foodgram.shopping_cart c
               WHERE c.recipe_id = r.id AND c.user_id = $1
           ) AS is_in_shopping_cart,
           u.id AS author_id, u.email AS author_email, u.username AS author_username,
           u.first_name AS author_first_name, u.last_name AS author_last_name,
           u.is_admin AS author_is_admin,
           EXISTS (
               SELECT 1 FROM foodgram.subscription s
               WHERE s.author_id = u.id AND s.user_id = $1
           ) AS author_is_subscribed
    FROM foodgram.recipe r
    JOIN foodgram.user u ON u.id = r.author_id
";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct RecipeRow {
    id: RecipeId,
    name: String,
    image: String,
    text: String,
    cooking_time: i32,
    pub_date: DateTime<Utc>,
    is_favorited: bool,
    is_in_shopping_cart: bool,
    author_id: UserId,
    author_email: Email,
    author_username: String,
    author_first_name: String,
    author_last_name: String,
    author_is_admin: bool,
    author_is_subscribed: bool,
}

impl RecipeRow {
    fn into_recipe(self, tags: Vec<Tag>, ingredients: Vec<RecipeIngredient>) -> Recipe {
        let author = User {
            id: self.author_id,
            email: self.author_email,
            username: self.author_username,
            first_name: self.author_first_name,
            last_name: self.author_last_name,
            is_admin: self.author_is_admin,
        };

        Recipe {
            id: self.id,
            tags,
            author: UserView::new(author, self.author_is_subscribed),
            ingredients,
            image: self.image,
            name: self.name,
            text: self.text,
            cooking_time: self.cooking_time,
            pub_date: self.pub_date,
            is_favorited: self.is_favorited,
            is_in_shopping_cart: self.is_in_shopping_cart,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RecipeTagRow {
    recipe_id: RecipeId,
    #[sqlx(flatten)]
    tag: Tag,
}

#[derive(Debug, sqlx::FromRow)]
struct RecipeIngredientRow {
    recipe_id: RecipeId,
    id: IngredientId,
    name: String,
    measurement_unit: String,
    amount: i32,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for recipes and their tag and ingredient links.
pub struct RecipeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RecipeRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all recipes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, viewer: Option<UserId>) -> Result<Vec<Recipe>, RepositoryError> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "{RECIPE_SELECT} ORDER BY r.pub_date DESC, r.id DESC"
        ))
        .bind(viewer)
        .fetch_all(self.pool)
        .await?;

        self.attach_details(rows).await
    }

    /// Get one recipe as seen by `viewer`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(
        &self,
        id: RecipeId,
        viewer: Option<UserId>,
    ) -> Result<Option<Recipe>, RepositoryError> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!("{RECIPE_SELECT} WHERE r.id = $2"))
            .bind(viewer)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.attach_details(vec![row]).await?.into_iter().next())
    }

    /// Get the short form of a recipe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_summary(&self, id: RecipeId) -> Result<Option<RecipeSummary>, RepositoryError> {
        let summary = sqlx::query_as::<_, RecipeSummary>(
            "SELECT id, name, image, cooking_time FROM foodgram.recipe WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(summary)
    }

    /// All recipes by one author in short form, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summaries_by_author(
        &self,
        author: UserId,
    ) -> Result<Vec<RecipeSummary>, RepositoryError> {
        let summaries = sqlx::query_as::<_, RecipeSummary>(
            r"
            SELECT id, name, image, cooking_time
            FROM foodgram.recipe
            WHERE author_id = $1
            ORDER BY pub_date DESC, id DESC
            ",
        )
        .bind(author)
        .fetch_all(self.pool)
        .await?;

        Ok(summaries)
    }

    /// Get the author of a recipe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn author_of(&self, id: RecipeId) -> Result<Option<UserId>, RepositoryError> {
        let author: Option<(UserId,)> =
            sqlx::query_as("SELECT author_id FROM foodgram.recipe WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(author.map(|(id,)| id))
    }

    /// Create a recipe with its tags and ingredients in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the author already has a recipe with this name.
    /// Returns `RepositoryError::InvalidReference` if a tag or ingredient does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        author: UserId,
        recipe: &ValidRecipe,
    ) -> Result<RecipeId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (id,): (RecipeId,) = sqlx::query_as(
            r"
            INSERT INTO foodgram.recipe (author_id, name, image, text, cooking_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(author)
        .bind(&recipe.name)
        .bind(&recipe.image)
        .bind(&recipe.text)
        .bind(recipe.cooking_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_NAME, "unknown author"))?;

        insert_links(&mut tx, id, recipe).await?;
        tx.commit().await?;

        Ok(id)
    }

    /// Replace every field, tag and ingredient of a recipe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the recipe does not exist.
    /// Returns `RepositoryError::Conflict` if the new name clashes with another recipe of the author.
    /// Returns `RepositoryError::InvalidReference` if a tag or ingredient does not exist.
    pub async fn update(&self, id: RecipeId, recipe: &ValidRecipe) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE foodgram.recipe
            SET name = $2, image = $3, text = $4, cooking_time = $5
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&recipe.name)
        .bind(&recipe.image)
        .bind(&recipe.text)
        .bind(recipe.cooking_time)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_NAME, "unknown author"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM foodgram.recipe_tag WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM foodgram.recipe_ingredient WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_links(&mut tx, id, recipe).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Delete a recipe. Favorites and cart entries cascade.
    ///
    /// Returns `true` if the recipe existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: RecipeId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM foodgram.recipe WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn attach_details(&self, rows: Vec<RecipeRow>) -> Result<Vec<Recipe>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<RecipeId> = rows.iter().map(|r| r.id).collect();

        let tag_rows = sqlx::query_as::<_, RecipeTagRow>(
            r"
            SELECT rt.recipe_id, t.id, t.name, t.color, t.slug
            FROM foodgram.recipe_tag rt
            JOIN foodgram.tag t ON t.id = rt.tag_id
            WHERE rt.recipe_id = ANY($1)
            ORDER BY t.name DESC
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let ingredient_rows = sqlx::query_as::<_, RecipeIngredientRow>(
            r"
            SELECT ri.recipe_id, i.id, i.name, i.measurement_unit, ri.amount
            FROM foodgram.recipe_ingredient ri
            JOIN foodgram.ingredient i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ANY($1)
            ORDER BY i.name
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut tags: HashMap<RecipeId, Vec<Tag>> = HashMap::new();
        for row in tag_rows {
            tags.entry(row.recipe_id).or_default().push(row.tag);
        }

        let mut ingredients: HashMap<RecipeId, Vec<RecipeIngredient>> = HashMap::new();
        for row in ingredient_rows {
            ingredients
                .entry(row.recipe_id)
                .or_default()
                .push(RecipeIngredient {
                    id: row.id,
                    name: row.name,
                    measurement_unit: row.measurement_unit,
                    amount: row.amount,
                });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let recipe_tags = tags.remove(&row.id).unwrap_or_default();
                let recipe_ingredients = ingredients.remove(&row.id).unwrap_or_default();
                row.into_recipe(recipe_tags, recipe_ingredients)
            })
            .collect())
    }
}

const DUPLICATE_NAME: &str = "author already has a recipe with this name";

/// Insert tag and ingredient links for a recipe inside an open transaction.
async fn insert_links(
    tx: &mut Transaction<'_, Postgres>,
    id: RecipeId,
    recipe: &ValidRecipe,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO foodgram.recipe_tag (recipe_id, tag_id)
        SELECT $1, tag_id FROM UNNEST($2::int4[]) AS t (tag_id)
        ",
    )
    .bind(id)
    .bind(&recipe.tags)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_constraint_error(e, "duplicate tag", "unknown tag"))?;

    let (ingredient_ids, amounts): (Vec<IngredientId>, Vec<i32>) = recipe
        .ingredients
        .iter()
        .map(|line| (line.id, line.amount))
        .unzip();

    sqlx::query(
        r"
        INSERT INTO foodgram.recipe_ingredient (recipe_id, ingredient_id, amount)
        SELECT $1, ingredient_id, amount
        FROM UNNEST($2::int4[], $3::int4[]) AS t (ingredient_id, amount)
        ",
    )
    .bind(id)
    .bind(&ingredient_ids)
    .bind(&amounts)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_constraint_error(e, "duplicate ingredient", "unknown ingredient"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_select_binds_viewer_first() {
        // Every viewer-relative flag must read the same parameter.
        assert_eq!(RECIPE_SELECT.matches("= $1").count(), 3);
        assert!(!RECIPE_SELECT.contains("$2"));
    }
}
