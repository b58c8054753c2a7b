//! Recipe domain types.

use chrono::{DateTime, Utc};
use foodgram_core::{IngredientId, RecipeId};
use serde::Serialize;

use super::{Tag, UserView};

/// One ingredient of a recipe with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeIngredient {
    /// Ingredient id (not the id of the recipe-ingredient link).
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// A recipe as seen by a particular viewer.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredient>,
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    #[serde(skip)]
    pub pub_date: DateTime<Utc>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Short form returned when a recipe is added to a list, and nested in subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}
