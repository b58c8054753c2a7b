//! Recipe input validation.
//!
//! Create and update share one request body. [`RecipeInput::validate`] turns
//! it into a [`ValidRecipe`] that repositories can store without further
//! checks; references to tags and ingredients are checked by the database.

use std::collections::HashSet;

use foodgram_core::{IngredientId, TagId};
use serde::Deserialize;
use thiserror::Error;

/// Longest accepted recipe name, in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// Largest accepted ingredient amount or cooking time.
pub const MAX_AMOUNT: i64 = 32_767;

/// Reasons a recipe body is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeValidationError {
    #[error("a recipe needs at least one ingredient")]
    NoIngredients,

    #[error("ingredient {0} is listed more than once")]
    DuplicateIngredient(IngredientId),

    #[error("amount of ingredient {id} must be between 1 and {max} (got {amount})", max = MAX_AMOUNT)]
    AmountOutOfRange { id: IngredientId, amount: i64 },

    #[error("a recipe needs at least one tag")]
    NoTags,

    #[error("tag {0} is listed more than once")]
    DuplicateTag(TagId),

    #[error("cooking time must be between 1 and {max} minutes (got {0})", max = MAX_AMOUNT)]
    CookingTimeOutOfRange(i64),

    #[error("name must not be blank")]
    BlankName,

    #[error("name must be at most {max} characters", max = MAX_NAME_LENGTH)]
    NameTooLong,

    #[error("text must not be blank")]
    BlankText,

    #[error("image must not be blank")]
    BlankImage,
}

/// One ingredient entry of a recipe request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientAmountInput {
    pub id: IngredientId,
    pub amount: i64,
}

/// Request body for creating or replacing a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecipeInput {
    #[serde(default)]
    pub ingredients: Vec<IngredientAmountInput>,
    #[serde(default)]
    pub tags: Vec<TagId>,
    /// Opaque image reference. Upload storage is handled elsewhere.
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
}

/// Validated ingredient quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub id: IngredientId,
    pub amount: i32,
}

/// A recipe body that passed every local rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRecipe {
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<IngredientAmount>,
}

impl RecipeInput {
    /// Check every rule and return the normalized recipe.
    ///
    /// Names and text are trimmed. Rules are checked in a fixed order and the
    /// first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns the first `RecipeValidationError` that applies.
    pub fn validate(self) -> Result<ValidRecipe, RecipeValidationError> {
        let ingredients = validate_ingredients(&self.ingredients)?;
        let tags = validate_tags(&self.tags)?;
        let cooking_time = in_range(self.cooking_time)
            .ok_or(RecipeValidationError::CookingTimeOutOfRange(self.cooking_time))?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(RecipeValidationError::BlankName);
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(RecipeValidationError::NameTooLong);
        }

        let text = self.text.trim();
        if text.is_empty() {
            return Err(RecipeValidationError::BlankText);
        }

        let image = self.image.trim();
        if image.is_empty() {
            return Err(RecipeValidationError::BlankImage);
        }

        Ok(ValidRecipe {
            name: name.to_owned(),
            image: image.to_owned(),
            text: text.to_owned(),
            cooking_time,
            tags,
            ingredients,
        })
    }
}

fn validate_ingredients(
    input: &[IngredientAmountInput],
) -> Result<Vec<IngredientAmount>, RecipeValidationError> {
    if input.is_empty() {
        return Err(RecipeValidationError::NoIngredients);
    }

    let mut seen = HashSet::with_capacity(input.len());
    input
        .iter()
        .map(|item| {
            if !seen.insert(item.id) {
                return Err(RecipeValidationError::DuplicateIngredient(item.id));
            }
            let amount = in_range(item.amount).ok_or(RecipeValidationError::AmountOutOfRange {
                id: item.id,
                amount: item.amount,
            })?;
            Ok(IngredientAmount {
                id: item.id,
                amount,
            })
        })
        .collect()
}

fn validate_tags(input: &[TagId]) -> Result<Vec<TagId>, RecipeValidationError> {
    if input.is_empty() {
        return Err(RecipeValidationError::NoTags);
    }

    let mut seen = HashSet::with_capacity(input.len());
    for tag in input {
        if !seen.insert(*tag) {
            return Err(RecipeValidationError::DuplicateTag(*tag));
        }
    }
    Ok(input.to_vec())
}

fn in_range(value: i64) -> Option<i32> {
    if (1..=MAX_AMOUNT).contains(&value) {
        i32::try_from(value).ok()
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pancakes() -> RecipeInput {
        RecipeInput {
            ingredients: vec![
                IngredientAmountInput {
                    id: IngredientId::new(1),
                    amount: 300,
                },
                IngredientAmountInput {
                    id: IngredientId::new(2),
                    amount: 2,
                },
            ],
            tags: vec![TagId::new(1)],
            image: "recipes/images/pancakes.png".to_owned(),
            name: "  Pancakes ".to_owned(),
            text: "Mix and fry.".to_owned(),
            cooking_time: 20,
        }
    }

    #[test]
    fn test_valid_recipe() {
        let recipe = pancakes().validate().unwrap();
        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.cooking_time, 20);
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].amount, 300);
    }

    #[test]
    fn test_no_ingredients() {
        let input = RecipeInput {
            ingredients: Vec::new(),
            ..pancakes()
        };
        assert_eq!(input.validate(), Err(RecipeValidationError::NoIngredients));
    }

    #[test]
    fn test_duplicate_ingredient() {
        let mut input = pancakes();
        input.ingredients[1].id = IngredientId::new(1);
        assert_eq!(
            input.validate(),
            Err(RecipeValidationError::DuplicateIngredient(IngredientId::new(1)))
        );
    }

    #[test]
    fn test_amount_bounds() {
        for amount in [0, -1, MAX_AMOUNT + 1] {
            let mut input = pancakes();
            input.ingredients[0].amount = amount;
            assert!(matches!(
                input.validate(),
                Err(RecipeValidationError::AmountOutOfRange { .. })
            ));
        }

        let mut input = pancakes();
        input.ingredients[0].amount = 1;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_tags_required_and_unique() {
        let input = RecipeInput {
            tags: Vec::new(),
            ..pancakes()
        };
        assert_eq!(input.validate(), Err(RecipeValidationError::NoTags));

        let input = RecipeInput {
            tags: vec![TagId::new(3), TagId::new(3)],
            ..pancakes()
        };
        assert_eq!(
            input.validate(),
            Err(RecipeValidationError::DuplicateTag(TagId::new(3)))
        );
    }

    #[test]
    fn test_cooking_time() {
        let input = RecipeInput {
            cooking_time: 0,
            ..pancakes()
        };
        assert_eq!(
            input.validate(),
            Err(RecipeValidationError::CookingTimeOutOfRange(0))
        );
    }

    #[test]
    fn test_name_and_text() {
        let input = RecipeInput {
            name: "   ".to_owned(),
            ..pancakes()
        };
        assert_eq!(input.validate(), Err(RecipeValidationError::BlankName));

        let input = RecipeInput {
            name: "x".repeat(MAX_NAME_LENGTH + 1),
            ..pancakes()
        };
        assert_eq!(input.validate(), Err(RecipeValidationError::NameTooLong));

        let input = RecipeInput {
            text: "\n".to_owned(),
            ..pancakes()
        };
        assert_eq!(input.validate(), Err(RecipeValidationError::BlankText));
    }

    #[test]
    fn test_deserialize_request_body() {
        let input: RecipeInput = serde_json::from_str(
            r#"{
                "ingredients": [{"id": 1, "amount": 10}],
                "tags": [1, 2],
                "image": "recipes/images/soup.png",
                "name": "Soup",
                "text": "Boil.",
                "cooking_time": 5
            }"#,
        )
        .unwrap();
        assert_eq!(input.tags, vec![TagId::new(1), TagId::new(2)]);
        assert!(input.validate().is_ok());
    }
}
