//! User domain types.

use foodgram_core::{Email, UserId};
use serde::Serialize;

use super::RecipeSummary;

/// A registered user.
///
/// This is also the identity handed to handlers by the auth extractors.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

/// Public view of a user, relative to the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub email: Email,
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the viewer follows this user. Always `false` for anonymous viewers.
    pub is_subscribed: bool,
}

impl UserView {
    #[must_use]
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// An author the viewer follows, with their recipes.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub author: UserView,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: usize,
}

impl SubscriptionView {
    #[must_use]
    pub fn new(author: User, recipes: Vec<RecipeSummary>) -> Self {
        Self {
            author: UserView::new(author, true),
            recipes_count: recipes.len(),
            recipes,
        }
    }

    /// Keep only the first `limit` recipes. `recipes_count` still reports the total.
    #[must_use]
    pub fn limit_recipes(mut self, limit: usize) -> Self {
        self.recipes.truncate(limit);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use foodgram_core::RecipeId;

    use super::*;

    fn cook() -> User {
        User {
            id: UserId::new(4),
            email: Email::parse("cook@example.com").unwrap(),
            username: "cook".to_owned(),
            first_name: "Julia".to_owned(),
            last_name: "Child".to_owned(),
            is_admin: false,
        }
    }

    #[test]
    fn test_user_view_field_names() {
        let json = serde_json::to_value(UserView::new(cook(), false)).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["email"], "cook@example.com");
        assert_eq!(json["is_subscribed"], false);
        assert!(json.get("is_admin").is_none());
    }

    #[test]
    fn test_subscription_view_is_flat_and_counts_recipes() {
        let recipes = vec![RecipeSummary {
            id: RecipeId::new(1),
            name: "Omelette".to_owned(),
            image: "recipes/omelette.png".to_owned(),
            cooking_time: 10,
        }];
        let json = serde_json::to_value(SubscriptionView::new(cook(), recipes)).unwrap();
        assert_eq!(json["username"], "cook");
        assert_eq!(json["is_subscribed"], true);
        assert_eq!(json["recipes_count"], 1);
        assert_eq!(json["recipes"][0]["name"], "Omelette");
    }

    #[test]
    fn test_subscription_view_limit_keeps_total() {
        let recipes = (1..=3)
            .map(|i| RecipeSummary {
                id: RecipeId::new(i),
                name: format!("Dish {i}"),
                image: format!("recipes/{i}.png"),
                cooking_time: 5,
            })
            .collect();
        let view = SubscriptionView::new(cook(), recipes).limit_recipes(1);
        assert_eq!(view.recipes.len(), 1);
        assert_eq!(view.recipes_count, 3);
    }
}
