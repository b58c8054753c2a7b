//! Domain models and response bodies.
//!
//! Every endpoint serializes one of these explicitly declared structs; no
//! field list is derived at runtime.

pub mod catalog;
pub mod recipe;
pub mod user;

pub use catalog::{Ingredient, Tag};
pub use recipe::{Recipe, RecipeIngredient, RecipeSummary};
pub use user::{SubscriptionView, User, UserView};
