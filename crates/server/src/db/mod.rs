//! Database operations for the Foodgram `PostgreSQL` schema.
//!
//! # Schema: `foodgram`
//!
//! ## Tables
//!
//! - `user` - Recipe authors and readers
//! - `auth_token` - API tokens (issued externally, only read here)
//! - `tag` - Recipe categories
//! - `ingredient` - Ingredient catalog with measurement units
//! - `recipe` - Published recipes
//! - `recipe_tag` - Recipe to tag links
//! - `recipe_ingredient` - Recipe ingredient quantities
//! - `subscription` - User follows author
//! - `favorite_recipe` - User favorites
//! - `shopping_cart` - Recipes a user intends to shop for
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p foodgram-cli -- migrate
//! ```
//!
//! Queries are checked at runtime (`query_as` with `FromRow` rows) so the
//! workspace builds without a live database.

pub mod ingredients;
pub mod recipe_lists;
pub mod recipes;
pub mod shopping_cart;
pub mod subscriptions;
pub mod tags;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use ingredients::IngredientRepository;
pub use recipe_lists::{RecipeList, RecipeListRepository};
pub use recipes::RecipeRepository;
pub use shopping_cart::ShoppingCartRepository;
pub use subscriptions::SubscriptionRepository;
pub use tags::TagRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Foreign key violation: a referenced row does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Translate unique and foreign key violations into typed repository errors.
pub(crate) fn map_constraint_error(
    err: sqlx::Error,
    conflict: &str,
    reference: &str,
) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(conflict.to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::InvalidReference(reference.to_owned());
        }
    }
    RepositoryError::Database(err)
}
