//! Integration tests for Foodgram.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p foodgram-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `shopping_list_export` - Cart aggregation through PDF rendering
//! - `recipe_validation` - Recipe request bodies and error status mapping
//!
//! None of the tests need a database: carts are served from [`FixtureCart`].
//! Exported documents are read back with [`drawn_text`].

use std::collections::HashMap;

use foodgram_core::{IngredientLine, UserId};
use printpdf::lopdf::content::Content;
use printpdf::lopdf::{Document, Object};
use foodgram_server::db::RepositoryError;
use foodgram_server::services::shopping_list::CartSource;

/// In-memory shopping carts keyed by user.
///
/// Each user's cart is a list of recipes; each recipe a list of
/// `(ingredient, unit, amount)` rows. Lines are served in cart order, then
/// ingredient name, like the database-backed source.
#[derive(Debug, Default, Clone)]
pub struct FixtureCart {
    carts: HashMap<UserId, Vec<Vec<IngredientLine>>>,
}

impl FixtureCart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a recipe with the given ingredient rows into `user`'s cart.
    #[must_use]
    pub fn with_recipe(mut self, user: UserId, rows: &[(&str, &str, i32)]) -> Self {
        let mut recipe: Vec<IngredientLine> = rows
            .iter()
            .map(|(name, unit, amount)| IngredientLine::new(*name, *unit, *amount))
            .collect();
        recipe.sort_by(|a, b| a.ingredient_name.cmp(&b.ingredient_name));
        self.carts.entry(user).or_default().push(recipe);
        self
    }

    /// Every raw line in `user`'s cart.
    #[must_use]
    pub fn raw_lines(&self, user: UserId) -> Vec<IngredientLine> {
        self.carts
            .get(&user)
            .map(|recipes| recipes.iter().flatten().cloned().collect())
            .unwrap_or_default()
    }
}

impl CartSource for FixtureCart {
    async fn cart_ingredient_lines(
        &self,
        user_id: UserId,
    ) -> Result<Vec<IngredientLine>, RepositoryError> {
        Ok(self.raw_lines(user_id))
    }
}

/// Text drawn on each page of a PDF export, one entry per `Tj` operation.
///
/// Strings are decoded with the builtin font encoding, so this is only
/// meaningful for exports rendered with `FontSource::Builtin`.
///
/// # Panics
///
/// Panics if `bytes` is not a readable PDF.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn drawn_text(bytes: &[u8]) -> Vec<Vec<String>> {
    let mut doc = Document::load_mem(bytes).unwrap();
    doc.decompress();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(raw, _)) => {
                        Some(Document::decode_text(Some("WinAnsiEncoding"), raw))
                    }
                    _ => None,
                })
                .collect()
        })
        .collect()
}
