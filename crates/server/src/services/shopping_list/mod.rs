//! Shopping list export.
//!
//! An export runs in two steps:
//!
//! 1. [`aggregate`] reads every ingredient line reachable from a user's cart
//!    through a [`CartSource`] and sums amounts per `(name, unit)`.
//! 2. [`render`] lays the totals out on pages ([`layout`]) and encodes the
//!    pages as a PDF ([`pdf`]).
//!
//! [`export`] chains both, running the CPU-bound render off the async runtime.

pub mod aggregate;
pub mod layout;
pub mod pdf;

use std::future::Future;

use foodgram_core::{CartLine, IngredientLine, UserId};
use thiserror::Error;
use tracing::instrument;

use crate::db::RepositoryError;

pub use aggregate::{aggregate, group_lines};
pub use layout::{LaidLine, LayoutText, LineStyle, Page, PageCapacity, PageCapacityError, lay_out};
pub use pdf::FontSource;

/// File name offered to the client for the exported list.
pub const EXPORT_FILENAME: &str = "shopping_cart.pdf";

/// Media type of the exported document.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Errors that can occur while building a shopping list export.
#[derive(Debug, Error)]
pub enum ShoppingListError {
    /// A resource the renderer needs (such as the font file) could not be loaded.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Stored cart data violates an invariant the export relies on.
    #[error("invalid cart data: {0}")]
    InvalidState(String),

    /// Reading the cart failed.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// The document could not be produced.
    #[error("render error: {0}")]
    Render(String),
}

/// Read access to the ingredient lines of a user's shopping cart.
///
/// Implementations return lines in a fixed order: cart entry order, then
/// ingredient name within each recipe.
pub trait CartSource {
    fn cart_ingredient_lines(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<IngredientLine>, RepositoryError>> + Send;
}

/// A finished export ready to be sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListExport {
    pub bytes: Vec<u8>,
    pub filename: &'static str,
    pub content_type: &'static str,
}

impl ShoppingListExport {
    const fn pdf(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            filename: EXPORT_FILENAME,
            content_type: PDF_CONTENT_TYPE,
        }
    }
}

/// Everything the renderer needs besides the lines themselves.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub font: FontSource,
    pub page_capacity: PageCapacity,
    pub text: LayoutText,
}

/// Render aggregated lines into a PDF document.
///
/// # Errors
///
/// Returns `ShoppingListError::ResourceUnavailable` if the configured font cannot be loaded.
/// Returns `ShoppingListError::Render` if PDF encoding fails.
pub fn render(
    lines: &[CartLine],
    options: &RenderOptions,
) -> Result<ShoppingListExport, ShoppingListError> {
    let pages = lay_out(lines, options.page_capacity, &options.text);
    let bytes = pdf::encode(&pages, &options.font)?;
    Ok(ShoppingListExport::pdf(bytes))
}

/// Build the shopping list export for `user_id`.
///
/// # Errors
///
/// Returns `ShoppingListError::Storage` if the cart cannot be read,
/// `ShoppingListError::InvalidState` if it holds malformed lines, and any
/// error from [`render`].
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn export<S>(
    source: &S,
    user_id: UserId,
    options: RenderOptions,
) -> Result<ShoppingListExport, ShoppingListError>
where
    S: CartSource + Sync,
{
    let lines = aggregate(source, user_id).await?;
    tracing::debug!(lines = lines.len(), "Aggregated shopping list");

    let export = tokio::task::spawn_blocking(move || render(&lines, &options))
        .await
        .map_err(|e| ShoppingListError::Render(format!("render task failed: {e}")))??;

    tracing::info!(bytes = export.bytes.len(), "Rendered shopping list");
    Ok(export)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct FixedCart(Vec<IngredientLine>);

    impl CartSource for FixedCart {
        async fn cart_ingredient_lines(
            &self,
            _user_id: UserId,
        ) -> Result<Vec<IngredientLine>, RepositoryError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_render_metadata() {
        let lines = vec![CartLine::new("Flour", "g", 300)];
        let export = render(&lines, &RenderOptions::default()).unwrap();
        assert_eq!(export.filename, "shopping_cart.pdf");
        assert_eq!(export.content_type, "application/pdf");
        assert!(export.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_missing_font_produces_nothing() {
        let options = RenderOptions {
            font: FontSource::File("/nonexistent/fonts/missing.ttf".into()),
            ..RenderOptions::default()
        };
        let err = render(&[CartLine::new("Egg", "pcs", 2)], &options).unwrap_err();
        assert!(matches!(err, ShoppingListError::ResourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_export_empty_cart_still_renders() {
        let export = export(&FixedCart(Vec::new()), UserId::new(1), RenderOptions::default())
            .await
            .unwrap();
        assert!(export.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_export_rejects_bad_amount() {
        let cart = FixedCart(vec![IngredientLine::new("Salt", "g", 0)]);
        let err = export(&cart, UserId::new(1), RenderOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ShoppingListError::InvalidState(_)));
    }
}
