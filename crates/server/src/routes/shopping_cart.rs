//! Shopping list download.

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::services::shopping_list;
use crate::state::AppState;

/// Export the current user's shopping cart as a PDF attachment.
#[instrument(skip_all)]
pub async fn download(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    add_breadcrumb("export", "Downloaded shopping list", None);

    let export =
        shopping_list::export(&state.shopping_cart(), user.id, state.export_options()).await?;

    Ok((
        [
            (CONTENT_TYPE, export.content_type.to_string()),
            (CONTENT_DISPOSITION, attachment(export.filename)),
        ],
        export.bytes,
    )
        .into_response())
}

fn attachment(filename: &str) -> String {
    format!("attachment; filename=\"{filename}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_header() {
        assert_eq!(
            attachment(shopping_list::EXPORT_FILENAME),
            "attachment; filename=\"shopping_cart.pdf\""
        );
    }
}
