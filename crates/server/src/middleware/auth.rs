//! Token authentication extractors.
//!
//! Clients send `Authorization: Token <key>`. Keys are issued by the external
//! auth service; here they are only resolved to a user.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::db::UserRepository;
use crate::error::{AppError, set_sentry_user};
use crate::models::User;
use crate::state::AppState;

const TOKEN_SCHEME: &str = "Token";

/// Extractor that requires an authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Extractor that optionally gets the current user.
///
/// Anonymous requests yield `None`. A token that is present but unknown is
/// still rejected.
pub struct OptionalAuth(pub Option<User>);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let OptionalAuth(user) = OptionalAuth::from_request_parts(parts, state).await?;
        user.map(Self).ok_or(AppError::Unauthorized)
    }
}

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Self(None));
        };

        let key = header
            .to_str()
            .ok()
            .and_then(parse_token)
            .ok_or(AppError::Unauthorized)?;

        let user = UserRepository::new(state.pool())
            .get_by_token(key)
            .await?
            .ok_or(AppError::Unauthorized)?;

        set_sentry_user(&user.id, Some(user.email.as_str()));
        tracing::Span::current().record("user_id", user.id.as_i32());

        Ok(Self(Some(user)))
    }
}

/// Extract the key from a `Token <key>` header value.
fn parse_token(value: &str) -> Option<&str> {
    let (scheme, key) = value.trim().split_once(' ')?;
    let key = key.trim();
    (scheme.eq_ignore_ascii_case(TOKEN_SCHEME) && !key.is_empty()).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token() {
        assert_eq!(parse_token("Token abc123"), Some("abc123"));
        assert_eq!(parse_token("token   abc123 "), Some("abc123"));
    }

    #[test]
    fn test_parse_token_rejects_other_schemes() {
        assert_eq!(parse_token("Bearer abc123"), None);
        assert_eq!(parse_token("Token"), None);
        assert_eq!(parse_token("Token "), None);
        assert_eq!(parse_token(""), None);
    }
}
