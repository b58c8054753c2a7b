//! HTTP middleware and extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Authentication is done per handler through the [`RequireAuth`] and
//! [`OptionalAuth`] extractors.

pub mod auth;
pub mod request_id;

pub use auth::{OptionalAuth, RequireAuth};
pub use request_id::request_id_middleware;
