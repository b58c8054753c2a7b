//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::db::ShoppingCartRepository;
use crate::services::shopping_list::{LayoutText, RenderOptions};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Cart source backed by this state's pool.
    #[must_use]
    pub fn shopping_cart(&self) -> ShoppingCartRepository {
        ShoppingCartRepository::new(self.inner.pool.clone())
    }

    /// Render options for shopping list exports.
    #[must_use]
    pub fn export_options(&self) -> RenderOptions {
        let export = &self.inner.config.export;
        RenderOptions {
            font: export.font.clone(),
            page_capacity: export.page_capacity,
            text: LayoutText::default(),
        }
    }
}
