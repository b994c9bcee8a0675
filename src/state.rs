use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;

/// Shared context handed to every handler through the router.
/// Config is built once at startup and injected here instead of living in a
/// process-wide global; cloning is cheap (pool handle + Arc).
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
