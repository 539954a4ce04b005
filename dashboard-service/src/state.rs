use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;

/// Shared handler state: one lifecycle-managed connection pool plus the
/// loaded configuration, injected into every route.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
}
