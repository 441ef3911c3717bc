use std::sync::Arc;
use std::time::Duration;

use grocerific_db::{DbPool, ItemRepo, ItemStore};

use crate::config::ServerConfig;
use crate::sessions::DemoSessions;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Database connection pool, when a database is configured.
    pub pool: Option<DbPool>,
    /// Store behind the durable `/api` surface.
    pub item_store: Option<Arc<dyn ItemStore>>,
    /// Per-session stores behind `/demo-api`.
    pub demo_sessions: Arc<DemoSessions>,
}

impl AppState {
    /// State backed by PostgreSQL, or with no durable store if `pool` is `None`.
    pub fn new(config: ServerConfig, pool: Option<DbPool>) -> Self {
        let item_store = pool
            .clone()
            .map(|pool| Arc::new(ItemRepo::new(pool)) as Arc<dyn ItemStore>);
        Self::with_store(config, pool, item_store)
    }

    /// State with an explicitly injected durable store.
    pub fn with_store(
        config: ServerConfig,
        pool: Option<DbPool>,
        item_store: Option<Arc<dyn ItemStore>>,
    ) -> Self {
        let demo_sessions = Arc::new(DemoSessions::new(Duration::from_secs(
            config.demo_session_ttl_secs,
        )));
        Self {
            config: Arc::new(config),
            pool,
            item_store,
            demo_sessions,
        }
    }
}
