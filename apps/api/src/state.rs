use std::sync::Arc;

use crate::checklist::store::ChecklistStore;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence. Default: PgChecklistStore.
    pub store: Arc<dyn ChecklistStore>,
    #[allow(dead_code)]
    pub config: Config,
}

#[cfg(test)]
pub fn test_state(store: Arc<crate::checklist::store::MemoryChecklistStore>) -> AppState {
    AppState {
        store,
        config: Config {
            database_url: "postgres://localhost/test".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            db_max_connections: 1,
        },
    }
}
