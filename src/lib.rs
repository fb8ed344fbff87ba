pub mod cli;
pub mod config;
pub mod error;
pub mod rest;
pub mod store;

use std::sync::Arc;

use config::ServerConfig;
use store::TaskStore;

/// Shared application state passed to every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub store: Arc<TaskStore>,
    pub started_at: std::time::Instant,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(TaskStore::new()),
            started_at: std::time::Instant::now(),
        }
    }

    /// One-time startup work: seed the welcome tasks when configured.
    ///
    /// Called once from `run_server` before the listener is bound; tests
    /// call it directly when exercising the seeded configuration.
    pub async fn bootstrap(&self) {
        if self.config.welcome_tasks {
            self.store.seed_welcome().await;
        }
    }
}
