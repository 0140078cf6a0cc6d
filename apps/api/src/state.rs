use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::scoring::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Live debounced scoring sessions, one per open editor.
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = SessionRegistry::new(
            Duration::from_millis(config.score_debounce_ms),
            Duration::from_secs(config.session_ttl_secs),
        );
        Self {
            config,
            sessions: Arc::new(sessions),
        }
    }
}
