use std::sync::Arc;

use crate::analysis_client::Analyzer;
use crate::config::Config;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable analyzer. Default: `AnalysisClient` pointed at `API_URL`.
    pub analyzer: Arc<dyn Analyzer>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, analyzer: Arc<dyn Analyzer>) -> Self {
        let sessions = SessionStore::new(config.session_idle_secs);
        Self {
            config,
            analyzer,
            sessions,
        }
    }
}
