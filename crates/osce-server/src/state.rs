use std::sync::Arc;

use osce_cases::catalog::CaseCatalog;
use osce_practice::conversation::{CannedReplies, ResponseSource};
use osce_practice::session::SessionTiming;

use crate::config::ServerConfig;
use crate::registry::SessionRegistry;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CaseCatalog,
    pub responder: Arc<dyn ResponseSource>,
    pub sessions: Arc<SessionRegistry>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let catalog = CaseCatalog::builtin();
        let responder = Arc::new(CannedReplies::new(catalog.clone()));
        Self::with_responder(config, catalog, responder)
    }

    pub fn with_responder(
        config: ServerConfig,
        catalog: CaseCatalog,
        responder: Arc<dyn ResponseSource>,
    ) -> Self {
        let sessions = Arc::new(SessionRegistry::new(config.timing.driver_tick()));
        Self {
            catalog,
            responder,
            sessions,
            config: Arc::new(config),
        }
    }

    pub fn session_timing(&self) -> SessionTiming {
        SessionTiming::from(&self.config.timing)
    }
}
