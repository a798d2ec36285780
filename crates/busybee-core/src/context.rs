//! Application context.
//!
//! Built once by the entry point and handed to whatever needs the
//! configuration or the controller.

use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::controller::RequestController;
use crate::history::storage::KeyValueStore;
use crate::history::HistoryStore;
use crate::provider::AnalysisProvider;

/// Everything a session needs, owned in one place.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: Config,
    controller: Arc<RequestController>,
}

impl AppContext {
    /// Wire a controller around `provider`, loading history from `storage`.
    pub fn new(
        config: Config,
        provider: Arc<dyn AnalysisProvider>,
        storage: Box<dyn KeyValueStore>,
    ) -> Self {
        let history = HistoryStore::open(storage);
        debug!(entries = history.entries().len(), "Application context ready");
        Self {
            config,
            controller: Arc::new(RequestController::new(provider, history)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn controller(&self) -> &Arc<RequestController> {
        &self.controller
    }
}
