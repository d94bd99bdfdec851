use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::session::export::SubmissionLog;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub submissions: SubmissionLog,
    /// AI backend for question generation. `None` when no API key is configured.
    pub llm: Option<Arc<dyn TextGenerator>>,
}

impl AppState {
    pub fn new(config: Config, llm: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            config,
            sessions: SessionStore::new(),
            submissions: SubmissionLog::new(),
            llm,
        }
    }
}
