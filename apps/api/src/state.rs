use std::sync::Arc;

use crate::config::Config;
use crate::decode::PageDecoder;
use crate::llm_client::TextCompleter;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Text-completion collaborator. `LlmClient` in production, a stub in tests.
    pub llm: Arc<dyn TextCompleter>,
    /// First-page rasterizer for uploaded resumes.
    pub decoder: Arc<dyn PageDecoder>,
    pub sessions: SessionStore,
    pub config: Config,
}
