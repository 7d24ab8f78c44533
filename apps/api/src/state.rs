use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionService;
use crate::render::pdf::PdfRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion service for section generation. Default: `LlmClient` against DeepSeek.
    pub llm: Arc<dyn CompletionService>,
    /// PDF export backend. Default: `ChromiumPdfRenderer`, one browser per export.
    pub pdf: Arc<dyn PdfRenderer>,
    pub config: Config,
}
