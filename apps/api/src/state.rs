use std::sync::Arc;

use crate::analysis::client::AnalysisFunction;
use crate::config::Config;
use crate::feedback::store::FeedbackStore;
use crate::ui::clipboard::Clipboard;
use crate::ui::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Remote analysis function. Default: `HttpAnalysisFunction`.
    pub analyzer: Arc<dyn AnalysisFunction>,
    pub clipboard: Arc<dyn Clipboard>,
    pub feedback: Arc<dyn FeedbackStore>,
    pub sessions: Arc<SessionStore>,
}
