use std::sync::Arc;

use crate::config::Config;
use crate::matching::MatchEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    #[allow(dead_code)]
    pub config: Config,
    /// Settings are validated once at startup; the engine is read-only after that.
    pub engine: Arc<MatchEngine>,
}
