use std::sync::Arc;

use crate::config::Config;
use crate::resume::extract::{default_extractors, TextExtractor};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Upload extractors, tried in order; the first that accepts the file wins.
    pub extractors: Arc<Vec<Box<dyn TextExtractor>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            extractors: Arc::new(default_extractors()),
        }
    }
}
