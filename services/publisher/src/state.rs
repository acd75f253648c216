//! Application state shared across handlers

use std::sync::Arc;

use common::graph::GraphApi;

use crate::schedule::Clock;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<dyn GraphApi>,
    pub clock: Arc<dyn Clock>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(graph: Arc<dyn GraphApi>, clock: Arc<dyn Clock>, max_upload_bytes: usize) -> Self {
        Self {
            graph,
            clock,
            max_upload_bytes,
        }
    }
}
