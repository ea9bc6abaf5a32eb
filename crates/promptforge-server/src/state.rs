use std::sync::Arc;

use promptforge_pipeline::Pipeline;

/// Shared handler state; the pipeline is immutable and shared across requests
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
