pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::ml::ModelMetadata;
use crate::service::AdvisoryService;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AdvisoryService>,
    pub model: Arc<ModelMetadata>,
    pub started_at: Instant,
    pub metrics_enabled: bool,
}

impl AppState {
    pub fn new(service: Arc<AdvisoryService>, model: Arc<ModelMetadata>) -> Self {
        Self {
            service,
            model,
            started_at: Instant::now(),
            metrics_enabled: true,
        }
    }

    /// Disable the `/metrics` endpoint
    pub fn without_metrics(mut self) -> Self {
        self.metrics_enabled = false;
        self
    }
}
