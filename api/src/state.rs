use std::sync::Arc;
use std::time::Duration;

use crate::repositories::{ElevationSource, Geocoder, TerrainCache};
use crate::telemetry::{PipelineObserver, Stage};

/// Collaborators shared by every request. Nothing in here is mutated per request.
pub(crate) struct AppState {
    pub geocoder: Arc<dyn Geocoder>,
    pub elevation: Arc<dyn ElevationSource>,
    pub cache: Option<Arc<dyn TerrainCache>>,
    pub observer: Option<Arc<dyn PipelineObserver>>,
    pub batch_delay: Duration,
    pub cache_ttl: Duration,
    pub default_grid: u32,
}

impl AppState {
    pub fn notify(&self, stage: Stage, elapsed: Duration) {
        if let Some(observer) = &self.observer {
            observer.stage_completed(stage, elapsed);
        }
    }
}
