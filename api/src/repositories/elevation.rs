use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::AppError;
use crate::grid::Coordinate;

/// Upstream elevation dataset queried one batch at a time.
#[async_trait]
pub trait ElevationSource: Send + Sync {
    /// Largest number of coordinates accepted by a single `lookup`.
    fn max_batch(&self) -> usize;

    /// Elevation in metres for each coordinate, in input order.
    /// `None` marks a point the dataset has no value for.
    async fn lookup(&self, batch: &[Coordinate]) -> Result<Vec<Option<f64>>, AppError>;
}

#[derive(Deserialize)]
struct LookupResponse {
    status: String,
    #[serde(default)]
    results: Vec<LookupResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct LookupResult {
    elevation: Option<f64>,
}

/// Client for the OpenTopoData v1 API (`/v1/{dataset}?locations=...`).
pub struct OpenTopoDataSource {
    client: Client,
    base_url: String,
    dataset: String,
    batch_size: usize,
}

impl OpenTopoDataSource {
    pub fn new(client: Client, base_url: &str, dataset: &str, batch_size: usize) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            dataset: dataset.to_string(),
            batch_size,
        }
    }

    fn request_url(&self) -> String {
        format!("{}/v1/{}", self.base_url, self.dataset)
    }
}

#[async_trait]
impl ElevationSource for OpenTopoDataSource {
    fn max_batch(&self) -> usize {
        self.batch_size
    }

    async fn lookup(&self, batch: &[Coordinate]) -> Result<Vec<Option<f64>>, AppError> {
        let locations = batch
            .iter()
            .map(|c| format!("{:.6},{:.6}", c.lat, c.lon))
            .collect::<Vec<_>>()
            .join("|");

        let resp = self
            .client
            .get(self.request_url())
            .query(&[("locations", &locations)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("elevation returned HTTP {}", status.as_u16())));
        }

        let body: LookupResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("malformed elevation response: {}", e.without_url())))?;

        if body.status != "OK" {
            return Err(AppError::Upstream(format!(
                "elevation status {}: {}",
                body.status,
                body.error.as_deref().unwrap_or("no detail")
            )));
        }
        if body.results.len() != batch.len() {
            return Err(AppError::Upstream(format!(
                "elevation returned {} results for {} locations",
                body.results.len(),
                batch.len()
            )));
        }

        Ok(body
            .results
            .into_iter()
            .map(|r| r.elevation.filter(|v| v.is_finite()))
            .collect())
    }
}

/// Fetch elevations for `points`, preserving order.
///
/// Points go out in contiguous batches of at most `source.max_batch()`, one
/// call at a time, with `delay` between consecutive calls. The first failing
/// batch aborts the whole fetch; earlier results are dropped.
pub async fn fetch_elevations(
    source: &dyn ElevationSource,
    points: &[Coordinate],
    delay: Duration,
) -> Result<Vec<Option<f64>>, AppError> {
    let batch_size = source.max_batch().max(1);
    let batch_count = points.len().div_ceil(batch_size);
    let mut elevations = Vec::with_capacity(points.len());

    for (index, batch) in points.chunks(batch_size).enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let values = source.lookup(batch).await.map_err(|err| match err {
            AppError::Upstream(msg) => {
                AppError::Upstream(format!("batch {}/{batch_count}: {msg}", index + 1))
            }
            other => other,
        })?;
        if values.len() != batch.len() {
            return Err(AppError::Upstream(format!(
                "batch {}/{batch_count}: expected {} elevations, got {}",
                index + 1,
                batch.len(),
                values.len()
            )));
        }
        elevations.extend(values);
    }

    Ok(elevations)
}
