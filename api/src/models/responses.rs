use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthPayload {
    pub status: String,
}

/// Elevation grid around a resolved centre.
///
/// `elevations` holds `grid * grid` samples in row-major order, northern row
/// first. `null` marks a point the dataset could not resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TerrainPayload {
    pub name: String,
    /// `[lat, lon]` of the area centre.
    #[schema(value_type = Vec<f64>)]
    pub center: [f64; 2],
    pub elevations: Vec<Option<f64>>,
    pub min_elev: f64,
    pub max_elev: f64,
    pub grid: u32,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
