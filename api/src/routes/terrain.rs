use std::time::Instant;

use actix_web::{web, HttpResponse, Result as ActixResult};
use validator::Validate;

use crate::aggregate::elevation_range;
use crate::errors::AppError;
use crate::grid;
use crate::models::{ErrorPayload, TerrainPayload, TerrainQuery};
use crate::repositories::{cache_key, fetch_elevations, resolve, LocationQuery};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::telemetry::Stage;
use crate::validation::{validate_coordinates, validate_grid};

/// Result of the pipeline, tagged with where it came from.
#[derive(Debug)]
pub(crate) enum Terrain {
    Cached(TerrainPayload),
    Computed(TerrainPayload),
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Terrain",
    summary = "Elevation grid around a place",
    description = "Resolves a centre from `q` (geocoded, first match) or from `lat`/`lon`, \
        samples a `grid × grid` lattice covering a `size` km square around it, and returns the \
        elevations in row-major order, northern row first. `null` marks points outside dataset \
        coverage. When both `q` and coordinates are supplied, `q` wins.\n\n\
        Results are cached; a cached response carries `\"cached\": true`.",
    params(TerrainQuery),
    responses(
        (status = 200, description = "Elevation grid", body = TerrainPayload),
        (status = 400, description = "Missing or invalid parameters", body = ErrorPayload),
        (status = 404, description = "Location not found", body = ErrorPayload),
        (status = 500, description = "Upstream failure or no elevation data", body = ErrorPayload)
    )
)]
pub(crate) async fn terrain(
    state: web::Data<AppState>,
    query: web::Query<TerrainQuery>,
) -> ActixResult<HttpResponse> {
    query.validate().map_err(|e| {
        AppError::Validation(format!("Validation failed: {e}"))
    })?;

    let location = location_query(&query)?;
    let grid = query.grid.unwrap_or(state.default_grid);
    validate_grid(grid)?;

    Ok(match build_terrain(&state, location, query.size, grid).await? {
        Terrain::Cached(payload) => ApiResponse::cached(payload),
        Terrain::Computed(payload) => ApiResponse::ok(payload),
    })
}

fn location_query(query: &TerrainQuery) -> Result<LocationQuery<'_>, AppError> {
    if let Some(text) = query.text() {
        if query.lat.is_some() || query.lon.is_some() {
            log::debug!("both q and lat/lon supplied; using q");
        }
        return Ok(LocationQuery::Text(text));
    }

    match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => {
            validate_coordinates(lat, lon)?;
            Ok(LocationQuery::Coordinates { lat, lon })
        }
        _ => Err(AppError::Validation(
            "Missing location: provide q or both lat and lon".to_string(),
        )),
    }
}

/// Cache lookup, then resolve → grid → fetch → aggregate → cache store on a miss.
///
/// Nothing is written to the cache unless every stage succeeded.
pub(crate) async fn build_terrain(
    state: &AppState,
    location: LocationQuery<'_>,
    size_km: f64,
    grid_size: u32,
) -> Result<Terrain, AppError> {
    let key = cache_key(location, size_km, grid_size);

    if let Some(payload) = cache_lookup(state, &key).await {
        log::debug!("cache hit for {key}");
        return Ok(Terrain::Cached(payload));
    }

    let started = Instant::now();
    let center = resolve(state.geocoder.as_ref(), location).await?;
    state.notify(Stage::Resolve, started.elapsed());

    let started = Instant::now();
    let points = grid::generate(center.lat, center.lon, size_km, grid_size)
        .ok_or_else(|| AppError::Internal(format!("grid generator rejected grid={grid_size}")))?;
    state.notify(Stage::Grid, started.elapsed());

    let started = Instant::now();
    let elevations = fetch_elevations(state.elevation.as_ref(), &points, state.batch_delay).await?;
    state.notify(Stage::Fetch, started.elapsed());

    let started = Instant::now();
    let (min_elev, max_elev) = elevation_range(&elevations)?;
    state.notify(Stage::Aggregate, started.elapsed());

    let payload = TerrainPayload {
        name: center.name,
        center: [center.lat, center.lon],
        elevations,
        min_elev,
        max_elev,
        grid: grid_size,
    };
    log::info!(
        "computed {n}×{n} terrain for \"{name}\" ({min_elev:.0}..{max_elev:.0} m)",
        n = grid_size,
        name = payload.name,
    );

    cache_store(state, &key, &payload).await;
    Ok(Terrain::Computed(payload))
}

/// Best effort: a missing, failing, or corrupt cache reads as a miss.
async fn cache_lookup(state: &AppState, key: &str) -> Option<TerrainPayload> {
    let cache = state.cache.as_ref()?;
    let started = Instant::now();
    let hit = match cache.get(key).await {
        Ok(body) => body,
        Err(err) => {
            log::warn!("cache lookup failed for {key}: {err}");
            None
        }
    };
    state.notify(Stage::CacheLookup, started.elapsed());

    match serde_json::from_str(&hit?) {
        Ok(payload) => Some(payload),
        Err(err) => {
            log::warn!("discarding unreadable cache entry {key}: {err}");
            None
        }
    }
}

async fn cache_store(state: &AppState, key: &str, payload: &TerrainPayload) {
    let Some(cache) = state.cache.as_ref() else {
        return;
    };
    let started = Instant::now();
    let body = match serde_json::to_string(payload) {
        Ok(body) => body,
        Err(err) => {
            log::warn!("could not serialize terrain for cache: {err}");
            return;
        }
    };
    if let Err(err) = cache.put(key, &body, state.cache_ttl).await {
        log::warn!("cache store failed for {key}: {err}");
    }
    state.notify(Stage::CacheStore, started.elapsed());
}
