mod aggregate;
mod config;
mod db;
mod errors;
mod grid;
mod models;
mod repositories;
mod response;
mod routes;
mod state;
mod telemetry;
mod validation;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::repositories::{
    MemoryTerrainCache, NominatimGeocoder, OpenTopoDataSource, PgTerrainCache, TerrainCache,
};
use crate::state::AppState;
use crate::telemetry::LogObserver;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Terrain API",
        description = "Elevation grids around a place.\n\n\
            Give a place name (`q`) or a centre (`lat`, `lon`), an area `size` in km and a \
            `grid` resolution; get back `grid × grid` elevation samples plus min/max.\n\n\
            Data sources: OpenStreetMap Nominatim geocoding, OpenTopoData elevation datasets.",
        version = "1.0.0"
    ),
    paths(
        routes::health::health,
        routes::terrain::terrain,
    ),
    components(schemas(
        models::HealthPayload, models::TerrainPayload, models::ErrorPayload,
    )),
    tags(
        (name = "System", description = "Health and status"),
        (name = "Terrain", description = "Elevation grid sampling"),
    )
)]
struct ApiDoc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
    let cfg = config::Config::from_env();

    let http = reqwest::Client::builder()
        .user_agent(cfg.user_agent.as_str())
        .timeout(cfg.upstream_timeout)
        .connect_timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(std::io::Error::other)?;

    let cache = build_cache(&cfg).await;

    log::info!(
        "Elevation source: {}/v1/{} ({} points per batch, {}ms between batches)",
        cfg.elevation_url,
        cfg.elevation_dataset,
        cfg.batch_size,
        cfg.batch_delay.as_millis()
    );
    let state = web::Data::new(AppState {
        geocoder: Arc::new(NominatimGeocoder::new(http.clone(), &cfg.geocoder_url)),
        elevation: Arc::new(OpenTopoDataSource::new(
            http,
            &cfg.elevation_url,
            &cfg.elevation_dataset,
            cfg.batch_size,
        )),
        cache,
        observer: Some(Arc::new(LogObserver)),
        batch_delay: cfg.batch_delay,
        cache_ttl: cfg.cache_ttl,
        default_grid: cfg.default_grid,
    });

    let bind = format!("{}:{}", cfg.host, cfg.port);
    log::info!("Starting Terrain API on {bind}");
    log::info!("Swagger UI: http://{bind}/docs/");

    let openapi = ApiDoc::openapi();

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors())
            .wrap(
                Logger::new(r#"%a "%r" %s %b %Dms "%{User-Agent}i""#)
                    .exclude("/health"),
            )
            .app_data(state.clone())
            .service(SwaggerUi::new("/docs/{_:.*}").url("/openapi.json", openapi.clone()))
            .configure(routes::configure_routes)
    })
    .bind(&bind)?
    .run()
    .await
}

/// Pick the cache store. Any failure here leaves the service running uncached.
async fn build_cache(cfg: &config::Config) -> Option<Arc<dyn TerrainCache>> {
    if cfg.cache_disabled {
        log::warn!("Terrain cache disabled (CACHE_DISABLED)");
        return None;
    }

    let Some(database_url) = cfg.database_url.as_deref() else {
        log::info!("Terrain cache: in-memory (DATABASE_URL not set)");
        return Some(Arc::new(MemoryTerrainCache::new()));
    };

    let pool = match db::create_pool(database_url, cfg.pool_size) {
        Ok(pool) => pool,
        Err(err) => {
            log::warn!("Terrain cache unavailable, continuing without it: {err}");
            return None;
        }
    };
    let cache = PgTerrainCache::new(pool);
    match cache.ensure_schema().await {
        Ok(()) => {
            log::info!("Terrain cache: postgres (ttl {}s)", cfg.cache_ttl.as_secs());
            Some(Arc::new(cache))
        }
        Err(err) => {
            log::warn!("Terrain cache unavailable, continuing without it: {err}");
            None
        }
    }
}
