pub mod health;
pub mod terrain;

use actix_cors::Cors;
use actix_web::{web, HttpRequest};

use crate::errors::AppError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config())
        .route("/", web::get().to(terrain::terrain))
        .route("/health", web::get().to(health::health));
}

/// Any origin may read the API; only GET and preflight OPTIONS are allowed.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(["GET", "OPTIONS"])
        .allow_any_header()
        .max_age(86_400)
}

/// Report unparsable query strings in the JSON error shape instead of actix's plain text.
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::Validation(format!("Invalid query parameters: {err}")).into()
    })
}
