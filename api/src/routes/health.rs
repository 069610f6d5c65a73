use actix_web::HttpResponse;

use crate::models::HealthPayload;

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses((status = 200, description = "Service is healthy", body = HealthPayload))
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthPayload {
        status: "ok".to_string(),
    })
}
