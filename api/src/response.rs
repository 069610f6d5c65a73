use actix_web::HttpResponse;
use serde::Serialize;

/// Success body: the payload's own fields, plus `cached: true` on a cache hit.
#[derive(Serialize)]
pub(crate) struct ApiResponse<T: Serialize> {
    #[serde(flatten)]
    pub payload: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(payload: T) -> HttpResponse {
        HttpResponse::Ok().json(Self { payload, cached: None })
    }

    pub fn cached(payload: T) -> HttpResponse {
        HttpResponse::Ok().json(Self { payload, cached: Some(true) })
    }
}
