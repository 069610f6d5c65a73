use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub(crate) enum AppError {
    Validation(String),
    NotFound(String),
    Upstream(String),
    EmptyData,
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Upstream(msg) => write!(f, "upstream error: {msg}"),
            Self::EmptyData => write!(f, "no valid elevation samples in area"),
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Validation(msg) => HttpResponse::BadRequest().json(ErrorBody {
                error: msg,
                details: None,
            }),
            Self::NotFound(msg) => HttpResponse::NotFound().json(ErrorBody {
                error: msg,
                details: None,
            }),
            Self::Upstream(msg) => {
                log::error!("Upstream error: {msg}");
                HttpResponse::InternalServerError().json(ErrorBody {
                    error: "Upstream service error",
                    details: Some(msg),
                })
            }
            Self::EmptyData => HttpResponse::InternalServerError().json(ErrorBody {
                error: "No elevation data available for this area",
                details: None,
            }),
            Self::Internal(msg) => {
                log::error!("Internal error: {msg}");
                HttpResponse::InternalServerError().json(ErrorBody {
                    error: "Internal server error",
                    details: Some(msg),
                })
            }
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        // Query strings carry user locations; keep only the host.
        let host = err.url().and_then(|u| u.host_str()).map(str::to_owned);
        let err = err.without_url();
        match host {
            Some(host) => Self::Upstream(format!("{err} ({host})")),
            None => Self::Upstream(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}
