//! Shared response helpers for the HTTP services

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::ShortyError;

/// Uniform JSON envelope for API responses
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code,
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, "0", "OK", Some(data))
}

pub fn error_response(status: StatusCode, code: &'static str, message: &str) -> HttpResponse {
    json_response::<()>(status, code, message, None)
}

/// Build an error response from a [`ShortyError`], mapping its HTTP status.
pub fn error_from_shorty(err: &ShortyError) -> HttpResponse {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(status, err.code(), err.message())
}
