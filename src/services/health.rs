//! Health probe
//!
//! Writes a never-expiring sentinel key with the current timestamp and reads
//! it straight back; a mismatch or read failure marks the service degraded.

use std::sync::Arc;
use std::time::Instant;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, trace};

use super::helpers::json_response;
use crate::store::TokenStore;

/// Sentinel key for the probe; deliberately outside the `[a-zA-Z0-9]` token
/// shape so it can never collide with a generated token.
pub const HEALTH_SENTINEL_KEY: &str = "__health_check__";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub entries: usize,
    pub response_time_ms: u32,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(store: web::Data<Arc<TokenStore>>) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let stamp = Utc::now().to_rfc3339();
        store.set(HEALTH_SENTINEL_KEY, &stamp, None);
        let healthy = match store.get(HEALTH_SENTINEL_KEY) {
            Some(read_back) if read_back == stamp => true,
            Some(read_back) => {
                error!(
                    "Health sentinel mismatch: wrote {}, read {}",
                    stamp, read_back
                );
                false
            }
            None => {
                error!("Health sentinel read failed");
                false
            }
        };

        let (status, code, message) = if healthy {
            (StatusCode::OK, "0", "OK")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "E503", "Service Unavailable")
        };

        json_response(
            status,
            code,
            message,
            Some(HealthResponse {
                status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
                timestamp: stamp,
                entries: store.count(),
                response_time_ms: start_time.elapsed().as_millis() as u32,
            }),
        )
    }

    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");
        HttpResponse::NoContent().finish()
    }
}

/// Health route configuration
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
