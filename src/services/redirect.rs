//! Token redirect endpoint

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::debug;

use super::shortener::ShortenService;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        shortener: web::Data<Arc<ShortenService>>,
    ) -> impl Responder {
        let captured_path = path.into_inner();

        match shortener.resolve(&captured_path) {
            Ok(target) => HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
                .insert_header(("Location", target))
                .finish(),
            Err(e) => {
                debug!("Redirect miss for '{}': {}", captured_path, e);
                Self::not_found_response()
            }
        }
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "public, max-age=60"))
            .body("Not Found")
    }
}

/// Redirect route configuration; must be registered last, it captures the
/// whole remaining path.
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/{path:.*}", web::get().to(RedirectService::handle_redirect))
        .route("/{path:.*}", web::head().to(RedirectService::handle_redirect))
}
