//! Public shorten endpoint
//!
//! `GET /` answers with a short usage note (no HTML templating here);
//! `POST /` takes a form-encoded URL and answers with the allocated token.

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::helpers::{error_from_shorty, success_response};
use super::shortener::ShortenService;
use crate::config::Config;

#[derive(Deserialize)]
pub struct ShortenForm {
    pub url: String,
}

#[derive(Serialize)]
pub struct ShortenResponse {
    pub token: String,
    pub short_url: String,
}

pub struct FrontendService;

impl FrontendService {
    pub async fn index() -> impl Responder {
        HttpResponse::Ok()
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("shorty - URL shortener\n\nPOST / with form field `url` to shorten a URL.\n")
    }

    pub async fn shorten(
        form: web::Form<ShortenForm>,
        shortener: web::Data<Arc<ShortenService>>,
        config: web::Data<Config>,
    ) -> impl Responder {
        match shortener.shorten(&form.url, config.token_length) {
            Ok(token) => {
                info!("Shortened URL to token {}", token);
                let short_url = format!("{}{}", config.base_url(), token);
                success_response(ShortenResponse { token, short_url })
            }
            Err(e) => error_from_shorty(&e),
        }
    }
}
