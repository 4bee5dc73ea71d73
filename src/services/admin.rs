//! Administrative snapshot operations
//!
//! Entry count, full dump, export-to-file and the two import paths, exposed
//! under `/v1`. Each handler is a thin wrapper over `store::snapshot`.

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::{error, info};

use super::helpers::{error_from_shorty, success_response};
use crate::config::Config;
use crate::store::{TokenStore, snapshot};

#[derive(Serialize)]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Serialize)]
pub struct SnapshotOpResponse {
    pub entries: usize,
    pub file: Option<String>,
}

pub struct AdminService;

impl AdminService {
    /// Tracked entry count, including not-yet-swept expired entries.
    pub async fn count(store: web::Data<Arc<TokenStore>>) -> impl Responder {
        success_response(CountResponse {
            count: store.count(),
        })
    }

    /// Full snapshot as the response body.
    pub async fn dump(store: web::Data<Arc<TokenStore>>) -> impl Responder {
        match snapshot::dump_json(&store) {
            Ok(json) => HttpResponse::Ok()
                .insert_header(("Content-Type", "application/json; charset=utf-8"))
                .body(json),
            Err(e) => {
                error!("Snapshot dump failed: {}", e);
                error_from_shorty(&e)
            }
        }
    }

    pub async fn dump_to_file(
        store: web::Data<Arc<TokenStore>>,
        config: web::Data<Config>,
    ) -> impl Responder {
        match snapshot::export_to_file(&store, &config.snapshot_file) {
            Ok(entries) => {
                info!("Exported {} entries to {}", entries, config.snapshot_file);
                success_response(SnapshotOpResponse {
                    entries,
                    file: Some(config.snapshot_file.clone()),
                })
            }
            Err(e) => error_from_shorty(&e),
        }
    }

    pub async fn load_from_file(
        store: web::Data<Arc<TokenStore>>,
        config: web::Data<Config>,
    ) -> impl Responder {
        match snapshot::import_from_file(&store, &config.snapshot_file, config.store_config()) {
            Ok(entries) => {
                info!("Imported {} entries from {}", entries, config.snapshot_file);
                success_response(SnapshotOpResponse {
                    entries,
                    file: Some(config.snapshot_file.clone()),
                })
            }
            Err(e) => error_from_shorty(&e),
        }
    }

    pub async fn load_from_post(
        store: web::Data<Arc<TokenStore>>,
        config: web::Data<Config>,
        body: web::Bytes,
    ) -> impl Responder {
        match snapshot::import_from_slice(&store, &body, config.store_config()) {
            Ok(entries) => {
                info!("Imported {} entries from request body", entries);
                success_response(SnapshotOpResponse {
                    entries,
                    file: None,
                })
            }
            Err(e) => error_from_shorty(&e),
        }
    }
}

/// Admin route configuration
pub fn admin_routes() -> actix_web::Scope {
    web::scope("/v1")
        .route("/count", web::get().to(AdminService::count))
        .route("/dump", web::get().to(AdminService::dump))
        .route("/dumpToFile", web::get().to(AdminService::dump_to_file))
        .route("/fromFile", web::get().to(AdminService::load_from_file))
        .route("/fromPost", web::post().to(AdminService::load_from_post))
}
