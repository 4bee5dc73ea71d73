use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shorty::config::Config;
use shorty::services::ShortenService;
use shorty::services::admin::admin_routes;
use shorty::services::frontend::FrontendService;
use shorty::services::health::health_routes;
use shorty::services::redirect::redirect_routes;
use shorty::store::TokenStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store = Arc::new(TokenStore::new(config.store_config()));
    store.spawn_sweeper();

    let shortener = Arc::new(ShortenService::new(
        Arc::clone(&store),
        config.route_prefix.clone(),
    ));

    let bind_address = config.bind_address();
    info!("Starting server at http://{}", bind_address);
    info!(
        "Public base URL: {}, token length: {}",
        config.base_url(),
        config.token_length
    );

    let app_store = Arc::clone(&store);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(Arc::clone(&app_store)))
            .app_data(web::Data::new(Arc::clone(&shortener)))
            .app_data(web::Data::new(config.clone()))
            .route("/", web::get().to(FrontendService::index))
            .route("/", web::post().to(FrontendService::shorten))
            .service(admin_routes())
            .service(health_routes())
            .service(redirect_routes())
    })
    .bind(bind_address)?
    .run()
    .await?;

    store.shutdown();

    Ok(())
}
