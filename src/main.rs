use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use proposals::config::Settings;
use proposals::{configure_routes, AppState, MongoStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(e)
    })?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting proposals service...");

    let store = MongoStore::connect(
        &settings.database.uri,
        settings.database.name.as_deref(),
        &settings.database.collection,
    )
    .await
    .map_err(|e| {
        error!("Failed to set up MongoDB client: {}", e);
        std::io::Error::other(e)
    })?;
    let store = Arc::new(store);

    let app_state = AppState::new(store.clone())
        .with_max_attachment_bytes(settings.uploads.max_file_size_bytes);

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    let result = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await;

    store.shutdown().await;
    info!("Server stopped");

    result
}
