use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use neighborly_algo::config::{LogFormat, LoggingSettings, Settings};
use neighborly_algo::core::Matcher;
use neighborly_algo::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use neighborly_algo::services::{spawn_periodic_refresh, CatalogStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.log_format() {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.compact().init(),
        LogFormat::Full => subscriber.init(),
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            return Err(startup_error("Failed to load configuration", e));
        }
    };

    init_logging(&settings.logging);
    info!("Starting Neighborly matching service...");

    let weights = settings
        .scoring_weights()
        .map_err(|e| startup_error("Invalid scoring weights", e))?;
    let matcher = Matcher::new(weights);
    info!("Matcher initialized with weights: {:?}", weights);

    let catalog = Arc::new(
        CatalogStore::load(&settings.catalog.path)
            .map_err(|e| startup_error("Failed to load neighborhood catalog", e))?,
    );
    info!("Catalog ready with {} neighborhoods", catalog.snapshot().len());

    if let Some(secs) = settings.catalog.reload_interval_secs.filter(|s| *s > 0) {
        spawn_periodic_refresh(Arc::clone(&catalog), Duration::from_secs(secs));
        info!("Catalog refresh scheduled every {}s", secs);
    }

    let app_state = AppState {
        catalog,
        matcher,
        matching: settings.matching.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
