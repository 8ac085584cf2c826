use std::env;
use std::path::Path;
use std::sync::Arc;

use terraplan_area::api::{create_router, AppState};
use terraplan_area::detector::FixtureDetector;
use terraplan_area::metadata::CatalogProvider;
use terraplan_area::service::AreaService;

#[tokio::main]
async fn main() {
    env_logger::init();

    let addr = env::var("TERRAPLAN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let catalog_path =
        env::var("TERRAPLAN_CATALOG").unwrap_or_else(|_| "data/catalog.json".to_string());
    let detections_path = env::var("TERRAPLAN_DETECTIONS").ok();
    let api_key = env::var("API_KEY").ok();

    if api_key.is_none() {
        log::warn!("API_KEY is not set; every request will be rejected");
    }

    let catalog = match CatalogProvider::from_file(Path::new(&catalog_path)) {
        Ok(catalog) => {
            log::info!("loaded {} catalog entries from {}", catalog.len(), catalog_path);
            catalog
        }
        Err(e) => {
            log::error!("failed to load catalog {}: {}", catalog_path, e);
            std::process::exit(1);
        }
    };

    let detector = match detections_path {
        Some(path) => match FixtureDetector::from_file(Path::new(&path)) {
            Ok(detector) => detector,
            Err(e) => {
                log::error!("failed to load detections {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            log::warn!("no detection fixtures configured; smart mode will fail");
            FixtureDetector::new()
        }
    };

    let service = AreaService::new(Arc::new(catalog), Arc::new(detector));
    let state = AppState {
        service: Arc::new(service),
        api_key,
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind port");

    log::info!("area engine listening on http://{}", addr);

    axum::serve(listener, app).await.expect("Server error");
}
