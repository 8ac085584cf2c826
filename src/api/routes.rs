use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use super::auth::require_api_key;
use super::handlers::*;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/area/metadata/:image_id", get(get_metadata))
        .route("/area/custom/:image_id", post(calc_custom_area))
        .route("/area/smart/:image_id", post(calc_smart_area))
        .route("/area/batch/:image_id", post(calc_batch_area))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_api_key,
                )),
        )
        .with_state(state)
}
