//! HTTP serving surface for the area engine

pub mod auth;
pub mod handlers;
pub mod models;
pub mod routes;

use std::sync::Arc;

use crate::service::AreaService;

/// Shared state for all request handlers.
///
/// Built once at startup and only ever read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AreaService>,
    /// Expected access key; requests are rejected when unset
    pub api_key: Option<String>,
}

pub use routes::create_router;
