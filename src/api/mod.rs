//! API module for the KPI engine
//!
//! Exposes the engine over REST; all data arrives in request bodies.

pub mod handlers;
pub mod service;

pub use service::KpiService;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_rest_router(service: Arc<KpiService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        // RSP
        .route("/api/v1/rsp", post(handlers::rsp_cumulative))
        .route("/api/v1/rsp/csv", post(handlers::rsp_cumulative_csv))
        // Defects
        .route("/api/v1/defects/compare", post(handlers::compare_defects))
        // DPC
        .route("/api/v1/dpc/monitoring", post(handlers::dpc_monitoring))
        .route("/api/v1/dpc/import", post(handlers::dpc_import))
        .route("/api/v1/dpc/export", post(handlers::dpc_export))
        // Documents
        .route("/api/v1/dms/search", post(handlers::search_docs))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
