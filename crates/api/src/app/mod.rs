//! HTTP application wiring (Axum router + service wiring).
//!
//! - `service.rs`: the dashboard assembler (store fan-out, engine pass, cache)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: response envelopes and dashboard section shapes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use talenthq_analytics::EngineConfig;
use talenthq_store::HrStore;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod service;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(store: Arc<dyn HrStore>, config: EngineConfig) -> Router {
    let services = Arc::new(service::AppServices::new(store, config));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/analytics", routes::analytics::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
