//! The six read-only analytics queries.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::app::dto::envelope_ok;
use crate::app::errors;
use crate::app::service::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/departments", get(departments))
        .route("/alerts", get(alerts))
        .route("/organizational-health", get(organizational_health))
        .route("/employee-scoring", get(employee_scoring))
        .route("/predictive", get(predictive))
}

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    /// Uniform lookback depth in months; engine defaults when absent.
    pub months: Option<u32>,
}

pub async fn dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<DashboardParams>,
) -> axum::response::Response {
    match services.dashboard(params.months).await {
        Ok(data) => envelope_ok(&*data),
        Err(e) => errors::query_error_to_response(e),
    }
}

pub async fn departments(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.department_comparison().await {
        Ok(data) => envelope_ok(&data),
        Err(e) => errors::query_error_to_response(e),
    }
}

pub async fn alerts(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.alerts().await {
        Ok(data) => envelope_ok(&data),
        Err(e) => errors::query_error_to_response(e),
    }
}

pub async fn organizational_health(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.organizational_health().await {
        Ok(data) => envelope_ok(&data),
        Err(e) => errors::query_error_to_response(e),
    }
}

pub async fn employee_scoring(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.employee_scoring().await {
        Ok(data) => envelope_ok(&data),
        Err(e) => errors::query_error_to_response(e),
    }
}

pub async fn predictive(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.predictive().await {
        Ok(data) => envelope_ok(&data),
        Err(e) => errors::query_error_to_response(e),
    }
}
