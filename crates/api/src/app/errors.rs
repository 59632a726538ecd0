use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::app::service::QueryError;

/// Map a query failure onto the wire contract: invalid parameters abort the
/// request with a 400; a store-level failure still answers 200 so dashboard
/// consumers render an explicit `success:false` instead of throwing.
pub fn query_error_to_response(err: QueryError) -> axum::response::Response {
    match err {
        QueryError::InvalidWindow(e) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_window", e.to_string())
        }
        QueryError::Store(e) => degraded(e.to_string()),
        QueryError::Task(msg) => degraded(msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

fn degraded(message: String) -> axum::response::Response {
    (
        StatusCode::OK,
        axum::Json(json!({
            "success": false,
            "error": message,
        })),
    )
        .into_response()
}
