// --- File: crates/werkstatt_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{HttpStatusCode, WerkstattError};

pub mod client;
pub mod rate_limit;

/// Extension trait for WerkstattError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for WerkstattError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            tracing::error!("Request failed ({}): {}", status_code.as_u16(), self);
        } else {
            tracing::info!("Request rejected ({}): {}", status_code.as_u16(), self);
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status_code, body).into_response()
    }
}

/// Implement IntoResponse for WerkstattError to make it easier to use in Axum handlers.
impl IntoResponse for WerkstattError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}
