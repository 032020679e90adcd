use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nd_core::Error;
use serde_json::json;

/// Maps crate errors onto JSON error responses.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Remote { .. } | Error::Transport(_) | Error::Http(_) | Error::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "❌ Request failed");
        } else {
            tracing::warn!(error = %self.0, "⚠️ Rejected request");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
