//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::Error;

/// An error on its way out of a handler.
///
/// Client errors are reported verbatim. Anything else is logged and replaced
/// by a generic message so internals don't leak into responses.
#[derive(Debug)]
pub struct ApiError {
    source: Error,
    fallback: &'static str,
}

impl ApiError {
    /// Wrap `source`, answering with `fallback` if it's a server-side failure.
    #[must_use]
    pub fn new(source: Error, fallback: &'static str) -> Self {
        Self { source, fallback }
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if self.source.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match (&self.source, status) {
            (Error::Validation { field, message }, _) => json!({
                "error": message,
                "field": field,
            }),
            (source, StatusCode::BAD_REQUEST) => json!({ "error": source.to_string() }),
            (source, _) => {
                error!(error = %source, "{}", self.fallback);
                json!({ "error": self.fallback })
            }
        };

        (status, Json(body)).into_response()
    }
}
