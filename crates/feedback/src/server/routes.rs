//! Request handlers.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::debug;

use super::{error::ApiError, AppState};
use crate::error::{Error, Result};
use crate::record::{FeedbackRecord, NewFeedback};
use crate::storage::{Health, Page, PageRequest};

const SUBMIT_FAILED: &str = "Failed to submit feedback";
const RETRIEVE_FAILED: &str = "Failed to retrieve feedback";

/// Query string for `GET /api/feedbacks`.
///
/// Kept as raw strings so that junk values fall back to defaults instead of
/// rejecting the request. A query string that can't be decoded at all, such
/// as one repeating a key, is treated as empty.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    limit: Option<String>,
    q: Option<String>,
}

/// `POST /api/submit-feedback`
pub async fn submit_feedback_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewFeedback>, JsonRejection>,
) -> std::result::Result<(StatusCode, Json<FeedbackRecord>), ApiError> {
    let on_error = |e: Error| ApiError::new(e, SUBMIT_FAILED);

    let Json(payload) = payload.map_err(|e| on_error(Error::MalformedPayload(e.body_text())))?;
    let fields = state.validator.validate(payload).map_err(on_error)?;

    let store = Arc::clone(&state.store);
    let record = blocking(move || store.append(fields))
        .await
        .map_err(on_error)?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/feedbacks`
pub async fn feedbacks_handler(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> std::result::Result<Json<Page>, ApiError> {
    let params = params.map_or_else(
        |rejection| {
            debug!(error = %rejection.body_text(), "Ignoring undecodable query string");
            ListParams::default()
        },
        |Query(params)| params,
    );
    let request = PageRequest::from_query(
        params.page.as_deref(),
        params.limit.as_deref(),
        &state.pagination,
    );

    let store = Arc::clone(&state.store);
    let page = blocking(move || match params.q {
        Some(query) => store.search(&query, request),
        None => store.list(request),
    })
    .await
    .map_err(|e| ApiError::new(e, RETRIEVE_FAILED))?;

    Ok(Json(page))
}

/// `GET /api/health`
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(state.store.health())
}

/// Run a store operation off the async runtime.
async fn blocking<T, F>(operation: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|e| Error::internal(format!("storage task failed: {e}")))?
}
