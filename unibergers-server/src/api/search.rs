//! Remote search handler.

use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;
use unibergers::core::Matcher;
use unibergers::services::api::{SearchRequest, SearchResponse};

use super::ApiError;
use crate::AppState;

/// Match a term against the full catalog.
///
/// The body is parsed leniently: an empty, malformed or term-less body is a
/// client error with an empty response body.
pub async fn search(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SearchResponse>, ApiError> {
    let request: SearchRequest = if body.is_empty() {
        SearchRequest { search_term: None }
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!("Rejecting unparsable search body: {}", e);
            ApiError::EmptyTerm
        })?
    };

    let term = request.term().ok_or(ApiError::EmptyTerm)?;

    {
        let mut cache = state
            .cache
            .lock()
            .map_err(|_| ApiError::Internal("cache lock poisoned".to_string()))?;
        if let Some(hit) = cache.get_ready(term) {
            tracing::debug!("Cache hit for {:?}", term);
            return Ok(Json(SearchResponse {
                indices: hit.to_vec(),
            }));
        }
    }

    let matcher = Matcher::new(term, state.match_mode).ok_or(ApiError::EmptyTerm)?;
    let result = matcher.run(&state.catalog);

    state
        .cache
        .lock()
        .map_err(|_| ApiError::Internal("cache lock poisoned".to_string()))?
        .put(term, result.clone());

    Ok(Json(SearchResponse {
        indices: result.to_vec(),
    }))
}
