//! Catalog entry lookup.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use unibergers::CatalogEntry;

use super::ApiError;
use crate::AppState;

/// Get one entry by its catalog index.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<CatalogEntry>, ApiError> {
    state
        .catalog
        .get(index)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No emoji at index {}", index)))
}
