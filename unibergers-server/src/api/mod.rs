//! API handlers.

pub mod emoji;
pub mod search;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, empty or unreadable search term. Answered with an empty body.
    #[error("Search term must not be empty")]
    EmptyTerm,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::EmptyTerm => return StatusCode::BAD_REQUEST.into_response(),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use unibergers::{Catalog, MatchMode};

    use crate::AppState;

    pub fn state(mode: MatchMode) -> Arc<AppState> {
        let catalog = Catalog::from_json(
            r#"[
                {"category": "Smileys", "char": "😀", "name": "grinning face", "codes": "1F600"},
                {"category": "Flags", "char": "🏳️", "name": "white flag", "codes": "1F3F3"}
            ]"#,
        )
        .unwrap();
        Arc::new(AppState::new(Arc::new(catalog), mode))
    }

    pub async fn send(state: Arc<AppState>, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = crate::router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }
}
