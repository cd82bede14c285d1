//! Unibergers search server
//!
//! Runs catalog matching server-side for clients that should not ship or
//! scan the whole catalog themselves.

mod api;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unibergers::core::ResultCache;
use unibergers::{Catalog, MatchMode};

/// Application state shared across handlers.
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub match_mode: MatchMode,
    /// Results memoized per term for the life of the process.
    pub cache: Mutex<ResultCache>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, match_mode: MatchMode) -> Self {
        Self {
            catalog,
            match_mode,
            cache: Mutex::new(ResultCache::default()),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/search", post(api::search::search))
        .route("/api/emoji/:index", get(api::emoji::get))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

fn parse_match_mode(raw: &str) -> anyhow::Result<MatchMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "forward" => Ok(MatchMode::Forward),
        "symmetric" => Ok(MatchMode::Symmetric),
        other => anyhow::bail!("unknown match mode {:?}", other),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unibergers=debug,unibergers_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // A catalog that fails to load is fatal: never serve a partial one
    let catalog = match std::env::var("UNIBERGERS_CATALOG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            tracing::info!("Loading catalog from {}", path.display());
            Arc::new(Catalog::from_path(&path)?)
        }
        Err(_) => Catalog::embedded()?,
    };
    tracing::info!("Catalog ready with {} entries", catalog.len());

    let match_mode = match std::env::var("UNIBERGERS_MATCH_MODE") {
        Ok(raw) => parse_match_mode(&raw)?,
        Err(_) => MatchMode::default(),
    };

    let state = Arc::new(AppState::new(catalog, match_mode));
    let app = router(state);

    // Start server
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {} ({:?} matching)", addr, match_mode);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_match_mode() {
        assert_eq!(parse_match_mode("forward").unwrap(), MatchMode::Forward);
        assert_eq!(parse_match_mode(" Symmetric ").unwrap(), MatchMode::Symmetric);
        assert!(parse_match_mode("fuzzy").is_err());
    }
}
