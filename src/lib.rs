//! Unibergers - incremental emoji catalog search.
//!
//! Keystrokes are debounced, normalized into an exact-match key and a
//! literal search term, matched against a static catalog (locally or via a
//! remote endpoint), memoized per session, and fed to a windowed list view
//! that only resolves the rows it shows.
//!
//! # Architecture
//!
//! - [`services::catalog`] - The static emoji catalog
//! - [`core`] - Normalizer, matcher, cache, session state machine, view feed
//! - [`address`] - `search` / `position` address-bar state
//! - [`config`] - Configuration loading and management
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use unibergers::{Catalog, SearchSession, SessionOptions};
//!
//! let catalog = Catalog::embedded().expect("bundled catalog");
//! let mut session = SearchSession::new(catalog, SessionOptions::default());
//!
//! let now = Instant::now();
//! session.set_search_term("grin", now);
//! session.tick(now + Duration::from_millis(200));
//!
//! assert!(!session.snapshot().list.is_empty());
//! ```

pub mod address;
pub mod config;
pub mod core;
pub mod services;

mod error;

// Re-export commonly used types for convenience
pub use address::AddressState;
pub use config::Config;
pub use crate::core::{ActiveList, MatchMode, SearchSession, SearchState, SessionOptions, ViewFeed, ViewLayout};
pub use error::{CatalogError, NormalizeError, UniError, UniResult};
pub use services::catalog::{Catalog, CatalogEntry};
