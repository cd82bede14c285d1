//! Core engine module - the incremental search pipeline.
//!
//! Nothing in here does IO or depends on a UI framework:
//! - Query normalization for exact matches
//! - Literal matching across entry fields
//! - Debouncing and the per-session result cache
//! - The session state machine and the windowed view feed

pub mod cache;
pub mod debounce;
#[cfg(feature = "remote")]
pub mod driver;
pub mod matcher;
pub mod normalize;
pub mod session;
pub mod window;

pub use cache::{CacheSlot, ResultCache};
pub use matcher::{MatchField, MatchMode, MatchResult, Matcher};
pub use session::{RemoteRequest, Resolver, SearchSession, SearchState, SessionOptions, Snapshot, Ticket};
pub use window::{ActiveList, Row, ViewFeed, ViewLayout};
