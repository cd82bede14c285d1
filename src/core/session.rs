//! One search session: the state behind a single list view.
//!
//! The session is a plain state machine. It never blocks and never does IO:
//! keystrokes arrive through [`SearchSession::set_search_term`], time
//! advances through [`SearchSession::tick`], and remote round trips are
//! handed to the caller as [`RemoteRequest`]s whose outcome comes back
//! through [`SearchSession::complete_remote`].
//!
//! State is derived from the raw and debounced terms:
//!
//! - `Idle`: raw term empty, the default list is shown.
//! - `Pending`: raw term differs from the debounced term (the user is still
//!   typing). Every edit resets the debounced term to empty until the quiet
//!   period elapses again.
//! - `Settled`: raw and debounced terms agree; results come from the cache,
//!   the local matcher, or a remote round trip.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::address::AddressState;
use crate::config::Config;
use crate::core::cache::{CacheSlot, ResultCache};
use crate::core::debounce::Debouncer;
use crate::core::matcher::{exclude_exact, MatchMode, MatchResult, Matcher};
use crate::core::normalize::exact_key;
use crate::core::window::{ActiveList, ViewFeed, ViewLayout};
use crate::error::UniError;
use crate::services::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Pending,
    Settled,
}

impl SearchState {
    pub fn derive(raw: &str, debounced: &str) -> Self {
        if raw.is_empty() {
            SearchState::Idle
        } else if raw != debounced {
            SearchState::Pending
        } else {
            SearchState::Settled
        }
    }
}

/// Where cache misses are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resolver {
    /// Scan the in-memory catalog.
    #[default]
    Local,
    /// Ask the remote search endpoint.
    Remote,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub debounce: Duration,
    pub match_mode: MatchMode,
    pub cache_capacity: Option<NonZeroUsize>,
    pub resolver: Resolver,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(200),
            match_mode: MatchMode::Forward,
            cache_capacity: None,
            resolver: Resolver::Local,
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            debounce: config.search.debounce(),
            match_mode: config.search.match_mode,
            cache_capacity: config.search.cache_capacity(),
            resolver: if config.remote.enabled {
                Resolver::Remote
            } else {
                Resolver::Local
            },
        }
    }
}

/// Identifies one dispatched round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// A round trip the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRequest {
    pub ticket: Ticket,
    pub term: String,
}

/// What the view needs to render the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub state: SearchState,
    /// Catalog index whose glyph equals the raw term. While settled, this is
    /// rendered as a separate card and excluded from `list`; while pending,
    /// `list` is the exact match alone.
    pub exact_match: Option<usize>,
    pub list: ActiveList,
    pub loading: bool,
    pub no_results: bool,
    pub failed: bool,
}

#[derive(Debug)]
pub struct SearchSession {
    catalog: Arc<Catalog>,
    options: SessionOptions,
    default_list: Arc<[usize]>,
    raw: String,
    debounced: String,
    debouncer: Debouncer<String>,
    cache: ResultCache,
    results: Option<MatchResult>,
    failed: bool,
    exact_index: Option<usize>,
    generation: u64,
    in_flight: HashMap<Ticket, String>,
    restore_from: Option<AddressState>,
}

impl SearchSession {
    pub fn new(catalog: Arc<Catalog>, options: SessionOptions) -> Self {
        let default_list = catalog.default_indices();
        Self {
            debouncer: Debouncer::new(options.debounce),
            cache: ResultCache::new(options.cache_capacity),
            catalog,
            options,
            default_list,
            raw: String::new(),
            debounced: String::new(),
            results: None,
            failed: false,
            exact_index: None,
            generation: 0,
            in_flight: HashMap::new(),
            restore_from: None,
        }
    }

    /// Start a session from persisted address-bar state. A persisted term is
    /// settled immediately, without waiting for the quiet period.
    pub fn restore(
        catalog: Arc<Catalog>,
        options: SessionOptions,
        address: &AddressState,
    ) -> (Self, Option<RemoteRequest>) {
        let mut session = Self::new(catalog, options);
        session.restore_from = Some(address.clone());

        let request = match address.search() {
            Some(term) => {
                session.raw = term.to_string();
                session.exact_index = session.find_exact(term);
                session.settle(term.to_string())
            }
            None => None,
        };
        (session, request)
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn raw_term(&self) -> &str {
        &self.raw
    }

    pub fn debounced_term(&self) -> &str {
        &self.debounced
    }

    pub fn state(&self) -> SearchState {
        SearchState::derive(&self.raw, &self.debounced)
    }

    pub fn exact_match(&self) -> Option<usize> {
        self.exact_index
    }

    pub fn search_failed(&self) -> bool {
        self.failed
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// When the pending debounce fires, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Apply a keystroke. Cancels and restarts the debounce.
    pub fn set_search_term(&mut self, term: &str, now: Instant) {
        if term == self.raw {
            return;
        }

        self.raw = term.to_string();
        self.exact_index = self.find_exact(term);
        self.reset_debounced();

        if term.is_empty() {
            self.debouncer.cancel();
        } else {
            self.debouncer.schedule(term.to_string(), now);
        }
    }

    /// Search for an entry's category, as clicking its category label does.
    pub fn select_category(&mut self, catalog_index: usize, now: Instant) {
        if let Some(entry) = self.catalog.get(catalog_index) {
            let category = entry.category.clone();
            self.set_search_term(&category, now);
        }
    }

    /// Advance time. Returns a round trip to perform if the debounce settled
    /// on a term that needs one.
    pub fn tick(&mut self, now: Instant) -> Option<RemoteRequest> {
        let term = self.debouncer.poll(now)?;
        self.settle(term)
    }

    /// Deliver the outcome of a round trip. The result is cached under its
    /// term regardless; it only reaches the visible state if that term is
    /// still the debounced one.
    pub fn complete_remote(&mut self, ticket: Ticket, outcome: Result<Vec<usize>, UniError>) {
        let Some(term) = self.in_flight.remove(&ticket) else {
            tracing::warn!("Completion for unknown ticket {:?}", ticket);
            return;
        };

        let applies = term == self.debounced && self.results.is_none();
        if !applies {
            tracing::debug!("Discarding stale result for {:?}", term);
        }

        match outcome {
            Ok(indices) => {
                let result = self.sanitize(indices);
                self.cache.put(term, result.clone());
                if applies {
                    self.results = Some(result);
                    self.failed = false;
                }
            }
            Err(e) => {
                tracing::warn!("Search for {:?} failed: {}", term, e);
                self.cache.mark_failed(&term);
                if applies {
                    self.failed = true;
                }
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.state();
        let list = match state {
            SearchState::Idle => ActiveList::Default(self.default_list.clone()),
            SearchState::Pending => match self.exact_index {
                Some(index) => ActiveList::ExactMatch(index),
                None => ActiveList::Default(self.default_list.clone()),
            },
            SearchState::Settled => match &self.results {
                Some(results) => ActiveList::Matches(exclude_exact(results, self.exact_index)),
                None => ActiveList::Loading,
            },
        };

        Snapshot {
            state,
            exact_match: self.exact_index,
            loading: state == SearchState::Settled && self.results.is_none() && !self.failed,
            no_results: self.results.as_ref().is_some_and(|r| r.is_empty()),
            failed: self.failed,
            list,
        }
    }

    pub fn feed(&self, layout: ViewLayout) -> ViewFeed {
        ViewFeed::new(self.catalog.clone(), &self.snapshot().list, layout)
    }

    /// The persisted scroll position, once, if it fits the list now shown.
    /// Kept until the list has loaded.
    pub fn take_initial_position(&mut self) -> Option<usize> {
        let list = self.snapshot().list;
        if list == ActiveList::Loading {
            return None;
        }
        self.restore_from
            .take()
            .and_then(|address| address.restored_position(list.len()))
    }

    /// Write the debounced term and first visible index to the address
    /// state. Returns whether anything changed.
    pub fn sync_address(&self, address: &mut AddressState, first_visible: usize) -> bool {
        let search_changed = address.set_search(&self.debounced);
        let position_changed = address.set_position(first_visible);
        search_changed || position_changed
    }

    fn reset_debounced(&mut self) {
        self.debounced.clear();
        self.results = None;
        self.failed = false;
        self.generation += 1;
    }

    fn settle(&mut self, term: String) -> Option<RemoteRequest> {
        self.debounced = term.clone();
        self.results = None;
        self.failed = false;
        self.generation += 1;

        match self.cache.get(&term) {
            Some(CacheSlot::Ready(result)) => {
                tracing::debug!("Cache hit for {:?}", term);
                self.results = Some(result);
                return None;
            }
            Some(CacheSlot::Pending) => {
                tracing::debug!("Waiting on in-flight search for {:?}", term);
                return None;
            }
            Some(CacheSlot::Failed) | None => {}
        }

        match self.options.resolver {
            Resolver::Local => {
                let result = Matcher::new(&term, self.options.match_mode)
                    .map(|m| m.run(&self.catalog))
                    .unwrap_or_else(|| Arc::from([]));
                self.cache.put(term, result.clone());
                self.results = Some(result);
                None
            }
            Resolver::Remote => {
                let ticket = Ticket(self.generation);
                tracing::debug!("Dispatching remote search {:?} for {:?}", ticket, term);
                self.cache.mark_pending(term.clone());
                self.in_flight.insert(ticket, term.clone());
                Some(RemoteRequest { ticket, term })
            }
        }
    }

    fn find_exact(&self, term: &str) -> Option<usize> {
        exact_key(term).and_then(|key| self.catalog.position_of_display_text(&key))
    }

    fn sanitize(&self, indices: Vec<usize>) -> MatchResult {
        let len = self.catalog.len();
        let total = indices.len();
        let result: MatchResult = indices.into_iter().filter(|&i| i < len).collect();
        if result.len() != total {
            tracing::warn!("Dropped {} out-of-range indices from remote result", total - result.len());
        }
        result
    }
}
