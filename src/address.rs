//! Address-bar state: the `search` term and the first visible `position`.
//!
//! Updates report whether anything changed so the router only pushes a new
//! (shallow) URL on a real change. Unrelated query parameters are carried
//! through untouched.

use std::fmt;

const SEARCH_PARAM: &str = "search";
const POSITION_PARAM: &str = "position";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressState {
    search: Option<String>,
    position: Option<usize>,
    rest: Vec<(String, String)>,
}

impl AddressState {
    /// Parse a query string, with or without the leading `?`.
    ///
    /// Malformed `position` values are dropped here; range checks against
    /// the active list happen in [`AddressState::restored_position`].
    pub fn parse(query: &str) -> Self {
        let mut state = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let (Some(key), Some(value)) = (decode_component(key), decode_component(value)) else {
                tracing::debug!("Ignoring undecodable query pair {:?}", pair);
                continue;
            };

            match key.as_str() {
                SEARCH_PARAM => state.search = Some(value).filter(|v| !v.is_empty()),
                POSITION_PARAM => state.position = value.parse().ok().filter(|&p| p > 0),
                _ => state.rest.push((key, value)),
            }
        }

        state
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// The persisted position if it is valid for a list of `active_len`
    /// items: strictly positive and strictly less than the length.
    pub fn restored_position(&self, active_len: usize) -> Option<usize> {
        self.position.filter(|&p| p > 0 && p < active_len)
    }

    /// Persist the debounced term. An empty term removes the parameter.
    /// Returns whether the state changed.
    pub fn set_search(&mut self, term: &str) -> bool {
        let next = Some(term).filter(|t| !t.is_empty());
        if self.search.as_deref() == next {
            return false;
        }
        self.search = next.map(str::to_string);
        true
    }

    /// Persist the first visible index. Zero removes the parameter.
    /// Returns whether the state changed.
    pub fn set_position(&mut self, first_visible: usize) -> bool {
        let next = Some(first_visible).filter(|&p| p > 0);
        if self.position == next {
            return false;
        }
        self.position = next;
        true
    }

    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<String> = self
            .rest
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();

        if let Some(search) = &self.search {
            pairs.push(format!("{}={}", SEARCH_PARAM, urlencoding::encode(search)));
        }
        if let Some(position) = self.position {
            pairs.push(format!("{}={}", POSITION_PARAM, position));
        }

        pairs.join("&")
    }
}

impl fmt::Display for AddressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = self.to_query_string();
        if query.is_empty() {
            Ok(())
        } else {
            write!(f, "?{}", query)
        }
    }
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}
