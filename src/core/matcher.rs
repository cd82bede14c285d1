//! Literal, case-insensitive matching of a term against catalog fields.

use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::services::catalog::{Catalog, CatalogEntry};

/// Ordered catalog indices satisfying a term, in catalog order.
pub type MatchResult = Arc<[usize]>;

/// Entry fields that participate in matching, in evaluation order.
/// `code_key` is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchField {
    Category,
    DisplayText,
    Label,
}

impl MatchField {
    pub const ORDER: [MatchField; 3] = [MatchField::Category, MatchField::DisplayText, MatchField::Label];

    pub fn value(self, entry: &CatalogEntry) -> &str {
        match self {
            MatchField::Category => &entry.category,
            MatchField::DisplayText => &entry.display_text,
            MatchField::Label => &entry.label,
        }
    }
}

/// How a term relates to a field for it to count as a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The term occurs inside the field.
    #[default]
    Forward,
    /// As `Forward`; if no field contains the term, a field occurring inside
    /// the term also matches.
    Symmetric,
}

/// How an entry matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMatch {
    /// The term was found in this field.
    TermInField(MatchField),
    /// This field was found in the term (symmetric mode only).
    FieldInTerm(MatchField),
}

/// Forward test for a term. Terms too large for the regex engine fall back
/// to a lowercased substring scan.
#[derive(Debug, Clone)]
enum Pattern {
    Regex(Regex),
    Literal(String),
}

impl Pattern {
    fn is_match(&self, haystack: &str) -> bool {
        match self {
            Pattern::Regex(regex) => regex.is_match(haystack),
            Pattern::Literal(lowered) => haystack.to_lowercase().contains(lowered.as_str()),
        }
    }
}

/// A compiled term. Only constructible for non-empty terms.
#[derive(Debug, Clone)]
pub struct Matcher {
    term: String,
    lowered_term: String,
    pattern: Pattern,
    mode: MatchMode,
}

impl Matcher {
    /// Compile `term` as literal text. Returns `None` for an empty term.
    pub fn new(term: &str, mode: MatchMode) -> Option<Self> {
        if term.is_empty() {
            return None;
        }

        let lowered_term = term.to_lowercase();
        let pattern = match RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build() {
            Ok(regex) => Pattern::Regex(regex),
            Err(e) => {
                tracing::debug!("Falling back to literal scan for a {}-byte term: {}", term.len(), e);
                Pattern::Literal(lowered_term.clone())
            }
        };

        Some(Self {
            term: term.to_string(),
            lowered_term,
            pattern,
            mode,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// The first field (in [`MatchField::ORDER`]) that matches, if any.
    pub fn matched_field(&self, entry: &CatalogEntry) -> Option<FieldMatch> {
        let forward = MatchField::ORDER
            .into_iter()
            .find(|field| self.pattern.is_match(field.value(entry)))
            .map(FieldMatch::TermInField);

        match (forward, self.mode) {
            (Some(hit), _) => Some(hit),
            (None, MatchMode::Forward) => None,
            (None, MatchMode::Symmetric) => MatchField::ORDER
                .into_iter()
                .find(|field| {
                    let value = field.value(entry);
                    !value.is_empty() && self.lowered_term.contains(&value.to_lowercase())
                })
                .map(FieldMatch::FieldInTerm),
        }
    }

    pub fn is_match(&self, entry: &CatalogEntry) -> bool {
        self.matched_field(entry).is_some()
    }

    /// Scan the whole catalog.
    pub fn run(&self, catalog: &Catalog) -> MatchResult {
        let result: MatchResult = catalog
            .iter()
            .enumerate()
            .filter(|(_, entry)| self.is_match(entry))
            .map(|(i, _)| i)
            .collect();

        tracing::debug!("Matched {:?} against {} entries: {} hits", self.term, catalog.len(), result.len());
        result
    }
}

/// Convenience wrapper: `None` when the term is empty.
pub fn search(term: &str, mode: MatchMode, catalog: &Catalog) -> Option<MatchResult> {
    Matcher::new(term, mode).map(|m| m.run(catalog))
}

/// Drop the separately rendered exact match from a fuzzy result.
pub fn exclude_exact(result: &[usize], exact_index: Option<usize>) -> MatchResult {
    match exact_index {
        Some(exact) => result.iter().copied().filter(|&i| i != exact).collect(),
        None => result.into(),
    }
}
