//! Per-session memo of match results, keyed by the exact debounced term.
//!
//! The cache is unbounded unless a capacity is configured. Entries are never
//! invalidated: the catalog is immutable, so a result stays correct for the
//! lifetime of the session. Growth is bounded only by how many distinct
//! terms a user types.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::core::matcher::MatchResult;

/// What is known about a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheSlot {
    Ready(MatchResult),
    /// A remote round trip for this term is in flight.
    Pending,
    /// The last round trip for this term failed; the next lookup retries.
    Failed,
}

impl CacheSlot {
    pub fn ready(&self) -> Option<&MatchResult> {
        match self {
            CacheSlot::Ready(result) => Some(result),
            _ => None,
        }
    }
}

pub struct ResultCache {
    slots: LruCache<String, CacheSlot>,
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("len", &self.slots.len())
            .field("cap", &self.slots.cap())
            .finish()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ResultCache {
    /// Create a cache. `None` means unbounded; with a capacity the least
    /// recently used term is evicted first.
    pub fn new(capacity: Option<NonZeroUsize>) -> Self {
        let slots = match capacity {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self { slots }
    }

    /// Look up a term. Keys are case-sensitive.
    pub fn get(&mut self, term: &str) -> Option<CacheSlot> {
        self.slots.get(term).cloned()
    }

    /// Ready result for `term`, ignoring pending and failed slots.
    pub fn get_ready(&mut self, term: &str) -> Option<MatchResult> {
        self.slots.get(term).and_then(|slot| slot.ready().cloned())
    }

    pub fn put(&mut self, term: impl Into<String>, result: MatchResult) {
        self.slots.put(term.into(), CacheSlot::Ready(result));
    }

    pub fn mark_pending(&mut self, term: impl Into<String>) {
        self.slots.put(term.into(), CacheSlot::Pending);
    }

    /// Record a failure, unless a result already arrived for the term.
    pub fn mark_failed(&mut self, term: &str) {
        if !matches!(self.slots.peek(term), Some(CacheSlot::Ready(_))) {
            self.slots.put(term.to_string(), CacheSlot::Failed);
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.slots.contains(term)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let mut cache = ResultCache::default();
        let result: MatchResult = vec![1, 2, 3].into();
        cache.put("grin", result.clone());

        assert_eq!(cache.get("grin"), Some(CacheSlot::Ready(result.clone())));
        assert_eq!(cache.get_ready("grin"), Some(result));
        assert_eq!(cache.get("flag"), None);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut cache = ResultCache::default();
        cache.put("Grin", vec![0].into());
        assert!(cache.get("grin").is_none());
        assert!(cache.contains("Grin"));
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut cache = ResultCache::default();
        for i in 0..1000 {
            cache.put(format!("term{}", i), vec![i].into());
        }
        assert_eq!(cache.len(), 1000);
        assert!(cache.get("term0").is_some());
    }

    #[test]
    fn test_capacity_evicts_least_recent() {
        let mut cache = ResultCache::new(NonZeroUsize::new(2));
        cache.put("a", vec![0].into());
        cache.put("b", vec![1].into());
        cache.get("a");
        cache.put("c", vec![2].into());

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_pending_and_failed() {
        let mut cache = ResultCache::default();
        cache.mark_pending("grin");
        assert_eq!(cache.get("grin"), Some(CacheSlot::Pending));
        assert_eq!(cache.get_ready("grin"), None);

        cache.mark_failed("grin");
        assert_eq!(cache.get("grin"), Some(CacheSlot::Failed));

        cache.put("grin", vec![0].into());
        cache.mark_failed("grin");
        assert!(cache.get_ready("grin").is_some());

        cache.clear();
        assert!(cache.is_empty());
    }
}
