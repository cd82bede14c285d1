//! Windowed view feed over the active result list.
//!
//! Rows have a fixed size, so ranges are computed arithmetically: only the
//! requested window is ever resolved to catalog entries.

use std::cmp;
use std::ops::Range;
use std::sync::Arc;

use crate::core::matcher::MatchResult;
use crate::services::catalog::{Catalog, CatalogEntry};

/// Which list the view is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveList {
    /// No search: every entry in catalog order.
    Default(Arc<[usize]>),
    /// The term is exactly one glyph.
    ExactMatch(usize),
    /// Debounced match set.
    Matches(MatchResult),
    /// A search is settling or in flight; nothing to show yet.
    Loading,
}

impl ActiveList {
    pub fn indices(&self) -> Arc<[usize]> {
        match self {
            ActiveList::Default(indices) | ActiveList::Matches(indices) => indices.clone(),
            ActiveList::ExactMatch(index) => Arc::from([*index]),
            ActiveList::Loading => Arc::from([]),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ActiveList::Default(indices) | ActiveList::Matches(indices) => indices.len(),
            ActiveList::ExactMatch(_) => 1,
            ActiveList::Loading => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fixed-size row geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLayout {
    /// Row size including gutter.
    pub row_size: u32,
    pub viewport_size: u32,
    /// Extra rows resolved on each side of the visible range.
    pub overscan: usize,
}

impl Default for ViewLayout {
    fn default() -> Self {
        Self {
            row_size: 110,
            viewport_size: 600,
            overscan: 1,
        }
    }
}

/// A resolved, renderable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    /// Position in the active list.
    pub index: usize,
    /// Stable identity: the entry's `code_key`.
    pub key: &'a str,
    /// Offset of the row's top edge.
    pub start: u64,
    pub entry: &'a CatalogEntry,
}

#[derive(Debug, Clone)]
pub struct ViewFeed {
    catalog: Arc<Catalog>,
    items: Arc<[usize]>,
    layout: ViewLayout,
}

impl ViewFeed {
    pub fn new(catalog: Arc<Catalog>, active: &ActiveList, layout: ViewLayout) -> Self {
        Self::from_indices(catalog, active.indices(), layout)
    }

    pub fn from_indices(catalog: Arc<Catalog>, items: Arc<[usize]>, layout: ViewLayout) -> Self {
        debug_assert!(items.iter().all(|&i| i < catalog.len()));
        Self {
            catalog,
            items,
            layout,
        }
    }

    pub fn layout(&self) -> ViewLayout {
        self.layout
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Catalog index backing position `i`.
    pub fn catalog_index(&self, i: usize) -> Option<usize> {
        self.items.get(i).copied()
    }

    pub fn item_at(&self, i: usize) -> Option<&CatalogEntry> {
        self.catalog_index(i).and_then(|c| self.catalog.get(c))
    }

    pub fn item_key(&self, i: usize) -> Option<&str> {
        self.item_at(i).map(|e| e.code_key.as_str())
    }

    /// True when both feeds show the same entries in the same order, so the
    /// view can keep its rows.
    pub fn same_items(&self, other: &ViewFeed) -> bool {
        Arc::ptr_eq(&self.items, &other.items) || self.items == other.items
    }

    pub fn total_size(&self) -> u64 {
        self.items.len() as u64 * self.layout.row_size as u64
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.total_size()
            .saturating_sub(self.layout.viewport_size as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// Rows intersecting the viewport, without overscan.
    pub fn visible_range(&self, scroll_offset: u64) -> Range<usize> {
        let count = self.items.len();
        let row = self.layout.row_size as u64;
        if count == 0 || row == 0 {
            return 0..0;
        }

        let view_end = scroll_offset.saturating_add(self.layout.viewport_size as u64);
        let start = cmp::min(count, (scroll_offset / row) as usize);
        let end = cmp::min(count, view_end.div_ceil(row) as usize);
        start..cmp::max(start, end)
    }

    /// Visible range widened by the overscan.
    pub fn render_range(&self, scroll_offset: u64) -> Range<usize> {
        let visible = self.visible_range(scroll_offset);
        if visible.is_empty() {
            return visible;
        }
        let start = visible.start.saturating_sub(self.layout.overscan);
        let end = cmp::min(self.items.len(), visible.end.saturating_add(self.layout.overscan));
        start..end
    }

    /// First visible position, as persisted in the address bar.
    pub fn first_visible_index(&self, scroll_offset: u64) -> usize {
        self.visible_range(scroll_offset).start
    }

    /// Offset that puts `index` at the top of the viewport (clamped).
    pub fn scroll_offset_for_index(&self, index: usize) -> u64 {
        if self.items.is_empty() {
            return 0;
        }
        let index = index.min(self.items.len() - 1);
        self.clamp_scroll_offset(index as u64 * self.layout.row_size as u64)
    }

    /// Resolve only the requested window into renderable rows.
    pub fn rows(&self, range: Range<usize>) -> Vec<Row<'_>> {
        let end = cmp::min(range.end, self.items.len());
        let start = cmp::min(range.start, end);
        (start..end)
            .filter_map(|index| {
                let entry = self.item_at(index)?;
                Some(Row {
                    index,
                    key: &entry.code_key,
                    start: index as u64 * self.layout.row_size as u64,
                    entry,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(count: usize) -> ViewFeed {
        let catalog = Catalog::embedded().unwrap();
        let items: Arc<[usize]> = (0..count.min(catalog.len())).collect();
        ViewFeed::from_indices(catalog, items, ViewLayout::default())
    }

    #[test]
    fn test_visible_range() {
        let feed = feed(50);
        assert_eq!(feed.visible_range(0), 0..6);
        assert_eq!(feed.visible_range(110), 1..7);
        assert_eq!(feed.visible_range(115), 1..7);
        assert_eq!(feed.render_range(0), 0..7);
        assert_eq!(feed.render_range(220), 1..9);
    }

    #[test]
    fn test_range_clamped_to_count() {
        let feed = feed(3);
        assert_eq!(feed.visible_range(0), 0..3);
        assert_eq!(feed.visible_range(10_000), 3..3);
        assert_eq!(feed.rows(0..100).len(), 3);
        assert!(feed.rows(5..10).is_empty());
    }

    #[test]
    fn test_empty_feed() {
        let catalog = Catalog::embedded().unwrap();
        let feed = ViewFeed::new(catalog, &ActiveList::Loading, ViewLayout::default());
        assert_eq!(feed.item_count(), 0);
        assert_eq!(feed.visible_range(0), 0..0);
        assert_eq!(feed.scroll_offset_for_index(5), 0);
        assert!(feed.item_at(0).is_none());
    }

    #[test]
    fn test_scroll_to_index_and_report_back() {
        let feed = feed(50);
        let offset = feed.scroll_offset_for_index(10);
        assert_eq!(offset, 1100);
        assert_eq!(feed.first_visible_index(offset), 10);

        // Near the end the offset is clamped to keep the viewport full
        let last = feed.scroll_offset_for_index(49);
        assert_eq!(last, feed.max_scroll_offset());
        assert_eq!(feed.first_visible_index(last), 44);
    }

    #[test]
    fn test_rows_use_code_keys() {
        let feed = feed(10);
        let rows = feed.rows(feed.render_range(0));
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[1].start, 110);
        for row in &rows {
            assert_eq!(Some(row.key), feed.item_key(row.index));
        }
    }

    #[test]
    fn test_exact_match_singleton() {
        let catalog = Catalog::embedded().unwrap();
        let index = catalog.position_of_display_text("😀").unwrap();
        let feed = ViewFeed::new(catalog, &ActiveList::ExactMatch(index), ViewLayout::default());
        assert_eq!(feed.item_count(), 1);
        assert_eq!(feed.item_at(0).unwrap().display_text, "😀");
    }

    #[test]
    fn test_same_items() {
        let catalog = Catalog::embedded().unwrap();
        let active = ActiveList::Matches(vec![1, 2].into());
        let a = ViewFeed::new(catalog.clone(), &active, ViewLayout::default());
        let b = ViewFeed::new(catalog.clone(), &active, ViewLayout::default());
        let c = ViewFeed::new(catalog, &ActiveList::Matches(vec![2, 1].into()), ViewLayout::default());
        assert!(a.same_items(&b));
        assert!(!a.same_items(&c));
    }
}
