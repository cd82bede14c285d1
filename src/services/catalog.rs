//! The emoji catalog: static, read-only entries loaded once at startup.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Longest display text (in Unicode code points) kept in the catalog.
pub const MAX_CODE_POINTS: usize = 8;

static EMBEDDED_JSON: &str = include_str!("../../data/emoji.json");
static EMBEDDED: OnceCell<Arc<Catalog>> = OnceCell::new();

/// A single emoji record.
///
/// Field names on the wire follow the `emoji.json` record shape
/// (`char`, `name`, `category`, `codes`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "char")]
    pub display_text: String,
    #[serde(rename = "name")]
    pub label: String,
    pub category: String,
    #[serde(rename = "codes")]
    pub code_key: String,
}

impl CatalogEntry {
    /// Number of Unicode code points in the glyph.
    pub fn code_point_count(&self) -> usize {
        self.display_text.chars().count()
    }

    /// Emojipedia page for this glyph.
    pub fn reference_url(&self) -> String {
        format!(
            "https://emojipedia.org/emoji/{}/",
            urlencoding::encode(&self.display_text)
        )
    }
}

/// Ordered, immutable list of searchable entries.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Parse a JSON array of records, dropping glyphs longer than
    /// [`MAX_CODE_POINTS`]. Order is preserved.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(raw))
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut dropped = 0usize;
        let entries: Vec<CatalogEntry> = entries
            .into_iter()
            .filter(|e| {
                let keep = e.code_point_count() <= MAX_CODE_POINTS;
                if !keep {
                    dropped += 1;
                }
                keep
            })
            .collect();

        if dropped > 0 {
            tracing::debug!("Dropped {} catalog entries longer than {} code points", dropped, MAX_CODE_POINTS);
        }

        Self { entries }
    }

    /// The catalog bundled with the binary, parsed on first use.
    pub fn embedded() -> Result<Arc<Catalog>, CatalogError> {
        EMBEDDED
            .get_or_try_init(|| Catalog::from_json(EMBEDDED_JSON).map(Arc::new))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Every index in catalog order: the list shown when nothing is searched.
    pub fn default_indices(&self) -> Arc<[usize]> {
        (0..self.entries.len()).collect()
    }

    /// First entry whose glyph equals `text` exactly.
    pub fn position_of_display_text(&self, text: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.display_text == text)
    }
}
