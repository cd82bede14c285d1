use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::matcher::MatchMode;
use crate::core::window::ViewLayout;
use crate::error::{UniError, UniResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub view: ViewConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a typed term is acted on.
    pub debounce_ms: u64,
    pub match_mode: MatchMode,
    /// Maximum number of cached terms. Unbounded when absent.
    pub cache_capacity: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub row_height: u32,
    pub row_gutter: u32,
    pub viewport_height: u32,
    pub overscan: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 200,
            match_mode: MatchMode::Forward,
            cache_capacity: None,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            row_height: 100,
            row_gutter: 10,
            viewport_height: 600,
            overscan: 1,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:3000/api/search".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn cache_capacity(&self) -> Option<NonZeroUsize> {
        self.cache_capacity.and_then(NonZeroUsize::new)
    }
}

impl ViewConfig {
    pub fn layout(&self) -> ViewLayout {
        ViewLayout {
            row_size: self.row_height + self.row_gutter,
            viewport_size: self.viewport_height,
            overscan: self.overscan,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config"))
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
            })
            .join("unibergers")
            .join("config.toml")
    }

    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load and validate config from an explicit path
    pub fn load_from(path: &Path) -> UniResult<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.validate();
        Ok(config)
    }

    /// Validate and clamp config values to acceptable ranges
    fn validate(&mut self) {
        self.search.debounce_ms = self.search.debounce_ms.clamp(50, 2000);
        self.view.row_height = self.view.row_height.clamp(16, 400);
        self.view.row_gutter = self.view.row_gutter.min(100);
        self.view.viewport_height = self.view.viewport_height.clamp(100, 4000);
        self.view.overscan = self.view.overscan.min(20);
        self.remote.timeout_ms = self.remote.timeout_ms.clamp(100, 60_000);
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> UniResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| UniError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_values() {
        let config = Config::default();
        assert_eq!(config.search.debounce_ms, 200);
        assert_eq!(config.search.match_mode, MatchMode::Forward);
        assert!(config.search.cache_capacity().is_none());
        assert_eq!(config.view.layout().row_size, 110);
        assert_eq!(config.view.layout().viewport_size, 600);
    }

    #[test]
    fn test_load_partial_file_and_clamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[search]\ndebounce_ms = 5\nmatch_mode = \"symmetric\"\ncache_capacity = 64\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.search.debounce_ms, 50);
        assert_eq!(config.search.match_mode, MatchMode::Symmetric);
        assert_eq!(config.search.cache_capacity().map(|c| c.get()), Some(64));
        assert_eq!(config.view.row_height, 100);
    }

    #[test]
    fn test_zero_capacity_means_unbounded() {
        let search = SearchConfig {
            cache_capacity: Some(0),
            ..SearchConfig::default()
        };
        assert!(search.cache_capacity().is_none());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[search\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(UniError::Config(_))));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.remote.enabled = true;
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.remote.enabled);
    }
}
