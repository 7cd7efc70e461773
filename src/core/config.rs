//! Configuration for the annotation engine and its collaborators
//!
//! Options can be built from a preset profile, loaded from a JSON file, and
//! then adjusted through `MARKMAP_*` environment variables.

use crate::core::constants::{
    CLUSTER_THRESHOLD_PERCENT, DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_MS, HIT_RADIUS_PX,
    MARK_SIZE_PX, MAX_LIST_RESULTS, SEARCH_DEBOUNCE_MS, TOUCH_HIT_RADIUS_PX,
};
use crate::{data::records::ListQuery, MarkError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineProfile {
    Standard,
    Touch,
    Custom(EngineOptions),
}

impl EngineProfile {
    pub fn resolve(&self) -> EngineOptions {
        match self {
            Self::Standard => EngineOptions {
                overlay: OverlayConfig {
                    mark_size_px: MARK_SIZE_PX,
                    hit_radius_px: HIT_RADIUS_PX,
                    show_labels: true,
                },
                clustering: ClusteringConfig {
                    threshold_percent: CLUSTER_THRESHOLD_PERCENT,
                },
                search: SearchConfig {
                    debounce_ms: SEARCH_DEBOUNCE_MS,
                    today_only: true,
                    max_results: MAX_LIST_RESULTS,
                },
                api: ApiConfig::default(),
            },
            Self::Touch => EngineOptions {
                overlay: OverlayConfig {
                    mark_size_px: MARK_SIZE_PX,
                    hit_radius_px: TOUCH_HIT_RADIUS_PX,
                    show_labels: true,
                },
                clustering: ClusteringConfig {
                    threshold_percent: CLUSTER_THRESHOLD_PERCENT,
                },
                search: SearchConfig {
                    debounce_ms: SEARCH_DEBOUNCE_MS,
                    today_only: true,
                    max_results: MAX_LIST_RESULTS,
                },
                api: ApiConfig::default(),
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

impl Default for EngineProfile {
    fn default() -> Self {
        Self::Standard
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub overlay: OverlayConfig,
    pub clustering: ClusteringConfig,
    pub search: SearchConfig,
    pub api: ApiConfig,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineProfile::default().resolve()
    }
}

impl EngineOptions {
    /// Load options from a JSON file; missing sections and fields fall back to defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(MarkError::Io)?;
        let options: EngineOptions = serde_json::from_str(&raw).map_err(MarkError::Serialization)?;
        log::debug!("loaded engine options from {}", path.display());
        options.validate()?;
        Ok(options)
    }

    /// Apply `MARKMAP_API_URL`, `MARKMAP_DEBOUNCE_MS` and `MARKMAP_HIT_RADIUS_PX`
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup("MARKMAP_API_URL") {
            self.api.base_url = url;
        }
        if let Some(raw) = lookup("MARKMAP_DEBOUNCE_MS") {
            self.search.debounce_ms = raw
                .trim()
                .parse()
                .map_err(|_| MarkError::Config(format!("MARKMAP_DEBOUNCE_MS: not a number: {raw}")))?;
        }
        if let Some(raw) = lookup("MARKMAP_HIT_RADIUS_PX") {
            self.overlay.hit_radius_px = raw
                .trim()
                .parse()
                .map_err(|_| MarkError::Config(format!("MARKMAP_HIT_RADIUS_PX: not a number: {raw}")))?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.overlay.hit_radius_px > 0.0) {
            return Err(MarkError::Config("hit radius must be positive".into()).into());
        }
        if !(self.clustering.threshold_percent > 0.0) {
            return Err(MarkError::Config("cluster threshold must be positive".into()).into());
        }
        if self.api.base_url.trim().is_empty() {
            return Err(MarkError::Config("api base url is empty".into()).into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub mark_size_px: f64,
    pub hit_radius_px: f64,
    pub show_labels: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        EngineProfile::Standard.resolve().overlay
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Percent-space distance at or under which two marks collapse
    pub threshold_percent: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            threshold_percent: CLUSTER_THRESHOLD_PERCENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    pub today_only: bool,
    pub max_results: usize,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// List query for the typed search text under this config's day filter
    pub fn query(&self, text: &str) -> ListQuery {
        ListQuery::search(text, self.today_only)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        EngineProfile::Standard.resolve().search
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_ms: DEFAULT_API_TIMEOUT_MS,
            user_agent: concat!("markmap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
