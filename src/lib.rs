//! # markmap
//!
//! Point annotations ("marks") on game-world map images.
//!
//! Marks live in a resolution-independent percent space so a saved set stays
//! valid whatever size the map image is rendered at. The crate provides the
//! pixel/percent conversion, click resolution for an editable overlay, and
//! clustering of marks pooled from several saved records for a combined view.

pub mod core;
pub mod data;
pub mod input;
pub mod prelude;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub mod spatial;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{EngineOptions, EngineProfile},
    geo::{MarkPosition, MarkSet, Point, RenderedImageFrame},
    mapper::CoordinateMapper,
    session::MarkingSession,
};

pub use input::{
    events::{ClickOutcome, EventHandled, PointerEvent},
    overlay::{remove_mark, rename_mark, ClickMode, MarkOverlayController},
};

pub use spatial::clustering::MarkClusterer;

pub use data::{
    records::{
        group_by_map, ListQuery, MapSelection, MapSummary, MarkedMapRecord, MarkedMapUpdate,
        NewMarkedMap,
    },
    store::{InMemoryStore, MarkedMapStore},
};

pub use data::http::HttpMarkedMapStore;

#[cfg(feature = "tokio-runtime")]
pub use runtime::Debouncer;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Error type alias for convenience
pub type Error = MarkError;
