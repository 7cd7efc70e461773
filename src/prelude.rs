//! Prelude module for common markmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use markmap::prelude::*;`

pub use crate::core::{
    config::{ApiConfig, ClusteringConfig, EngineOptions, EngineProfile, OverlayConfig, SearchConfig},
    geo::{MarkPosition, MarkSet, Point, RenderedImageFrame},
    mapper::CoordinateMapper,
    session::MarkingSession,
};

pub use crate::input::{
    events::{ClickOutcome, EventHandled, PointerEvent},
    overlay::{remove_mark, rename_mark, ClickMode, MarkCallback, MarkOverlayController},
};

pub use crate::spatial::clustering::MarkClusterer;

pub use crate::data::{
    records::{
        group_by_map, ListQuery, MapSelection, MapSummary, MarkedMapRecord, MarkedMapUpdate,
        NewMarkedMap,
    },
    store::{InMemoryStore, MarkedMapStore},
};

pub use crate::data::http::HttpMarkedMapStore;

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::{spawn, AsyncHandle, Debouncer};

pub use crate::{Error as MarkError, Result};

pub use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use futures::Future;
