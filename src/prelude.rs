//! Prelude module for common gridlet types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use gridlet::prelude::*;`

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use crate::core::{
    config::{Color, GridConfig, GridStyle, GridTheme, LabelConfig, LabelFont},
    decimal::WorldCoord,
    geo::{PixelBounds, Point, TileCoord, TileRange, ViewportRect},
    interval::{grid_intervals, GridInterval},
    tiling::{TileCoordinator, WorldRect},
    transform::{AxisTransform, TileTransforms},
};

pub use crate::layers::{
    base::{LayerProperties, LayerType},
    grid::StaticGridLayer,
    group::{GridOverlay, OverlayTile},
    labels::GridLabelsLayer,
};

pub use crate::input::events::{MoveEvents, Subscription};

pub use crate::rendering::{
    context::{DrawCommand, SharedCanvas, TileCanvas},
    text::{FallbackFontSource, FixedAdvanceFont, FontCache, TextMetrics},
};

pub use crate::traits::{FontSource, GridTileLayer, MapHost, TextMeasure, TileOutcome};

pub use crate::{GridError, Result};

pub use std::sync::Arc;
