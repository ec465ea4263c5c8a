//! # gridlet
//!
//! An infinite Cartesian grid overlay for tiled map views.
//!
//! The grid stays exact at any zoom: world coordinates are fixed-point
//! decimals and only the final pixel positions are rounded to `f64`. Each
//! tile gets major and minor gridlines from the 1-2-5 interval progression,
//! both axes, and tick labels that stay on screen while an axis is scrolled
//! out of view.
//!
//! The host map owns the tiles and the viewport; the overlay reaches it
//! through the traits in [`traits`].

pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{GridConfig, GridStyle, GridTheme},
    decimal::WorldCoord,
    geo::{PixelBounds, Point, TileCoord, TileRange, ViewportRect},
    interval::GridInterval,
};

pub use layers::{grid::StaticGridLayer, group::GridOverlay, labels::GridLabelsLayer};

pub use input::events::{MoveEvents, Subscription};

pub use rendering::{context::TileCanvas, text::FontCache};

pub use traits::{FontSource, GridTileLayer, MapHost, TextMeasure, TileOutcome};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, GridError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Font load error: {0}")]
    FontLoad(String),

    #[error("Font load timed out after {0:?}")]
    FontTimeout(std::time::Duration),
}

/// Error type alias for convenience
pub type Error = GridError;

/// Initializes `env_logger` for binaries and tests. Safe to call more than
/// once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}
