//! Seams to the outside world
//!
//! The grid overlay never owns the map: tile lifecycle, viewport geometry,
//! move events and fonts all belong to the host. These traits are the only
//! way the overlay reaches them.

use crate::{
    core::{
        config::LabelFont,
        geo::{PixelBounds, TileCoord, ViewportRect},
    },
    input::events::MoveEvents,
    layers::base::LayerProperties,
    rendering::{context::SharedCanvas, text::TextMetrics},
    Result,
};
use async_trait::async_trait;
use std::sync::Arc;

/// The tiling map the overlay is attached to.
pub trait MapHost: Send + Sync {
    /// Global pixel bounds of the visible map at the current zoom.
    fn pixel_bounds(&self) -> PixelBounds;

    /// Screen-space rectangle of the map container.
    fn container_rect(&self) -> ViewportRect;

    /// Screen-space rectangle of a tile's drawing surface.
    fn tile_rect(&self, coord: TileCoord) -> ViewportRect;

    /// Emitter for viewport movement.
    fn move_events(&self) -> &MoveEvents;
}

/// Measures rendered text, like `CanvasRenderingContext2D::measureText`.
pub trait TextMeasure: Send + Sync {
    fn measure(&self, text: &str) -> TextMetrics;
}

/// Loads the label font and hands back its metrics once it is usable.
#[async_trait]
pub trait FontSource: Send + Sync {
    async fn load(&self, font: &LabelFont) -> Result<Arc<dyn TextMeasure>>;
}

/// Outcome of a tile creation request.
#[derive(Debug, Clone)]
pub enum TileOutcome {
    /// The tile is drawn and ready for display.
    Ready(SharedCanvas),
    /// The tile was evicted before its draw completed; nothing was drawn.
    Cancelled,
}

impl TileOutcome {
    pub fn canvas(&self) -> Option<&SharedCanvas> {
        match self {
            Self::Ready(canvas) => Some(canvas),
            Self::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// A layer that produces one drawing surface per tile.
#[async_trait]
pub trait GridTileLayer: Send + Sync {
    fn properties(&self) -> &LayerProperties;

    /// The surface registered for `coord`, drawn or not.
    fn surface(&self, coord: TileCoord) -> Option<SharedCanvas>;

    /// Creates and draws the tile at `coord`. The surface is registered
    /// immediately; the future resolves once it is ready for display.
    async fn create_tile(&self, coord: TileCoord) -> TileOutcome;

    /// Evicts a tile. A pending creation for it completes as
    /// [`TileOutcome::Cancelled`].
    fn remove_tile(&self, coord: TileCoord);

    /// Marks tiles at `zoom` as current and every other tile as stale.
    fn set_current_zoom(&self, zoom: i32);
}
