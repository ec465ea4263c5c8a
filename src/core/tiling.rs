//! Tile addressing: which part of the world a tile shows, and which tiles
//! are on screen.

use crate::core::config::GridConfig;
use crate::core::decimal::WorldCoord;
use crate::core::geo::{PixelBounds, TileCoord, TileRange};
use crate::core::transform::TileTransforms;

/// World-coordinate extent of one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub x0: WorldCoord,
    pub x1: WorldCoord,
    pub y0: WorldCoord,
    pub y1: WorldCoord,
}

/// Maps tile addresses to world rectangles and pixel bounds to tile ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileCoordinator {
    tile_size: u32,
    base_zoom: i32,
}

impl TileCoordinator {
    pub fn new(tile_size: u32, base_zoom: i32) -> Self {
        Self {
            tile_size,
            base_zoom,
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.tile_size, config.base_zoom)
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// World units covered by one tile at zoom `z`: `2^(base_zoom - z)`.
    pub fn width_per_tile(&self, z: i32) -> WorldCoord {
        WorldCoord::pow2(self.base_zoom - z)
    }

    /// World units covered by one CSS pixel at zoom `z`.
    pub fn pixel_width(&self, z: i32) -> f64 {
        2f64.powi(self.base_zoom - z) / f64::from(self.tile_size)
    }

    pub fn world_rect(&self, coord: TileCoord) -> WorldRect {
        let width = self.width_per_tile(coord.z);
        let column = WorldCoord::from_int(coord.x);
        let row = WorldCoord::from_int(coord.y);
        let one = WorldCoord::one();
        WorldRect {
            x0: width * column,
            x1: width * (column + one),
            y0: width * (-row - one),
            y1: width * -row,
        }
    }

    /// World rectangle and pixel transforms for a tile, derived fresh.
    pub fn tile_geometry(&self, coord: TileCoord) -> (WorldRect, TileTransforms) {
        let rect = self.world_rect(coord);
        let transforms = TileTransforms::for_rect(&rect, self.tile_size);
        (rect, transforms)
    }

    /// Tiles covering the visible pixel bounds.
    ///
    /// The upper end counts only tiles whose first pixel column/row is inside
    /// the bounds.
    pub fn visible_tile_range(&self, bounds: &PixelBounds) -> TileRange {
        let size = f64::from(self.tile_size);
        let last = size - 1.0;
        TileRange::new(
            (bounds.min.x / size).floor() as i64,
            (bounds.min.y / size).floor() as i64,
            ((bounds.max.x - last) / size).ceil() as i64,
            ((bounds.max.y - last) / size).ceil() as i64,
        )
    }
}

impl Default for TileCoordinator {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}
