//! The gridline layer: background, minor and major lines, and the two axes.

use crate::{
    core::{
        config::GridConfig,
        decimal::WorldCoord,
        geo::{Point, TileCoord},
        interval::{grid_intervals, GridInterval},
        tiling::{TileCoordinator, WorldRect},
        transform::TileTransforms,
    },
    layers::{
        base::{LayerProperties, LayerType},
        registry::TileRegistry,
    },
    rendering::context::{lock_canvas, LineSegment, Stroke, TileCanvas},
    traits::{GridTileLayer, TileOutcome},
};
use async_trait::async_trait;

/// Full-span segments for every multiple of `interval` crossing the tile, on
/// both axes.
fn interval_segments(
    interval: &GridInterval,
    rect: &WorldRect,
    transforms: &TileTransforms,
    size: f64,
) -> Vec<LineSegment> {
    let mut segments = Vec::new();
    for tick in interval.ticks(rect.x0, rect.x1) {
        let x = transforms.x.pixel(tick.value);
        segments.push(LineSegment::new(Point::new(x, 0.0), Point::new(x, size)));
    }
    for tick in interval.ticks(rect.y0, rect.y1) {
        let y = transforms.y.pixel(tick.value);
        segments.push(LineSegment::new(Point::new(0.0, y), Point::new(size, y)));
    }
    segments
}

/// Draws one grid tile onto `canvas`.
///
/// Paint order sets priority: background, then minor lines, then major lines,
/// then the axes on top.
pub fn draw_grid_tile(
    canvas: &mut TileCanvas,
    coord: TileCoord,
    tiles: &TileCoordinator,
    config: &GridConfig,
) {
    let style = &config.style;
    let size = f64::from(tiles.tile_size());
    let (rect, transforms) = tiles.tile_geometry(coord);
    let (major, minor) = grid_intervals(tiles.pixel_width(coord.z), config.max_density);

    canvas.clear();
    canvas.fill_rect(Point::new(0.0, 0.0), Point::new(size, size), style.background);

    for (interval, color) in [(&minor, style.minor_line), (&major, style.major_line)] {
        canvas.stroke_path(
            interval_segments(interval, &rect, &transforms, size),
            Stroke {
                color,
                width: style.line_width,
            },
        );
    }

    let origin = WorldCoord::zero();
    let cx = transforms.x.pixel(origin);
    let cy = transforms.y.pixel(origin);
    canvas.stroke_path(
        vec![
            LineSegment::new(Point::new(cx, 0.0), Point::new(cx, size)),
            LineSegment::new(Point::new(0.0, cy), Point::new(size, cy)),
        ],
        Stroke {
            color: style.axis,
            width: style.line_width,
        },
    );
}

/// Tile layer drawing the static part of the grid.
#[derive(Debug)]
pub struct StaticGridLayer {
    properties: LayerProperties,
    config: GridConfig,
    tiles: TileCoordinator,
    registry: TileRegistry,
}

impl StaticGridLayer {
    pub fn new(config: GridConfig) -> Self {
        let properties = LayerProperties::new(
            "grid-lines".to_string(),
            "Grid lines".to_string(),
            LayerType::GridLines,
        );
        Self {
            properties,
            tiles: TileCoordinator::from_config(&config),
            config,
            registry: TileRegistry::new(),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    pub fn draw_tile(&self, canvas: &mut TileCanvas, coord: TileCoord) {
        draw_grid_tile(canvas, coord, &self.tiles, &self.config);
    }
}

#[async_trait]
impl GridTileLayer for StaticGridLayer {
    crate::impl_registry_layer!(properties, registry);

    async fn create_tile(&self, coord: TileCoord) -> TileOutcome {
        let ticket = self.registry.register(
            coord,
            TileCanvas::shared(self.config.tile_size, self.config.device_pixel_ratio),
        );

        // Hand the tile back to the host before spending time on it.
        tokio::task::yield_now().await;

        let Some(canvas) = self.registry.canvas_for(&ticket) else {
            log::debug!("grid tile {} evicted before drawing", coord);
            return TileOutcome::Cancelled;
        };
        self.draw_tile(&mut lock_canvas(&canvas), coord);
        if !self.registry.mark_rendered(&ticket) {
            log::debug!("grid tile {} evicted while drawing", coord);
            return TileOutcome::Cancelled;
        }
        log::debug!("grid tile {} ready", coord);
        TileOutcome::Ready(canvas)
    }
}
