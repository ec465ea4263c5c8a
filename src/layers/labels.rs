//! The tick label layer.
//!
//! Only a few tiles draw labels: the ones along each axis, or, when an axis
//! is off-screen, the two tiles nearest to it on the side where it left.
//! Labels that would leave the map container are pushed back inside it and
//! muted, so the scale stays readable while the axis is out of view.
//! Rendered tiles are redrawn on every viewport move because the clamping
//! depends on where the tile currently sits on screen.

use crate::{
    core::{
        config::GridConfig,
        decimal::WorldCoord,
        format::format_tick,
        geo::{Point, TileCoord, TileRange, ViewportRect},
        interval::grid_intervals,
        tiling::TileCoordinator,
    },
    input::events::Subscription,
    layers::{
        base::{LayerProperties, LayerType},
        registry::TileRegistry,
    },
    rendering::{
        context::{lock_canvas, Halo, TileCanvas},
        text::{FontCache, TextMetrics},
    },
    traits::{GridTileLayer, MapHost, TextMeasure, TileOutcome},
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

/// The axis a label annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Screen geometry a label tile is drawn against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelFrame {
    /// Tiles currently in view.
    pub range: TileRange,
    /// The map container on screen.
    pub map_viewport: ViewportRect,
    /// The tile's own surface on screen.
    pub tile_viewport: ViewportRect,
}

/// Whether the tile draws labels for ticks on the x axis.
pub fn owns_x_labels(coord: TileCoord, range: &TileRange) -> bool {
    let row = coord.y;
    row == 0
        || (range.max_y <= 0 && (row == range.max_y || row == range.max_y - 1))
        || (range.min_y >= 0 && (row == range.min_y || row == range.min_y + 1))
}

/// Whether the tile draws labels for ticks on the y axis.
pub fn owns_y_labels(coord: TileCoord, range: &TileRange) -> bool {
    let col = coord.x;
    col == -1
        || (range.max_x <= -1 && (col == range.max_x || col == range.max_x - 1))
        || (range.min_x >= -1 && (col == range.min_x || col == range.min_x + 1))
}

/// The origin sits at the top-right corner of tile (-1, 0), which draws its
/// label on behalf of all four tiles touching it.
pub fn owns_origin_label(coord: TileCoord) -> bool {
    coord.x == -1 && coord.y == 0
}

/// Where a label ends up after clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// Text anchor in tile pixels.
    pub position: Point,
    /// Screen-space bounding box at `position`.
    pub bounds: ViewportRect,
    /// The label was moved off its axis to stay on screen.
    pub muted: bool,
}

/// Screen-space box of text anchored at `anchor` on a tile at `tile`.
pub fn label_bounds(anchor: Point, metrics: &TextMetrics, tile: &ViewportRect) -> ViewportRect {
    ViewportRect::new(
        tile.x + anchor.x - metrics.left,
        tile.y + anchor.y - metrics.ascent,
        metrics.width(),
        metrics.height(),
    )
}

/// Shift that brings `[lo, hi]` inside `[min, max]`.
fn clamp_shift(lo: f64, hi: f64, min: f64, max: f64) -> f64 {
    (min - lo).max(0.0) + (max - hi).min(0.0)
}

/// Moves a label anchored at `anchor` so its box stays `padding` inside the
/// map container.
pub fn place_label(
    anchor: Point,
    metrics: &TextMetrics,
    axis: Axis,
    frame: &LabelFrame,
    padding: f64,
) -> LabelPlacement {
    let bounds = label_bounds(anchor, metrics, &frame.tile_viewport);
    let inner = frame.map_viewport.inset(padding);
    let dx = clamp_shift(bounds.left(), bounds.right(), inner.left(), inner.right());
    let dy = clamp_shift(bounds.top(), bounds.bottom(), inner.top(), inner.bottom());

    let muted = match axis {
        Axis::X => dy != 0.0,
        Axis::Y => dx != 0.0,
    };
    LabelPlacement {
        position: Point::new(anchor.x + dx, anchor.y + dy),
        bounds: ViewportRect::new(bounds.x + dx, bounds.y + dy, bounds.width, bounds.height),
        muted,
    }
}

/// Draws the labels of one tile onto `canvas`, replacing whatever was there.
pub fn draw_label_tile(
    canvas: &mut TileCanvas,
    coord: TileCoord,
    frame: &LabelFrame,
    tiles: &TileCoordinator,
    config: &GridConfig,
    metrics: &dyn TextMeasure,
) {
    canvas.clear();

    let draw_x = owns_x_labels(coord, &frame.range);
    let draw_y = owns_y_labels(coord, &frame.range);
    let draw_origin = owns_origin_label(coord);
    if !(draw_x || draw_y || draw_origin) {
        return;
    }

    let style = &config.style;
    let labels = &config.labels;
    let halo = Halo {
        color: style.label_halo,
        width: labels.halo_width,
    };
    let (rect, transforms) = tiles.tile_geometry(coord);
    let (major, _) = grid_intervals(tiles.pixel_width(coord.z), config.max_density);
    let origin = WorldCoord::zero();
    let cx = transforms.x.pixel(origin);
    let cy = transforms.y.pixel(origin);
    let tile = &frame.tile_viewport;
    let map = &frame.map_viewport;

    if draw_origin {
        let text = format_tick(0, &major, labels.exponential_at);
        let m = metrics.measure(&text);
        let position = Point::new(cx - m.right - labels.offset, cy + m.ascent + labels.offset);
        canvas.fill_text(text, position, &labels.font, style.label, Some(halo.clone()));
    }

    if draw_x {
        for tick in major.ticks(rect.x0, rect.x1).filter(|t| t.index != 0) {
            let x = transforms.x.pixel(tick.value);
            let screen_x = tile.x + x;
            if screen_x < map.left() || screen_x > map.right() {
                continue;
            }
            let text = format_tick(tick.index, &major, labels.exponential_at);
            let m = metrics.measure(&text);
            let anchor = Point::new(x - (m.left + m.right) / 2.0, cy + m.ascent + labels.offset);
            let placement = place_label(anchor, &m, Axis::X, frame, labels.padding);
            let fill = if placement.muted { style.label_muted } else { style.label };
            canvas.fill_text(text, placement.position, &labels.font, fill, Some(halo.clone()));
        }
    }

    if draw_y {
        for tick in major.ticks(rect.y0, rect.y1).filter(|t| t.index != 0) {
            let y = transforms.y.pixel(tick.value);
            let screen_y = tile.y + y;
            if screen_y < map.top() || screen_y > map.bottom() {
                continue;
            }
            let text = format_tick(tick.index, &major, labels.exponential_at);
            let m = metrics.measure(&text);
            let anchor = Point::new(cx - m.right - labels.offset, y + (m.ascent - m.descent) / 2.0);
            let placement = place_label(anchor, &m, Axis::Y, frame, labels.padding);
            let fill = if placement.muted { style.label_muted } else { style.label };
            canvas.fill_text(text, placement.position, &labels.font, fill, Some(halo.clone()));
        }
    }
}

/// Tile layer drawing axis tick labels.
///
/// Call [`attach`](Self::attach) after wrapping the layer in an `Arc` so it
/// follows viewport moves.
pub struct GridLabelsLayer {
    properties: LayerProperties,
    config: GridConfig,
    tiles: TileCoordinator,
    registry: TileRegistry,
    host: Arc<dyn MapHost>,
    fonts: Arc<FontCache>,
    subscription: Mutex<Option<Subscription>>,
}

impl GridLabelsLayer {
    pub fn new(config: GridConfig, host: Arc<dyn MapHost>, fonts: Arc<FontCache>) -> Self {
        let properties = LayerProperties::new(
            "grid-labels".to_string(),
            "Grid labels".to_string(),
            LayerType::GridLabels,
        );
        Self {
            properties,
            tiles: TileCoordinator::from_config(&config),
            config,
            registry: TileRegistry::new(),
            host,
            fonts,
            subscription: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    /// Starts redrawing rendered tiles whenever the host's viewport moves.
    pub fn attach(self: &Arc<Self>) {
        let layer = Arc::downgrade(self);
        let subscription = self.host.move_events().subscribe(move || {
            if let Some(layer) = layer.upgrade() {
                layer.redraw_current_tiles();
            }
        });
        let previous = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(subscription);
        if previous.is_some() {
            log::debug!("{}: re-attached, previous subscription released", self.properties.id);
        }
    }

    /// Stops following viewport moves.
    pub fn detach(&self) {
        let subscription = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(subscription) = subscription {
            subscription.release();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Current screen geometry for a tile.
    pub fn frame(&self, coord: TileCoord) -> LabelFrame {
        LabelFrame {
            range: self.tiles.visible_tile_range(&self.host.pixel_bounds()),
            map_viewport: self.host.container_rect(),
            tile_viewport: self.host.tile_rect(coord),
        }
    }

    pub fn draw_tile(
        &self,
        canvas: &mut TileCanvas,
        coord: TileCoord,
        frame: &LabelFrame,
        metrics: &dyn TextMeasure,
    ) {
        draw_label_tile(canvas, coord, frame, &self.tiles, &self.config, metrics);
    }

    /// Redraws every rendered, current tile against the current viewport.
    /// Returns the number of tiles redrawn.
    pub fn redraw_current_tiles(&self) -> usize {
        // Nothing is rendered before the font resolves.
        let Some(metrics) = self.fonts.get() else {
            return 0;
        };
        let tiles = self.registry.rendered_current();
        for (coord, canvas) in &tiles {
            let mut canvas = lock_canvas(canvas);
            let frame = self.frame(*coord);
            self.draw_tile(&mut canvas, *coord, &frame, metrics.as_ref());
        }
        log::trace!("{}: redrew {} tiles", self.properties.id, tiles.len());
        tiles.len()
    }
}

impl std::fmt::Debug for GridLabelsLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridLabelsLayer")
            .field("properties", &self.properties)
            .field("tiles", &self.registry.len())
            .field("fonts", &self.fonts)
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[async_trait]
impl GridTileLayer for GridLabelsLayer {
    crate::impl_registry_layer!(properties, registry);

    async fn create_tile(&self, coord: TileCoord) -> TileOutcome {
        let ticket = self.registry.register(
            coord,
            TileCanvas::shared(self.config.tile_size, self.config.device_pixel_ratio),
        );

        let metrics = self.fonts.ready().await;

        let Some(canvas) = self.registry.canvas_for(&ticket) else {
            log::debug!("label tile {} evicted while waiting for the font", coord);
            return TileOutcome::Cancelled;
        };
        {
            // Marked rendered under the surface lock so a concurrent move
            // redraw waits and then draws with the newer viewport.
            let mut surface = lock_canvas(&canvas);
            let frame = self.frame(coord);
            self.draw_tile(&mut surface, coord, &frame, metrics.as_ref());
            if !self.registry.mark_rendered(&ticket) {
                log::debug!("label tile {} evicted while drawing", coord);
                return TileOutcome::Cancelled;
            }
        }
        log::debug!("label tile {} ready", coord);
        TileOutcome::Ready(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::text::FixedAdvanceFont;

    fn frame(range: TileRange, tile: ViewportRect) -> LabelFrame {
        LabelFrame {
            range,
            map_viewport: ViewportRect::new(0.0, 0.0, 512.0, 512.0),
            tile_viewport: tile,
        }
    }

    fn metrics() -> TextMetrics {
        TextMetrics {
            left: 0.0,
            right: 20.0,
            ascent: 10.0,
            descent: 2.0,
        }
    }

    #[test]
    fn test_x_label_ownership() {
        let around_origin = TileRange::new(-3, -3, 3, 3);
        assert!(owns_x_labels(TileCoord::new(5, 0, 0), &around_origin));
        assert!(!owns_x_labels(TileCoord::new(5, -1, 0), &around_origin));

        // Axis above the view: the top two rows take over.
        let below = TileRange::new(0, 3, 1, 5);
        assert!(owns_x_labels(TileCoord::new(0, 3, 0), &below));
        assert!(owns_x_labels(TileCoord::new(0, 4, 0), &below));
        assert!(!owns_x_labels(TileCoord::new(0, 5, 0), &below));

        // Axis below the view: the bottom two rows take over.
        let above = TileRange::new(0, -6, 1, -3);
        assert!(owns_x_labels(TileCoord::new(0, -3, 0), &above));
        assert!(owns_x_labels(TileCoord::new(0, -4, 0), &above));
        assert!(!owns_x_labels(TileCoord::new(0, -5, 0), &above));
    }

    #[test]
    fn test_y_label_ownership() {
        let around_origin = TileRange::new(-3, -3, 3, 3);
        assert!(owns_y_labels(TileCoord::new(-1, 7, 0), &around_origin));
        assert!(!owns_y_labels(TileCoord::new(0, 7, 0), &around_origin));

        let right = TileRange::new(2, 0, 4, 1);
        assert!(owns_y_labels(TileCoord::new(2, 0, 0), &right));
        assert!(owns_y_labels(TileCoord::new(3, 0, 0), &right));
        assert!(!owns_y_labels(TileCoord::new(4, 0, 0), &right));

        let left = TileRange::new(-9, 0, -4, 1);
        assert!(owns_y_labels(TileCoord::new(-4, 0, 0), &left));
        assert!(owns_y_labels(TileCoord::new(-5, 0, 0), &left));
        assert!(!owns_y_labels(TileCoord::new(-6, 0, 0), &left));
    }

    #[test]
    fn test_origin_label_owner() {
        assert!(owns_origin_label(TileCoord::new(-1, 0, 9)));
        assert!(!owns_origin_label(TileCoord::new(0, 0, 9)));
        assert!(!owns_origin_label(TileCoord::new(-1, -1, 9)));
    }

    #[test]
    fn test_label_inside_viewport_is_untouched() {
        let f = frame(TileRange::new(0, 0, 1, 1), ViewportRect::new(0.0, 0.0, 256.0, 256.0));
        let anchor = Point::new(100.0, 100.0);
        let placement = place_label(anchor, &metrics(), Axis::X, &f, 4.0);
        assert_eq!(placement.position, anchor);
        assert!(!placement.muted);
    }

    #[test]
    fn test_x_label_clamped_vertically_is_muted() {
        // Tile hangs below the map; its labels would fall off the bottom.
        let f = frame(TileRange::new(0, 0, 1, 1), ViewportRect::new(0.0, 400.0, 256.0, 256.0));
        let placement = place_label(Point::new(50.0, 200.0), &metrics(), Axis::X, &f, 4.0);

        assert!(placement.muted);
        assert_eq!(placement.bounds.bottom(), 508.0);
        assert!(f.map_viewport.inset(4.0).contains_rect(&placement.bounds));
    }

    #[test]
    fn test_x_label_clamped_sideways_is_not_muted() {
        let f = frame(TileRange::new(0, 0, 1, 1), ViewportRect::new(500.0, 0.0, 256.0, 256.0));
        let placement = place_label(Point::new(5.0, 100.0), &metrics(), Axis::X, &f, 4.0);

        assert!(!placement.muted);
        assert_eq!(placement.bounds.right(), 508.0);
        assert!(f.map_viewport.inset(4.0).contains_rect(&placement.bounds));
    }

    #[test]
    fn test_y_label_clamped_horizontally_is_muted() {
        let f = frame(TileRange::new(0, 0, 1, 1), ViewportRect::new(-200.0, 0.0, 256.0, 256.0));
        let placement = place_label(Point::new(10.0, 100.0), &metrics(), Axis::Y, &f, 4.0);

        assert!(placement.muted);
        assert_eq!(placement.bounds.left(), 4.0);
    }

    #[test]
    fn test_oversized_label_aligns_left() {
        let f = LabelFrame {
            range: TileRange::new(0, 0, 0, 0),
            map_viewport: ViewportRect::new(0.0, 0.0, 10.0, 100.0),
            tile_viewport: ViewportRect::new(0.0, 0.0, 256.0, 256.0),
        };
        let placement = place_label(Point::new(-30.0, 50.0), &metrics(), Axis::X, &f, 4.0);
        assert_eq!(placement.bounds.left(), 4.0);
    }

    #[test]
    fn test_tile_without_labels_is_blank() {
        let config = GridConfig::default();
        let tiles = TileCoordinator::from_config(&config);
        let f = frame(TileRange::new(-3, -3, 3, 3), ViewportRect::new(0.0, 0.0, 256.0, 256.0));
        let mut canvas = TileCanvas::new(256, 1.0);
        let font = FixedAdvanceFont::for_font(&config.labels.font);

        draw_label_tile(&mut canvas, TileCoord::new(1, 1, 0), &f, &tiles, &config, &font);
        assert_eq!(canvas.texts().count(), 0);
        assert_eq!(canvas.commands().len(), 1);
    }

    #[test]
    fn test_origin_label_position() {
        let config = GridConfig::default();
        let tiles = TileCoordinator::from_config(&config);
        // Only the origin tile is in view, far from the container edges.
        let f = LabelFrame {
            range: TileRange::new(-1, 0, -1, 0),
            map_viewport: ViewportRect::new(-1000.0, -1000.0, 3000.0, 3000.0),
            tile_viewport: ViewportRect::new(0.0, 0.0, 256.0, 256.0),
        };
        let mut canvas = TileCanvas::new(256, 1.0);
        let font = FixedAdvanceFont::for_font(&config.labels.font);
        draw_label_tile(&mut canvas, TileCoord::new(-1, 0, 0), &f, &tiles, &config, &font);

        let zeros: Vec<_> = canvas.texts().filter(|(text, _, _)| *text == "0").collect();
        assert_eq!(zeros.len(), 1);
        let (_, position, fill) = zeros[0];
        let m = font.measure("0");
        // Origin is the tile's top-right corner: (256.5, 0.5).
        assert!((position.x - (256.5 - m.right - 4.0)).abs() < 1e-9);
        assert!((position.y - (0.5 + m.ascent + 4.0)).abs() < 1e-9);
        assert_eq!(fill, config.style.label);
    }

    #[test]
    fn test_labels_for_huge_columns() {
        let config = GridConfig::default();
        let tiles = TileCoordinator::from_config(&config);
        let f = frame(TileRange::new(-3, -3, 3, 3), ViewportRect::new(0.0, 0.0, 256.0, 256.0));
        let mut canvas = TileCanvas::new(256, 1.0);
        let font = FixedAdvanceFont::for_font(&config.labels.font);

        // Tile spans world x in [2048, 2048 + 2^-50]; its left edge is a major tick.
        draw_label_tile(&mut canvas, TileCoord::new(1 << 61, 0, 50), &f, &tiles, &config, &font);
        let texts: Vec<&str> = canvas.texts().map(|(text, _, _)| text).collect();
        assert!(texts.contains(&"2048"), "{texts:?}");
    }
}
