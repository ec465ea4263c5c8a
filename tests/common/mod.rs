#![allow(dead_code)]

use async_trait::async_trait;
use gridlet::prelude::*;
use gridlet::rendering::text::FixedAdvanceFont;
use std::sync::Mutex;
use tokio::sync::Notify;

/// A map view whose container sits at the screen origin and whose top-left
/// corner shows global pixel `origin`.
pub struct TestHost {
    tile_size: f64,
    width: f64,
    height: f64,
    origin: Mutex<Point>,
    events: MoveEvents,
}

impl TestHost {
    pub fn new(origin: Point, width: f64, height: f64) -> Arc<Self> {
        Arc::new(Self {
            tile_size: 256.0,
            width,
            height,
            origin: Mutex::new(origin),
            events: MoveEvents::new(),
        })
    }

    /// 512×512 view centered on the world origin.
    pub fn centered() -> Arc<Self> {
        Self::new(Point::new(-256.0, -256.0), 512.0, 512.0)
    }

    pub fn origin(&self) -> Point {
        *self.origin.lock().unwrap()
    }

    /// Moves the view and notifies listeners.
    pub fn pan_to(&self, origin: Point) {
        *self.origin.lock().unwrap() = origin;
        self.events.emit();
    }

    pub fn visible_tiles(&self, z: i32) -> Vec<TileCoord> {
        TileCoordinator::default()
            .visible_tile_range(&self.pixel_bounds())
            .coords(z)
            .collect()
    }
}

impl MapHost for TestHost {
    fn pixel_bounds(&self) -> PixelBounds {
        let origin = self.origin();
        PixelBounds::new(origin, Point::new(origin.x + self.width, origin.y + self.height))
    }

    fn container_rect(&self) -> ViewportRect {
        ViewportRect::new(0.0, 0.0, self.width, self.height)
    }

    fn tile_rect(&self, coord: TileCoord) -> ViewportRect {
        let origin = self.origin();
        ViewportRect::new(
            coord.x as f64 * self.tile_size - origin.x,
            coord.y as f64 * self.tile_size - origin.y,
            self.tile_size,
            self.tile_size,
        )
    }

    fn move_events(&self) -> &MoveEvents {
        &self.events
    }
}

/// Font source that only finishes loading once opened.
#[derive(Default)]
pub struct GatedFontSource {
    gate: Notify,
}

impl GatedFontSource {
    pub fn open(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl FontSource for GatedFontSource {
    async fn load(&self, font: &LabelFont) -> Result<Arc<dyn TextMeasure>> {
        self.gate.notified().await;
        Ok(Arc::new(FixedAdvanceFont::for_font(font)))
    }
}

pub struct FailingFontSource;

#[async_trait]
impl FontSource for FailingFontSource {
    async fn load(&self, font: &LabelFont) -> Result<Arc<dyn TextMeasure>> {
        Err(GridError::FontLoad(format!("{} is not installed", font.family)))
    }
}

pub struct StalledFontSource;

#[async_trait]
impl FontSource for StalledFontSource {
    async fn load(&self, _font: &LabelFont) -> Result<Arc<dyn TextMeasure>> {
        futures::future::pending().await
    }
}

pub fn overlay(host: Arc<TestHost>) -> GridOverlay {
    overlay_with_fonts(host, Arc::new(FallbackFontSource))
}

pub fn overlay_with_fonts(host: Arc<TestHost>, fonts: Arc<dyn FontSource>) -> GridOverlay {
    gridlet::init_logging();
    let overlay = GridOverlay::new(GridConfig::default(), host, fonts).expect("default config is valid");
    overlay.attach();
    overlay
}

/// Text commands of a surface as owned `(text, position, fill)`.
pub fn texts(canvas: &SharedCanvas) -> Vec<(String, Point, Color)> {
    canvas
        .lock()
        .unwrap()
        .texts()
        .map(|(text, position, fill)| (text.to_string(), position, fill))
        .collect()
}

pub fn commands(canvas: &SharedCanvas) -> Vec<DrawCommand> {
    canvas.lock().unwrap().commands().to_vec()
}
