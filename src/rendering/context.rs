use crate::core::{
    config::{Color, LabelFont},
    geo::Point,
};
use image::{Rgba, RgbaImage};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Stroke style for paths
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// Outline stroked beneath label text, with round joins.
#[derive(Debug, Clone, PartialEq)]
pub struct Halo {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

impl LineSegment {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

/// Commands recorded on a tile surface, in CSS pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Reset the whole surface to transparent.
    Clear,
    FillRect {
        min: Point,
        max: Point,
        color: Color,
    },
    /// One stroke over many segments, like a single canvas path.
    StrokePath {
        segments: Vec<LineSegment>,
        stroke: Stroke,
    },
    /// Text anchored at its alphabetic baseline origin.
    Text {
        text: String,
        position: Point,
        font: LabelFont,
        fill: Color,
        halo: Option<Halo>,
    },
}

/// Drawing surface of one tile.
///
/// Commands are kept in CSS pixels; the device pixel ratio only matters when
/// the surface is rasterized.
#[derive(Debug, Clone, PartialEq)]
pub struct TileCanvas {
    size: u32,
    pixel_ratio: f64,
    drawing_queue: Vec<DrawCommand>,
}

/// A tile surface shared between the host and the layer that draws it.
pub type SharedCanvas = Arc<Mutex<TileCanvas>>;

/// Locks a shared canvas. A panic in another drawer leaves only a partially
/// recorded queue behind, so a poisoned lock is still usable.
pub fn lock_canvas(canvas: &SharedCanvas) -> MutexGuard<'_, TileCanvas> {
    canvas.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TileCanvas {
    pub fn new(size: u32, pixel_ratio: f64) -> Self {
        Self {
            size,
            pixel_ratio,
            drawing_queue: Vec::new(),
        }
    }

    pub fn shared(size: u32, pixel_ratio: f64) -> SharedCanvas {
        Arc::new(Mutex::new(Self::new(size, pixel_ratio)))
    }

    /// Size in CSS pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Size of the backing store in device pixels.
    pub fn device_size(&self) -> u32 {
        (f64::from(self.size) * self.pixel_ratio).round() as u32
    }

    /// Drops everything drawn so far.
    pub fn clear(&mut self) {
        self.drawing_queue.clear();
        self.drawing_queue.push(DrawCommand::Clear);
    }

    pub fn fill_rect(&mut self, min: Point, max: Point, color: Color) {
        self.drawing_queue.push(DrawCommand::FillRect { min, max, color });
    }

    pub fn stroke_path(&mut self, segments: Vec<LineSegment>, stroke: Stroke) {
        if segments.is_empty() {
            return;
        }
        self.drawing_queue
            .push(DrawCommand::StrokePath { segments, stroke });
    }

    pub fn fill_text(
        &mut self,
        text: String,
        position: Point,
        font: &LabelFont,
        fill: Color,
        halo: Option<Halo>,
    ) {
        self.drawing_queue.push(DrawCommand::Text {
            text,
            position,
            font: font.clone(),
            fill,
            halo,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    /// Text commands as `(text, position, fill)`.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Point, Color)> + '_ {
        self.drawing_queue.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text {
                text,
                position,
                fill,
                ..
            } => Some((text.as_str(), *position, *fill)),
            _ => None,
        })
    }

    /// Rasterizes fills and axis-aligned strokes into device pixels.
    ///
    /// Text is left to the host's glyph renderer and diagonal segments are
    /// not supported; the grid never produces either here.
    pub fn rasterize(&self) -> RgbaImage {
        let device = self.device_size();
        let mut image = RgbaImage::new(device, device);
        let ratio = self.pixel_ratio;

        for command in &self.drawing_queue {
            match command {
                DrawCommand::Clear => {
                    for pixel in image.pixels_mut() {
                        *pixel = Color::TRANSPARENT.into();
                    }
                }
                DrawCommand::FillRect { min, max, color } => {
                    let cols = pixel_span(min.x * ratio, max.x * ratio, device);
                    let rows = pixel_span(min.y * ratio, max.y * ratio, device);
                    fill_block(&mut image, cols, rows, *color);
                }
                DrawCommand::StrokePath { segments, stroke } => {
                    let half = stroke.width * ratio / 2.0;
                    for segment in segments {
                        let (from, to) = (segment.from, segment.to);
                        let (cols, rows) = if from.x == to.x {
                            let x = from.x * ratio;
                            let (y0, y1) = ordered(from.y * ratio, to.y * ratio);
                            (pixel_span(x - half, x + half, device), pixel_span(y0, y1, device))
                        } else if from.y == to.y {
                            let y = from.y * ratio;
                            let (x0, x1) = ordered(from.x * ratio, to.x * ratio);
                            (pixel_span(x0, x1, device), pixel_span(y - half, y + half, device))
                        } else {
                            continue;
                        };
                        fill_block(&mut image, cols, rows, stroke.color);
                    }
                }
                DrawCommand::Text { .. } => {}
            }
        }

        image
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Device pixels whose centers fall in `[lo, hi)`, clipped to the surface.
fn pixel_span(lo: f64, hi: f64, device: u32) -> std::ops::Range<u32> {
    let first = (lo - 0.5).ceil().max(0.0);
    let end = (hi - 0.5).ceil().min(f64::from(device));
    if end <= first {
        return 0..0;
    }
    first as u32..end as u32
}

fn fill_block(
    image: &mut RgbaImage,
    cols: std::ops::Range<u32>,
    rows: std::ops::Range<u32>,
    color: Color,
) {
    for y in rows {
        for x in cols.clone() {
            let dst = image.get_pixel_mut(x, y);
            *dst = blend(*dst, color);
        }
    }
}

/// Source-over compositing of `src` onto `dst`.
fn blend(dst: Rgba<u8>, src: Color) -> Rgba<u8> {
    if src.a == 255 {
        return src.into();
    }
    let alpha = f64::from(src.a) / 255.0;
    let mix = |s: u8, d: u8| (f64::from(s) * alpha + f64::from(d) * (1.0 - alpha)).round() as u8;
    let out_alpha = alpha + f64::from(dst[3]) / 255.0 * (1.0 - alpha);
    Rgba([
        mix(src.r, dst[0]),
        mix(src.g, dst[1]),
        mix(src.b, dst[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(color: Color) -> Stroke {
        Stroke { color, width: 1.0 }
    }

    #[test]
    fn test_clear_resets_queue() {
        let mut canvas = TileCanvas::new(256, 1.0);
        canvas.fill_rect(Point::new(0.0, 0.0), Point::new(256.0, 256.0), Color::WHITE);
        canvas.clear();
        assert_eq!(canvas.commands(), &[DrawCommand::Clear]);
    }

    #[test]
    fn test_clear_rasterizes_transparent() {
        let mut canvas = TileCanvas::new(2, 1.0);
        canvas.fill_rect(Point::new(0.0, 0.0), Point::new(2.0, 2.0), Color::WHITE);
        canvas.clear();
        assert_eq!(canvas.rasterize().get_pixel(1, 1), &Rgba::from(Color::TRANSPARENT));
    }

    #[test]
    fn test_empty_paths_are_not_recorded() {
        let mut canvas = TileCanvas::new(256, 1.0);
        canvas.stroke_path(Vec::new(), stroke(Color::BLACK));
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn test_half_pixel_line_is_crisp() {
        let mut canvas = TileCanvas::new(8, 1.0);
        canvas.stroke_path(
            vec![LineSegment::new(Point::new(2.5, 0.0), Point::new(2.5, 8.0))],
            stroke(Color::BLACK),
        );
        let image = canvas.rasterize();
        for y in 0..8 {
            assert_eq!(image.get_pixel(2, y), &Rgba([0, 0, 0, 255]));
            assert_eq!(image.get_pixel(1, y)[3], 0);
            assert_eq!(image.get_pixel(3, y)[3], 0);
        }
    }

    #[test]
    fn test_retina_scales_line_width() {
        let mut canvas = TileCanvas::new(8, 2.0);
        assert_eq!(canvas.device_size(), 16);
        canvas.stroke_path(
            vec![LineSegment::new(Point::new(0.0, 0.5), Point::new(8.0, 0.5))],
            stroke(Color::BLACK),
        );
        let image = canvas.rasterize();
        assert_eq!(image.get_pixel(5, 0)[3], 255);
        assert_eq!(image.get_pixel(5, 1)[3], 255);
        assert_eq!(image.get_pixel(5, 2)[3], 0);
    }

    #[test]
    fn test_later_commands_overdraw() {
        let mut canvas = TileCanvas::new(4, 1.0);
        canvas.fill_rect(Point::new(0.0, 0.0), Point::new(4.0, 4.0), Color::WHITE);
        let line = vec![LineSegment::new(Point::new(1.5, 0.0), Point::new(1.5, 4.0))];
        canvas.stroke_path(line.clone(), stroke(Color::rgb(0xe0, 0xe0, 0xe0)));
        canvas.stroke_path(line, stroke(Color::BLACK));
        let image = canvas.rasterize();
        assert_eq!(image.get_pixel(1, 1), &Rgba([0, 0, 0, 255]));
        assert_eq!(image.get_pixel(0, 1), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_translucent_fill_blends() {
        let mut canvas = TileCanvas::new(2, 1.0);
        canvas.fill_rect(Point::new(0.0, 0.0), Point::new(2.0, 2.0), Color::WHITE);
        canvas.fill_rect(Point::new(0.0, 0.0), Point::new(2.0, 2.0), Color::new(0, 0, 0, 128));
        let pixel = canvas.rasterize().get_pixel(0, 0).0;
        assert!(pixel[0] > 100 && pixel[0] < 160);
        assert_eq!(pixel[3], 255);
    }
}
