use serde::{Deserialize, Serialize};

/// Represents a point in screen or pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Tile address. Columns grow eastward and rows grow southward; both may be
/// negative because the plane is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i64,
    pub y: i64,
    pub z: i32,
}

impl TileCoord {
    pub fn new(x: i64, y: i64, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Global pixel bounds of the visible part of the map at the current zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelBounds {
    pub min: Point,
    pub max: Point,
}

impl PixelBounds {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> Point {
        self.max.subtract(&self.min)
    }
}

/// Inclusive range of tile indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRange {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl TileRange {
    pub fn new(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        coord.x >= self.min_x && coord.x <= self.max_x && coord.y >= self.min_y && coord.y <= self.max_y
    }

    /// All tiles in the range at zoom `z`, row by row.
    pub fn coords(&self, z: i32) -> impl Iterator<Item = TileCoord> + '_ {
        (self.min_y..=self.max_y)
            .flat_map(move |y| (self.min_x..=self.max_x).map(move |x| TileCoord::new(x, y, z)))
    }
}

/// A screen-space rectangle, like a DOM bounding client rect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Shrinks the rectangle by `padding` on every side.
    pub fn inset(&self, padding: f64) -> ViewportRect {
        ViewportRect::new(
            self.x + padding,
            self.y + padding,
            self.width - 2.0 * padding,
            self.height - 2.0 * padding,
        )
    }

    /// Whether `other` lies entirely inside this rectangle, with a small
    /// tolerance for floating-point noise.
    pub fn contains_rect(&self, other: &ViewportRect) -> bool {
        const EPS: f64 = 1e-9;
        other.left() >= self.left() - EPS
            && other.right() <= self.right() + EPS
            && other.top() >= self.top() - EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_rect_edges() {
        let rect = ViewportRect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.bottom(), 70.0);

        let inner = rect.inset(4.0);
        assert_eq!(inner.left(), 14.0);
        assert_eq!(inner.right(), 106.0);
        assert!(rect.contains_rect(&inner));
        assert!(!inner.contains_rect(&rect));
    }

    #[test]
    fn test_tile_range_coords() {
        let range = TileRange::new(-1, -1, 0, 0);
        let coords: Vec<TileCoord> = range.coords(3).collect();
        assert_eq!(coords.len(), 4);
        assert_eq!(coords[0], TileCoord::new(-1, -1, 3));
        assert!(range.contains(&TileCoord::new(0, -1, 3)));
        assert!(!range.contains(&TileCoord::new(1, 0, 3)));
    }

    #[test]
    fn test_tile_coord_display() {
        assert_eq!(TileCoord::new(-2, 5, 7).to_string(), "7/-2/5");
    }
}
