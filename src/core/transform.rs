//! World → pixel transforms.
//!
//! An [`AxisTransform`] is the 1-D affine map through two control points,
//! solved in exact decimal arithmetic. Only the final evaluation is rounded to
//! `f64`, because pixel output needs nothing finer.

use crate::core::decimal::WorldCoord;
use crate::core::tiling::WorldRect;

/// Maps world coordinates on one axis to pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTransform {
    /// `p1 - p0`
    a: WorldCoord,
    /// `x1·p0 - x0·p1`
    b: WorldCoord,
    /// `x1 - x0`
    d: WorldCoord,
}

impl AxisTransform {
    /// The affine map taking `src[0] → dst[0]` and `src[1] → dst[1]`.
    /// Both pairs must be distinct.
    pub fn new(src: [WorldCoord; 2], dst: [WorldCoord; 2]) -> Self {
        let [x0, x1] = src;
        let [p0, p1] = dst;
        debug_assert!(x0 != x1, "transform source points coincide");
        Self {
            a: p1 - p0,
            b: x1 * p0 - x0 * p1,
            d: x1 - x0,
        }
    }

    /// Pixel coordinate of `x`.
    pub fn apply(&self, x: WorldCoord) -> f64 {
        ((self.a * x + self.b) / self.d).to_f64()
    }

    /// [`apply`](Self::apply) for drawing. Anything non-finite here means
    /// the transform itself is broken.
    pub fn pixel(&self, x: WorldCoord) -> f64 {
        let p = self.apply(x);
        assert!(p.is_finite(), "non-finite pixel coordinate for world value {x}");
        p
    }
}

/// The pair of transforms for one tile surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileTransforms {
    pub x: AxisTransform,
    pub y: AxisTransform,
}

impl TileTransforms {
    /// Builds the transforms for a tile covering `rect` on a surface of
    /// `tile_size` CSS pixels.
    ///
    /// Both edges are inset by half a pixel so that lines on tile boundaries
    /// land on pixel centers. The y axis is inverted: world y grows north,
    /// pixel y grows down.
    pub fn for_rect(rect: &WorldRect, tile_size: u32) -> Self {
        let size = i64::from(tile_size);
        let near = WorldCoord::ratio(1, 2);
        let far = WorldCoord::ratio(2 * size + 1, 2);
        Self {
            x: AxisTransform::new([rect.x0, rect.x1], [near, far]),
            y: AxisTransform::new([rect.y0, rect.y1], [far, near]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_transform() -> AxisTransform {
        AxisTransform::new(
            [WorldCoord::zero(), WorldCoord::one()],
            [WorldCoord::zero(), WorldCoord::from_int(256)],
        )
    }

    #[test]
    #[should_panic(expected = "non-finite pixel coordinate")]
    fn test_pixel_rejects_overflow() {
        let t = AxisTransform::new(
            [WorldCoord::zero(), WorldCoord::one()],
            [WorldCoord::zero(), WorldCoord::pow10(400)],
        );
        t.pixel(WorldCoord::one());
    }

    #[test]
    fn test_pixel_matches_apply() {
        let t = unit_transform();
        let x = WorldCoord::ratio(3, 8);
        assert_eq!(t.pixel(x), t.apply(x));
    }

    #[test]
    fn test_endpoints_are_exact() {
        let t = unit_transform();
        assert_eq!(t.apply(WorldCoord::zero()), 0.0);
        assert_eq!(t.apply(WorldCoord::one()), 256.0);
        assert!((t.apply(WorldCoord::ratio(1, 2)) - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_between_endpoints() {
        let t = unit_transform();
        let mut last = f64::NEG_INFINITY;
        for i in 0..=100 {
            let p = t.apply(WorldCoord::ratio(i, 100));
            assert!(p > last);
            last = p;
        }
    }

    #[test]
    fn test_inverted_axis() {
        let t = AxisTransform::new(
            [WorldCoord::from_int(-1), WorldCoord::zero()],
            [WorldCoord::ratio(513, 2), WorldCoord::ratio(1, 2)],
        );
        assert_eq!(t.apply(WorldCoord::from_int(-1)), 256.5);
        assert_eq!(t.apply(WorldCoord::zero()), 0.5);
        assert!(t.apply(WorldCoord::ratio(-1, 4)) < t.apply(WorldCoord::ratio(-3, 4)));
    }

    #[test]
    fn test_deep_zoom_tile_is_precise() {
        // A tile 2^-70 wide, far from the origin.
        let width = WorldCoord::pow2(-70);
        let column = WorldCoord::from_int(123_456_789_012_345);
        let x0 = width * column;
        let x1 = x0 + width;
        let t = AxisTransform::new(
            [x0, x1],
            [WorldCoord::ratio(1, 2), WorldCoord::ratio(513, 2)],
        );
        assert_eq!(t.apply(x0), 0.5);
        assert_eq!(t.apply(x1), 256.5);
        let quarter = x0 + width * WorldCoord::ratio(1, 4);
        assert!((t.apply(quarter) - 64.5).abs() < 1e-9);
    }

    #[test]
    fn test_tile_transforms_inset() {
        let rect = WorldRect {
            x0: WorldCoord::zero(),
            x1: WorldCoord::one(),
            y0: WorldCoord::from_int(-1),
            y1: WorldCoord::zero(),
        };
        let t = TileTransforms::for_rect(&rect, 256);
        assert_eq!(t.x.apply(WorldCoord::zero()), 0.5);
        assert_eq!(t.x.apply(WorldCoord::one()), 256.5);
        assert_eq!(t.y.apply(WorldCoord::zero()), 0.5);
        assert_eq!(t.y.apply(WorldCoord::from_int(-1)), 256.5);
    }
}
