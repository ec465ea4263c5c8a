//! Adaptive "nice number" grid spacing.
//!
//! Intervals walk the 1-2-5 progression: `1·10^e, 2·10^e, 5·10^e, 1·10^(e+1)`.
//! Each step of that sequence is a *level*; the minor interval is the first
//! level whose on-screen spacing reaches the density threshold, and the major
//! interval sits two levels above it.

use crate::core::decimal::WorldCoord;
use once_cell::sync::OnceCell;

const MANTISSAS: [u8; 3] = [1, 2, 5];

/// Grid spacing `mantissa × 10^exponent` with `mantissa ∈ {1, 2, 5}`.
#[derive(Debug, Clone)]
pub struct GridInterval {
    mantissa: u8,
    exponent: i32,
    value: OnceCell<WorldCoord>,
    inverse: OnceCell<WorldCoord>,
}

impl GridInterval {
    pub fn new(mantissa: u8, exponent: i32) -> Self {
        debug_assert!(
            MANTISSAS.contains(&mantissa),
            "grid mantissa must be 1, 2 or 5, got {mantissa}"
        );
        Self {
            mantissa,
            exponent,
            value: OnceCell::new(),
            inverse: OnceCell::new(),
        }
    }

    /// The interval at position `level` of the 1-2-5 progression, where
    /// level 0 is `1` and level 3 is `10`.
    pub fn from_level(level: i32) -> Self {
        let exponent = level.div_euclid(3);
        let mantissa = MANTISSAS[level.rem_euclid(3) as usize];
        Self::new(mantissa, exponent)
    }

    pub fn level(&self) -> i32 {
        let position = MANTISSAS
            .iter()
            .position(|&m| m == self.mantissa)
            .unwrap_or_default() as i32;
        3 * self.exponent + position
    }

    pub fn mantissa(&self) -> u8 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// The exact spacing in world units.
    pub fn value(&self) -> WorldCoord {
        *self.value.get_or_init(|| {
            WorldCoord::from_int(i64::from(self.mantissa)) * WorldCoord::pow10(self.exponent)
        })
    }

    /// The exact reciprocal of [`value`](Self::value).
    pub fn inverse(&self) -> WorldCoord {
        *self.inverse.get_or_init(|| {
            WorldCoord::from_int(i64::from(self.mantissa)).recip()
                * WorldCoord::pow10(-self.exponent)
        })
    }

    /// Approximate spacing, good enough for density comparisons.
    pub fn value_f64(&self) -> f64 {
        f64::from(self.mantissa) * 10f64.powi(self.exponent)
    }

    /// Inclusive range of multiples of this interval covering `[start, end]`,
    /// padded by one index on each side so lines straddling the edges survive
    /// rounding.
    ///
    /// Indices are `i128`: a tile spans at most about 13 intervals, so any
    /// `i64` tile column maps to an index well inside that range.
    pub fn index_bounds(&self, start: WorldCoord, end: WorldCoord) -> (i128, i128) {
        let inverse = self.inverse();
        let one = WorldCoord::one();
        let min = (start * inverse).ceil() - one;
        let max = (end * inverse).floor() + one;
        let min = min.to_i128().expect("grid index below i128 range");
        let max = max.to_i128().expect("grid index above i128 range");
        (min, max)
    }

    /// Every multiple of this interval in the padded range over `[start, end]`.
    pub fn ticks(&self, start: WorldCoord, end: WorldCoord) -> TickIter {
        let (next, last) = self.index_bounds(start, end);
        TickIter {
            step: self.value(),
            next,
            last,
        }
    }
}

impl PartialEq for GridInterval {
    fn eq(&self, other: &Self) -> bool {
        self.mantissa == other.mantissa && self.exponent == other.exponent
    }
}

impl Eq for GridInterval {}

/// One multiple of a grid interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub index: i128,
    pub value: WorldCoord,
}

/// Iterator over the ticks of a [`GridInterval`] within a world range.
pub struct TickIter {
    step: WorldCoord,
    next: i128,
    last: i128,
}

impl Iterator for TickIter {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.next > self.last {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(Tick {
            index,
            value: WorldCoord::from_i128(index) * self.step,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.last - self.next + 1).max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TickIter {}

/// Returns `(major, minor)` grid intervals for a pixel that is
/// `pixel_width` world units wide.
///
/// `max_density` is the minimum on-screen spacing of minor lines in pixels.
pub fn grid_intervals(pixel_width: f64, max_density: f64) -> (GridInterval, GridInterval) {
    debug_assert!(
        pixel_width > 0.0 && pixel_width.is_finite(),
        "pixel width must be positive and finite, got {pixel_width}"
    );

    // Start roughly a decade below the answer; the scan then takes a few steps.
    let exponent = (pixel_width * max_density).log10().floor() as i32 - 1;
    let mut level = 3 * exponent;
    loop {
        let minor = GridInterval::from_level(level);
        if minor.value_f64() / pixel_width >= max_density {
            return (GridInterval::from_level(level + 2), minor);
        }
        level += 1;
    }
}
