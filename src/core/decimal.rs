//! Exact decimal world coordinates.
//!
//! World positions are kept as 256-bit decimals so that grid lines do not
//! drift across dozens of zoom levels. Native `f64` only appears at the very
//! end, once a coordinate has been mapped to a pixel.

use fastnum::decimal::D256;
use num_traits::{Float, One, ToPrimitive, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A point on one axis of the unbounded Cartesian plane.
///
/// Scaling by powers of two (tile widths) and by `{1, 2, 5} × 10^e` (grid
/// intervals) is exact as long as the result fits in ~76 significant digits.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct WorldCoord(D256);

impl WorldCoord {
    pub fn zero() -> Self {
        Self(<D256 as Zero>::zero())
    }

    pub fn one() -> Self {
        Self(<D256 as One>::one())
    }

    pub fn from_int(value: i64) -> Self {
        Self(D256::from(value))
    }

    pub fn from_i128(value: i128) -> Self {
        Self(D256::from(value))
    }

    /// `numerator / denominator`, e.g. `ratio(1, 2)` for a half pixel.
    pub fn ratio(numerator: i64, denominator: i64) -> Self {
        Self::from_int(numerator) / Self::from_int(denominator)
    }

    /// Exact `2^exp`. Negative exponents halve repeatedly, which never
    /// rounds in decimal.
    pub fn pow2(exp: i32) -> Self {
        Self::scaled(exp, 2)
    }

    /// Exact `10^exp`.
    pub fn pow10(exp: i32) -> Self {
        Self::scaled(exp, 10)
    }

    fn scaled(exp: i32, base: i64) -> Self {
        let base = Self::from_int(base);
        let mut value = Self::one();
        for _ in 0..exp.unsigned_abs() {
            value = if exp >= 0 { value * base } else { value / base };
        }
        value
    }

    pub fn floor(self) -> Self {
        Self(Float::floor(self.0))
    }

    pub fn ceil(self) -> Self {
        Self(Float::ceil(self.0))
    }

    /// Multiplicative inverse. Callers guarantee a non-zero value.
    pub fn recip(self) -> Self {
        Self::one() / self
    }

    pub fn is_zero(&self) -> bool {
        Zero::is_zero(&self.0)
    }

    /// Nearest `f64`; `NaN` if the value cannot be represented at all.
    pub fn to_f64(self) -> f64 {
        ToPrimitive::to_f64(&self.0).unwrap_or(f64::NAN)
    }

    /// The value as an integer, if it is integral and fits.
    pub fn to_i64(self) -> Option<i64> {
        if Float::fract(self.0) != <D256 as Zero>::zero() {
            return None;
        }
        ToPrimitive::to_i64(&self.0)
    }

    /// Like [`to_i64`](Self::to_i64) with room for grid indices past the
    /// `i64` tile columns they are derived from.
    pub fn to_i128(self) -> Option<i128> {
        if Float::fract(self.0) != <D256 as Zero>::zero() {
            return None;
        }
        ToPrimitive::to_i128(&self.0)
    }
}

impl Default for WorldCoord {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for WorldCoord {
    fn from(value: i64) -> Self {
        Self::from_int(value)
    }
}

impl Add for WorldCoord {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for WorldCoord {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for WorldCoord {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Div for WorldCoord {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self(self.0 / rhs.0)
    }
}

impl Neg for WorldCoord {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for WorldCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for WorldCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WorldCoord({})", self.0)
    }
}
