//! Engine-wide defaults for the grid overlay.
//! Keeping them in a single place makes it easier to tweak the magic numbers;
//! every one of them can be overridden through [`GridConfig`](crate::core::config::GridConfig).

/// Default square tile size in CSS pixels.
pub const TILE_SIZE: u32 = 256;

/// Zoom level at which one tile spans exactly one world unit.
pub const BASE_ZOOM_LEVEL: i32 = 0;

/// Minimum on-screen spacing of minor grid lines, in pixels.
pub const MAX_DENSITY: f64 = 20.0;

/// Distance between an axis and its tick labels.
pub const LABEL_OFFSET: f64 = 4.0;

/// Distance between the map boundary and clamped tick labels.
pub const LABEL_PADDING: f64 = 4.0;

/// Width of the halo stroked under every label.
pub const LABEL_HALO_WIDTH: f64 = 3.0;

/// Default label font family and size.
pub const LABEL_FONT_FAMILY: &str = "Noto Sans";
pub const LABEL_FONT_SIZE: f64 = 14.0;

/// Labels switch to exponential notation at `10^±EXPONENTIAL_AT`.
pub const EXPONENTIAL_AT: i32 = 5;

/// Give up waiting for the label font after this long and use fallback metrics.
pub const FONT_LOAD_TIMEOUT_MS: u64 = 5_000;
