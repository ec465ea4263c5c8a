//! Configuration for the grid overlay
//!
//! Everything that used to be ambient global state (device pixel ratio, label
//! font, colors) is carried explicitly in a [`GridConfig`], so rendering is
//! deterministic and testable without a live display. Colors come from a
//! [`GridTheme`] preset or a fully custom [`GridStyle`].

use crate::core::constants::*;
use crate::{GridError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Serializable RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| GridError::InvalidConfig(format!("bad color {hex:?}")))
        };
        match digits.len() {
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(GridError::InvalidConfig(format!("bad color {hex:?}"))),
        }
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba([color.r, color.g, color.b, color.a])
    }
}

/// Colors and stroke widths of the grid and its labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridStyle {
    pub background: Color,
    pub minor_line: Color,
    pub major_line: Color,
    pub axis: Color,
    pub line_width: f64,
    pub label: Color,
    /// Used for labels whose true position is off-screen.
    pub label_muted: Color,
    pub label_halo: Color,
}

impl Default for GridStyle {
    fn default() -> Self {
        GridTheme::default().resolve()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GridTheme {
    #[default]
    Light,
    Dark,
    Custom(GridStyle),
}

impl GridTheme {
    pub fn resolve(&self) -> GridStyle {
        match self {
            Self::Light => GridStyle {
                background: Color::WHITE,
                minor_line: Color::rgb(0xe0, 0xe0, 0xe0),
                major_line: Color::rgb(0xc0, 0xc0, 0xc0),
                axis: Color::BLACK,
                line_width: 1.0,
                label: Color::BLACK,
                label_muted: Color::GRAY,
                label_halo: Color::WHITE,
            },
            Self::Dark => GridStyle {
                background: Color::rgb(0x12, 0x12, 0x12),
                minor_line: Color::rgb(0x2a, 0x2a, 0x2a),
                major_line: Color::rgb(0x48, 0x48, 0x48),
                axis: Color::rgb(0xf0, 0xf0, 0xf0),
                line_width: 1.0,
                label: Color::rgb(0xf0, 0xf0, 0xf0),
                label_muted: Color::rgb(0x90, 0x90, 0x90),
                label_halo: Color::rgb(0x12, 0x12, 0x12),
            },
            Self::Custom(style) => style.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelFont {
    pub family: String,
    pub size_px: f64,
}

impl LabelFont {
    /// CSS shorthand, e.g. `14px 'Noto Sans'`.
    pub fn css(&self) -> String {
        format!("{}px '{}'", self.size_px, self.family)
    }
}

impl Default for LabelFont {
    fn default() -> Self {
        Self {
            family: LABEL_FONT_FAMILY.to_string(),
            size_px: LABEL_FONT_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub font: LabelFont,
    /// Distance between the axes and tick labels.
    pub offset: f64,
    /// Distance between the map boundary and tick labels.
    pub padding: f64,
    pub halo_width: f64,
    pub exponential_at: i32,
    pub font_load_timeout_ms: u64,
}

impl LabelConfig {
    pub fn font_load_timeout(&self) -> Duration {
        Duration::from_millis(self.font_load_timeout_ms)
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font: LabelFont::default(),
            offset: LABEL_OFFSET,
            padding: LABEL_PADDING,
            halo_width: LABEL_HALO_WIDTH,
            exponential_at: EXPONENTIAL_AT,
            font_load_timeout_ms: FONT_LOAD_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub tile_size: u32,
    pub base_zoom: i32,
    pub device_pixel_ratio: f64,
    pub max_density: f64,
    pub style: GridStyle,
    pub labels: LabelConfig,
}

impl GridConfig {
    pub fn with_theme(theme: GridTheme) -> Self {
        Self {
            style: theme.resolve(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(GridError::InvalidConfig("tile_size must be positive".into()));
        }
        if !(self.device_pixel_ratio > 0.0 && self.device_pixel_ratio.is_finite()) {
            return Err(GridError::InvalidConfig(format!(
                "device_pixel_ratio must be positive, got {}",
                self.device_pixel_ratio
            )));
        }
        if !(self.max_density > 0.0 && self.max_density.is_finite()) {
            return Err(GridError::InvalidConfig(format!(
                "max_density must be positive, got {}",
                self.max_density
            )));
        }
        if self.labels.padding < 0.0 || self.labels.offset < 0.0 {
            return Err(GridError::InvalidConfig(
                "label padding and offset must not be negative".into(),
            ));
        }
        if self.labels.font.size_px <= 0.0 {
            return Err(GridError::InvalidConfig("font size must be positive".into()));
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            base_zoom: BASE_ZOOM_LEVEL,
            device_pixel_ratio: 1.0,
            max_density: MAX_DENSITY,
            style: GridStyle::default(),
            labels: LabelConfig::default(),
        }
    }
}
