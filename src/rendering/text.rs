//! Text metrics and the process-wide label font.

use crate::{
    core::config::{LabelConfig, LabelFont},
    traits::{FontSource, TextMeasure},
    GridError, Result,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Actual bounding box of a piece of text relative to its anchor, all
/// distances positive in their named direction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub left: f64,
    pub right: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl TextMetrics {
    pub fn width(&self) -> f64 {
        self.left + self.right
    }

    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// Metrics of a font where every character has the same advance.
///
/// This is the fallback when the real label font cannot be loaded, and a
/// deterministic stand-in for tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceFont {
    pub advance: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl FixedAdvanceFont {
    pub fn for_font(font: &LabelFont) -> Self {
        Self {
            advance: 0.6 * font.size_px,
            ascent: 0.72 * font.size_px,
            descent: 0.0,
        }
    }
}

impl TextMeasure for FixedAdvanceFont {
    fn measure(&self, text: &str) -> TextMetrics {
        TextMetrics {
            left: 0.0,
            right: self.advance * text.chars().count() as f64,
            ascent: self.ascent,
            descent: self.descent,
        }
    }
}

/// A font source that is always ready with [`FixedAdvanceFont`] metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackFontSource;

#[async_trait]
impl FontSource for FallbackFontSource {
    async fn load(&self, font: &LabelFont) -> Result<Arc<dyn TextMeasure>> {
        Ok(Arc::new(FixedAdvanceFont::for_font(font)))
    }
}

/// Loads the label font once and shares its metrics with every tile.
///
/// A failed load falls back to [`FixedAdvanceFont`]. Inside a tokio runtime
/// so does a load that outlasts the configured timeout.
pub struct FontCache {
    source: Arc<dyn FontSource>,
    font: LabelFont,
    timeout: Duration,
    metrics: OnceCell<Arc<dyn TextMeasure>>,
}

impl FontCache {
    pub fn new(source: Arc<dyn FontSource>, config: &LabelConfig) -> Self {
        Self {
            source,
            font: config.font.clone(),
            timeout: config.font_load_timeout(),
            metrics: OnceCell::new(),
        }
    }

    pub fn font(&self) -> &LabelFont {
        &self.font
    }

    /// Metrics of the label font, waiting for it to load on first use.
    pub async fn ready(&self) -> Arc<dyn TextMeasure> {
        self.metrics
            .get_or_init(|| async {
                let load = self.source.load(&self.font);
                // The timer needs a tokio runtime; plain executors wait for the source.
                let loaded = if tokio::runtime::Handle::try_current().is_ok() {
                    match tokio::time::timeout(self.timeout, load).await {
                        Ok(result) => result,
                        Err(_) => Err(GridError::FontTimeout(self.timeout)),
                    }
                } else {
                    log::debug!("no tokio runtime, loading {} without a timeout", self.font.css());
                    load.await
                };
                match loaded {
                    Ok(metrics) => {
                        log::debug!("label font {} ready", self.font.css());
                        metrics
                    }
                    Err(e) => {
                        log::warn!("label font {} unavailable ({}), using fallback metrics", self.font.css(), e);
                        Arc::new(FixedAdvanceFont::for_font(&self.font)) as Arc<dyn TextMeasure>
                    }
                }
            })
            .await
            .clone()
    }

    /// Metrics if the font has already been resolved.
    pub fn get(&self) -> Option<Arc<dyn TextMeasure>> {
        self.metrics.get().cloned()
    }
}

impl std::fmt::Debug for FontCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCache")
            .field("font", &self.font)
            .field("timeout", &self.timeout)
            .field("ready", &self.metrics.initialized())
            .finish()
    }
}
