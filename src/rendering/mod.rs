pub mod context;
pub mod text;

// Re-export main types
pub use context::{DrawCommand, SharedCanvas, TileCanvas};
pub use text::{FallbackFontSource, FixedAdvanceFont, FontCache, TextMetrics};
