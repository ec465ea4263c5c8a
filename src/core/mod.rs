pub mod config;
pub mod constants;
pub mod decimal;
pub mod format;
pub mod geo;
pub mod interval;
pub mod tiling;
pub mod transform;

// Re-export main types
pub use config::{GridConfig, GridStyle, GridTheme};
pub use decimal::WorldCoord;
pub use interval::{grid_intervals, GridInterval};
pub use tiling::{TileCoordinator, WorldRect};
pub use transform::{AxisTransform, TileTransforms};
