#[macro_use]
pub mod macros;

pub mod base;
pub mod grid;
pub mod group;
pub mod labels;
pub mod registry;

// Re-export main types
pub use grid::StaticGridLayer;
pub use group::{GridOverlay, OverlayTile};
pub use labels::GridLabelsLayer;
pub use registry::{TileRegistry, TileState};
