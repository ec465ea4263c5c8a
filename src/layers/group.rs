use crate::{
    core::{config::GridConfig, geo::TileCoord},
    layers::{grid::StaticGridLayer, labels::GridLabelsLayer},
    rendering::text::FontCache,
    traits::{FontSource, GridTileLayer, MapHost, TileOutcome},
    Result,
};
use std::sync::Arc;

/// Both surfaces produced for one tile address.
#[derive(Debug, Clone)]
pub struct OverlayTile {
    pub grid: TileOutcome,
    pub labels: TileOutcome,
}

/// The full grid overlay: gridlines underneath, tick labels on top.
#[derive(Debug)]
pub struct GridOverlay {
    grid: Arc<StaticGridLayer>,
    labels: Arc<GridLabelsLayer>,
}

impl GridOverlay {
    pub fn new(
        config: GridConfig,
        host: Arc<dyn MapHost>,
        fonts: Arc<dyn FontSource>,
    ) -> Result<Self> {
        config.validate()?;
        let font_cache = Arc::new(FontCache::new(fonts, &config.labels));
        Ok(Self {
            grid: Arc::new(StaticGridLayer::new(config.clone())),
            labels: Arc::new(GridLabelsLayer::new(config, host, font_cache)),
        })
    }

    pub fn grid_layer(&self) -> &Arc<StaticGridLayer> {
        &self.grid
    }

    pub fn labels_layer(&self) -> &Arc<GridLabelsLayer> {
        &self.labels
    }

    /// Both layers, bottom first.
    pub fn layers(&self) -> Vec<Arc<dyn GridTileLayer>> {
        let mut layers: Vec<Arc<dyn GridTileLayer>> = vec![self.labels.clone(), self.grid.clone()];
        layers.sort_by_key(|layer| layer.properties().z_index);
        layers
    }

    pub fn attach(&self) {
        self.labels.attach();
    }

    pub fn detach(&self) {
        self.labels.detach();
    }

    pub async fn create_tile(&self, coord: TileCoord) -> OverlayTile {
        let (grid, labels) = futures::join!(
            self.grid.create_tile(coord),
            self.labels.create_tile(coord)
        );
        OverlayTile { grid, labels }
    }

    pub fn remove_tile(&self, coord: TileCoord) {
        self.grid.remove_tile(coord);
        self.labels.remove_tile(coord);
    }

    pub fn set_current_zoom(&self, zoom: i32) {
        self.grid.set_current_zoom(zoom);
        self.labels.set_current_zoom(zoom);
    }
}
