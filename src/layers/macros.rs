//! Macros to reduce boilerplate in layer implementations
//!
//! Both grid layers keep their identity in a `LayerProperties` field and their
//! tiles in a `TileRegistry` field; the registry-facing half of
//! `GridTileLayer` is identical for them.

/// Generates `properties`, `surface`, `remove_tile` and `set_current_zoom`
/// for a layer struct.
///
/// Usage:
/// ```ignore
/// impl GridTileLayer for MyLayer {
///     crate::impl_registry_layer!(properties, registry);
///     async fn create_tile(&self, coord: TileCoord) -> TileOutcome { ... }
/// }
/// ```
#[macro_export]
macro_rules! impl_registry_layer {
    ($properties_field:ident, $registry_field:ident) => {
        fn properties(&self) -> &$crate::layers::base::LayerProperties {
            &self.$properties_field
        }

        fn surface(
            &self,
            coord: $crate::core::geo::TileCoord,
        ) -> Option<$crate::rendering::context::SharedCanvas> {
            self.$registry_field.canvas(coord)
        }

        fn remove_tile(&self, coord: $crate::core::geo::TileCoord) {
            if self.$registry_field.remove(coord) {
                log::trace!("{}: evicted tile {}", self.$properties_field.id, coord);
            }
        }

        fn set_current_zoom(&self, zoom: i32) {
            self.$registry_field.set_current_zoom(zoom);
        }
    };
}
