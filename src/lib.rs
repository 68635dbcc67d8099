#![warn(missing_docs)]

//! TMX map loading, tile-layer geometry and collision queries for Macroquad.

mod animator;
mod config;
mod error;
mod layer;
mod loader {
    pub mod tmx_loader;
}
mod map;
/// Macroquad drawing for loaded maps.
pub mod render {
    /// Batched layer meshes and the collision debug overlay.
    pub mod mesh;
}
mod spatial {
    pub mod index;
}
mod tileset;

pub use animator::LayerAnimator;
pub use config::{AnimatedLayer, MapConfig};
pub use error::{ErrorKind, MapError};
pub use layer::{Quad, TileGeometry, TileLayer};
pub use loader::tmx_loader::{
    load_collision_geometry, load_layers, parse_tile_grid, LayerGrid, MapDocument,
};
pub use map::Map;
pub use spatial::index::{overlaps_strict, CollisionIndex, CollisionObject};
pub use tileset::Tileset;
