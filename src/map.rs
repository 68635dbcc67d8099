use crate::animator::LayerAnimator;
use crate::config::MapConfig;
use crate::error::MapError;
use crate::layer::{TileGeometry, TileLayer};
use crate::loader::tmx_loader::*;
use crate::spatial::index::{CollisionIndex, CollisionObject};
use crate::tileset::Tileset;
use log::{debug, info};
use macroquad::prelude::*;
use std::path::Path;
use std::time::Duration;

/// A loaded map: layer geometry, blink animation and collision rectangles.
///
/// Built in one go by [`Map::load`] or [`Map::from_document`]; either the whole
/// map is returned or an error is.
#[derive(Debug)]
pub struct Map {
    tileset: Tileset,
    layers: Vec<TileLayer>,
    collisions: CollisionIndex,
    animator: LayerAnimator,
    scale: f32,
}

impl Map {
    /// Loads a TMX file together with the tileset sheet it is drawn from.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        map_path: P,
        tileset_image: Q,
        config: &MapConfig,
    ) -> Result<Self, MapError> {
        let map_path = map_path.as_ref();
        let tileset =
            Tileset::from_image_file(tileset_image, config.tile_width, config.tile_height)?;
        let txt = std::fs::read_to_string(map_path).map_err(|source| MapError::Io {
            path: map_path.to_path_buf(),
            source,
        })?;
        let map = Self::from_document(&txt, tileset, config)?;
        info!("loaded map {}", map_path.display());
        Ok(map)
    }

    /// Builds a map from TMX text and already-known tileset metadata.
    pub fn from_document(text: &str, tileset: Tileset, config: &MapConfig) -> Result<Self, MapError> {
        let doc = MapDocument::parse(text)?;
        let grids = load_layers(&doc)?;
        let objects = load_collision_geometry(&doc, config.scale);

        let tile_size = tileset.tile_size();
        let layers: Vec<TileLayer> = grids
            .into_iter()
            .map(|g| {
                let geometry =
                    TileGeometry::build(&g.tile_ids, g.width, g.height, tileset.columns, tile_size);
                debug!(
                    "layer '{}': {}x{} cells, {} tiles",
                    g.name,
                    g.width,
                    g.height,
                    geometry.quad_count()
                );
                TileLayer {
                    name: g.name,
                    geometry,
                    visible: g.visible,
                }
            })
            .collect();

        info!(
            "map ready: {} layers, {} collision objects",
            layers.len(),
            objects.len()
        );

        Ok(Self {
            tileset,
            layers,
            collisions: CollisionIndex::new(objects),
            animator: LayerAnimator::new(config.animated_layer, config.toggle_interval()),
            scale: config.scale,
        })
    }

    /// Advances the layer animation by one frame.
    pub fn tick(&mut self, dt: Duration) {
        self.animator.tick(dt, &mut self.layers);
    }

    /// Does the world-space `rect` overlap any collision object?
    #[inline]
    pub fn collides(&self, rect: &Rect) -> bool {
        self.collisions.query(rect)
    }

    /// All layers, back to front.
    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    /// Layers to draw this frame, back to front.
    pub fn visible_layers(&self) -> impl Iterator<Item = &TileLayer> + '_ {
        self.layers.iter().filter(|l| l.visible)
    }

    /// Collision objects in load order.
    pub fn collision_objects(&self) -> &[CollisionObject] {
        self.collisions.objects()
    }

    /// The index behind [`Map::collides`], for richer queries.
    pub fn collision_index(&self) -> &CollisionIndex {
        &self.collisions
    }

    /// Blink state of the animated layer.
    pub fn animator(&self) -> &LayerAnimator {
        &self.animator
    }

    /// Sheet metadata the layers were built with.
    pub fn tileset(&self) -> &Tileset {
        &self.tileset
    }

    /// Uniform world scale for drawing layer geometry.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Layer size in world units, taken from the first layer.
    pub fn world_size(&self) -> Vec2 {
        self.layers
            .first()
            .map(|l| {
                vec2(
                    l.geometry.width() as f32 * self.tileset.tile_w as f32,
                    l.geometry.height() as f32 * self.tileset.tile_h as f32,
                ) * self.scale
            })
            .unwrap_or(Vec2::ZERO)
    }
}
