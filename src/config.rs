use crate::error::MapError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Which tile layer the [`LayerAnimator`](crate::LayerAnimator) blinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatedLayer {
    /// The topmost layer in load order
    #[default]
    Last,
    /// A fixed position in the layer list
    Index(usize),
    /// No layer animates
    None,
}

impl AnimatedLayer {
    /// Resolves the selector against a list of `layer_count` layers.
    pub fn resolve(self, layer_count: usize) -> Option<usize> {
        match self {
            AnimatedLayer::Last => layer_count.checked_sub(1),
            AnimatedLayer::Index(i) if i < layer_count => Some(i),
            AnimatedLayer::Index(_) | AnimatedLayer::None => None,
        }
    }
}

/// Load-time settings for a [`Map`](crate::Map).
///
/// The defaults are the values the desert map ships with: 16x16 tiles drawn at
/// 2x, with the wall layer blinking once per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Tile cell width in tileset pixels
    pub tile_width: u32,
    /// Tile cell height in tileset pixels
    pub tile_height: u32,
    /// World scale applied to collision geometry and rendering
    pub scale: f32,
    /// Layer toggled by the animator
    pub animated_layer: AnimatedLayer,
    /// Time between visibility toggles
    pub toggle_interval_ms: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_width: 16,
            tile_height: 16,
            scale: 2.0,
            animated_layer: AnimatedLayer::Last,
            toggle_interval_ms: 1000,
        }
    }
}

impl MapConfig {
    /// `toggle_interval_ms` as a `Duration`.
    pub fn toggle_interval(&self) -> Duration {
        Duration::from_millis(self.toggle_interval_ms)
    }

    /// Parses a JSON config. Missing fields take their default.
    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let p = path.as_ref();
        let txt = std::fs::read_to_string(p).map_err(|source| MapError::Io {
            path: p.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&txt)
    }
}
