use crate::error::MapError;
use macroquad::prelude::*;
use std::path::Path;

/// Grid metadata of the single tileset sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tileset {
    /// Tile cell width in pixels
    pub tile_w: u32,
    /// Tile cell height in pixels
    pub tile_h: u32,
    /// Tiles per sheet row
    pub columns: u32,
}

impl Tileset {
    /// Derives the column count from the sheet's pixel width.
    pub fn new(tile_w: u32, tile_h: u32, sheet_width: u32) -> Result<Self, MapError> {
        if tile_w == 0 || tile_h == 0 {
            return Err(MapError::InvalidTileset(format!(
                "tile size must be non-zero, got {}x{}",
                tile_w, tile_h
            )));
        }
        let columns = sheet_width / tile_w;
        if columns == 0 {
            return Err(MapError::InvalidTileset(format!(
                "sheet is {}px wide, narrower than one {}px tile",
                sheet_width, tile_w
            )));
        }
        Ok(Self {
            tile_w,
            tile_h,
            columns,
        })
    }

    /// Decodes the sheet image only to learn its pixel width.
    pub fn from_image_file<P: AsRef<Path>>(path: P, tile_w: u32, tile_h: u32) -> Result<Self, MapError> {
        let p = path.as_ref();
        let bytes = std::fs::read(p).map_err(|source| MapError::Io {
            path: p.to_path_buf(),
            source,
        })?;
        let img = Image::from_file_with_format(&bytes, None).map_err(|e| MapError::Image {
            path: p.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::new(tile_w, tile_h, img.width() as u32)
    }

    /// Tile cell size as a vector
    #[inline]
    pub fn tile_size(&self) -> Vec2 {
        vec2(self.tile_w as f32, self.tile_h as f32)
    }

    /// Sheet cell `(column, row)` of a 0-based tile index.
    #[inline]
    pub fn cell_of(&self, tile: u32) -> (u32, u32) {
        (tile % self.columns, tile / self.columns)
    }
}
