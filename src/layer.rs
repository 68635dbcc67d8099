use macroquad::prelude::*;

/// One tile's corners, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// 0-based index into the tileset
    pub tile: u32,
    /// Corners in layer space, unscaled
    pub positions: [Vec2; 4],
    /// Texture coordinates in sheet pixels
    pub tex_coords: [Vec2; 4],
}

impl Quad {
    fn corners(origin: Vec2, size: Vec2) -> [Vec2; 4] {
        [
            origin,
            origin + vec2(size.x, 0.0),
            origin + size,
            origin + vec2(0.0, size.y),
        ]
    }

    /// Source rectangle on the sheet.
    pub fn tex_rect(&self) -> Rect {
        let [tl, _, br, _] = self.tex_coords;
        Rect::new(tl.x, tl.y, br.x - tl.x, br.y - tl.y)
    }

    /// Destination rectangle in layer space.
    pub fn dest_rect(&self) -> Rect {
        let [tl, _, br, _] = self.positions;
        Rect::new(tl.x, tl.y, br.x - tl.x, br.y - tl.y)
    }
}

/// Row-major quad buffer for one layer. Empty cells hold `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGeometry {
    width: usize,
    height: usize,
    cells: Vec<Option<Quad>>,
}

impl TileGeometry {
    /// Turns 1-based tile ids into quads. Ids <= 0 leave the cell empty.
    ///
    /// Cells past the end of `tile_ids` are empty. A `width * height` that
    /// overflows yields an empty 0x0 geometry.
    pub fn build(
        tile_ids: &[i32],
        width: usize,
        height: usize,
        sheet_columns: u32,
        tile_size: Vec2,
    ) -> Self {
        let Some(total) = width.checked_mul(height) else {
            return Self {
                width: 0,
                height: 0,
                cells: Vec::new(),
            };
        };
        if sheet_columns == 0 {
            return Self {
                width,
                height,
                cells: Vec::new(),
            };
        }
        let cols = sheet_columns as i64;

        let cells = tile_ids
            .iter()
            .take(total)
            .enumerate()
            .map(|(idx, &id)| {
                let tile_number = id as i64 - 1;
                if tile_number < 0 {
                    return None;
                }
                let (i, j) = (idx % width, idx / width);
                let column = (tile_number % cols) as f32;
                let row = (tile_number / cols) as f32;
                let pos = vec2(i as f32 * tile_size.x, j as f32 * tile_size.y);
                let tex = vec2(column * tile_size.x, row * tile_size.y);

                Some(Quad {
                    tile: tile_number as u32,
                    positions: Quad::corners(pos, tile_size),
                    tex_coords: Quad::corners(tex, tile_size),
                })
            })
            .collect();

        Self { width, height, cells }
    }

    /// Width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    /// Quad at column `i`, row `j`; `None` for empty or out-of-range cells.
    #[inline]
    pub fn cell(&self, i: usize, j: usize) -> Option<&Quad> {
        if i >= self.width || j >= self.height {
            return None;
        }
        self.cells.get(i + j * self.width)?.as_ref()
    }

    /// Non-empty cells in row-major order.
    pub fn quads(&self) -> impl Iterator<Item = &Quad> + '_ {
        self.cells.iter().flatten()
    }

    /// Number of non-empty cells
    pub fn quad_count(&self) -> usize {
        self.quads().count()
    }
}

/// A built layer plus its visibility flag. Position in the map's list is the z-order.
#[derive(Debug, Clone)]
pub struct TileLayer {
    /// Name from the map document
    pub name: String,
    /// Immutable quads built at load time
    pub geometry: TileGeometry,
    /// Renderers skip the layer while this is false
    pub visible: bool,
}

impl TileLayer {
    /// Flips `visible`.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}
