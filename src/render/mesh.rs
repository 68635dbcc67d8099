use crate::layer::TileGeometry;
use crate::map::Map;
use macroquad::prelude::*;

// Stay under macroquad's default per-drawcall index budget (5000).
const QUADS_PER_MESH: usize = 800;

const DEBUG_FILL: Color = Color::new(1.0, 0.0, 0.0, 0.4);

/// GPU-side copy of a map's layers, built once after loading.
pub struct MapMeshes {
    layers: Vec<Vec<Mesh>>,
}

impl MapMeshes {
    /// Uploads every layer's quads, textured with the tileset `texture`.
    pub fn new(map: &Map, texture: &Texture2D) -> Self {
        let sheet = vec2(texture.width(), texture.height());
        let layers = map
            .layers()
            .iter()
            .map(|l| layer_meshes(&l.geometry, texture, sheet, map.scale()))
            .collect();
        Self { layers }
    }

    /// Draws every visible layer back to front.
    pub fn draw(&self, map: &Map) {
        for (layer, meshes) in map.layers().iter().zip(&self.layers) {
            if !layer.visible {
                continue;
            }
            for mesh in meshes {
                draw_mesh(mesh);
            }
        }
    }
}

fn layer_meshes(geometry: &TileGeometry, texture: &Texture2D, sheet: Vec2, scale: f32) -> Vec<Mesh> {
    layer_batches(geometry, sheet, scale)
        .into_iter()
        .map(|(vertices, indices)| Mesh {
            vertices,
            indices,
            texture: Some(texture.clone()),
        })
        .collect()
}

/// Vertex and index buffers for one layer, split every `QUADS_PER_MESH` quads.
/// Positions are scaled to world space, UVs normalized against `sheet`.
fn layer_batches(geometry: &TileGeometry, sheet: Vec2, scale: f32) -> Vec<(Vec<Vertex>, Vec<u16>)> {
    let mut batches = Vec::new();
    let mut vertices = Vec::with_capacity(QUADS_PER_MESH * 4);
    let mut indices = Vec::with_capacity(QUADS_PER_MESH * 6);

    for quad in geometry.quads() {
        let base = vertices.len() as u16;
        for (pos, tex) in quad.positions.iter().zip(&quad.tex_coords) {
            let p = *pos * scale;
            let uv = *tex / sheet;
            vertices.push(Vertex::new(p.x, p.y, 0.0, uv.x, uv.y, WHITE));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);

        if vertices.len() >= QUADS_PER_MESH * 4 {
            batches.push((std::mem::take(&mut vertices), std::mem::take(&mut indices)));
        }
    }

    if !vertices.is_empty() {
        batches.push((vertices, indices));
    }
    batches
}

/// Translucent overlay on every collision rectangle.
pub fn draw_collision_debug(map: &Map) {
    for obj in map.collision_objects() {
        let r = obj.rect;
        draw_rectangle(r.x, r.y, r.w, r.h, DEBUG_FILL);
        if obj.next_area {
            draw_rectangle_lines(r.x, r.y, r.w, r.h, 2.0, YELLOW);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: Vec2 = Vec2::new(16.0, 16.0);
    const SHEET: Vec2 = Vec2::new(64.0, 64.0);

    fn row_of(n: usize) -> TileGeometry {
        TileGeometry::build(&vec![1; n], n, 1, 4, TILE)
    }

    #[test]
    fn full_batch_fits_one_mesh() {
        let batches = layer_batches(&row_of(QUADS_PER_MESH), SHEET, 1.0);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].0.len(), QUADS_PER_MESH * 4);
        assert_eq!(batches[0].1.len(), QUADS_PER_MESH * 6);
    }

    #[test]
    fn one_quad_past_the_limit_starts_a_new_mesh() {
        let batches = layer_batches(&row_of(QUADS_PER_MESH + 1), SHEET, 1.0);
        assert_eq!(batches.len(), 2);

        let (first_v, first_i) = &batches[0];
        assert_eq!(first_v.len(), 3200);
        assert_eq!(first_i.len(), 4800);
        assert_eq!(first_i.iter().copied().max(), Some(3199));

        let (last_v, last_i) = &batches[1];
        assert_eq!(last_v.len(), 4);
        assert_eq!(last_i, &vec![0, 1, 2, 0, 2, 3]);
        // indices restart, positions do not
        assert_eq!(last_v[0].position.x, 800.0 * 16.0);
    }

    #[test]
    fn scales_positions_and_normalizes_uvs() {
        // tile number 6 -> column 1, row 1 on a 4-wide sheet
        let g = TileGeometry::build(&[0, 6], 2, 1, 4, TILE);
        let batches = layer_batches(&g, SHEET, 2.0);
        assert_eq!(batches.len(), 1);

        let verts = &batches[0].0;
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[0].position, vec3(32.0, 0.0, 0.0));
        assert_eq!(verts[2].position, vec3(64.0, 32.0, 0.0));
        assert_eq!(verts[0].uv, vec2(0.25, 0.25));
        assert_eq!(verts[2].uv, vec2(0.5, 0.5));
    }

    #[test]
    fn empty_layer_has_no_batches() {
        let g = TileGeometry::build(&[0, 0, 0], 3, 1, 4, TILE);
        assert!(layer_batches(&g, SHEET, 2.0).is_empty());
    }
}
