use macroquad::prelude::*;

/// A static rectangle from one of the map's object groups.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionObject {
    /// Tiled object id, if the document carried one
    pub id: Option<u32>,
    /// Object name, if set in the editor
    pub name: Option<String>,
    /// Free-form `type` (or `class`) tag, e.g. "wall" or "entrance"
    pub kind: Option<String>,
    /// World-space rectangle, already multiplied by the map scale
    pub rect: Rect,
    /// Set on entrances that move the player to the next area
    pub next_area: bool,
}

impl CollisionObject {
    /// The rectangle as authored in the map file, before scaling.
    pub fn source_rect(&self, scale: f32) -> Rect {
        Rect::new(
            self.rect.x / scale,
            self.rect.y / scale,
            self.rect.w / scale,
            self.rect.h / scale,
        )
    }
}

// [min, max) on each axis; negative sizes are flipped.
#[inline]
fn span(origin: f32, size: f32) -> (f32, f32) {
    if size < 0.0 {
        (origin + size, origin)
    } else {
        (origin, origin + size)
    }
}

/// True when `a` and `b` share an area greater than zero. Touching edges do not count.
#[inline]
pub fn overlaps_strict(a: &Rect, b: &Rect) -> bool {
    let (ax0, ax1) = span(a.x, a.w);
    let (ay0, ay1) = span(a.y, a.h);
    let (bx0, bx1) = span(b.x, b.w);
    let (by0, by1) = span(b.y, b.h);

    ax0.max(bx0) < ax1.min(bx1) && ay0.max(by0) < ay1.min(by1)
}

/// Linear-scan collision store. Fine for the few dozen objects a map has.
#[derive(Debug, Clone, Default)]
pub struct CollisionIndex {
    objects: Vec<CollisionObject>,
}

impl CollisionIndex {
    /// Wraps objects already scaled to world space.
    pub fn new(objects: Vec<CollisionObject>) -> Self {
        Self { objects }
    }

    /// Does `rect` overlap any stored object?
    pub fn query(&self, rect: &Rect) -> bool {
        self.objects.iter().any(|o| overlaps_strict(rect, &o.rect))
    }

    /// Objects hit by `rect`, in load order.
    pub fn overlapping(&self, rect: Rect) -> impl Iterator<Item = &CollisionObject> + '_ {
        self.objects.iter().filter(move |o| overlaps_strict(&rect, &o.rect))
    }

    /// First entrance hit by `rect`.
    pub fn next_area_hit(&self, rect: &Rect) -> Option<&CollisionObject> {
        self.overlapping(*rect).find(|o| o.next_area)
    }

    /// All objects, in load order.
    pub fn objects(&self) -> &[CollisionObject] {
        &self.objects
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when the map has no collision objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(x: f32, y: f32, w: f32, h: f32) -> CollisionObject {
        CollisionObject {
            id: None,
            name: None,
            kind: Some("wall".into()),
            rect: Rect::new(x, y, w, h),
            next_area: false,
        }
    }

    #[test]
    fn shared_edge_is_not_a_collision() {
        let index = CollisionIndex::new(vec![wall(0.0, 0.0, 10.0, 10.0)]);
        assert!(!index.query(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!index.query(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(!index.query(&Rect::new(10.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn positive_overlap_is_a_collision() {
        let index = CollisionIndex::new(vec![wall(0.0, 0.0, 10.0, 10.0)]);
        assert!(index.query(&Rect::new(9.5, 9.5, 10.0, 10.0)));
        assert!(index.query(&Rect::new(2.0, 2.0, 1.0, 1.0)));
        assert!(index.query(&Rect::new(-5.0, -5.0, 30.0, 30.0)));
    }

    #[test]
    fn zero_area_query_never_collides() {
        let index = CollisionIndex::new(vec![wall(0.0, 0.0, 10.0, 10.0)]);
        assert!(!index.query(&Rect::new(5.0, 5.0, 0.0, 4.0)));
        assert!(!index.query(&Rect::new(5.0, 5.0, 4.0, 0.0)));
    }

    #[test]
    fn negative_size_is_normalised() {
        let index = CollisionIndex::new(vec![wall(0.0, 0.0, 10.0, 10.0)]);
        assert!(index.query(&Rect::new(12.0, 12.0, -4.0, -4.0)));
        assert!(!index.query(&Rect::new(14.0, 14.0, -4.0, -4.0)));
    }

    #[test]
    fn empty_index_never_collides() {
        let index = CollisionIndex::default();
        assert!(index.is_empty());
        assert!(!index.query(&Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn finds_entrance_among_overlaps() {
        let mut gate = wall(20.0, 0.0, 10.0, 10.0);
        gate.kind = Some("entrance".into());
        gate.next_area = true;
        let index = CollisionIndex::new(vec![wall(0.0, 0.0, 25.0, 10.0), gate]);

        let player = Rect::new(22.0, 2.0, 4.0, 4.0);
        assert_eq!(index.overlapping(player).count(), 2);
        let hit = index.next_area_hit(&player).expect("entrance");
        assert_eq!(hit.kind.as_deref(), Some("entrance"));

        assert!(index.next_area_hit(&Rect::new(1.0, 1.0, 2.0, 2.0)).is_none());
    }

    #[test]
    fn source_rect_undoes_scaling() {
        let scale = 2.0;
        let src = Rect::new(13.3, 7.1, 16.0, 48.2);
        let obj = wall(src.x * scale, src.y * scale, src.w * scale, src.h * scale);
        let back = obj.source_rect(scale);
        for (a, b) in [(back.x, src.x), (back.y, src.y), (back.w, src.w), (back.h, src.h)] {
            assert!((a - b).abs() < 1e-4, "{a} != {b}");
        }
    }
}
