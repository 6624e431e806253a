use std::collections::HashMap;

use anyhow::Result;

use crate::coords::{Rect, RotRect, Transform, Vec2};
use crate::geometry::Mesh;
use crate::render::{MeshKey, MeshStore};

/// Handle to an element in a [`SceneGraph`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ElementId(u32);

impl ElementId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A drawable scene element.
#[derive(Debug, Clone)]
pub struct Element {
    mesh: Mesh,
    mesh_key: MeshKey,
    mbr: Rect,
    region: RotRect,
    visible: bool,
    needs_upload: bool,
}

impl Element {
    fn new(mesh: Mesh) -> Self {
        let mut e = Self {
            mesh,
            mesh_key: MeshKey::next(),
            mbr: Rect::default(),
            region: RotRect::default(),
            visible: true,
            needs_upload: true,
        };
        e.refresh_bounds();
        e
    }

    fn refresh_bounds(&mut self) {
        let local = self.mesh.local_mbr().unwrap_or_default();
        self.region = RotRect::from_rect(local).transformed(&self.mesh.object_matrix);
        self.mbr = self.mesh.world_mbr().unwrap_or_default();
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn mesh_key(&self) -> MeshKey {
        self.mesh_key
    }

    /// World-space axis-aligned bounds.
    #[inline]
    pub fn mbr(&self) -> Rect {
        self.mbr
    }

    /// World-space oriented bounds; rotates with the element.
    #[inline]
    pub fn region(&self) -> RotRect {
        self.region
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// True once the current vertex data has been uploaded.
    #[inline]
    pub fn is_synchronized(&self) -> bool {
        !self.needs_upload
    }
}

/// Arena of scene elements addressed by [`ElementId`].
///
/// Elements keep insertion order, which is also their paint order.
#[derive(Debug, Default)]
pub struct SceneGraph {
    elements: HashMap<ElementId, Element>,
    order: Vec<ElementId>,
    next_id: u32,
    pending_release: Vec<MeshKey>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `mesh` as a new top-most element.
    pub fn add(&mut self, mesh: Mesh) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.elements.insert(id, Element::new(mesh));
        self.order.push(id);
        log::debug!("scene: added element {id}");
        id
    }

    /// Removes an element; its GPU mesh is released on the next
    /// [`SceneGraph::synchronize`].
    pub fn remove(&mut self, id: ElementId) -> Option<Mesh> {
        let element = self.elements.remove(&id)?;
        self.order.retain(|e| *e != id);
        self.pending_release.push(element.mesh_key);
        Some(element.mesh)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Element ids in paint order.
    pub fn ids(&self) -> &[ElementId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of visible elements.
    pub fn visible_count(&self) -> usize {
        self.elements.values().filter(|e| e.visible).count()
    }

    /// Returns whether `id` exists.
    pub fn set_visible(&mut self, id: ElementId, visible: bool) -> bool {
        match self.elements.get_mut(&id) {
            Some(e) => {
                e.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Composes `t` onto the element's object matrix. Vertex data is
    /// untouched, so no re-upload is needed.
    pub fn apply_transform(&mut self, id: ElementId, t: &Transform) -> bool {
        match self.elements.get_mut(&id) {
            Some(e) => {
                e.mesh.object_matrix = e.mesh.object_matrix.then(*t);
                e.refresh_bounds();
                true
            }
            None => false,
        }
    }

    /// Union of the bounds of the existing ids, `None` if there are none.
    pub fn mbr_of(&self, ids: &[ElementId]) -> Option<Rect> {
        ids.iter()
            .filter_map(|id| self.elements.get(id))
            .map(|e| e.mbr)
            .reduce(Rect::union)
    }

    /// Oriented bounds of a selection: a single element keeps its own
    /// region, several elements share their unrotated union.
    pub fn region_of(&self, ids: &[ElementId]) -> Option<RotRect> {
        let existing: Vec<&Element> = ids.iter().filter_map(|id| self.elements.get(id)).collect();
        match existing.as_slice() {
            [] => None,
            [only] => Some(only.region),
            _ => self.mbr_of(ids).map(RotRect::from_rect),
        }
    }

    /// Top-most visible element whose region contains `world_pos`.
    pub fn element_at(&self, world_pos: Vec2) -> Option<ElementId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|id| self.elements.get(id).is_some_and(|e| e.visible && e.region.contains(world_pos)))
    }

    /// Releases removed meshes and uploads changed ones.
    pub fn synchronize(&mut self, store: &mut dyn MeshStore) -> Result<()> {
        for key in self.pending_release.drain(..) {
            store.release(key);
        }
        for e in self.elements.values_mut().filter(|e| e.needs_upload) {
            if !e.mesh.is_empty() {
                store.upload(e.mesh_key, &e.mesh)?;
            }
            e.needs_upload = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::render::{MemoryMeshBackend, MeshResources};

    fn square(x: f32, y: f32, size: f32) -> Mesh {
        let mut m = Mesh::default();
        m.push_quad(
            [
                Vec2::new(x, y),
                Vec2::new(x + size, y),
                Vec2::new(x + size, y + size),
                Vec2::new(x, y + size),
            ],
            Color::black(),
        );
        m
    }

    // ── arena ─────────────────────────────────────────────────────────────

    #[test]
    fn add_and_remove_keep_paint_order() {
        let mut g = SceneGraph::new();
        let a = g.add(square(0.0, 0.0, 1.0));
        let b = g.add(square(2.0, 0.0, 1.0));
        let c = g.add(square(4.0, 0.0, 1.0));
        assert_eq!(g.ids(), &[a, b, c]);

        assert!(g.remove(b).is_some());
        assert_eq!(g.ids(), &[a, c]);
        assert!(g.remove(b).is_none());
        assert!(!g.contains(b));
    }

    // ── bounds ────────────────────────────────────────────────────────────

    #[test]
    fn mbr_and_region_of_selection() {
        let mut g = SceneGraph::new();
        let a = g.add(square(0.0, 0.0, 1.0));
        let b = g.add(square(3.0, 2.0, 1.0));

        assert_eq!(g.mbr_of(&[a, b]), Some(Rect::new(0.0, 0.0, 4.0, 3.0)));
        assert_eq!(g.region_of(&[a]), Some(RotRect::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0))));
        assert_eq!(g.region_of(&[a, b]).unwrap().dims, Vec2::new(4.0, 3.0));
        assert!(g.region_of(&[]).is_none());
    }

    #[test]
    fn transform_moves_bounds() {
        let mut g = SceneGraph::new();
        let a = g.add(square(0.0, 0.0, 2.0));
        g.apply_transform(a, &Transform::translation(5.0, 1.0));
        assert_eq!(g.get(a).unwrap().mbr(), Rect::new(5.0, 1.0, 2.0, 2.0));
        assert_eq!(g.get(a).unwrap().region().center, Vec2::new(6.0, 2.0));
    }

    // ── hit testing ───────────────────────────────────────────────────────

    #[test]
    fn element_at_prefers_top_most_visible() {
        let mut g = SceneGraph::new();
        let a = g.add(square(0.0, 0.0, 4.0));
        let b = g.add(square(1.0, 1.0, 2.0));
        assert_eq!(g.element_at(Vec2::new(2.0, 2.0)), Some(b));
        g.set_visible(b, false);
        assert_eq!(g.element_at(Vec2::new(2.0, 2.0)), Some(a));
        assert_eq!(g.element_at(Vec2::new(9.0, 9.0)), None);
    }

    // ── synchronization ───────────────────────────────────────────────────

    #[test]
    fn synchronize_uploads_once_and_releases_removed() {
        let mut g = SceneGraph::new();
        let mut res = MeshResources::new(MemoryMeshBackend::new());
        let a = g.add(square(0.0, 0.0, 1.0));
        assert!(!g.get(a).unwrap().is_synchronized());

        g.synchronize(&mut res).unwrap();
        g.synchronize(&mut res).unwrap();
        assert_eq!(res.backend().upload_count(), 1);
        assert!(g.get(a).unwrap().is_synchronized());

        let key = g.get(a).unwrap().mesh_key();
        g.remove(a);
        g.synchronize(&mut res).unwrap();
        assert!(!res.is_synchronized(key));
    }
}
