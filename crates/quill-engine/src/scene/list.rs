use crate::render::MeshKey;

use super::{DrawCmd, SceneGraph, SortKey, ZIndex};

/// One recorded command and where it sits in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
}

/// Commands recorded for one frame.
///
/// Items keep recording order; paint order (layer, then recording order) is
/// computed on demand into a reused index buffer.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    paint_order: Vec<usize>,
    paint_order_stale: bool,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every item, keeping capacity for the next frame.
    pub fn clear(&mut self) {
        self.items.clear();
        self.paint_order.clear();
        self.paint_order_stale = false;
    }

    /// Items in recording order.
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        debug_assert!(self.items.len() < u32::MAX as usize, "draw list overflow");
        let key = SortKey::new(z, self.items.len() as u32);
        self.items.push(DrawItem { key, cmd });
        self.paint_order_stale = true;
    }

    /// Number of items recorded on layer `z`.
    pub fn count_in(&self, z: ZIndex) -> usize {
        self.items.iter().filter(|i| i.key.z == z).count()
    }

    /// Whether any command references `mesh`.
    pub fn references(&self, mesh: MeshKey) -> bool {
        self.items.iter().any(|i| i.cmd.mesh_key() == mesh)
    }

    /// Indices into [`DrawList::items`], back to front.
    pub fn indices_in_paint_order(&mut self) -> &[usize] {
        self.refresh_paint_order();
        &self.paint_order
    }

    /// Items back to front.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        self.refresh_paint_order();
        self.paint_order.iter().map(|&i| &self.items[i])
    }

    fn refresh_paint_order(&mut self) {
        if !self.paint_order_stale {
            return;
        }
        let items = &self.items;
        self.paint_order.clear();
        self.paint_order.extend(0..items.len());
        self.paint_order.sort_unstable_by_key(|&i| items[i].key);
        self.paint_order_stale = false;
    }
}

/// Where renderers record a frame: the scene they read from and the list
/// they push into.
pub struct DrawTarget<'a> {
    pub scene: &'a SceneGraph,
    pub list: &'a mut DrawList,
}

impl<'a> DrawTarget<'a> {
    #[inline]
    pub fn new(scene: &'a SceneGraph, list: &'a mut DrawList) -> Self {
        Self { scene, list }
    }
}
