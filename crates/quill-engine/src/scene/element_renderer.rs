use crate::camera::Camera;
use crate::coords::Transform;
use crate::time::FrameTimeS;

use super::{DrawCmd, DrawList, ElementId, MeshCmd, SceneGraph, ZIndex};

/// Records draw commands for individual scene elements.
#[derive(Debug, Copy, Clone)]
pub struct ElementRenderer {
    z: ZIndex,
}

impl Default for ElementRenderer {
    fn default() -> Self {
        Self::new(ZIndex::SCENE)
    }
}

impl ElementRenderer {
    pub fn new(z: ZIndex) -> Self {
        Self { z }
    }

    /// Draws element `id` with `transform` applied after its own object
    /// matrix. Returns whether a command was recorded.
    ///
    /// Skips elements that are missing, hidden, not yet uploaded, or
    /// entirely outside the camera's view.
    pub fn draw(
        &self,
        id: ElementId,
        scene: &SceneGraph,
        cam: &Camera,
        _draw_time: FrameTimeS,
        transform: Transform,
        list: &mut DrawList,
    ) -> bool {
        let Some(element) = scene.get(id) else {
            log::debug!("element renderer: no element {id}");
            return false;
        };
        if !element.is_visible() || !element.is_synchronized() || element.mesh().is_empty() {
            return false;
        }

        let bounds = element.region().transformed(&transform).mbr();
        if bounds.intersect(cam.world_window()).is_none() && !bounds.is_empty() {
            return false;
        }

        list.push(
            self.z,
            DrawCmd::Mesh(MeshCmd {
                mesh: element.mesh_key(),
                transform: element.mesh().object_matrix.then(transform),
                opacity: 1.0,
                shader: element.mesh().shader_type,
            }),
        );
        true
    }
}
