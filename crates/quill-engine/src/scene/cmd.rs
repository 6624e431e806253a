use crate::coords::Transform;
use crate::geometry::ShaderType;
use crate::render::MeshKey;

/// Draws an uploaded mesh.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshCmd {
    pub mesh: MeshKey,
    /// Object-to-world transform applied on top of the mesh's vertices.
    pub transform: Transform,
    /// Opacity multiplier in [0, 1].
    pub opacity: f32,
    pub shader: ShaderType,
}

/// Renderer-agnostic draw command stream.
///
/// Extending the scene:
/// - add a new variant here
/// - add a matching consumer in the host's renderer
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Mesh(MeshCmd),
}

impl DrawCmd {
    /// Mesh referenced by the command.
    pub fn mesh_key(&self) -> MeshKey {
        match self {
            DrawCmd::Mesh(cmd) => cmd.mesh,
        }
    }
}
