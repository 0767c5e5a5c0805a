//! Backend abstraction for the rendering system
//!
//! Backends own GPU (or recorded) copies of meshes and materials and hand
//! out opaque handles. The [`GraphicsEngine`](crate::render::GraphicsEngine)
//! facade turns a scene into a [`FrameData`] each frame and passes it down.

use crate::render::api::FrameData;
use crate::render::{Material, Mesh, RenderError};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

slotmap::new_key_type! {
    /// Handle to a mesh resource stored in the backend
    pub struct MeshHandle;

    /// Handle to a material resource stored in the backend
    pub struct MaterialHandle;
}

/// Main rendering backend trait
pub trait RenderBackend {
    /// Current drawable surface size in pixels (width, height)
    fn surface_extent(&self) -> (u32, u32);

    /// Upload mesh data and return an opaque handle
    fn create_mesh(&mut self, mesh: &Mesh) -> BackendResult<MeshHandle>;

    /// Create material resources (texture, sampler binding) and return a handle
    ///
    /// A texture that cannot be loaded is not an error: backends log it and
    /// bind a plain white texture instead.
    fn create_material(&mut self, material: &Material) -> BackendResult<MaterialHandle>;

    /// Record and present one frame
    fn draw_frame(&mut self, frame: &FrameData) -> BackendResult<()>;

    /// Resize the drawable surface
    fn resize(&mut self, width: u32, height: u32) -> BackendResult<()>;

    /// Wait for all submitted work to finish
    fn wait_idle(&self) -> BackendResult<()>;

    /// Downcast to the concrete backend type
    fn as_any(&self) -> &dyn std::any::Any;

    /// Downcast to the concrete backend type, mutably
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
