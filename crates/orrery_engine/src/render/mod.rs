//! Rendering
//!
//! [`GraphicsEngine`] is the facade applications talk to. It owns a boxed
//! [`RenderBackend`] (Vulkan for the real window, [`HeadlessBackend`] for
//! tests), turns a [`Scene`] plus a [`Camera`] into a [`FrameData`] each
//! frame, and forwards uploads and resizes.

pub mod api;
pub mod controls;
pub mod headless;
pub mod lighting;
pub mod material;
pub mod primitives;
pub mod scene;
pub mod vulkan;
pub mod window;

pub use api::{DrawCommand, FrameData, MaterialHandle, MeshHandle, RenderBackend};
pub use controls::ZoomControls;
pub use headless::HeadlessBackend;
pub use lighting::{LightingEnvironment, PointLight};
pub use material::{Material, MaterialFlags};
pub use primitives::{Camera, Mesh, Vertex};
pub use scene::{NodeId, Scene, SceneNode};
pub use vulkan::{VulkanRenderer, VulkanRendererConfig};

use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Renderer initialization failed during setup
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// A rendering operation failed during execution
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// GPU resource creation failed
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// Backend-specific error
    #[error("Backend error: {0}")]
    BackendError(String),

    /// A draw referenced a mesh or material the backend never created
    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    /// The drawing surface is unusable
    #[error("Surface error: {0}")]
    SurfaceError(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Graphics facade over a render backend
pub struct GraphicsEngine {
    backend: Box<dyn RenderBackend>,
    frame_count: u64,
}

impl GraphicsEngine {
    /// Wrap a backend
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            backend,
            frame_count: 0,
        }
    }

    /// Create a Vulkan-backed engine drawing into `window`
    pub fn new_from_window(window: &mut window::WindowHandle, config: &VulkanRendererConfig) -> RenderResult<Self> {
        log::info!("Initializing Vulkan renderer for '{}'", config.application_name);
        let renderer = VulkanRenderer::new(window, config)
            .map_err(|e| RenderError::InitializationFailed(format!("Failed to create Vulkan renderer: {}", e)))?;
        Ok(Self::new(Box::new(renderer)))
    }

    /// Upload geometry
    pub fn upload_mesh(&mut self, mesh: &Mesh) -> RenderResult<MeshHandle> {
        self.backend.create_mesh(mesh)
    }

    /// Create a material, loading its texture if it has one
    pub fn create_material(&mut self, material: &Material) -> RenderResult<MaterialHandle> {
        self.backend.create_material(material)
    }

    /// Draw every visible node of `scene` from `camera`
    pub fn render(&mut self, scene: &Scene, camera: &Camera) -> RenderResult<()> {
        let frame = Self::build_frame(scene, camera);
        self.backend.draw_frame(&frame)?;
        self.frame_count += 1;
        log::trace!("Frame {} submitted with {} draws", self.frame_count, frame.draws.len());
        Ok(())
    }

    fn build_frame(scene: &Scene, camera: &Camera) -> FrameData {
        let mut frame = FrameData::new(camera, scene.lighting());
        frame.draws.extend(scene.iter().filter(|(_, node)| node.visible).map(|(_, node)| DrawCommand {
            mesh: node.mesh,
            material: node.material,
            model: node.model_matrix(),
        }));
        frame
    }

    /// Resize the drawing surface; zero sizes are passed through for the backend to pause on
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.backend.resize(width, height)
    }

    /// Current surface size in pixels
    pub fn surface_size(&self) -> (u32, u32) {
        self.backend.surface_extent()
    }

    /// Frames rendered so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Wait for the GPU to finish
    pub fn wait_idle(&self) -> RenderResult<()> {
        self.backend.wait_idle()
    }

    /// Borrow the backend as its concrete type
    pub fn backend<B: RenderBackend + 'static>(&self) -> Option<&B> {
        self.backend.as_any().downcast_ref::<B>()
    }

    /// Borrow the backend mutably as its concrete type
    pub fn backend_mut<B: RenderBackend + 'static>(&mut self) -> Option<&mut B> {
        self.backend.as_any_mut().downcast_mut::<B>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn headless_engine() -> GraphicsEngine {
        GraphicsEngine::new(Box::new(HeadlessBackend::new(800, 600)))
    }

    #[test]
    fn test_render_skips_hidden_nodes_and_keeps_order() {
        let mut engine = headless_engine();
        let mesh = engine.upload_mesh(&Mesh::sphere(1.0, 8, 6)).unwrap();
        let material = engine.create_material(&Material::unlit()).unwrap();

        let mut scene = Scene::new();
        let first = scene.add(SceneNode::new(mesh, material).with_position(Vec3::new(1.0, 0.0, 0.0)));
        let hidden = scene.add(SceneNode::new(mesh, material));
        scene.add(SceneNode::new(mesh, material).with_position(Vec3::new(3.0, 0.0, 0.0)));
        scene.node_mut(hidden).unwrap().visible = false;

        engine.render(&scene, &Camera::default()).unwrap();

        let backend = engine.backend::<HeadlessBackend>().unwrap();
        let frame = backend.last_frame().unwrap();
        assert_eq!(frame.draws.len(), 2);
        assert_eq!(frame.draws[0].model, scene.node(first).unwrap().model_matrix());
        assert_eq!(frame.draws[1].model[(0, 3)], 3.0);
        assert_eq!(engine.frame_count(), 1);
    }

    #[test]
    fn test_unknown_handle_fails_the_frame() {
        let mut engine = headless_engine();
        let mesh = engine.upload_mesh(&Mesh::sphere(1.0, 8, 6)).unwrap();

        let mut scene = Scene::new();
        scene.add(SceneNode::new(mesh, slotmap::Key::null()));

        let result = engine.render(&scene, &Camera::default());
        assert!(matches!(result, Err(RenderError::InvalidHandle(_))));
        assert_eq!(engine.frame_count(), 0);
    }

    #[test]
    fn test_resize_reaches_backend() {
        let mut engine = headless_engine();
        engine.resize(1024, 768).unwrap();
        assert_eq!(engine.surface_size(), (1024, 768));
        assert!(engine.backend::<VulkanRenderer>().is_none());
    }
}
