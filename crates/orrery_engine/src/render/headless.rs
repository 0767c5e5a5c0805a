//! In-memory render backend
//!
//! Records everything it is asked to do instead of talking to a GPU. Used
//! by tests and for running scene logic on machines without Vulkan.

use slotmap::SlotMap;

use crate::assets::ImageData;
use crate::render::api::{BackendResult, FrameData, MaterialHandle, MeshHandle, RenderBackend};
use crate::render::{Material, Mesh, RenderError};

/// What the headless backend kept of an uploaded mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedMesh {
    /// Vertex count
    pub vertex_count: usize,
    /// Index count
    pub index_count: usize,
}

/// What the headless backend kept of a created material
#[derive(Debug, Clone)]
pub struct RecordedMaterial {
    /// The material as submitted
    pub material: Material,
    /// Whether its texture could be decoded; false means the white fallback
    pub texture_loaded: bool,
}

/// Backend that records uploads and frames
#[derive(Debug)]
pub struct HeadlessBackend {
    extent: (u32, u32),
    meshes: SlotMap<MeshHandle, RecordedMesh>,
    materials: SlotMap<MaterialHandle, RecordedMaterial>,
    last_frame: Option<FrameData>,
    frames_drawn: u64,
    resize_count: u64,
    decode_textures: bool,
}

impl HeadlessBackend {
    /// Create a backend with a `width × height` surface
    ///
    /// Textures are not decoded; every textured material records as loaded
    /// so tests stay independent of image files on disk.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            extent: (width, height),
            meshes: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            last_frame: None,
            frames_drawn: 0,
            resize_count: 0,
            decode_textures: false,
        }
    }

    /// Actually decode texture files, recording fallbacks for missing ones
    pub fn with_texture_decoding(mut self) -> Self {
        self.decode_textures = true;
        self
    }

    /// Most recently drawn frame
    pub fn last_frame(&self) -> Option<&FrameData> {
        self.last_frame.as_ref()
    }

    /// Frames drawn so far
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Number of resizes that changed the surface
    pub fn resize_count(&self) -> u64 {
        self.resize_count
    }

    /// Look up an uploaded mesh
    pub fn mesh(&self, handle: MeshHandle) -> Option<&RecordedMesh> {
        self.meshes.get(handle)
    }

    /// Look up a created material
    pub fn material(&self, handle: MaterialHandle) -> Option<&RecordedMaterial> {
        self.materials.get(handle)
    }

    /// Number of uploaded meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Number of created materials
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

impl RenderBackend for HeadlessBackend {
    fn surface_extent(&self) -> (u32, u32) {
        self.extent
    }

    fn create_mesh(&mut self, mesh: &Mesh) -> BackendResult<MeshHandle> {
        if mesh.vertices.is_empty() || mesh.indices.is_empty() {
            return Err(RenderError::ResourceCreationFailed("mesh has no geometry".into()));
        }
        Ok(self.meshes.insert(RecordedMesh {
            vertex_count: mesh.vertices.len(),
            index_count: mesh.indices.len(),
        }))
    }

    fn create_material(&mut self, material: &Material) -> BackendResult<MaterialHandle> {
        let texture_loaded = match (&material.texture, self.decode_textures) {
            (Some(path), true) => match ImageData::from_file(path) {
                Ok(_) => true,
                Err(e) => {
                    log::warn!("Texture unavailable, using plain white: {}", e);
                    false
                }
            },
            (Some(_), false) => true,
            (None, _) => false,
        };

        Ok(self.materials.insert(RecordedMaterial {
            material: material.clone(),
            texture_loaded,
        }))
    }

    fn draw_frame(&mut self, frame: &FrameData) -> BackendResult<()> {
        for draw in &frame.draws {
            if !self.meshes.contains_key(draw.mesh) {
                return Err(RenderError::InvalidHandle(format!("mesh {:?}", draw.mesh)));
            }
            if !self.materials.contains_key(draw.material) {
                return Err(RenderError::InvalidHandle(format!("material {:?}", draw.material)));
            }
        }

        self.frames_drawn += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> BackendResult<()> {
        if self.extent != (width, height) {
            self.extent = (width, height);
            self.resize_count += 1;
        }
        Ok(())
    }

    fn wait_idle(&self) -> BackendResult<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::api::DrawCommand;
    use crate::render::lighting::LightingEnvironment;
    use crate::render::primitives::Camera;
    use crate::foundation::math::Mat4;

    #[test]
    fn test_records_uploads() {
        let mut backend = HeadlessBackend::new(800, 600);
        let mesh = backend.create_mesh(&Mesh::sphere(1.0, 8, 6)).unwrap();

        assert_eq!(backend.mesh(mesh).map(|m| m.vertex_count), Some(9 * 7));
        assert_eq!(backend.mesh_count(), 1);
    }

    #[test]
    fn test_rejects_empty_mesh() {
        let mut backend = HeadlessBackend::new(800, 600);
        assert!(backend.create_mesh(&Mesh::default()).is_err());
    }

    #[test]
    fn test_decoding_records_missing_texture_as_fallback() {
        let mut backend = HeadlessBackend::new(800, 600).with_texture_decoding();
        let handle = backend
            .create_material(&Material::unlit().with_texture("./missing/planet-1.jpg"))
            .unwrap();

        assert_eq!(backend.material(handle).map(|m| m.texture_loaded), Some(false));
    }

    #[test]
    fn test_draw_with_unknown_handle_fails() {
        let mut backend = HeadlessBackend::new(800, 600);
        let mut other = HeadlessBackend::new(800, 600);
        let mesh = other.create_mesh(&Mesh::ring(1.0, 2.0, 8)).unwrap();
        let material = other.create_material(&Material::unlit()).unwrap();

        let mut frame = FrameData::new(&Camera::default(), &LightingEnvironment::new());
        frame.draws.push(DrawCommand { mesh, material, model: Mat4::identity() });

        assert!(matches!(backend.draw_frame(&frame), Err(RenderError::InvalidHandle(_))));
        assert_eq!(backend.frames_drawn(), 0);
    }

    #[test]
    fn test_resize_counts_changes_only() {
        let mut backend = HeadlessBackend::new(800, 600);
        backend.resize(800, 600).unwrap();
        backend.resize(1024, 768).unwrap();
        backend.resize(1024, 768).unwrap();

        assert_eq!(backend.surface_extent(), (1024, 768));
        assert_eq!(backend.resize_count(), 1);
    }
}
