//! Per-frame rendering data
//!
//! Built once per frame by the graphics facade from a scene and a camera.
//! Backends consume it without needing to know about either.

use crate::foundation::math::{Mat4, Vec3};
use crate::render::api::{MaterialHandle, MeshHandle};
use crate::render::lighting::LightingEnvironment;
use crate::render::primitives::Camera;

/// One indexed draw of a mesh with a material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Geometry to draw
    pub mesh: MeshHandle,
    /// Material to shade it with
    pub material: MaterialHandle,
    /// Model-to-world transform
    pub model: Mat4,
}

/// Light data packed the way the shaders read it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLighting {
    /// Point light position in world space
    pub light_position: Vec3,
    /// Point light colour times intensity
    pub light_color: Vec3,
    /// Point light range; 0 means unbounded
    pub light_range: f32,
    /// Ambient colour times intensity
    pub ambient: Vec3,
}

impl FrameLighting {
    /// Collapse a lighting environment to the single point light backends shade with
    pub fn from_environment(environment: &LightingEnvironment) -> Self {
        let ambient = environment.ambient_color * environment.ambient_intensity;
        match environment.primary_light() {
            Some(light) => Self {
                light_position: light.position,
                light_color: light.color * light.intensity,
                light_range: light.range,
                ambient,
            },
            None => Self {
                light_position: Vec3::zeros(),
                light_color: Vec3::zeros(),
                light_range: 0.0,
                ambient,
            },
        }
    }
}

/// Complete frame rendering data
#[derive(Debug, Clone)]
pub struct FrameData {
    /// Projection × Vulkan transform × view
    pub view_projection: Mat4,
    /// Camera position in world space
    pub camera_position: Vec3,
    /// Lights for this frame
    pub lighting: FrameLighting,
    /// Draws in submission order
    pub draws: Vec<DrawCommand>,
}

impl FrameData {
    /// Start a frame with no draws
    pub fn new(camera: &Camera, environment: &LightingEnvironment) -> Self {
        Self {
            view_projection: camera.get_view_projection_matrix(),
            camera_position: camera.position,
            lighting: FrameLighting::from_environment(environment),
            draws: Vec::new(),
        }
    }
}
