//! # 3D Camera
//!
//! Perspective camera with on-demand matrix generation.
//!
//! View space is right-handed and Y-up. The Vulkan coordinate transform is
//! applied separately in [`Camera::get_view_projection_matrix`] so the view
//! and projection matrices keep their textbook form.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// 3D perspective camera
///
/// Matrices are computed on every call rather than cached; the demo has one
/// camera and asks for one matrix per frame.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height) for projection calculations
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin with +Y up
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Example
    /// ```rust
    /// use orrery_engine::foundation::math::Vec3;
    /// use orrery_engine::render::primitives::Camera;
    ///
    /// let camera = Camera::perspective(Vec3::new(0.0, 30.0, 95.0), 50.0, 16.0 / 9.0, 0.1, 1000.0);
    /// assert!(camera.distance_to_target() > 99.0);
    /// ```
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space, keeping the target
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Point the camera at `target` with a custom up vector
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Update camera aspect ratio for viewport changes
    ///
    /// Only logs changes larger than 0.01 to keep drag-resizes quiet.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Distance between the camera and its target
    pub fn distance_to_target(&self) -> f32 {
        (self.position - self.target).magnitude()
    }

    /// Move the camera along its view direction so it sits `distance` from the target
    pub fn set_distance_to_target(&mut self, distance: f32) {
        let offset = self.position - self.target;
        let Some(direction) = offset.try_normalize(f32::EPSILON) else {
            return;
        };
        self.set_position(self.target + direction * distance);
    }

    /// World-to-camera transform
    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Perspective projection for the current aspect ratio
    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix: P × X × V
    ///
    /// X is the Vulkan coordinate transform that flips Y and Z between the
    /// Y-up view space and Vulkan's Y-down clip space.
    pub fn get_view_projection_matrix(&self) -> Mat4 {
        self.get_projection_matrix() * Mat4::vulkan_coordinate_transform() * self.get_view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, 3.0),
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;
    use approx::assert_relative_eq;

    #[test]
    fn test_perspective_converts_degrees() {
        let camera = Camera::perspective(Vec3::new(0.0, 30.0, 95.0), 50.0, 1.5, 0.1, 1000.0);
        assert_relative_eq!(camera.fov, 50.0f32.to_radians(), epsilon = 1e-6);
        assert_relative_eq!(camera.aspect, 1.5);
        assert_eq!(camera.target, Vec3::zeros());
    }

    #[test]
    fn test_target_projects_to_screen_centre() {
        let camera = Camera::perspective(Vec3::new(0.0, 30.0, 95.0), 50.0, 16.0 / 9.0, 0.1, 1000.0);
        let clip = camera.get_view_projection_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);

        assert!(clip.w > 0.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth));
    }

    #[test]
    fn test_world_up_is_screen_up() {
        // Vulkan clip space is Y-down, so a point above the target lands at negative y
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 50.0), 50.0, 1.0, 0.1, 1000.0);
        let clip = camera.get_view_projection_matrix() * Vec4::new(0.0, 5.0, 0.0, 1.0);
        assert!(clip.y / clip.w < 0.0);
    }

    #[test]
    fn test_set_distance_keeps_direction() {
        let mut camera = Camera::perspective(Vec3::new(0.0, 30.0, 95.0), 50.0, 1.0, 0.1, 1000.0);
        let before = (camera.position - camera.target).normalize();

        camera.set_distance_to_target(40.0);

        assert_relative_eq!(camera.distance_to_target(), 40.0, epsilon = 1e-4);
        assert_relative_eq!((camera.position - camera.target).normalize(), before, epsilon = 1e-5);
    }

    #[test]
    fn test_aspect_ratio_update() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1024.0 / 768.0);
        assert_relative_eq!(camera.aspect, 1024.0 / 768.0);
    }
}
