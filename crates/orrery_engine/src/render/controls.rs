//! Zoom-only camera controls
//!
//! Scroll input is accumulated as it arrives and applied to the camera in
//! [`ZoomControls::update`], once per frame. Rotation and panning are not
//! offered; the camera keeps its viewing direction and only dollies along
//! it.

use crate::render::primitives::Camera;

/// Mouse-wheel dolly controls
#[derive(Debug, Clone)]
pub struct ZoomControls {
    /// Closest allowed distance to the target
    pub min_distance: f32,
    /// Farthest allowed distance to the target
    pub max_distance: f32,
    /// Scale per wheel notch; 0.95 moves 5% closer per notch
    pub zoom_step: f32,
    pending_notches: f32,
}

impl Default for ZoomControls {
    fn default() -> Self {
        Self::new(10.0, 500.0)
    }
}

impl ZoomControls {
    /// Create controls clamped to `[min_distance, max_distance]`
    pub fn new(min_distance: f32, max_distance: f32) -> Self {
        Self {
            min_distance,
            max_distance,
            zoom_step: 0.95,
            pending_notches: 0.0,
        }
    }

    /// Queue scroll input; positive `delta_y` zooms in
    pub fn scroll(&mut self, delta_y: f64) {
        self.pending_notches += delta_y as f32;
    }

    /// True when scroll input is waiting for the next update
    pub fn has_pending(&self) -> bool {
        self.pending_notches != 0.0
    }

    /// Apply queued zoom to the camera and clear it
    pub fn update(&mut self, camera: &mut Camera) {
        if !self.has_pending() {
            return;
        }

        let notches = std::mem::take(&mut self.pending_notches);
        let scale = self.zoom_step.powf(notches);
        let distance = (camera.distance_to_target() * scale).clamp(self.min_distance, self.max_distance);

        log::debug!("Zoom {:+.1} notches -> distance {:.2}", notches, distance);
        camera.set_distance_to_target(distance);
    }

    /// Drop any queued input
    pub fn reset(&mut self) {
        self.pending_notches = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::perspective(Vec3::new(0.0, 30.0, 95.0), 50.0, 1.0, 0.1, 1000.0)
    }

    #[test]
    fn test_scroll_is_deferred_until_update() {
        let mut controls = ZoomControls::default();
        let mut camera = camera();
        let start = camera.distance_to_target();

        controls.scroll(1.0);
        assert_relative_eq!(camera.distance_to_target(), start);

        controls.update(&mut camera);
        assert_relative_eq!(camera.distance_to_target(), start * 0.95, epsilon = 1e-3);
        assert!(!controls.has_pending());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut controls = ZoomControls::new(10.0, 500.0);
        let mut camera = camera();

        controls.scroll(1000.0);
        controls.update(&mut camera);
        assert_relative_eq!(camera.distance_to_target(), 10.0, epsilon = 1e-3);

        controls.scroll(-1000.0);
        controls.update(&mut camera);
        assert_relative_eq!(camera.distance_to_target(), 500.0, epsilon = 1e-2);
    }

    #[test]
    fn test_update_without_input_leaves_camera() {
        let mut controls = ZoomControls::default();
        let mut camera = camera();
        let before = camera.position;

        controls.update(&mut camera);
        assert_eq!(camera.position, before);
    }
}
