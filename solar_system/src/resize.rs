//! Window resize handling

use orrery_engine::render::{GraphicsEngine, RenderResult};

use crate::world::SolarSystem;

/// React to a new drawable size
///
/// Resizes the drawing surface and updates the camera's aspect ratio.
/// A zero width or height (minimized window) still reaches the surface so
/// the engine can pause presentation, but leaves the aspect ratio alone so
/// it never becomes zero or infinite. Returns whether the aspect changed.
pub fn handle_resize(
    world: &mut SolarSystem,
    graphics: &mut GraphicsEngine,
    width: u32,
    height: u32,
) -> RenderResult<bool> {
    graphics.resize(width, height)?;

    if width == 0 || height == 0 {
        log::debug!("Surface minimized at {}x{}, keeping aspect ratio", width, height);
        return Ok(false);
    }

    world.camera.set_aspect_ratio(width as f32 / height as f32);
    log::debug!("Resized to {}x{}", width, height);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolarSystemConfig;
    use crate::scene_builder::{orbit_rng, SceneBuilder};
    use approx::assert_relative_eq;
    use orrery_engine::render::HeadlessBackend;

    fn setup() -> (GraphicsEngine, SolarSystem) {
        let config = SolarSystemConfig::default();
        let mut graphics = GraphicsEngine::new(Box::new(HeadlessBackend::new(1280, 720)));
        let world = SceneBuilder::new(&config)
            .build(&mut graphics, &mut orbit_rng(Some(5)), 1280.0 / 720.0)
            .unwrap();
        (graphics, world)
    }

    #[test]
    fn test_resize_updates_aspect_and_surface() {
        let (mut graphics, mut world) = setup();
        assert!(handle_resize(&mut world, &mut graphics, 1000, 500).unwrap());

        assert_relative_eq!(world.camera.aspect, 2.0);
        assert_eq!(graphics.surface_size(), (1000, 500));
        assert_eq!(graphics.backend::<HeadlessBackend>().unwrap().resize_count(), 1);
    }

    #[test]
    fn test_zero_size_keeps_aspect_but_reaches_surface() {
        let (mut graphics, mut world) = setup();
        let aspect = world.camera.aspect;

        assert!(!handle_resize(&mut world, &mut graphics, 0, 720).unwrap());
        assert_eq!(graphics.surface_size(), (0, 720));
        assert!(!handle_resize(&mut world, &mut graphics, 1280, 0).unwrap());
        assert_eq!(graphics.surface_size(), (1280, 0));

        assert_relative_eq!(world.camera.aspect, aspect);
        assert_eq!(graphics.backend::<HeadlessBackend>().unwrap().resize_count(), 2);
    }

    #[test]
    fn test_restore_after_minimize_resumes_previous_aspect() {
        let (mut graphics, mut world) = setup();
        handle_resize(&mut world, &mut graphics, 0, 0).unwrap();
        assert_eq!(graphics.surface_size(), (0, 0));

        assert!(handle_resize(&mut world, &mut graphics, 1280, 720).unwrap());
        assert_relative_eq!(world.camera.aspect, 1280.0 / 720.0);
        assert_eq!(graphics.surface_size(), (1280, 720));
    }

    #[test]
    fn test_repeated_resizes_keep_last_size() {
        let (mut graphics, mut world) = setup();
        for (w, h) in [(800, 600), (640, 640), (1920, 1080)] {
            handle_resize(&mut world, &mut graphics, w, h).unwrap();
        }
        assert_relative_eq!(world.camera.aspect, 1920.0 / 1080.0);
        assert_eq!(graphics.surface_size(), (1920, 1080));
    }
}
