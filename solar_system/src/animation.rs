//! Per-frame animation
//!
//! Each frame: apply pending zoom, spin the sun and the planets, move every
//! planet to its orbit position for the current wall-clock time, carry the
//! accessory ring along with its planet, then draw.

use orrery_engine::render::{GraphicsEngine, RenderResult};

use crate::world::SolarSystem;

/// Drives the world forward one frame at a time
#[derive(Debug, Default)]
pub struct AnimationDriver {
    frames: u64,
}

impl AnimationDriver {
    /// Driver that has not run yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames advanced so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Update the world for time `now_ms` (milliseconds since the Unix epoch)
    pub fn advance(&mut self, world: &mut SolarSystem, now_ms: f64) {
        world.zoom.update(&mut world.camera);

        if let Some(sun) = world.scene.node_mut(world.sun.node) {
            sun.transform.rotation.y += world.sun.rotation_step;
        }

        let time_scale = world.rates.time_scale;
        for body in &world.bodies {
            let position = body.position_at(now_ms, time_scale);
            if let Some(node) = world.scene.node_mut(body.node) {
                node.transform.rotation.y += body.rotation_step;
                node.transform.position.x = position.x;
                node.transform.position.z = position.z;
            }
            if body.index == world.accessory_ring.body_index {
                if let Some(ring) = world.scene.node_mut(world.accessory_ring.node) {
                    ring.transform.position.x = position.x;
                    ring.transform.position.z = position.z;
                }
            }
        }

        self.frames += 1;
    }

    /// Advance, then draw the scene
    pub fn frame(&mut self, world: &mut SolarSystem, graphics: &mut GraphicsEngine, now_ms: f64) -> RenderResult<()> {
        self.advance(world, now_ms);
        graphics.render(&world.scene, &world.camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::orbit_position;
    use crate::config::SolarSystemConfig;
    use crate::scene_builder::{orbit_rng, SceneBuilder};
    use approx::assert_relative_eq;
    use orrery_engine::render::HeadlessBackend;

    fn world() -> (GraphicsEngine, SolarSystem) {
        let config = SolarSystemConfig::default();
        let mut graphics = GraphicsEngine::new(Box::new(HeadlessBackend::new(800, 600)));
        let world = SceneBuilder::new(&config)
            .build(&mut graphics, &mut orbit_rng(Some(11)), 800.0 / 600.0)
            .unwrap();
        (graphics, world)
    }

    #[test]
    fn test_rotation_steps_accumulate_per_frame() {
        let (_, mut world) = world();
        let mut driver = AnimationDriver::new();
        for frame in 0..3 {
            driver.advance(&mut world, 1_000.0 * f64::from(frame));
        }

        assert_relative_eq!(world.sun_node().unwrap().transform.rotation.y, 0.006, epsilon = 1e-6);
        for i in 0..world.bodies.len() {
            assert_relative_eq!(world.body_node(i).unwrap().transform.rotation.y, 0.045, epsilon = 1e-6);
        }
        assert_eq!(driver.frames(), 3);
    }

    #[test]
    fn test_positions_follow_clock() {
        let (_, mut world) = world();
        let mut driver = AnimationDriver::new();
        let now = 1_700_000_123_456.0;
        driver.advance(&mut world, now);

        for (i, body) in world.bodies.iter().enumerate() {
            let expected = orbit_position(now, 0.0001, body.speed, body.base_radius);
            let position = world.body_node(i).unwrap().transform.position;
            assert_relative_eq!(position.x, expected.x);
            assert_relative_eq!(position.z, expected.z);

            let angle = now * 0.0001 * body.speed;
            let radius = f64::from(body.base_radius);
            assert_relative_eq!(position.x, (angle.cos() * radius) as f32, epsilon = 1e-3);
            assert_relative_eq!(position.z, (angle.sin() * radius) as f32, epsilon = 1e-3);
            assert_relative_eq!(position.y, 0.0);
            assert_relative_eq!(
                (position.x * position.x + position.z * position.z).sqrt(),
                body.base_radius,
                epsilon = 1e-3
            );
        }
    }

    #[test]
    fn test_accessory_ring_tracks_its_planet() {
        let (_, mut world) = world();
        let mut driver = AnimationDriver::new();
        for step in 0..5 {
            driver.advance(&mut world, 1_700_000_000_000.0 + 16.0 * f64::from(step));
            let ring = world.accessory_ring_node().unwrap().transform.position;
            let planet = world.body_node(5).unwrap().transform.position;
            assert_eq!(ring, planet);
        }
    }

    #[test]
    fn test_sun_does_not_move() {
        let (_, mut world) = world();
        let mut driver = AnimationDriver::new();
        driver.advance(&mut world, 123_456.0);
        assert_eq!(world.sun_node().unwrap().transform.position, orrery_engine::foundation::math::Vec3::zeros());
    }

    #[test]
    fn test_frame_draws_every_node() {
        let (mut graphics, mut world) = world();
        let mut driver = AnimationDriver::new();
        driver.frame(&mut world, &mut graphics, 0.0).unwrap();

        let backend = graphics.backend::<HeadlessBackend>().unwrap();
        assert_eq!(backend.last_frame().unwrap().draws.len(), 18);
        assert_eq!(graphics.frame_count(), 1);
    }

    #[test]
    fn test_pending_zoom_applies_on_advance() {
        let (_, mut world) = world();
        let before = world.camera.distance_to_target();
        world.zoom.scroll(2.0);
        assert_relative_eq!(world.camera.distance_to_target(), before);

        AnimationDriver::new().advance(&mut world, 0.0);
        assert_relative_eq!(world.camera.distance_to_target(), before * 0.95 * 0.95, epsilon = 1e-3);
    }
}
