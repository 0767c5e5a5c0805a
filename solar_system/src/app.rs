//! Solar system application
//!
//! Glue between the engine's frame loop and the world: builds the world on
//! initialize, runs the animation driver each frame and routes input.

use orrery_engine::prelude::*;

use crate::animation::AnimationDriver;
use crate::config::SolarSystemConfig;
use crate::resize::handle_resize;
use crate::scene_builder::{orbit_rng, SceneBuilder};
use crate::world::SolarSystem;

/// The solar system demo
pub struct SolarSystemApp {
    config: SolarSystemConfig,
    world: Option<SolarSystem>,
    driver: AnimationDriver,
}

impl SolarSystemApp {
    /// App that will build its world from `config`
    pub fn new(config: SolarSystemConfig) -> Self {
        Self {
            config,
            world: None,
            driver: AnimationDriver::new(),
        }
    }

    /// The world, once initialized
    pub fn world(&self) -> Option<&SolarSystem> {
        self.world.as_ref()
    }

    /// Frames animated so far
    pub fn frames(&self) -> u64 {
        self.driver.frames()
    }

    fn world_mut(&mut self) -> Result<&mut SolarSystem, AppError> {
        self.world
            .as_mut()
            .ok_or_else(|| AppError::Custom("solar system used before initialize".to_string()))
    }
}

impl Application for SolarSystemApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Building solar system...");

        let graphics = engine.graphics_engine_mut();
        let (width, height) = match graphics.surface_size() {
            (0, _) | (_, 0) => (self.config.window.width, self.config.window.height),
            size => size,
        };
        let aspect = width as f32 / height.max(1) as f32;

        let mut rng = orbit_rng(self.config.seed);
        let world = SceneBuilder::new(&self.config).build(graphics, &mut rng, aspect)?;
        self.world = Some(world);
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        let now_ms = engine.now_ms();
        let world = self.world.as_mut().ok_or_else(|| {
            AppError::Custom("solar system used before initialize".to_string())
        })?;
        self.driver.frame(world, engine.graphics_engine_mut(), now_ms)?;
        Ok(())
    }

    fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
        match event {
            AppEvent::WindowResized { width, height } => {
                let world = self.world_mut()?;
                handle_resize(world, engine.graphics_engine_mut(), width, height)?;
            }
            AppEvent::MouseWheel { delta_y, .. } => {
                self.world_mut()?.zoom.scroll(delta_y);
            }
            AppEvent::KeyPressed(KeyCode::Space) => {
                self.world_mut()?.reset_camera();
            }
            other => engine.handle_event(&other),
        }
        Ok(())
    }

    fn cleanup(&mut self, _engine: &mut Engine) {
        log::info!("Solar system ran for {} frames", self.driver.frames());
        self.world = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_before_initialize_is_an_error() {
        let mut engine = Engine::with_backend(Box::new(HeadlessBackend::new(10, 10)), Box::new(ManualClock::new(0.0)));
        let mut app = SolarSystemApp::new(SolarSystemConfig::default());
        assert!(app.world().is_none());
        assert!(matches!(app.update(&mut engine, 0.016), Err(AppError::Custom(_))));
    }

    #[test]
    fn test_zero_surface_falls_back_to_configured_aspect() {
        let mut engine = Engine::with_backend(Box::new(HeadlessBackend::new(0, 0)), Box::new(ManualClock::new(0.0)));
        let mut app = SolarSystemApp::new(SolarSystemConfig {
            seed: Some(1),
            ..SolarSystemConfig::default()
        });
        app.initialize(&mut engine).unwrap();
        let aspect = app.world().unwrap().camera.aspect;
        assert!((aspect - 1280.0 / 720.0).abs() < 1e-5);
    }
}
