//! Solar system configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Missing files fall back to the defaults entirely.

use std::path::PathBuf;

use orrery_engine::config::Config;
use orrery_engine::foundation::math::Vec3;
use orrery_engine::render::VulkanRendererConfig;
use orrery_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarSystemConfig {
    /// Seed for orbit speeds; `None` draws a fresh seed from the OS
    pub seed: Option<u64>,
    /// Window settings
    pub window: WindowSettings,
    /// Camera settings
    pub camera: CameraSettings,
    /// Orbit layout and animation rates
    pub orbits: OrbitSettings,
    /// Texture and shader locations
    pub assets: AssetSettings,
}

/// Window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Window title
    pub title: String,
    /// Initial width
    pub width: u32,
    /// Initial height
    pub height: u32,
    /// Present once per display refresh; the animation steps once per frame
    pub vsync: bool,
}

/// Camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Starting position; the camera always looks at the sun
    pub position: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Closest zoom distance
    pub min_distance: f32,
    /// Farthest zoom distance
    pub max_distance: f32,
}

/// Orbit layout and animation rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    /// Orbit radius of the innermost planet
    pub base_radius: f32,
    /// Distance between neighbouring orbits
    pub spacing: f32,
    /// Planet self-rotation per frame, radians
    pub planet_rotation_step: f32,
    /// Sun self-rotation per frame, radians
    pub sun_rotation_step: f32,
    /// Converts epoch milliseconds times speed into an orbit angle
    pub time_scale: f64,
    /// Lower bound of the random angular speed
    pub min_speed: f64,
    /// Upper bound (exclusive) of the random angular speed
    pub max_speed: f64,
}

/// Texture and shader locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directory holding `sun.jpg` and `planet-1.jpg` .. `planet-8.jpg`
    pub texture_dir: PathBuf,
    /// Directory holding the compiled SPIR-V shaders
    pub shader_dir: PathBuf,
}

/// Values that would break the orbit invariants
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// Orbits would not be strictly increasing
    #[error("orbit spacing must be positive, got {0}")]
    NonPositiveSpacing(f32),

    /// The innermost orbit would cut through the sun
    #[error("base radius must be positive, got {0}")]
    NonPositiveBaseRadius(f32),

    /// The speed range is empty
    #[error("speed range {min}..{max} is empty")]
    EmptySpeedRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Zoom bounds are inverted
    #[error("zoom range {min}..{max} is invalid")]
    InvalidZoomRange {
        /// Closest distance
        min: f32,
        /// Farthest distance
        max: f32,
    },
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Solar System".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 30.0, 95.0],
            fov_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
            min_distance: 10.0,
            max_distance: 500.0,
        }
    }
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            base_radius: 30.0,
            spacing: 5.0,
            planet_rotation_step: 0.015,
            sun_rotation_step: 0.002,
            time_scale: 0.0001,
            min_speed: 0.2,
            max_speed: 2.2,
        }
    }
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("resources/textures"),
            shader_dir: PathBuf::from("target/shaders"),
        }
    }
}

impl Default for SolarSystemConfig {
    fn default() -> Self {
        Self {
            seed: None,
            window: WindowSettings::default(),
            camera: CameraSettings::default(),
            orbits: OrbitSettings::default(),
            assets: AssetSettings::default(),
        }
    }
}

impl Config for SolarSystemConfig {}

impl SolarSystemConfig {
    /// Check the values the scene relies on
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let orbits = &self.orbits;
        if orbits.spacing <= 0.0 {
            return Err(ConfigValidationError::NonPositiveSpacing(orbits.spacing));
        }
        if orbits.base_radius <= 0.0 {
            return Err(ConfigValidationError::NonPositiveBaseRadius(orbits.base_radius));
        }
        if orbits.min_speed >= orbits.max_speed {
            return Err(ConfigValidationError::EmptySpeedRange {
                min: orbits.min_speed,
                max: orbits.max_speed,
            });
        }
        let camera = &self.camera;
        if camera.min_distance <= 0.0 || camera.min_distance > camera.max_distance {
            return Err(ConfigValidationError::InvalidZoomRange {
                min: camera.min_distance,
                max: camera.max_distance,
            });
        }
        Ok(())
    }

    /// Window and renderer settings for [`Engine::run`](orrery_engine::Engine::run)
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            title: self.window.title.clone(),
            width: self.window.width,
            height: self.window.height,
            renderer: VulkanRendererConfig {
                application_name: self.window.title.clone(),
                shader_dir: self.assets.shader_dir.clone(),
                vsync: self.window.vsync,
                ..VulkanRendererConfig::default()
            },
        }
    }

    /// Path of the sun's texture
    pub fn sun_texture(&self) -> PathBuf {
        self.assets.texture_dir.join("sun.jpg")
    }

    /// Path of planet `index`'s texture; files are numbered from 1
    pub fn planet_texture(&self, index: usize) -> PathBuf {
        self.assets.texture_dir.join(format!("planet-{}.jpg", index + 1))
    }
}

impl CameraSettings {
    /// Starting position as a vector
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.position[0], self.position[1], self.position[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::config::ConfigFormat;

    #[test]
    fn test_defaults_are_valid() {
        let config = SolarSystemConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, None);
        assert_eq!(config.orbits.base_radius, 30.0);
        assert_eq!(config.orbits.spacing, 5.0);
    }

    #[test]
    fn test_toml_round_trip_keeps_seed_and_paths() {
        let config = SolarSystemConfig {
            seed: Some(42),
            ..SolarSystemConfig::default()
        };
        let text = ConfigFormat::Toml.render(&config).unwrap();
        let parsed: SolarSystemConfig = ConfigFormat::Toml.parse(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let parsed: SolarSystemConfig = ConfigFormat::Toml
            .parse("seed = 7\n\n[orbits]\nspacing = 6.0\n")
            .unwrap();
        assert_eq!(parsed.seed, Some(7));
        assert_eq!(parsed.orbits.spacing, 6.0);
        assert_eq!(parsed.orbits.base_radius, 30.0);
        assert_eq!(parsed.window, WindowSettings::default());
    }

    #[test]
    fn test_validation_rejects_broken_layouts() {
        let mut config = SolarSystemConfig::default();
        config.orbits.spacing = 0.0;
        assert_eq!(config.validate(), Err(ConfigValidationError::NonPositiveSpacing(0.0)));

        let mut config = SolarSystemConfig::default();
        config.orbits.min_speed = 3.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptySpeedRange { .. })
        ));
    }

    #[test]
    fn test_texture_paths_are_one_based() {
        let config = SolarSystemConfig::default();
        assert_eq!(config.planet_texture(0), PathBuf::from("resources/textures/planet-1.jpg"));
        assert_eq!(config.planet_texture(7), PathBuf::from("resources/textures/planet-8.jpg"));
        assert_eq!(config.sun_texture(), PathBuf::from("resources/textures/sun.jpg"));
    }

    #[test]
    fn test_engine_config_carries_shader_dir() {
        let config = SolarSystemConfig::default();
        let engine = config.engine_config();
        assert_eq!(engine.renderer.shader_dir, PathBuf::from("target/shaders"));
        assert_eq!(engine.width, 1280);
        assert!(engine.renderer.vsync);

        let mut config = SolarSystemConfig::default();
        config.window.vsync = false;
        assert!(!config.engine_config().renderer.vsync);
    }
}
