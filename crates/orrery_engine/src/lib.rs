//! # Orrery Engine
//!
//! A small Vulkan scene renderer: a flat scene of textured meshes, one point
//! light, a perspective camera with wheel zoom, and a host frame loop.
//!
//! ## Features
//!
//! - **Vulkan Rendering**: forward pass with depth, textures and push constants
//! - **Procedural Geometry**: spheres, flat rings and tori
//! - **Headless Backend**: record uploads and draws without a GPU
//! - **Config Files**: TOML or RON through one [`config::Config`] trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orrery_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod render;

mod application;
mod engine;

pub use application::{AppError, AppEvent, Application};
pub use engine::{Engine, EngineConfig, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::Config,
        foundation::{
            math::{Mat4, Transform, Vec3},
            time::{Clock, ManualClock, SystemClock},
        },
        render::{
            window::KeyCode, Camera, GraphicsEngine, HeadlessBackend, LightingEnvironment, Material, Mesh, NodeId,
            PointLight, Scene, SceneNode, ZoomControls,
        },
        AppError, AppEvent, Application, Engine, EngineConfig, EngineError,
    };
}
