//! # Solar System
//!
//! A sun and eight textured planets on circular orbits, each orbit traced by
//! a thin ring, with a torus riding along with the sixth planet. Built on
//! `orrery_engine`.

pub mod animation;
pub mod app;
pub mod bodies;
pub mod config;
pub mod resize;
pub mod scene_builder;
pub mod world;

pub use animation::AnimationDriver;
pub use app::SolarSystemApp;
pub use config::SolarSystemConfig;
pub use scene_builder::SceneBuilder;
pub use world::SolarSystem;
