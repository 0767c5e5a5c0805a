//! Core primitive types for rendering
//!
//! Backend-independent camera and geometry types.

pub mod camera;
pub mod mesh;

pub use camera::Camera;
pub use mesh::{Mesh, Vertex};
