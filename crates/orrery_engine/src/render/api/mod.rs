//! Public rendering API
//!
//! The backend trait, resource handles and the per-frame data handed to
//! backends.

pub mod frame_data;
pub mod render_backend;

pub use frame_data::{DrawCommand, FrameData, FrameLighting};
pub use render_backend::{BackendResult, MaterialHandle, MeshHandle, RenderBackend};
