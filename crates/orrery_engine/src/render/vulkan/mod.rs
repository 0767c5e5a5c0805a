//! Vulkan rendering backend
//!
//! RAII wrappers around raw `ash` handles plus [`VulkanRenderer`], the
//! [`RenderBackend`](crate::render::api::RenderBackend) implementation that
//! ties them together. Every wrapper owns a clone of the `ash::Device` and
//! destroys its handle on drop, so owners only need to get field order
//! right: resources are declared before the context that created them.

pub mod buffer;
pub mod commands;
pub mod context;
pub mod descriptor;
pub mod framebuffer;
pub mod pipeline;
pub mod render_pass;
pub mod renderer;
pub mod swapchain;
pub mod sync;
pub mod texture;

use ash::vk;
use thiserror::Error;

pub use context::{LogicalDevice, PhysicalDeviceInfo, VulkanContext, VulkanInstance};
pub use renderer::{VulkanRenderer, VulkanRendererConfig};
pub use swapchain::Swapchain;

/// Vulkan-specific error types
#[derive(Error, Debug)]
pub enum VulkanError {
    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// Invalid operation attempted
    #[error("Invalid operation: {reason}")]
    InvalidOperation {
        /// Description of why the operation is invalid
        reason: String,
    },

    /// Vulkan context initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// No suitable memory type found for allocation
    #[error("No suitable memory type found")]
    NoSuitableMemoryType,

    /// Shader bytecode could not be read
    #[error("Shader error: {0}")]
    Shader(String),
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;

impl From<VulkanError> for crate::render::RenderError {
    fn from(error: VulkanError) -> Self {
        match error {
            VulkanError::InitializationFailed(reason) => Self::InitializationFailed(reason),
            other => Self::BackendError(other.to_string()),
        }
    }
}
