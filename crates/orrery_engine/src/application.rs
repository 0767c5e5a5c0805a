//! Application trait and lifecycle management

use thiserror::Error;

use crate::config::ConfigError;
use crate::engine::{Engine, EngineError};
use crate::render::window::{KeyCode, WindowEvent};
use crate::render::RenderError;

/// Application trait driven by [`Engine::run`]
///
/// `update` is called once per frame; an application draws by calling
/// [`GraphicsEngine::render`](crate::render::GraphicsEngine::render) from it.
pub trait Application {
    /// Build the application's world; runs once before the first frame
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Advance one frame
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Handle an input or window event; the default lets the engine react
    fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
        engine.handle_event(&event);
        Ok(())
    }

    /// Release resources before the engine shuts down
    fn cleanup(&mut self, _engine: &mut Engine) {}
}

/// Application errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Rendering error
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Application-specific error
    #[error("Application error: {0}")]
    Custom(String),
}

/// Events delivered to [`Application::handle_event`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// Drawable area resized
    WindowResized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },

    /// Window close requested
    WindowCloseRequested,

    /// Key pressed
    KeyPressed(KeyCode),

    /// Mouse wheel scrolled
    MouseWheel {
        /// Horizontal delta
        delta_x: f64,
        /// Vertical delta; positive zooms in
        delta_y: f64,
    },
}

impl From<WindowEvent> for AppEvent {
    fn from(event: WindowEvent) -> Self {
        match event {
            WindowEvent::FramebufferResized { width, height } => Self::WindowResized { width, height },
            WindowEvent::CloseRequested => Self::WindowCloseRequested,
            WindowEvent::KeyPressed(key) => Self::KeyPressed(key),
            WindowEvent::Scrolled { delta_x, delta_y } => Self::MouseWheel { delta_x, delta_y },
        }
    }
}
