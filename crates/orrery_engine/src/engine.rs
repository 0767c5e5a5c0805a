//! Host frame loop
//!
//! [`Engine::run`] opens the window, creates the Vulkan renderer and then
//! loops: poll window events, dispatch them to the application, call
//! [`Application::update`]. The loop ends when the window closes or anyone
//! calls [`Engine::quit`].

use thiserror::Error;

use crate::application::{AppEvent, Application};
use crate::foundation::time::{Clock, SystemClock, Timer};
use crate::render::api::RenderBackend;
use crate::render::window::{KeyCode, WindowError, WindowHandle};
use crate::render::{GraphicsEngine, RenderError, VulkanRendererConfig};

/// Main engine struct
pub struct Engine {
    graphics_engine: GraphicsEngine,
    clock: Box<dyn Clock>,
    timer: Timer,
    running: bool,
}

impl Engine {
    /// Wrap an existing graphics engine; time comes from `clock`
    pub fn new(graphics_engine: GraphicsEngine, clock: Box<dyn Clock>) -> Self {
        Self {
            graphics_engine,
            clock,
            timer: Timer::new(),
            running: true,
        }
    }

    /// Engine over any backend, e.g. the headless one in tests
    pub fn with_backend(backend: Box<dyn RenderBackend>, clock: Box<dyn Clock>) -> Self {
        Self::new(GraphicsEngine::new(backend), clock)
    }

    /// Open a window and run `app` until it quits or the window closes
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        log::info!("Initializing engine...");
        let mut window = WindowHandle::new(&config.title, config.width, config.height)?;
        let graphics_engine = GraphicsEngine::new_from_window(&mut window, &config.renderer)?;
        let mut engine = Self::new(graphics_engine, Box::new(SystemClock));

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {}", e)))?;

        log::info!("Starting main loop...");
        let result = engine.main_loop(&mut window, app);

        if let Err(e) = engine.graphics_engine.wait_idle() {
            log::warn!("GPU did not go idle before shutdown: {}", e);
        }
        app.cleanup(&mut engine);

        log::info!(
            "Engine shutdown complete after {} frames ({:.1} fps average)",
            engine.graphics_engine.frame_count(),
            engine.timer.average_fps()
        );
        result
    }

    fn main_loop<T: Application>(&mut self, window: &mut WindowHandle, app: &mut T) -> Result<(), EngineError> {
        while self.running {
            if window.should_close() {
                self.quit();
                break;
            }

            for event in window.poll_events() {
                self.dispatch(app, event.into())?;
            }
            if !self.running {
                break;
            }

            let (width, height) = self.graphics_engine.surface_size();
            if width == 0 || height == 0 {
                // Minimized: block instead of spinning until the window comes back
                window.wait_events();
                continue;
            }

            self.frame(app)?;
        }
        Ok(())
    }

    /// Deliver one event to the application
    pub fn dispatch<T: Application>(&mut self, app: &mut T, event: AppEvent) -> Result<(), EngineError> {
        log::trace!("Dispatching {:?}", event);
        app.handle_event(self, event)
            .map_err(|e| EngineError::ApplicationError(format!("App event: {}", e)))
    }

    /// Run one frame of `app`
    pub fn frame<T: Application>(&mut self, app: &mut T) -> Result<(), EngineError> {
        self.timer.update();
        let delta_time = self.timer.delta_time();
        app.update(self, delta_time)
            .map_err(|e| EngineError::ApplicationError(format!("App update: {}", e)))
    }

    /// Engine-level reaction to an event: close and Escape stop the loop
    pub fn handle_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::WindowCloseRequested | AppEvent::KeyPressed(KeyCode::Escape) => self.quit(),
            _ => {}
        }
    }

    /// Stop the loop before the next frame
    pub fn quit(&mut self) {
        if self.running {
            log::info!("Engine shutdown requested");
        }
        self.running = false;
    }

    /// True until [`quit`](Self::quit) is called
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Wall-clock time in milliseconds since the Unix epoch
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Seconds since the previous frame
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }

    /// Borrow the graphics engine
    pub fn graphics_engine(&self) -> &GraphicsEngine {
        &self.graphics_engine
    }

    /// Borrow the graphics engine mutably
    pub fn graphics_engine_mut(&mut self) -> &mut GraphicsEngine {
        &mut self.graphics_engine
    }
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Window title
    pub title: String,
    /// Initial window width in screen coordinates
    pub width: u32,
    /// Initial window height in screen coordinates
    pub height: u32,
    /// Vulkan renderer settings
    pub renderer: VulkanRendererConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Orrery".to_string(),
            width: 1280,
            height: 720,
            renderer: VulkanRendererConfig::default(),
        }
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine initialization failed
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Window creation or event handling failed
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Rendering failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// The application returned an error
    #[error("Application error: {0}")]
    ApplicationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;
    use crate::foundation::time::ManualClock;
    use crate::render::HeadlessBackend;
    use std::rc::Rc;

    #[derive(Default)]
    struct CountingApp {
        updates: u32,
        quit_after: Option<u32>,
        last_now: f64,
    }

    impl Application for CountingApp {
        fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
            Ok(())
        }

        fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
            self.updates += 1;
            self.last_now = engine.now_ms();
            if self.quit_after == Some(self.updates) {
                engine.quit();
            }
            Ok(())
        }
    }

    fn headless(clock: Rc<ManualClock>) -> Engine {
        Engine::with_backend(Box::new(HeadlessBackend::new(640, 480)), Box::new(clock))
    }

    #[test]
    fn test_escape_and_close_stop_the_loop() {
        let clock = Rc::new(ManualClock::new(0.0));
        let mut app = CountingApp::default();

        let mut engine = headless(clock.clone());
        engine.dispatch(&mut app, AppEvent::KeyPressed(KeyCode::Escape)).unwrap();
        assert!(!engine.is_running());

        let mut engine = headless(clock);
        engine.dispatch(&mut app, AppEvent::KeyPressed(KeyCode::Space)).unwrap();
        assert!(engine.is_running());
        engine.dispatch(&mut app, AppEvent::WindowCloseRequested).unwrap();
        assert!(!engine.is_running());
    }

    #[test]
    fn test_frame_reads_shared_clock() {
        let clock = Rc::new(ManualClock::new(1_000.0));
        let mut engine = headless(clock.clone());
        let mut app = CountingApp {
            quit_after: Some(2),
            ..CountingApp::default()
        };

        engine.frame(&mut app).unwrap();
        assert_eq!(app.last_now, 1_000.0);

        clock.advance(16.0);
        engine.frame(&mut app).unwrap();
        assert_eq!(app.last_now, 1_016.0);
        assert_eq!(app.updates, 2);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_window_events_map_to_app_events() {
        use crate::render::window::WindowEvent;

        let event: AppEvent = WindowEvent::FramebufferResized { width: 3, height: 2 }.into();
        assert_eq!(event, AppEvent::WindowResized { width: 3, height: 2 });
        let event: AppEvent = WindowEvent::Scrolled {
            delta_x: 0.0,
            delta_y: -1.0,
        }
        .into();
        assert_eq!(
            event,
            AppEvent::MouseWheel {
                delta_x: 0.0,
                delta_y: -1.0
            }
        );
    }
}
