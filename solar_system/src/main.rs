//! Solar system demo
//!
//! Usage: `solar_system [config.toml|config.ron]`. Without an argument the
//! built-in defaults are used.

use orrery_engine::config::Config;
use orrery_engine::foundation::logging;
use orrery_engine::Engine;
use solar_system::{SolarSystemApp, SolarSystemConfig};

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred: {}", panic_info);
        if let Some(location) = panic_info.location() {
            eprintln!("Panic location: {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    logging::init("info");
    log::info!("Starting Solar System");

    let config = match std::env::args().nth(1) {
        Some(path) => match SolarSystemConfig::load_from_file(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path);
                config
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SolarSystemConfig::default(),
    };

    if let Err(e) = config.validate() {
        log::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let mut app = SolarSystemApp::new(config.clone());
    match Engine::run(config.engine_config(), &mut app) {
        Ok(()) => log::info!("Solar System finished successfully"),
        Err(e) => {
            log::error!("Application error: {}", e);
            std::process::exit(1);
        }
    }
}
