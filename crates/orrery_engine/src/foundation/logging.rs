//! Logging utilities
//!
//! Re-exports the `log` macros and sets up `env_logger` with a default
//! filter that `RUST_LOG` can override.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// `default_filter` applies when `RUST_LOG` is unset, e.g. `"info"` or
/// `"orrery_engine=debug,solar_system=info"`. Calling this twice is harmless;
/// the second call is ignored.
pub fn init(default_filter: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();
}
