//! Logging utilities and structured logging support
//!
//! The library only ever emits through the `log` facade; binaries decide
//! whether and how to install a logger.

pub use log::{debug, info, warn, error, trace, LevelFilter};

/// Initialize logging with a default level, still overridable through `RUST_LOG`
///
/// Safe to call more than once (later calls are ignored), which keeps tests
/// that each want logging from fighting over the global logger.
pub fn init_with_level(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
