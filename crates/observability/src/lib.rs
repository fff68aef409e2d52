//! Tracing/logging setup shared by Outpost binaries.

/// Initialize process-wide logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(config: &LogConfig) {
    tracing::init(config);
}

/// Subscriber configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{LOG_FILTER_VAR, LOG_FORMAT_VAR, LogConfig, LogConfigError, LogFormat};
