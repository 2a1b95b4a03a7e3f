//! Tracing/logging setup shared by every binary that embeds the fruit store.

/// Initialize process-wide tracing with the default configuration.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(&tracing::ObservabilityConfig::default());
}

/// Subscriber configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{ObservabilityConfig, init_with};
