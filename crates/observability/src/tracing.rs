//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// How the global subscriber is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Filter used when `RUST_LOG` is unset or invalid.
    pub default_filter: String,
    /// JSON lines when true, human-readable text otherwise.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            json: true,
        }
    }
}

impl ObservabilityConfig {
    pub fn plain(default_filter: impl Into<String>) -> Self {
        Self {
            default_filter: default_filter.into(),
            json: false,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.default_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed (the call is then a
/// no-op).
pub fn init_with(config: &ObservabilityConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        init_with(&ObservabilityConfig::plain("debug"));
        assert!(!init_with(&ObservabilityConfig::default()));
        crate::init();
        ::tracing::info!("still logging after repeated init");
    }

    #[test]
    fn bad_default_filter_falls_back_to_info() {
        let config = ObservabilityConfig::plain("not a [valid filter");
        // Only checks that building the filter does not panic.
        let _ = config.filter();
    }
}
