//! Structured logging setup for the strata tools.
//!
//! Library crates emit events through `tracing`; only binaries install a
//! subscriber, via [`init_logging`].

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console logging.
///
/// The filter honors `RUST_LOG` when set and falls back to `default_filter`
/// (e.g. `"info"`). Safe to call once per process; later calls are ignored
/// by the subscriber registry.
pub fn init_logging(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let console_layer = fmt::layer().with_target(true).with_level(true);
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}

/// The filter used when neither `RUST_LOG` nor a caller override applies.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_enables_info() {
        let filter = default_env_filter();
        assert!(format!("{filter}").contains("info"));
    }

    #[test]
    fn test_repeated_init_does_not_panic() {
        init_logging("info");
        init_logging("debug");
    }
}
