use secretconf_core::{DEFAULT_LOG_FILTER, SECRETCONF_LOG_VAR};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// The filter is read from `SECRETCONF_LOG`, then `RUST_LOG`, and falls back
/// to `info`. Output goes to stderr without ANSI colours so it stays readable
/// when captured by a process supervisor.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Install a subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_for_tests() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_test_writer().compact())
        .try_init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(SECRETCONF_LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Create a span covering one refresh cycle of a provider
pub fn refresh_span(provider: &str, secrets: usize) -> Span {
    span!(Level::DEBUG, "refresh", provider = %provider, secrets = %secrets)
}
