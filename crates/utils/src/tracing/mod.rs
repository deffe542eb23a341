use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// Honours `RUST_LOG`, falling back to `info`. Output goes to stderr in a
/// compact single-line format so it can be shipped as-is by log collectors.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span for one authentication attempt
pub fn auth_span(api_key: &str) -> Span {
    span!(Level::DEBUG, "authenticate", api_key = %api_key)
}

/// Emit a structured event for cache operations
pub fn cache_event(api_key: &str, hit: bool, operation: &str) {
    if hit {
        debug!(
            api_key = %api_key,
            operation = %operation,
            "cache_hit"
        );
    } else {
        debug!(
            api_key = %api_key,
            operation = %operation,
            "cache_miss"
        );
    }
}
