use std::str::FromStr;

/// Initialize tracing for the application.
///
/// `default_level` accepts the usual level names ("error", "warn", "info",
/// "debug", "trace"); anything unrecognized falls back to `info`.
pub fn init(default_level: &str) {
    let level = tracing::Level::from_str(default_level).unwrap_or(tracing::Level::INFO);

    // try_init so tests and embedding callers can call this repeatedly
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
