use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber. `RUST_LOG` wins over `default_level`.
/// Calling it again is a no-op.
pub fn setup_logger(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn level_for_verbosity(occurrences: u64) -> &'static str {
    match occurrences {
        0 => "warn",
        1 => "info",
        _ => "debug"
    }
}
