use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber that honours `RUST_LOG`, defaulting to
/// `info` when the variable is unset or invalid.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
