//! Logging setup for the command line tool.

use tracing_subscriber::EnvFilter;

/// Setup logging of events reported by the benchmark.
///
/// Without `verbose`, completed measurements and the final summary are
/// logged at info level; `verbose` adds the per-attempt retry and timeout
/// events at debug level.
///
/// Use the RUST_LOG environment variable to override the defaults.
///
/// E.g. to silence everything but the measurement events:
///   RUST_LOG=OFF,dnsbench::measurement=INFO
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init()
        .ok();
}
