use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log to stderr so command output on stdout stays clean. `RUST_LOG`
/// overrides the default `warn` level.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "buddy=debug,buddy_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
