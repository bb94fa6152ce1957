//! Subscriber setup. `RUST_LOG` takes precedence over the CLI flags.

use tracing_subscriber::EnvFilter;

use crate::GlobalArgs;

/// Returns the filter directive implied by the global flags.
pub fn default_directive(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "info"
    }
}

/// Installs the global `fmt` subscriber writing to stderr.
pub fn init(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(global)))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
