//! Process-wide tracing setup.

use tracing_subscriber::EnvFilter;

/// Initialize tracing to stderr.
///
/// Stdout is reserved for command output (`--list`, `--current`), so
/// diagnostics must not interleave with it. `--debug` forces the debug
/// level; otherwise `RUST_LOG` applies, defaulting to warnings only.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
