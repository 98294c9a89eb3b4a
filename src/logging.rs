//! Log setup for the binaries.
//!
//! Logs go to stderr so stdout stays free for game output and JSONL
//! records. `RUST_LOG` overrides the default filter.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "fleetfall=info,selfplay=info";

/// Filter used with `--verbose`.
pub const VERBOSE_FILTER: &str = "fleetfall=debug,selfplay=debug";

/// Installs the global subscriber. Later calls are ignored.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
