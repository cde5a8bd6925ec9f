//! Tracing subscriber setup for the carbonlock binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the embedding program. The CLI calls [`init`] once at startup.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects debug output and the
/// default is warnings only.
pub fn init(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::new(Level::WARN.to_string())
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
