//! Diagnostic logging setup
//!
//! Library code emits `tracing` events; the binary installs a console
//! subscriber here. Filtering follows the `RUST_LOG` environment variable:
//! - `RUST_LOG=debug` - everything, including skipped config lines
//! - `RUST_LOG=cfg_keybind_manager::core::merge=debug` - one module only
//!
//! Logs go to stderr so reports printed on stdout stay clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Installs the global subscriber
///
/// `verbose` raises the default level from `warn` to `debug` when `RUST_LOG`
/// is unset. Calling this twice is harmless; the second call is ignored.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
