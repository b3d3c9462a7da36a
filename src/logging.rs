//! Tracing helpers (ambient). The core itself only ever emits `debug!`/
//! `trace!` events — it must work with no subscriber installed. Installing
//! a subscriber is left to the CLI entry point.

use tracing_subscriber::EnvFilter;

/// Installs a `tracing-subscriber` formatter reading `RUST_LOG`, defaulting
/// to `"error"` when unset. Safe to call more than once; later calls are a
/// no-op.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .try_init();
}
