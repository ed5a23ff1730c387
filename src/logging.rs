//! Tracing subscriber setup for binaries and tests.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application. This helper installs a `fmt` subscriber filtered by
//! `RUST_LOG`, falling back to `default_directive` when it is unset or invalid.

use tracing_subscriber::EnvFilter;

/// Default filter: warnings everywhere, info from this crate
pub const DEFAULT_DIRECTIVE: &str = "warn,netdelay=info";

/// Install a global `fmt` subscriber.
///
/// Returns `false` if a global subscriber was already installed, which makes
/// the call safe to repeat from every test.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}
