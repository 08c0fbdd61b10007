//! Tracing bootstrap for tests.

use tracing_subscriber::EnvFilter;

/// Installs a `RUST_LOG`-driven subscriber writing through the test
/// harness. Safe to call from every test; only the first call in the
/// process installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
