use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber for the binaries.
///
/// The filter comes from `RUST_LOG` and falls back to `info`, e.g.
/// `RUST_LOG=cadet_roster=debug` to see every swap the rebalancer makes.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Debug-level subscriber that writes through the test harness. Safe to call
/// from every test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
