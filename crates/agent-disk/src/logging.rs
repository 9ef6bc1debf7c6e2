//! Logger bootstrap for binaries embedding the disk manager.
//!
//! The library itself only speaks the `log` facade; the agent decides where
//! records go.

use env_logger::{Builder, Target};

/// Initialise `env_logger` from `RUST_LOG`, defaulting to `info` on stderr.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(Target::Stderr)
        .try_init();
}

/// Test-friendly logger that routes records through the test harness capture.
pub fn init_for_tests() {
    let _ = Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
