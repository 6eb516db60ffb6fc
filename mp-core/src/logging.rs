//! Process-wide `tracing` setup.
use tracing_subscriber::prelude::*;
use tracing_subscriber::{
    fmt,
    EnvFilter,
};

/// Install a formatting subscriber that writes to stderr, filtered by `env_filter` (for example
/// `info` or `mp_gen=debug,warn`).
///
/// Logs go to stderr so that generated manifests can be piped from stdout.
pub fn setup(env_filter: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .with(EnvFilter::new(env_filter))
        .init();
}
