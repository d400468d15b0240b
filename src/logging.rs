use std::time::Instant;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. Output goes to stderr because stdout
/// carries the JSON-RPC stream.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

pub fn request_summary(line_bytes: usize, responded: bool, started_at: Instant) {
    let elapsed_us = started_at.elapsed().as_micros();

    info!(
        line_bytes,
        responded,
        duration_us = elapsed_us,
        "request summary"
    );
}
