//! Diagnostics on stderr, filtered by `RUST_LOG`.
//!
//! - `RUST_LOG=debug` logs every file outlined
//! - `RUST_LOG=jsoutline::builder=trace` also logs each skipped construct

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the stderr subscriber. Stdout stays reserved for outline output.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}
