//! Tracing setup for tests
//!
//! Call [`init_test_tracing`] at the top of a test to see the domain's
//! `tracing` output. Honours `RUST_LOG`, defaulting to `warn`.

use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Installs a test-friendly tracing subscriber once per process
pub fn init_test_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn"))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        // Another harness may already own the global subscriber
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_test_writer().with_target(true))
            .try_init();
    });
}
