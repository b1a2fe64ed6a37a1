//! Shared helpers for integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::{Arc, Once};

use altapay_sdk::{auth::Authentication, transport::MockTransport};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per test binary.
///
/// Filter with `RUST_LOG`, e.g. `RUST_LOG=altapay_sdk=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// Reads a file from `tests/fixtures`.
pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {path}: {e}"))
}

/// Test credentials against the default gateway URL.
pub fn auth() -> Authentication {
    Authentication::new("test_user", "test_password")
}

/// A fresh mock transport with tracing installed.
pub fn mock() -> Arc<MockTransport> {
    init_tracing();
    Arc::new(MockTransport::new())
}
