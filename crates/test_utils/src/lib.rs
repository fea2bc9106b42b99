//! Test Utilities Crate
//!
//! Provides shared test infrastructure for the accounting test suites:
//!
//! - `fixtures`: pre-built taxes, dates, and seeded ledgers
//! - `builders`: builder patterns for invoices, bills, and expenses

pub mod builders;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static TRACING: OnceCell<()> = OnceCell::new();

/// Initializes test tracing once per process
///
/// Respects `RUST_LOG`; output is captured per test by the harness. Safe to
/// call from every test.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}
