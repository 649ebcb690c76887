//! Test utilities for variant-select
//!
//! Helpers shared by unit, integration and stress tests:
//! - one-time tracing initialisation
//! - attribute set shorthands and sample descriptors
//! - scenario files for command-line tests
//! - an instrumented descriptor provider for concurrency tests
//!
//! # Example
//!
//! ```rust,no_run
//! use variant_select::test_utils::{fixtures, init_test_logging};
//!
//! init_test_logging(None);
//! let library = fixtures::java_library("org.example", "lib", "1.0");
//! assert_eq!(library.variants().len(), 3);
//! ```

pub mod fixtures;
pub mod provider;

pub use fixtures::{ScenarioFixture, attrs, named_attrs};
pub use provider::CountingProvider;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=realize=trace,selection=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(true)
            .try_init();
    });
}
