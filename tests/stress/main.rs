//! Stress test suite for variant-select
//!
//! Concurrency tests for the compute-once realization cache. They spawn many
//! tasks on a multi-threaded runtime against a deliberately slow descriptor
//! provider so that requests for the same key overlap.
//!
//! Timings are logged rather than asserted; hangs are caught by the test
//! runner's timeout.
//!
//! ```bash
//! cargo test --test stress
//! RUST_LOG=realize=debug cargo test --test stress -- --nocapture
//! ```

mod concurrent_realization;
