//! Unit test suite for variant-select
//!
//! Property tests for attribute merging and selection determinism. Module
//! level behaviour is covered by the `#[cfg(test)]` modules next to the code.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod merge_properties;
mod selection_determinism;
