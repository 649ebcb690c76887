//! Core types shared by every module: the error type and its user-facing wrapper.
//!
//! # Error Handling Pattern
//!
//! Core operations return [`Result`] with a typed [`VariantError`], so callers
//! can match on the failure kind. Outer layers (configuration loading, the
//! command line) use `anyhow` and turn errors into an [`ErrorContext`] with
//! [`user_friendly_error`] for display.
//!
//! ```rust
//! use variant_select::attributes::{AttributeSet, AttributeValue};
//! use variant_select::core::VariantError;
//!
//! let result = AttributeSet::from_entries([
//!     ("org.gradle.jvm.version", AttributeValue::Integer(17)),
//!     ("org.gradle.jvm.version", AttributeValue::string("17")),
//! ]);
//! assert!(matches!(result, Err(VariantError::AttributeTypeMismatch { .. })));
//! ```

pub mod error;

pub use error::{ErrorContext, Result, VariantError, user_friendly_error};
