//! Error handling for variant realization and selection
//!
//! This module provides the typed error enum returned by every core operation
//! and the user-facing wrapper used by the command line.
//!
//! # Architecture
//!
//! - [`VariantError`] - Enumerated failures. The four resolution failure kinds
//!   ([`AttributeTypeMismatch`], [`MalformedDescriptor`], [`NoMatchingVariant`],
//!   [`AmbiguousVariantSelection`]) are always distinguishable by variant.
//! - [`ErrorContext`] - Wrapper that adds a suggestion and details for display.
//!
//! Realization failures are local to one component: the realization cache
//! never commits a failed computation, so a later request retries cleanly.
//! Selection failures carry the full [`SelectionFailure`] report (requested
//! attributes and every candidate's attributes) because the usual remedy is to
//! adjust attribute declarations.
//!
//! # Examples
//!
//! ```rust,no_run
//! use variant_select::core::{VariantError, user_friendly_error};
//!
//! fn check(result: variant_select::core::Result<()>) {
//!     match result {
//!         Ok(()) => {}
//!         Err(VariantError::AmbiguousVariantSelection(failure)) => {
//!             eprintln!("{}", failure.render());
//!         }
//!         Err(e) => user_friendly_error(anyhow::Error::from(e)).display(),
//!     }
//! }
//! ```
//!
//! [`AttributeTypeMismatch`]: VariantError::AttributeTypeMismatch
//! [`MalformedDescriptor`]: VariantError::MalformedDescriptor
//! [`NoMatchingVariant`]: VariantError::NoMatchingVariant
//! [`AmbiguousVariantSelection`]: VariantError::AmbiguousVariantSelection

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::attributes::AttributeType;
use crate::selection::SelectionFailure;

/// Result alias used by all core operations.
pub type Result<T> = std::result::Result<T, VariantError>;

/// The error type for realization and selection.
///
/// # Error Categories
///
/// ## Realization (fatal for one component only)
/// - [`AttributeTypeMismatch`] - one attribute name declared with two types
/// - [`MalformedDescriptor`] - descriptor is missing required identity data
/// - [`ComponentNotFound`] - the descriptor provider has no such component
/// - [`VariantNotFound`] - the component declares no variant of that name
///
/// ## Selection (fatal for one dependency edge)
/// - [`NoMatchingVariant`] - no candidate is compatible with the request
/// - [`AmbiguousVariantSelection`] - several candidates survive disambiguation
///
/// ## Configuration
/// - [`ConfigError`] - invalid schema or engine configuration
///
/// [`AttributeTypeMismatch`]: VariantError::AttributeTypeMismatch
/// [`MalformedDescriptor`]: VariantError::MalformedDescriptor
/// [`ComponentNotFound`]: VariantError::ComponentNotFound
/// [`VariantNotFound`]: VariantError::VariantNotFound
/// [`NoMatchingVariant`]: VariantError::NoMatchingVariant
/// [`AmbiguousVariantSelection`]: VariantError::AmbiguousVariantSelection
/// [`ConfigError`]: VariantError::ConfigError
#[derive(Error, Debug, Clone)]
pub enum VariantError {
    /// The same attribute name carries two different declared types.
    ///
    /// This is a data-integrity problem in a descriptor, not a normal runtime
    /// condition. It fails the realization of the affected component.
    #[error("Attribute '{attribute}' is declared as both {first} and {second}")]
    AttributeTypeMismatch {
        /// Name of the conflicting attribute
        attribute: String,
        /// Type on the winning (variant / earlier) side
        first: AttributeType,
        /// Type on the other side
        second: AttributeType,
    },

    /// A descriptor or one of its variants is structurally invalid.
    #[error("Malformed descriptor for {component}: {reason}")]
    MalformedDescriptor {
        /// Display form of the component identifier
        component: String,
        /// What is missing or invalid
        reason: String,
    },

    /// The descriptor provider does not know the component.
    #[error("No descriptor available for component {component}")]
    ComponentNotFound {
        /// Display form of the component identifier
        component: String,
    },

    /// The component declares no variant with the requested name.
    #[error("Component {component} has no variant named '{variant}'")]
    VariantNotFound {
        /// Display form of the component identifier
        component: String,
        /// Requested variant name
        variant: String,
        /// Variant names the component does declare
        available: Vec<String>,
    },

    /// No candidate variant is compatible with the requested attributes.
    #[error(
        "No variant matches the requested attributes {} ({} candidate(s) considered)",
        .0.requested,
        .0.candidates.len()
    )]
    NoMatchingVariant(Box<SelectionFailure>),

    /// More than one candidate remains after disambiguation.
    #[error(
        "Cannot choose between {} variants matching {}",
        .0.candidates.len(),
        .0.requested
    )]
    AmbiguousVariantSelection(Box<SelectionFailure>),

    /// Invalid engine or schema configuration.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },
}

impl VariantError {
    /// Selection report carried by the selection failure kinds.
    pub fn selection_failure(&self) -> Option<&SelectionFailure> {
        match self {
            Self::NoMatchingVariant(failure) | Self::AmbiguousVariantSelection(failure) => {
                Some(failure)
            }
            _ => None,
        }
    }
}

/// Error wrapper with user-friendly suggestions for CLI display.
///
/// ```rust,no_run
/// use variant_select::core::{ErrorContext, VariantError};
///
/// let context = ErrorContext::new(VariantError::ComponentNotFound {
///     component: "org:lib:1.0".to_string(),
/// })
/// .with_suggestion("Add the component to the scenario file");
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: VariantError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    #[must_use]
    pub const fn new(error: VariantError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`VariantError`] anywhere in the error chain, TOML parse errors
/// and I/O errors; everything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(variant_error) = error.chain().find_map(|e| e.downcast_ref::<VariantError>()) {
        return create_error_context(variant_error.clone());
    }

    if let Some(toml_error) = error.chain().find_map(|e| e.downcast_ref::<toml::de::Error>()) {
        return ErrorContext::new(VariantError::ConfigError {
            message: error.to_string(),
        })
        .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and table names")
        .with_details(toml_error.to_string());
    }

    if let Some(io_error) = error.chain().find_map(|e| e.downcast_ref::<std::io::Error>()) {
        if io_error.kind() == std::io::ErrorKind::NotFound {
            return ErrorContext::new(VariantError::ConfigError {
                message: error.to_string(),
            })
            .with_suggestion("Check that the file exists and the path is correct");
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(VariantError::ConfigError {
        message,
    })
}

fn create_error_context(error: VariantError) -> ErrorContext {
    match &error {
        VariantError::AttributeTypeMismatch { attribute, .. } => {
            let attribute = attribute.clone();
            ErrorContext::new(error)
                .with_suggestion(format!(
                    "Declare '{attribute}' with one type across the component and all of its variants"
                ))
                .with_details("Component-level and variant-level attributes are merged; a name cannot change type between them")
        }

        VariantError::MalformedDescriptor { .. } => ErrorContext::new(error)
            .with_suggestion("Fix the component descriptor; only this component is affected")
            .with_details("Every component needs a group, name and version, and every variant a unique non-empty name"),

        VariantError::ComponentNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Check the component coordinates (group:name:version)"),

        VariantError::VariantNotFound { available, .. } => {
            let available = if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            };
            ErrorContext::new(error).with_details(format!("Declared variants: {available}"))
        }

        VariantError::NoMatchingVariant(failure) => {
            let details = failure.render();
            ErrorContext::new(error)
                .with_suggestion("Request attributes that a declared variant provides, or register a compatibility rule")
                .with_details(details)
        }

        VariantError::AmbiguousVariantSelection(failure) => {
            let details = failure.render();
            ErrorContext::new(error)
                .with_suggestion("Request a more specific attribute or register a disambiguation rule for one of the differing attributes")
                .with_details(details)
        }

        VariantError::ConfigError { .. } => ErrorContext::new(error),
    }
}
