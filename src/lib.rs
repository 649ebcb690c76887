//! variant-select - variant realization and attribute-based variant selection
//!
//! The core of a dependency resolver's variant handling. A component publishes
//! several variants (API jars, runtime jars, platform definitions, builds for
//! different JVM versions); each variant carries a set of typed attributes. This
//! crate merges each variant's attributes with the component-level attributes
//! into immutable [`metadata::ConfigurationMetadata`] and, given the attributes
//! a consumer asks for, selects the single variant that fits best.
//!
//! # Architecture Overview
//!
//! - Descriptors come from a [`component::DescriptorProvider`]; parsing real
//!   descriptor files happens elsewhere.
//! - A [`realize::RealizationEngine`] realizes each `(component, variant)` pair
//!   at most once per session, even under concurrent requests.
//! - An [`selection::AttributeMatcher`] filters candidates by compatibility and
//!   narrows them with the rules of an [`schema::AttributesSchema`].
//! - A [`session::ResolutionSession`] ties one cache, one attribute factory and
//!   one schema together.
//!
//! # Core Modules
//!
//! - [`attributes`] - immutable attribute sets, merge semantics, interning
//! - [`component`] - component identifiers, raw variants, descriptors
//! - [`metadata`] - realized configuration metadata
//! - [`realize`] - compute-once realization engine and its cache
//! - [`schema`] - compatibility and disambiguation rules
//! - [`selection`] - variant selection and failure diagnostics
//! - [`session`] - per-resolution session facade
//! - [`config`] - TOML engine configuration
//! - [`core`] - error types
//! - [`cli`] - diagnostic command line
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use variant_select::attributes::{AttributeSet, AttributeValue};
//! use variant_select::component::{ComponentDescriptor, ComponentIdentifier, DescriptorRegistry, RawVariant};
//! use variant_select::config::EngineConfig;
//! use variant_select::session::ResolutionSession;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let usage = |v: &str| AttributeSet::from_entries([("org.gradle.usage", AttributeValue::named(v))]);
//! let id = ComponentIdentifier::new("org.example", "lib", "1.0");
//!
//! let registry = Arc::new(DescriptorRegistry::new());
//! registry.register(
//!     ComponentDescriptor::new(id.clone(), AttributeSet::empty())
//!         .with_variant(RawVariant::new("apiElements", usage("java-api")?))
//!         .with_variant(RawVariant::new("runtimeElements", usage("java-runtime")?)),
//! );
//!
//! let session = ResolutionSession::new(registry, EngineConfig::default())?;
//! let selected = session.select_variant(&id, &usage("java-runtime")?).await?;
//! assert_eq!(selected.name(), "runtimeElements");
//! # Ok(())
//! # }
//! ```

pub mod attributes;
pub mod cli;
pub mod component;
pub mod config;
pub mod constants;
pub mod core;
pub mod metadata;
pub mod realize;
pub mod schema;
pub mod selection;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
