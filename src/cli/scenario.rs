//! Scenario files: a small TOML fixture format for the diagnostic commands.
//!
//! A scenario lists component descriptors inline and may carry an engine
//! configuration. It is meant for reproducing a selection problem, not as a
//! descriptor interchange format.
//!
//! ```toml
//! [config]
//! component_governed_keys = ["org.gradle.status"]
//!
//! [[components]]
//! id = "org.example:lib:1.0"
//! attributes = { "org.gradle.status" = "release" }
//!
//! [[components.variants]]
//! name = "apiElements"
//! attributes = { "org.gradle.usage" = "java-api", "org.gradle.jvm.version" = 11 }
//! artifacts = [{ name = "lib-1.0", extension = "jar" }]
//!
//! [[components.variants.dependencies]]
//! group = "org.example"
//! name = "platform"
//! version = "1.0"
//! attributes = { "org.gradle.category" = "platform" }
//! ```
//!
//! Text values become named values unless the schema declares another type.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::attributes::{AttributeSet, AttributeType, AttributeValue};
use crate::component::{
    ArtifactRef, ComponentDescriptor, ComponentIdentifier, DependencyRef, DescriptorRegistry, RawVariant,
};
use crate::config::{EngineConfig, parse_config};
use crate::core::{self, VariantError};
use crate::schema::AttributesSchema;
use crate::session::ResolutionSession;

/// An attribute value as written in TOML or on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// `true` / `false`
    Bool(bool),
    /// Integer literal
    Integer(i64),
    /// Any text
    Text(String),
}

impl RawValue {
    /// Interpret command-line text: booleans and integers are recognised,
    /// anything else is text.
    pub fn from_arg(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => raw.parse::<i64>().map_or_else(|_| Self::Text(raw.to_string()), Self::Integer),
        }
    }

    /// Convert to a typed value; the declared type wins over the literal's
    /// own shape.
    pub fn to_value(&self, declared: Option<AttributeType>) -> core::Result<AttributeValue> {
        match (self, declared) {
            (Self::Text(text), Some(value_type)) => AttributeValue::parse(value_type, text),
            (Self::Text(text), None) => Ok(AttributeValue::named(text)),
            (Self::Integer(i), None | Some(AttributeType::Integer)) => Ok(AttributeValue::Integer(*i)),
            (Self::Bool(b), None | Some(AttributeType::Boolean)) => Ok(AttributeValue::Boolean(*b)),
            (Self::Integer(i), Some(value_type)) => AttributeValue::parse(value_type, &i.to_string()),
            (Self::Bool(b), Some(value_type)) => AttributeValue::parse(value_type, &b.to_string()),
        }
    }
}

/// Build an attribute set from raw values, typing each by the schema.
pub fn attribute_set(
    raw: &BTreeMap<String, RawValue>,
    schema: &AttributesSchema,
) -> core::Result<AttributeSet> {
    let mut entries = Vec::with_capacity(raw.len());
    for (name, value) in raw {
        entries.push((name.as_str(), value.to_value(schema.value_type(name))?));
    }
    AttributeSet::from_entries(entries)
}

/// Parse `key=value` command-line pairs into an attribute set.
pub fn parse_attribute_args(args: &[String], schema: &AttributesSchema) -> core::Result<AttributeSet> {
    let mut raw = BTreeMap::new();
    for arg in args {
        let (key, value) = arg.split_once('=').ok_or_else(|| VariantError::ConfigError {
            message: format!("attribute '{arg}' must be written as key=value"),
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(VariantError::ConfigError {
                message: format!("attribute '{arg}' has an empty name"),
            });
        }
        raw.insert(key.to_string(), RawValue::from_arg(value.trim()));
    }
    attribute_set(&raw, schema)
}

/// Top level of a scenario file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Engine configuration used unless `--config` is given
    pub config: Option<EngineConfig>,
    /// Component descriptors
    pub components: Vec<ComponentSpec>,
}

/// One component descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentSpec {
    /// `group:name:version`
    pub id: String,
    /// Component-level attributes
    #[serde(default)]
    pub attributes: BTreeMap<String, RawValue>,
    /// Declared variants, in order
    #[serde(default)]
    pub variants: Vec<VariantSpec>,
}

/// One declared variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantSpec {
    /// Variant name
    pub name: String,
    /// Variant-level attributes
    #[serde(default)]
    pub attributes: BTreeMap<String, RawValue>,
    /// Published artifacts
    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,
    /// Declared dependencies
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
}

/// One artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactSpec {
    /// Base name
    pub name: String,
    /// Extension, defaults to `jar`
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Classifier
    pub classifier: Option<String>,
    /// Explicit location
    pub url: Option<String>,
}

fn default_extension() -> String {
    "jar".to_string()
}

/// One dependency.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencySpec {
    /// Target group
    pub group: String,
    /// Target name
    pub name: String,
    /// Version requirement
    pub version: String,
    /// Attributes requested on the edge
    #[serde(default)]
    pub attributes: BTreeMap<String, RawValue>,
    /// Reason
    pub reason: Option<String>,
}

impl ComponentSpec {
    /// Structural checks are left to realization so that one malformed
    /// component does not hide the rest of the scenario.
    fn to_descriptor(&self, schema: &AttributesSchema) -> Result<ComponentDescriptor> {
        let id: ComponentIdentifier = self.id.parse()?;
        let mut descriptor = ComponentDescriptor::new(id, attribute_set(&self.attributes, schema)?);

        for variant in &self.variants {
            let mut raw = RawVariant::new(&variant.name, attribute_set(&variant.attributes, schema)?);
            for artifact in &variant.artifacts {
                raw = raw.with_artifact(ArtifactRef {
                    name: artifact.name.clone(),
                    extension: artifact.extension.clone(),
                    classifier: artifact.classifier.clone(),
                    url: artifact.url.clone(),
                });
            }
            for dependency in &variant.dependencies {
                let mut dep = DependencyRef::new(&dependency.group, &dependency.name, &dependency.version)
                    .with_attributes(attribute_set(&dependency.attributes, schema)?);
                dep.reason = dependency.reason.clone();
                raw = raw.with_dependency(dep);
            }
            descriptor = descriptor.with_variant(raw);
        }
        Ok(descriptor)
    }
}

impl Scenario {
    /// Load a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        parse_config(path)
    }

    /// Build a descriptor registry, typing attribute values by `schema`.
    pub fn registry(&self, schema: &AttributesSchema) -> Result<DescriptorRegistry> {
        let registry = DescriptorRegistry::new();
        for component in &self.components {
            let descriptor = component
                .to_descriptor(schema)
                .with_context(|| format!("Invalid component '{}' in scenario", component.id))?;
            if registry.register(descriptor).is_some() {
                anyhow::bail!("Component '{}' is declared twice in the scenario", component.id);
            }
        }
        Ok(registry)
    }

    /// Open a resolution session over this scenario's components.
    ///
    /// `config_override` replaces the scenario's own `[config]` table.
    pub fn session(&self, config_override: Option<EngineConfig>) -> Result<ResolutionSession> {
        let config = config_override.or_else(|| self.config.clone()).unwrap_or_default();
        let schema = config.schema.to_schema()?;
        let registry = Arc::new(self.registry(&schema)?);
        tracing::debug!(target: "config", "scenario loaded with {} component(s)", registry.len());
        Ok(ResolutionSession::new(registry, config)?)
    }
}
