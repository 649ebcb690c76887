//! Engine configuration.
//!
//! All settings live in one TOML document and every field has a default, so an
//! empty file (or no file at all) gives exact matching, no disambiguation rules
//! and strict variant precedence.
//!
//! ```toml
//! # Keys whose component-level value overrides the variant value
//! component_governed_keys = ["org.gradle.status"]
//!
//! [schema]
//! precedence = ["org.gradle.usage", "org.gradle.category"]
//!
//! [schema.attributes."org.gradle.usage"]
//! type = "named"
//! compatible = { "java-api" = ["java-runtime"] }
//! prefer = ["java-api", "java-runtime"]
//!
//! [schema.attributes."org.gradle.jvm.version"]
//! type = "integer"
//! compatibility = "at-most"
//! disambiguation = "closest"
//! ```
//!
//! [`EngineConfig::into_schema`] turns the `[schema]` table into an
//! [`AttributesSchema`]; invalid rule combinations are reported as
//! [`VariantError::ConfigError`].

mod parser;

pub use parser::parse_config;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::attributes::AttributeType;
use crate::core::{Result, VariantError};
use crate::schema::{
    AttributesSchema, CompatibleValues, ExactMatch, IntegerAtMost, PreferClosestInteger, PreferHighest,
    PreferLowest, PreferRequested, PreferValues,
};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Keys for which the component-level value wins over the variant value
    pub component_governed_keys: Vec<String>,
    /// Attribute matching rules
    pub schema: SchemaConfig,
}

/// The `[schema]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Explicit disambiguation order
    pub precedence: Vec<String>,
    /// Per-attribute rules
    pub attributes: BTreeMap<String, AttributeRuleConfig>,
}

/// Compatibility rule selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompatibilityKind {
    /// Equal values only (plus the `compatible` table, if any)
    Exact,
    /// Provided integer must not exceed the requested one
    AtMost,
}

/// Disambiguation rule selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisambiguationKind {
    /// First value of `prefer` present among candidates
    Prefer,
    /// Highest value (natural order or `order`)
    Highest,
    /// Lowest value (natural order or `order`)
    Lowest,
    /// Value equal to the requested one
    Requested,
    /// Highest integer not above the requested one
    Closest,
}

/// Rules for one attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttributeRuleConfig {
    /// Declared value type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<AttributeType>,
    /// Whether candidates must provide the attribute when it is requested
    pub mandatory: bool,
    /// Requested value -> provided values that also satisfy it
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub compatible: BTreeMap<String, Vec<String>>,
    /// Compatibility rule, defaults to exact matching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<CompatibilityKind>,
    /// Disambiguation rule; defaults to `prefer` when `prefer` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disambiguation: Option<DisambiguationKind>,
    /// Preference list for the `prefer` rule
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prefer: Vec<String>,
    /// Explicit order, lowest first, for `highest` / `lowest`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<String>,
}

fn config_error(message: String) -> VariantError {
    VariantError::ConfigError {
        message,
    }
}

impl AttributeRuleConfig {
    fn apply(&self, name: &str, mut schema: AttributesSchema) -> Result<AttributesSchema> {
        if let Some(value_type) = self.value_type {
            schema = schema.with_type(name, value_type);
        }
        if self.mandatory {
            schema = schema.mandatory(name);
        }

        let integer_only = |rule: &str| -> Result<()> {
            match self.value_type {
                Some(AttributeType::Integer) | None => Ok(()),
                Some(other) => Err(config_error(format!(
                    "attribute '{name}' is declared as {other}, but '{rule}' only applies to integers"
                ))),
            }
        };

        schema = match self.compatibility {
            Some(CompatibilityKind::AtMost) => {
                integer_only("at-most")?;
                if !self.compatible.is_empty() {
                    return Err(config_error(format!(
                        "attribute '{name}' cannot combine 'at-most' compatibility with a 'compatible' table"
                    )));
                }
                schema.with_compatibility(name, IntegerAtMost)
            }
            Some(CompatibilityKind::Exact) | None if self.compatible.is_empty() => {
                schema.with_compatibility(name, ExactMatch)
            }
            Some(CompatibilityKind::Exact) | None => {
                let table = self
                    .compatible
                    .iter()
                    .fold(CompatibleValues::new(), |rule, (requested, provided)| {
                        rule.allow(requested.clone(), provided.iter().cloned())
                    });
                schema.with_compatibility(name, table)
            }
        };

        let disambiguation = match (self.disambiguation, self.prefer.is_empty()) {
            (None, true) => None,
            (None, false) | (Some(DisambiguationKind::Prefer), false) => Some(DisambiguationKind::Prefer),
            (Some(DisambiguationKind::Prefer), true) => {
                return Err(config_error(format!(
                    "attribute '{name}' uses the 'prefer' rule but has an empty 'prefer' list"
                )));
            }
            (Some(kind), _) => Some(kind),
        };

        schema = match disambiguation {
            None => schema,
            Some(DisambiguationKind::Prefer) => {
                schema.with_disambiguation(name, PreferValues::new(self.prefer.iter().cloned()))
            }
            Some(DisambiguationKind::Highest) if self.order.is_empty() => {
                schema.with_disambiguation(name, PreferHighest::natural())
            }
            Some(DisambiguationKind::Highest) => {
                schema.with_disambiguation(name, PreferHighest::by_order(self.order.clone()))
            }
            Some(DisambiguationKind::Lowest) if self.order.is_empty() => {
                schema.with_disambiguation(name, PreferLowest::natural())
            }
            Some(DisambiguationKind::Lowest) => {
                schema.with_disambiguation(name, PreferLowest::by_order(self.order.clone()))
            }
            Some(DisambiguationKind::Requested) => schema.with_disambiguation(name, PreferRequested),
            Some(DisambiguationKind::Closest) => {
                integer_only("closest")?;
                schema.with_disambiguation(name, PreferClosestInteger)
            }
        };

        Ok(schema)
    }
}

impl SchemaConfig {
    /// Build the attribute schema described by this table.
    pub fn to_schema(&self) -> Result<AttributesSchema> {
        let mut seen = BTreeSet::new();
        for name in &self.precedence {
            if !seen.insert(name.as_str()) {
                return Err(config_error(format!("attribute '{name}' is listed twice in schema.precedence")));
            }
        }

        let mut schema = AttributesSchema::new().with_precedence(self.precedence.iter().cloned());
        for (name, rule) in &self.attributes {
            schema = rule.apply(name, schema)?;
        }
        tracing::debug!(
            target: "config",
            "schema built with {} attribute rule(s), precedence {:?}",
            self.attributes.len(),
            self.precedence
        );
        Ok(schema)
    }
}

impl EngineConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config: Self = parse_config(path)?;
        config
            .validate()
            .with_context(|| format!("Invalid engine configuration: {}", path.display()))?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse engine configuration")?;
        config.validate().context("Invalid engine configuration")?;
        Ok(config)
    }

    /// Check that the schema rules can be built.
    pub fn validate(&self) -> Result<()> {
        self.schema.to_schema().map(|_| ())
    }

    /// Build the attribute schema, consuming the configuration.
    pub fn into_schema(self) -> Result<AttributesSchema> {
        self.schema.to_schema()
    }
}
