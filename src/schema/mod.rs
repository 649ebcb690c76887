//! Attribute schema: per-attribute compatibility and disambiguation rules.
//!
//! The schema is the rule registry consulted by [`crate::selection`]. For every
//! attribute name it holds an [`AttributeMatchingStrategy`]; attributes without
//! a registered strategy use exact matching and have no disambiguation rule.
//! The schema also fixes the order in which attributes are disambiguated.

pub mod rules;

pub use rules::{
    CompatibleValues, ExactMatch, IntegerAtMost, PreferClosestInteger, PreferHighest, PreferLowest,
    PreferRequested, PreferValues, ValueOrder,
};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::attributes::{AttributeType, AttributeValue};

/// Decides whether a provided value satisfies a requested value.
pub trait CompatibilityRule: Send + Sync + fmt::Debug {
    /// Whether `provided` satisfies a request for `requested`.
    fn is_compatible(&self, requested: &AttributeValue, provided: &AttributeValue) -> bool;
}

/// Narrows a set of competing values.
///
/// Rules operate on value sets rather than candidate lists so that the result
/// never depends on candidate order.
pub trait DisambiguationRule: Send + Sync + fmt::Debug {
    /// The preferred subset of `candidates`. An empty result or the full input
    /// means the rule has no preference.
    fn choose(
        &self,
        requested: Option<&AttributeValue>,
        candidates: &BTreeSet<AttributeValue>,
    ) -> BTreeSet<AttributeValue>;
}

/// Matching behaviour registered for one attribute.
#[derive(Debug, Clone)]
pub struct AttributeMatchingStrategy {
    /// Declared value type, used to parse textual input
    pub value_type: Option<AttributeType>,
    /// Compatibility rule
    pub compatibility: Arc<dyn CompatibilityRule>,
    /// Disambiguation rule, if any
    pub disambiguation: Option<Arc<dyn DisambiguationRule>>,
    /// Whether candidates must provide this attribute when it is requested
    pub mandatory: bool,
}

impl Default for AttributeMatchingStrategy {
    fn default() -> Self {
        Self {
            value_type: None,
            compatibility: Arc::new(ExactMatch),
            disambiguation: None,
            mandatory: false,
        }
    }
}

/// Registry of attribute matching strategies plus a key precedence order.
#[derive(Debug, Clone, Default)]
pub struct AttributesSchema {
    strategies: BTreeMap<String, AttributeMatchingStrategy>,
    precedence: Vec<String>,
}

impl AttributesSchema {
    /// Empty schema: exact matching, no disambiguation rules.
    pub fn new() -> Self {
        Self::default()
    }

    fn strategy_mut(&mut self, name: &str) -> &mut AttributeMatchingStrategy {
        self.strategies.entry(name.to_string()).or_default()
    }

    /// Declare the value type of an attribute.
    #[must_use]
    pub fn with_type(mut self, name: &str, value_type: AttributeType) -> Self {
        self.strategy_mut(name).value_type = Some(value_type);
        self
    }

    /// Register the compatibility rule of an attribute.
    #[must_use]
    pub fn with_compatibility(mut self, name: &str, rule: impl CompatibilityRule + 'static) -> Self {
        self.strategy_mut(name).compatibility = Arc::new(rule);
        self
    }

    /// Register the disambiguation rule of an attribute.
    #[must_use]
    pub fn with_disambiguation(mut self, name: &str, rule: impl DisambiguationRule + 'static) -> Self {
        self.strategy_mut(name).disambiguation = Some(Arc::new(rule));
        self
    }

    /// Require candidates to provide `name` whenever it is requested.
    #[must_use]
    pub fn mandatory(mut self, name: &str) -> Self {
        self.strategy_mut(name).mandatory = true;
        self
    }

    /// Set the explicit disambiguation order.
    #[must_use]
    pub fn with_precedence<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.precedence = order.into_iter().map(Into::into).collect();
        self
    }

    /// Strategy registered for `name`.
    pub fn strategy(&self, name: &str) -> Option<&AttributeMatchingStrategy> {
        self.strategies.get(name)
    }

    /// Declared value type of `name`.
    pub fn value_type(&self, name: &str) -> Option<AttributeType> {
        self.strategy(name).and_then(|s| s.value_type)
    }

    /// Whether `name` is mandatory.
    pub fn is_mandatory(&self, name: &str) -> bool {
        self.strategy(name).is_some_and(|s| s.mandatory)
    }

    /// Whether `provided` satisfies a request for `requested` under `name`'s
    /// rule.
    ///
    /// Equal values are always compatible. String and named values are
    /// compared by text; any other type mismatch is incompatible.
    pub fn is_compatible(&self, name: &str, requested: &AttributeValue, provided: &AttributeValue) -> bool {
        match requested.coerced_eq(provided) {
            Some(true) => true,
            None => false,
            Some(false) => self
                .strategy(name)
                .is_some_and(|s| s.compatibility.is_compatible(requested, provided)),
        }
    }

    /// Disambiguation rule registered for `name`.
    pub fn disambiguation(&self, name: &str) -> Option<&Arc<dyn DisambiguationRule>> {
        self.strategy(name).and_then(|s| s.disambiguation.as_ref())
    }

    /// All known attribute names in disambiguation order: the explicit
    /// precedence list first, then the remaining registered names by name.
    pub fn precedence(&self) -> Vec<String> {
        let mut ordered: Vec<String> = Vec::with_capacity(self.strategies.len() + self.precedence.len());
        for name in &self.precedence {
            if !ordered.contains(name) {
                ordered.push(name.clone());
            }
        }
        for name in self.strategies.keys() {
            if !ordered.contains(name) {
                ordered.push(name.clone());
            }
        }
        ordered
    }

    /// Order arbitrary attribute names: names in the explicit precedence list
    /// first in that order, then the rest by name.
    pub fn order_keys<'a, I>(&self, keys: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut keys: Vec<&'a str> = keys.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();
        keys.sort_by_key(|key| {
            self.precedence
                .iter()
                .position(|p| p.as_str() == *key)
                .unwrap_or(usize::MAX)
        });
        keys
    }
}
