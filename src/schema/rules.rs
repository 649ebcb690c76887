//! Built-in compatibility and disambiguation rules.
//!
//! Rules compare values by their text where that makes sense, so a rule
//! configured with plain strings applies to both string and named values.

use std::collections::{BTreeMap, BTreeSet};

use super::{CompatibilityRule, DisambiguationRule};
use crate::attributes::AttributeValue;

fn text_of(value: &AttributeValue) -> String {
    value.to_string()
}

/// Only equal values are compatible.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl CompatibilityRule for ExactMatch {
    fn is_compatible(&self, requested: &AttributeValue, provided: &AttributeValue) -> bool {
        requested.coerced_eq(provided) == Some(true)
    }
}

/// A table of consumer values and the producer values that also satisfy them.
///
/// ```rust
/// use variant_select::attributes::AttributeValue;
/// use variant_select::schema::{CompatibilityRule, CompatibleValues};
///
/// let rule = CompatibleValues::new().allow("java-api", ["java-runtime"]);
/// assert!(rule.is_compatible(&AttributeValue::named("java-api"), &AttributeValue::named("java-runtime")));
/// assert!(!rule.is_compatible(&AttributeValue::named("java-runtime"), &AttributeValue::named("java-api")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CompatibleValues {
    table: BTreeMap<String, BTreeSet<String>>,
}

impl CompatibleValues {
    /// Empty table: behaves like [`ExactMatch`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `provided` values satisfy a request for `requested`.
    #[must_use]
    pub fn allow<I, S>(mut self, requested: impl Into<String>, provided: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table
            .entry(requested.into())
            .or_default()
            .extend(provided.into_iter().map(Into::into));
        self
    }
}

impl CompatibilityRule for CompatibleValues {
    fn is_compatible(&self, requested: &AttributeValue, provided: &AttributeValue) -> bool {
        if requested.coerced_eq(provided) == Some(true) {
            return true;
        }
        self.table
            .get(&text_of(requested))
            .is_some_and(|allowed| allowed.contains(&text_of(provided)))
    }
}

/// Producer integer must not exceed the consumer integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerAtMost;

impl CompatibilityRule for IntegerAtMost {
    fn is_compatible(&self, requested: &AttributeValue, provided: &AttributeValue) -> bool {
        match (requested.as_integer(), provided.as_integer()) {
            (Some(requested), Some(provided)) => provided <= requested,
            _ => false,
        }
    }
}

fn matching_requested(
    requested: Option<&AttributeValue>,
    candidates: &BTreeSet<AttributeValue>,
) -> BTreeSet<AttributeValue> {
    match requested {
        Some(requested) => candidates
            .iter()
            .filter(|c| requested.coerced_eq(c) == Some(true))
            .cloned()
            .collect(),
        None => BTreeSet::new(),
    }
}

/// Prefer candidates equal to the requested value.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferRequested;

impl DisambiguationRule for PreferRequested {
    fn choose(
        &self,
        requested: Option<&AttributeValue>,
        candidates: &BTreeSet<AttributeValue>,
    ) -> BTreeSet<AttributeValue> {
        matching_requested(requested, candidates)
    }
}

/// Prefer the first value of an ordered list that some candidate provides,
/// falling back to the requested value.
#[derive(Debug, Clone, Default)]
pub struct PreferValues {
    preferred: Vec<String>,
}

impl PreferValues {
    /// Preference list, most preferred first.
    pub fn new<I, S>(preferred: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            preferred: preferred.into_iter().map(Into::into).collect(),
        }
    }
}

impl DisambiguationRule for PreferValues {
    fn choose(
        &self,
        requested: Option<&AttributeValue>,
        candidates: &BTreeSet<AttributeValue>,
    ) -> BTreeSet<AttributeValue> {
        for preferred in &self.preferred {
            let chosen: BTreeSet<_> =
                candidates.iter().filter(|c| text_of(c) == *preferred).cloned().collect();
            if !chosen.is_empty() {
                return chosen;
            }
        }
        matching_requested(requested, candidates)
    }
}

/// How [`PreferHighest`] and [`PreferLowest`] rank values.
#[derive(Debug, Clone, Default)]
pub enum ValueOrder {
    /// Natural value order (integers numerically, text lexically)
    #[default]
    Natural,
    /// Explicit order from lowest to highest; unlisted values are never chosen
    Explicit(Vec<String>),
}

impl ValueOrder {
    fn extreme(&self, candidates: &BTreeSet<AttributeValue>, highest: bool) -> BTreeSet<AttributeValue> {
        let picked = match self {
            Self::Natural => {
                if highest {
                    candidates.last().cloned()
                } else {
                    candidates.first().cloned()
                }
            }
            Self::Explicit(order) => {
                let ranked = candidates
                    .iter()
                    .filter_map(|c| order.iter().position(|o| *o == text_of(c)).map(|rank| (rank, c)));
                let best = if highest {
                    ranked.max_by_key(|(rank, _)| *rank)
                } else {
                    ranked.min_by_key(|(rank, _)| *rank)
                };
                best.map(|(_, value)| value.clone())
            }
        };
        picked.into_iter().collect()
    }
}

/// Prefer the highest candidate value.
#[derive(Debug, Clone, Default)]
pub struct PreferHighest {
    order: ValueOrder,
}

impl PreferHighest {
    /// Rank by natural value order.
    pub fn natural() -> Self {
        Self::default()
    }

    /// Rank by an explicit order, lowest first.
    pub fn by_order(order: Vec<String>) -> Self {
        Self {
            order: ValueOrder::Explicit(order),
        }
    }
}

impl DisambiguationRule for PreferHighest {
    fn choose(
        &self,
        _requested: Option<&AttributeValue>,
        candidates: &BTreeSet<AttributeValue>,
    ) -> BTreeSet<AttributeValue> {
        self.order.extreme(candidates, true)
    }
}

/// Prefer the lowest candidate value.
#[derive(Debug, Clone, Default)]
pub struct PreferLowest {
    order: ValueOrder,
}

impl PreferLowest {
    /// Rank by natural value order.
    pub fn natural() -> Self {
        Self::default()
    }

    /// Rank by an explicit order, lowest first.
    pub fn by_order(order: Vec<String>) -> Self {
        Self {
            order: ValueOrder::Explicit(order),
        }
    }
}

impl DisambiguationRule for PreferLowest {
    fn choose(
        &self,
        _requested: Option<&AttributeValue>,
        candidates: &BTreeSet<AttributeValue>,
    ) -> BTreeSet<AttributeValue> {
        self.order.extreme(candidates, false)
    }
}

/// Prefer the highest integer not above the requested one.
///
/// Without a requested integer the highest candidate wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferClosestInteger;

impl DisambiguationRule for PreferClosestInteger {
    fn choose(
        &self,
        requested: Option<&AttributeValue>,
        candidates: &BTreeSet<AttributeValue>,
    ) -> BTreeSet<AttributeValue> {
        let ceiling = requested.and_then(AttributeValue::as_integer).unwrap_or(i64::MAX);
        candidates
            .iter()
            .filter_map(AttributeValue::as_integer)
            .filter(|value| *value <= ceiling)
            .max()
            .map(AttributeValue::Integer)
            .into_iter()
            .collect()
    }
}
