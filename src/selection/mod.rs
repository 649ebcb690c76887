//! Variant selection by attribute matching and disambiguation.
//!
//! Selection runs in stages:
//!
//! 1. Candidates are put in canonical order (component, then variant name) and
//!    duplicates by value are dropped, so the caller's order never matters.
//! 2. Candidates incompatible with any requested attribute are discarded.
//! 3. Survivors are narrowed by each requested attribute's disambiguation rule
//!    in schema precedence order, then by rules for unrequested attributes.
//! 4. Candidates providing more of the requested attributes are preferred.
//!
//! Exactly one survivor is the selection. Otherwise the result is
//! [`VariantError::NoMatchingVariant`] or
//! [`VariantError::AmbiguousVariantSelection`] carrying a [`SelectionFailure`].

mod diagnostics;

pub use diagnostics::{AttributeMismatch, CandidateReport, SelectionFailure};

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::attributes::{AttributeSet, AttributeValue};
use crate::core::{Result, VariantError};
use crate::metadata::ConfigurationMetadata;
use crate::schema::{AttributesSchema, DisambiguationRule, PreferRequested};

type Candidate = Arc<ConfigurationMetadata>;

/// Selects the best variant for a request under an [`AttributesSchema`].
#[derive(Debug, Clone, Copy)]
pub struct AttributeMatcher<'a> {
    schema: &'a AttributesSchema,
}

impl<'a> AttributeMatcher<'a> {
    /// Matcher using `schema`'s rules.
    pub fn new(schema: &'a AttributesSchema) -> Self {
        Self { schema }
    }

    /// Requested attributes `candidate` does not satisfy.
    pub fn mismatches(
        &self,
        requested: &AttributeSet,
        candidate: &ConfigurationMetadata,
    ) -> Vec<AttributeMismatch> {
        requested
            .iter()
            .filter_map(|(key, wanted)| match candidate.attributes().get(key) {
                Some(provided) if self.schema.is_compatible(key, wanted, provided) => None,
                Some(provided) => Some(AttributeMismatch {
                    key: key.to_string(),
                    requested: wanted.clone(),
                    provided: Some(provided.clone()),
                }),
                None if self.schema.is_mandatory(key) => Some(AttributeMismatch {
                    key: key.to_string(),
                    requested: wanted.clone(),
                    provided: None,
                }),
                None => None,
            })
            .collect()
    }

    /// Whether `candidate` satisfies every requested attribute.
    pub fn is_compatible(&self, requested: &AttributeSet, candidate: &ConfigurationMetadata) -> bool {
        self.mismatches(requested, candidate).is_empty()
    }

    /// All compatible candidates, in canonical order.
    pub fn matching_candidates(&self, requested: &AttributeSet, candidates: &[Candidate]) -> Vec<Candidate> {
        canonical(candidates)
            .into_iter()
            .filter(|c| self.is_compatible(requested, c))
            .collect()
    }

    /// Narrow compatible candidates using the schema's disambiguation rules.
    ///
    /// Returns the survivors in canonical order; a single survivor is the
    /// selection.
    pub fn disambiguate(&self, requested: &AttributeSet, compatible: Vec<Candidate>) -> Vec<Candidate> {
        let mut survivors = canonical(&compatible);

        for key in self.schema.order_keys(requested.keys()) {
            if survivors.len() <= 1 {
                return survivors;
            }
            let rule: &dyn DisambiguationRule = match self.schema.disambiguation(key) {
                Some(rule) => rule.as_ref(),
                None => &PreferRequested,
            };
            survivors = narrow(survivors, key, requested.get(key), rule);
        }

        let extra_keys: Vec<String> = self
            .schema
            .precedence()
            .into_iter()
            .filter(|key| !requested.contains(key) && self.schema.disambiguation(key).is_some())
            .collect();
        for key in &extra_keys {
            if survivors.len() <= 1 {
                return survivors;
            }
            if let Some(rule) = self.schema.disambiguation(key) {
                survivors = narrow(survivors, key, None, rule.as_ref());
            }
        }

        if survivors.len() > 1 {
            let provided = |c: &Candidate| requested.keys().filter(|k| c.attributes().contains(k)).count();
            let most = survivors.iter().map(provided).max().unwrap_or(0);
            survivors.retain(|c| provided(c) == most);
        }
        survivors
    }

    /// Select the single best candidate for `requested`.
    pub fn select(&self, requested: &AttributeSet, candidates: &[Candidate]) -> Result<Candidate> {
        let ordered = canonical(candidates);
        if ordered.is_empty() {
            tracing::debug!(target: "selection", "no candidates offered for {}", requested);
            return Err(VariantError::NoMatchingVariant(Box::new(SelectionFailure::no_match(
                requested,
                Vec::new(),
            ))));
        }

        let mut reports = Vec::with_capacity(ordered.len());
        let mut compatible = Vec::new();
        for candidate in &ordered {
            let mismatches = self.mismatches(requested, candidate);
            if mismatches.is_empty() {
                compatible.push(Arc::clone(candidate));
            } else {
                tracing::trace!(
                    target: "selection",
                    "{} rejected: {} incompatible attribute(s)",
                    candidate,
                    mismatches.len()
                );
            }
            reports.push(CandidateReport::new(candidate, mismatches));
        }

        if compatible.is_empty() {
            tracing::debug!(
                target: "selection",
                "none of {} candidate(s) matches {}",
                ordered.len(),
                requested
            );
            return Err(VariantError::NoMatchingVariant(Box::new(SelectionFailure::no_match(
                requested, reports,
            ))));
        }

        let survivors = self.disambiguate(requested, compatible);
        match survivors.as_slice() {
            [selected] => {
                tracing::debug!(target: "selection", "selected {} for {}", selected, requested);
                Ok(Arc::clone(selected))
            }
            _ => {
                tracing::debug!(
                    target: "selection",
                    "{} candidates remain for {}",
                    survivors.len(),
                    requested
                );
                Err(VariantError::AmbiguousVariantSelection(Box::new(SelectionFailure::ambiguous(
                    requested, &survivors,
                ))))
            }
        }
    }
}

/// Sort into canonical order and drop duplicates by value.
fn canonical(candidates: &[Candidate]) -> Vec<Candidate> {
    let mut ordered = candidates.to_vec();
    ordered.sort_by(|a, b| a.canonical_cmp(b));
    ordered.dedup_by(|a, b| **a == **b);
    ordered
}

/// Keep candidates whose value for `key` the rule chooses.
///
/// A rule that chooses nothing or every value leaves the survivors unchanged.
fn narrow(
    survivors: Vec<Candidate>,
    key: &str,
    requested: Option<&AttributeValue>,
    rule: &dyn DisambiguationRule,
) -> Vec<Candidate> {
    let values: BTreeSet<AttributeValue> =
        survivors.iter().filter_map(|c| c.attributes().get(key).cloned()).collect();
    if values.is_empty() {
        return survivors;
    }

    let chosen = rule.choose(requested, &values);
    if chosen.is_empty() || chosen == values {
        return survivors;
    }

    tracing::trace!(target: "selection", "disambiguating on {}: {} of {} value(s) kept", key, chosen.len(), values.len());
    survivors
        .into_iter()
        .filter(|c| c.attributes().get(key).is_some_and(|v| chosen.contains(v)))
        .collect()
}
