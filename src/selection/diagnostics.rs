//! Structured selection failures and their rendering.

use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::sync::Arc;
use strsim::levenshtein;

use crate::attributes::{AttributeSet, AttributeValue};
use crate::component::ComponentIdentifier;
use crate::metadata::ConfigurationMetadata;

/// Maximum edit distance for "did you mean" hints, in percent of the name length.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// One requested attribute a candidate does not satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeMismatch {
    /// Attribute name
    pub key: String,
    /// Requested value
    pub requested: AttributeValue,
    /// Provided value; `None` when a mandatory attribute is missing
    pub provided: Option<AttributeValue>,
}

/// A candidate as seen by a failed selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateReport {
    /// Owning component
    pub id: ComponentIdentifier,
    /// Variant name
    pub name: String,
    /// Full attribute set of the candidate
    pub attributes: AttributeSet,
    /// Requested attributes the candidate does not satisfy
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mismatches: Vec<AttributeMismatch>,
}

impl CandidateReport {
    pub(crate) fn new(candidate: &ConfigurationMetadata, mismatches: Vec<AttributeMismatch>) -> Self {
        Self {
            id: candidate.component_id().clone(),
            name: candidate.name().to_string(),
            attributes: candidate.attributes().clone(),
            mismatches,
        }
    }
}

/// Everything needed to explain a failed selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionFailure {
    /// The consumer's request
    pub requested: AttributeSet,
    /// Candidates considered (no match) or still competing (ambiguous)
    pub candidates: Vec<CandidateReport>,
    /// Attribute names whose values differ between the reported candidates
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub differing_attributes: Vec<String>,
    /// Suggestions for requested names no candidate provides
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

impl SelectionFailure {
    /// Failure report for a request that no candidate satisfies.
    pub(crate) fn no_match(requested: &AttributeSet, candidates: Vec<CandidateReport>) -> Self {
        let hints = missing_key_hints(requested, &candidates);
        Self {
            requested: requested.clone(),
            candidates,
            differing_attributes: Vec::new(),
            hints,
        }
    }

    /// Failure report for several surviving candidates.
    pub(crate) fn ambiguous(requested: &AttributeSet, survivors: &[Arc<ConfigurationMetadata>]) -> Self {
        let candidates: Vec<_> = survivors
            .iter()
            .map(|c| CandidateReport::new(c, Vec::new()))
            .collect();
        Self {
            requested: requested.clone(),
            differing_attributes: differing_attributes(&candidates),
            hints: missing_key_hints(requested, &candidates),
            candidates,
        }
    }

    /// Multi-line explanation for terminal output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Requested attributes: {}", self.requested);
        if self.candidates.is_empty() {
            let _ = writeln!(out, "No candidate variants were available");
        } else {
            let _ = writeln!(out, "Candidates:");
        }
        for candidate in &self.candidates {
            let _ = writeln!(
                out,
                "  - {}({}) {}",
                candidate.id,
                candidate.name.bold(),
                candidate.attributes
            );
            for mismatch in &candidate.mismatches {
                match &mismatch.provided {
                    Some(provided) => {
                        let _ = writeln!(
                            out,
                            "      incompatible {}: requested '{}', provided '{}'",
                            mismatch.key, mismatch.requested, provided
                        );
                    }
                    None => {
                        let _ = writeln!(
                            out,
                            "      missing mandatory {}: requested '{}'",
                            mismatch.key, mismatch.requested
                        );
                    }
                }
            }
        }
        if !self.differing_attributes.is_empty() {
            let _ = writeln!(out, "Attributes that differ: {}", self.differing_attributes.join(", "));
        }
        for hint in &self.hints {
            let _ = writeln!(out, "{} {}", "hint:".yellow(), hint);
        }
        out.trim_end().to_string()
    }
}

/// Names whose value (or presence) differs between candidates.
fn differing_attributes(candidates: &[CandidateReport]) -> Vec<String> {
    let keys: BTreeSet<&str> = candidates.iter().flat_map(|c| c.attributes.keys()).collect();
    keys.into_iter()
        .filter(|key| {
            let mut values = candidates.iter().map(|c| c.attributes.get(key));
            match values.next() {
                Some(first) => values.any(|v| v != first),
                None => false,
            }
        })
        .map(str::to_string)
        .collect()
}

/// "Did you mean" hints for requested names that no candidate declares.
fn missing_key_hints(requested: &AttributeSet, candidates: &[CandidateReport]) -> Vec<String> {
    let provided: BTreeSet<&str> = candidates.iter().flat_map(|c| c.attributes.keys()).collect();
    if provided.is_empty() {
        return Vec::new();
    }

    requested
        .keys()
        .filter(|key| !provided.contains(key))
        .filter_map(|key| {
            let similar = find_similar(key, &provided);
            if similar.is_empty() {
                None
            } else {
                Some(format!(
                    "no candidate provides '{key}'; did you mean {}?",
                    similar.iter().map(|s| format!("'{s}'")).collect::<Vec<_>>().join(" or ")
                ))
            }
        })
        .collect()
}

fn find_similar<'a>(target: &str, available: &BTreeSet<&'a str>) -> Vec<&'a str> {
    let mut scored: Vec<_> = available.iter().map(|name| (*name, levenshtein(target, name))).collect();
    scored.sort_by_key(|(name, dist)| (*dist, *name));
    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(name, _)| name)
        .collect()
}
