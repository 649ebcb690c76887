//! Session-scoped interning of attribute sets.
//!
//! Dependency graphs revisit the same components many times, and every variant
//! of a component merges against the same component-level set. The factory
//! interns sets by value and memoizes merge results so those merges are
//! computed once and their results shared.

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::AttributeSet;
use crate::core::Result;

/// Snapshot of factory counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactoryStats {
    /// Distinct non-empty sets interned so far
    pub interned: usize,
    /// Merges answered from the memo table
    pub concat_hits: usize,
    /// Merges that had to be computed
    pub concat_misses: usize,
}

/// Thread-safe interner and merge memo for [`AttributeSet`]s.
///
/// Both tables use `DashMap` entry operations, so concurrent lookups and
/// concurrent insert-if-absent calls converge on a single canonical instance
/// without an engine-wide lock.
#[derive(Debug, Default)]
pub struct AttributesFactory {
    /// Value -> canonical instance of that value
    interned: DashMap<AttributeSet, AttributeSet>,
    /// (variant, component) -> interned merge result
    merges: DashMap<(AttributeSet, AttributeSet), AttributeSet>,
    concat_hits: AtomicUsize,
    concat_misses: AtomicUsize,
}

impl AttributesFactory {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical instance for a set equal to `set`.
    ///
    /// The first caller to intern a value defines its canonical instance; later
    /// callers with an equal set get that instance back.
    pub fn intern(&self, set: AttributeSet) -> AttributeSet {
        if set.is_empty() {
            return AttributeSet::empty();
        }
        if let Some(existing) = self.interned.get(&set) {
            return existing.value().clone();
        }
        self.interned.entry(set.clone()).or_insert(set).value().clone()
    }

    /// Merge `variant` over `component` (see [`AttributeSet::concat`]), reusing
    /// an earlier result for the same pair of inputs.
    pub fn concat(&self, variant: &AttributeSet, component: &AttributeSet) -> Result<AttributeSet> {
        let key = (self.intern(variant.clone()), self.intern(component.clone()));

        if let Some(hit) = self.merges.get(&key) {
            self.concat_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit.value().clone());
        }

        self.concat_misses.fetch_add(1, Ordering::Relaxed);
        let merged = self.intern(AttributeSet::concat(&key.0, &key.1)?);
        tracing::trace!(
            target: "attributes",
            "interned merge {} over {} -> {}",
            key.0,
            key.1,
            merged
        );
        Ok(self.merges.entry(key).or_insert(merged).value().clone())
    }

    /// Current counters.
    pub fn stats(&self) -> FactoryStats {
        FactoryStats {
            interned: self.interned.len(),
            concat_hits: self.concat_hits.load(Ordering::Relaxed),
            concat_misses: self.concat_misses.load(Ordering::Relaxed),
        }
    }
}
