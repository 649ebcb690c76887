//! Immutable attribute sets and their merge semantics.
//!
//! An [`AttributeSet`] maps attribute names to typed values. Sets are immutable
//! once built: every operation that "changes" a set returns a new one, and
//! clones are pointer copies of a shared, name-sorted entry slice.
//!
//! # Merge precedence
//!
//! [`AttributeSet::concat`] merges a variant-level set with a component-level
//! set. The argument order encodes precedence: for a key present on both sides
//! the first (variant) argument wins, keys present on one side pass through.
//!
//! ```rust
//! use variant_select::attributes::{AttributeSet, AttributeValue};
//!
//! # fn main() -> variant_select::core::Result<()> {
//! let component = AttributeSet::from_entries([("usage", AttributeValue::named("java-api"))])?;
//! let runtime = AttributeSet::from_entries([("usage", AttributeValue::named("java-runtime"))])?;
//!
//! let merged = AttributeSet::concat(&runtime, &component)?;
//! assert_eq!(merged.get("usage"), Some(&AttributeValue::named("java-runtime")));
//!
//! // Merging with an empty side shares the other input instead of copying it.
//! let compile = AttributeSet::concat(&AttributeSet::empty(), &component)?;
//! assert!(compile.ptr_eq(&component));
//! # Ok(())
//! # }
//! ```
//!
//! # Structural sharing
//!
//! Names and text values are `Arc<str>`, so merged sets reuse the strings of
//! their inputs. When one side of a merge contributes nothing, the other input
//! is returned as-is. [`AttributesFactory`] additionally interns sets by value
//! and memoizes merges so that variants sharing one component-level set also
//! share merge results.

mod factory;
mod value;

pub use factory::{AttributesFactory, FactoryStats};
pub use value::{Attribute, AttributeType, AttributeValue};

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::core::{Result, VariantError};

type Entry = (Arc<str>, AttributeValue);

static EMPTY: LazyLock<Arc<[Entry]>> = LazyLock::new(|| Arc::from(Vec::new()));

/// Immutable mapping from attribute name to typed value.
///
/// Equality and hashing are by value: two sets holding the same name/value
/// pairs are equal no matter how they were built.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeSet {
    /// Sorted by name, no duplicate names.
    entries: Arc<[Entry]>,
}

impl AttributeSet {
    /// The empty set, identity element of [`concat`](Self::concat).
    pub fn empty() -> Self {
        Self {
            entries: Arc::clone(&EMPTY),
        }
    }

    /// Build a set from name/value pairs.
    ///
    /// A later pair replaces an earlier pair with the same name. Two pairs that
    /// give the same name different value types fail with
    /// [`VariantError::AttributeTypeMismatch`].
    pub fn from_entries<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, AttributeValue)>,
        K: AsRef<str>,
    {
        let mut map: BTreeMap<Arc<str>, AttributeValue> = BTreeMap::new();
        for (name, value) in entries {
            let name = name.as_ref();
            if let Some(existing) = map.get(name) {
                if existing.attribute_type() != value.attribute_type() {
                    return Err(VariantError::AttributeTypeMismatch {
                        attribute: name.to_string(),
                        first: existing.attribute_type(),
                        second: value.attribute_type(),
                    });
                }
            }
            map.insert(Arc::from(name), value);
        }
        if map.is_empty() {
            return Ok(Self::empty());
        }
        Ok(Self {
            entries: map.into_iter().collect::<Vec<_>>().into(),
        })
    }

    /// Merge a variant-level set over a component-level set.
    ///
    /// Keys present in both take the `variant` value, keys present in only one
    /// side pass through unchanged. Neither input is modified. If a key has
    /// different value types on the two sides the merge fails with
    /// [`VariantError::AttributeTypeMismatch`].
    ///
    /// The result shares an input outright when the other side adds nothing,
    /// so merging against [`empty`](Self::empty) returns the same instance.
    pub fn concat(variant: &Self, component: &Self) -> Result<Self> {
        if component.is_empty() || Arc::ptr_eq(&variant.entries, &component.entries) {
            return Ok(variant.clone());
        }
        if variant.is_empty() {
            return Ok(component.clone());
        }

        let (v, c) = (&variant.entries[..], &component.entries[..]);
        let mut merged: Vec<Entry> = Vec::with_capacity(v.len() + c.len());
        let (mut i, mut j) = (0, 0);
        // Whether each side contributes anything the other does not already hold.
        let mut component_adds = false;
        let mut variant_adds = false;

        while i < v.len() && j < c.len() {
            let (v_name, v_value) = &v[i];
            let (c_name, c_value) = &c[j];
            match v_name.cmp(c_name) {
                Ordering::Less => {
                    merged.push(v[i].clone());
                    variant_adds = true;
                    i += 1;
                }
                Ordering::Greater => {
                    merged.push(c[j].clone());
                    component_adds = true;
                    j += 1;
                }
                Ordering::Equal => {
                    if v_value.attribute_type() != c_value.attribute_type() {
                        return Err(VariantError::AttributeTypeMismatch {
                            attribute: v_name.to_string(),
                            first: v_value.attribute_type(),
                            second: c_value.attribute_type(),
                        });
                    }
                    if v_value != c_value {
                        variant_adds = true;
                    }
                    merged.push(v[i].clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        if i < v.len() {
            variant_adds = true;
            merged.extend_from_slice(&v[i..]);
        }
        if j < c.len() {
            component_adds = true;
            merged.extend_from_slice(&c[j..]);
        }

        if !variant_adds {
            return Ok(component.clone());
        }
        if !component_adds {
            return Ok(variant.clone());
        }
        Ok(Self {
            entries: merged.into(),
        })
    }

    /// Return a new set with `name` set to `value`, replacing any existing value
    /// of the same type.
    pub fn with(&self, name: impl AsRef<str>, value: AttributeValue) -> Result<Self> {
        let single = Self::from_entries([(name, value)])?;
        Self::concat(&single, self)
    }

    /// Keep only the given keys.
    pub fn restrict<K: AsRef<str>>(&self, keys: &[K]) -> Self {
        if keys.is_empty() || self.is_empty() {
            return Self::empty();
        }
        let kept: Vec<Entry> = self
            .entries
            .iter()
            .filter(|(name, _)| keys.iter().any(|k| k.as_ref() == name.as_ref()))
            .cloned()
            .collect();
        if kept.len() == self.len() {
            return self.clone();
        }
        if kept.is_empty() {
            return Self::empty();
        }
        Self {
            entries: kept.into(),
        }
    }

    /// Look up a value by attribute name.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries
            .binary_search_by(|(n, _)| n.as_ref().cmp(name))
            .ok()
            .map(|idx| &self.entries[idx].1)
    }

    /// Look up a value by typed key; a value of another type is treated as absent.
    pub fn get_typed(&self, attribute: &Attribute) -> Option<&AttributeValue> {
        self.get(attribute.name()).filter(|v| v.attribute_type() == attribute.value_type())
    }

    /// Whether the set declares `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(n, v)| (n.as_ref(), v))
    }

    /// Attribute names in name order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_ref())
    }

    /// Whether both sets share the same underlying storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, (name, value)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}

impl Serialize for AttributeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
