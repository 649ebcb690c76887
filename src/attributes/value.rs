//! Typed attribute keys and values.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use crate::core::{Result, VariantError};

/// Declared type of an attribute.
///
/// Two declarations of the same attribute name must agree on the type; merging
/// sets that disagree fails with [`VariantError::AttributeTypeMismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// Free-form text
    String,
    /// `true` / `false`
    Boolean,
    /// Signed integer, e.g. a target JVM version
    Integer,
    /// Enum-like value drawn from a vocabulary, compared by name
    Named,
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Named => "named",
        };
        f.write_str(name)
    }
}

/// A named, typed attribute key.
///
/// Used for typed lookups: [`AttributeSet::get_typed`](super::AttributeSet::get_typed)
/// only returns a value whose type matches the key's declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Attribute {
    name: Arc<str>,
    value_type: AttributeType,
}

impl Attribute {
    /// Create an attribute key with an explicit type.
    pub fn of(name: impl AsRef<str>, value_type: AttributeType) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            value_type,
        }
    }

    /// Shorthand for a [`AttributeType::Named`] attribute.
    pub fn named(name: impl AsRef<str>) -> Self {
        Self::of(name, AttributeType::Named)
    }

    /// Shorthand for a [`AttributeType::String`] attribute.
    pub fn string(name: impl AsRef<str>) -> Self {
        Self::of(name, AttributeType::String)
    }

    /// Shorthand for a [`AttributeType::Integer`] attribute.
    pub fn integer(name: impl AsRef<str>) -> Self {
        Self::of(name, AttributeType::Integer)
    }

    /// Shorthand for a [`AttributeType::Boolean`] attribute.
    pub fn boolean(name: impl AsRef<str>) -> Self {
        Self::of(name, AttributeType::Boolean)
    }

    /// The attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared value type.
    pub const fn value_type(&self) -> AttributeType {
        self.value_type
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.value_type)
    }
}

/// The value of one attribute.
///
/// Text payloads are `Arc<str>` so that copying a value between sets never
/// reallocates. The derived ordering (type first, then payload) gives rules a
/// deterministic iteration order over value sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeValue {
    /// Free-form text value
    String(Arc<str>),
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Enum-like named value
    Named(Arc<str>),
}

impl AttributeValue {
    /// Create a [`AttributeValue::String`].
    pub fn string(value: impl AsRef<str>) -> Self {
        Self::String(Arc::from(value.as_ref()))
    }

    /// Create a [`AttributeValue::Named`].
    pub fn named(value: impl AsRef<str>) -> Self {
        Self::Named(Arc::from(value.as_ref()))
    }

    /// The type this value carries.
    pub const fn attribute_type(&self) -> AttributeType {
        match self {
            Self::String(_) => AttributeType::String,
            Self::Boolean(_) => AttributeType::Boolean,
            Self::Integer(_) => AttributeType::Integer,
            Self::Named(_) => AttributeType::Named,
        }
    }

    /// Text of a string or named value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Named(s) => Some(s),
            _ => None,
        }
    }

    /// Payload of an integer value.
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Compare two values, coercing between string and named values by text.
    ///
    /// Returns `None` when the types are not comparable at all (for example an
    /// integer against a string).
    pub fn coerced_eq(&self, other: &Self) -> Option<bool> {
        if self.attribute_type() == other.attribute_type() {
            return Some(self == other);
        }
        match (self.as_text(), other.as_text()) {
            (Some(a), Some(b)) => Some(a == b),
            _ => None,
        }
    }

    /// Parse raw text into a value of the given type.
    ///
    /// Used by configuration loading and the command line, where every value
    /// arrives as text and the declared type decides its meaning.
    pub fn parse(value_type: AttributeType, raw: &str) -> Result<Self> {
        match value_type {
            AttributeType::String => Ok(Self::string(raw)),
            AttributeType::Named => Ok(Self::named(raw)),
            AttributeType::Boolean => match raw.trim() {
                "true" => Ok(Self::Boolean(true)),
                "false" => Ok(Self::Boolean(false)),
                other => Err(VariantError::ConfigError {
                    message: format!("'{other}' is not a boolean (expected true or false)"),
                }),
            },
            AttributeType::Integer => raw.trim().parse::<i64>().map(Self::Integer).map_err(|e| {
                VariantError::ConfigError {
                    message: format!("'{raw}' is not an integer: {e}"),
                }
            }),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::Named(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
        }
    }
}

/// Named, boolean and integer values serialize as plain scalars. Free-form
/// strings are tagged as `{"string": ...}` so they stay distinguishable from
/// named values of the same text.
impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_newtype_variant("AttributeValue", 0, "string", &**s),
            Self::Named(s) => serializer.serialize_str(s),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
        }
    }
}
