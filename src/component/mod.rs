//! Component descriptors as handed to the engine by the metadata parser.
//!
//! Parsing real descriptor files is somebody else's job; this module only
//! defines the in-memory shape the engine consumes. Everything here is
//! read-only once built: the engine never re-parses or mutates a descriptor.
//!
//! - [`ComponentIdentifier`] - `group:name:version` key, used in cache keys
//! - [`RawVariant`] - one declared variant: name, own attributes, artifacts,
//!   dependencies
//! - [`ComponentDescriptor`] - identifier, component-level attributes and the
//!   ordered list of raw variants
//! - [`DescriptorProvider`] - lookup seam the realization engine reads from

mod registry;

pub use registry::{DescriptorProvider, DescriptorRegistry};

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::attributes::AttributeSet;
use crate::core::{Result, VariantError};

/// Identity of a component: `group:name:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentIdentifier {
    group: String,
    name: String,
    version: String,
}

impl ComponentIdentifier {
    /// Create an identifier from its three coordinates.
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Group coordinate.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Name coordinate.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version coordinate.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for ComponentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

impl FromStr for ComponentIdentifier {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [group, name, version] => Ok(Self::new(*group, *name, *version)),
            _ => Err(VariantError::ConfigError {
                message: format!("'{s}' is not a component identifier (expected group:name:version)"),
            }),
        }
    }
}

impl Serialize for ComponentIdentifier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A file published by a variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ArtifactRef {
    /// Artifact base name
    pub name: String,
    /// File extension, e.g. `jar`
    pub extension: String,
    /// Optional classifier, e.g. `sources`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    /// Optional explicit location relative to the component
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ArtifactRef {
    /// Artifact with no classifier and no explicit URL.
    pub fn new(name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            classifier: None,
            url: None,
        }
    }

    /// Set the classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }
}

/// A dependency declared by a variant.
///
/// A dependency may carry its own attribute request, which the graph builder
/// merges into the consumer request when traversing the edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DependencyRef {
    /// Target group
    pub group: String,
    /// Target name
    pub name: String,
    /// Version requirement as written in the descriptor
    pub version_requirement: String,
    /// Attributes requested on this edge
    #[serde(skip_serializing_if = "AttributeSet::is_empty")]
    pub requested_attributes: AttributeSet,
    /// Free-form reason published with the dependency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DependencyRef {
    /// Dependency with no attribute request and no reason.
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version_requirement: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version_requirement: version_requirement.into(),
            requested_attributes: AttributeSet::empty(),
            reason: None,
        }
    }

    /// Set the attributes requested on this edge.
    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.requested_attributes = attributes;
        self
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version_requirement)
    }
}

/// One variant as declared in a descriptor, before attribute merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVariant {
    name: String,
    attributes: AttributeSet,
    artifacts: Vec<ArtifactRef>,
    dependencies: Vec<DependencyRef>,
}

impl RawVariant {
    /// Variant with no artifacts and no dependencies.
    pub fn new(name: impl Into<String>, attributes: AttributeSet) -> Self {
        Self {
            name: name.into(),
            attributes,
            artifacts: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Add an artifact.
    #[must_use]
    pub fn with_artifact(mut self, artifact: ArtifactRef) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Add a dependency.
    #[must_use]
    pub fn with_dependency(mut self, dependency: DependencyRef) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Variant name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The variant's own attributes.
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Published artifacts.
    pub fn artifacts(&self) -> &[ArtifactRef] {
        &self.artifacts
    }

    /// Declared dependencies.
    pub fn dependencies(&self) -> &[DependencyRef] {
        &self.dependencies
    }

    /// Check the variant's own identity data.
    pub fn validate(&self, component: &ComponentIdentifier) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(VariantError::MalformedDescriptor {
                component: component.to_string(),
                reason: "variant declared without a name".to_string(),
            });
        }
        Ok(())
    }
}

/// In-memory parse of a component descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    id: ComponentIdentifier,
    attributes: AttributeSet,
    variants: Vec<RawVariant>,
}

impl ComponentDescriptor {
    /// Descriptor with component-level attributes and no variants yet.
    pub fn new(id: ComponentIdentifier, attributes: AttributeSet) -> Self {
        Self {
            id,
            attributes,
            variants: Vec::new(),
        }
    }

    /// Append a variant, keeping declaration order.
    #[must_use]
    pub fn with_variant(mut self, variant: RawVariant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Component identifier.
    pub fn id(&self) -> &ComponentIdentifier {
        &self.id
    }

    /// Component-level attributes, applied to every variant.
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Declared variants in declaration order.
    pub fn variants(&self) -> &[RawVariant] {
        &self.variants
    }

    /// Find a variant by name.
    pub fn variant(&self, name: &str) -> Option<&RawVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Declared variant names in declaration order.
    pub fn variant_names(&self) -> Vec<String> {
        self.variants.iter().map(|v| v.name.clone()).collect()
    }

    /// Check identity data of the component and all of its variants.
    ///
    /// Fails with [`VariantError::MalformedDescriptor`] for an identifier with an
    /// empty coordinate, a variant without a name, or two variants sharing a name.
    pub fn validate(&self) -> Result<()> {
        let malformed = |reason: String| VariantError::MalformedDescriptor {
            component: self.id.to_string(),
            reason,
        };

        for (coordinate, value) in
            [("group", &self.id.group), ("name", &self.id.name), ("version", &self.id.version)]
        {
            if value.trim().is_empty() {
                return Err(malformed(format!("identifier has an empty {coordinate}")));
            }
        }

        let mut seen = HashSet::new();
        for variant in &self.variants {
            variant.validate(&self.id)?;
            if !seen.insert(variant.name.as_str()) {
                return Err(malformed(format!("variant '{}' is declared twice", variant.name)));
            }
        }
        Ok(())
    }
}
