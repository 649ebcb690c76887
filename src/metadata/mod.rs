//! Realized variant metadata.
//!
//! A [`ConfigurationMetadata`] is the immutable, fully merged view of one
//! variant of one component: its own attributes combined with the
//! component-level attributes, plus the artifacts and dependencies it
//! publishes. Once built it never changes, so it is handed out as
//! `Arc<ConfigurationMetadata>` and shared freely between threads.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::attributes::{AttributeSet, AttributesFactory};
use crate::component::{ArtifactRef, ComponentIdentifier, DependencyRef, RawVariant};
use crate::core::Result;

/// Immutable metadata for one variant of one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationMetadata {
    component_id: ComponentIdentifier,
    name: String,
    attributes: AttributeSet,
    artifacts: Vec<ArtifactRef>,
    dependencies: Vec<DependencyRef>,
    realized: bool,
}

impl ConfigurationMetadata {
    /// Build metadata from the variant's own attributes only.
    ///
    /// No component-level merge happens, so the result is marked as not
    /// realized. Useful for cheap listings where merged attributes are not
    /// needed yet.
    pub fn from_lazy(component_id: ComponentIdentifier, variant: &RawVariant) -> Self {
        Self {
            component_id,
            name: variant.name().to_string(),
            attributes: variant.attributes().clone(),
            artifacts: variant.artifacts().to_vec(),
            dependencies: variant.dependencies().to_vec(),
            realized: false,
        }
    }

    /// Build fully merged metadata, variant attributes taking precedence.
    pub fn realize(
        component_id: ComponentIdentifier,
        variant: &RawVariant,
        component_attributes: &AttributeSet,
        factory: &AttributesFactory,
    ) -> Result<Self> {
        Self::realize_with(component_id, variant, component_attributes, factory, &[] as &[String])
    }

    /// Like [`realize`](Self::realize), but the component-level value wins for
    /// every key listed in `governed_keys`.
    pub fn realize_with<K: AsRef<str>>(
        component_id: ComponentIdentifier,
        variant: &RawVariant,
        component_attributes: &AttributeSet,
        factory: &AttributesFactory,
        governed_keys: &[K],
    ) -> Result<Self> {
        let mut attributes = factory.concat(variant.attributes(), component_attributes)?;

        if !governed_keys.is_empty() {
            let governing = component_attributes.restrict(governed_keys);
            if !governing.is_empty() {
                attributes = factory.concat(&governing, &attributes)?;
            }
        }

        Ok(Self {
            component_id,
            name: variant.name().to_string(),
            attributes,
            artifacts: variant.artifacts().to_vec(),
            dependencies: variant.dependencies().to_vec(),
            realized: true,
        })
    }

    /// Owning component.
    pub fn component_id(&self) -> &ComponentIdentifier {
        &self.component_id
    }

    /// Variant name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes (merged when [`is_realized`](Self::is_realized)).
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

    /// Whether component-level attributes were merged in.
    pub fn is_realized(&self) -> bool {
        self.realized
    }

    /// Canonical ordering: component identifier, then variant name, then the
    /// remaining fields.
    ///
    /// The order is total, so it returns `Equal` only for equal metadata.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.component_id
            .cmp(&other.component_id)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.attributes.cmp(&other.attributes))
            .then_with(|| self.artifacts.cmp(&other.artifacts))
            .then_with(|| self.dependencies.cmp(&other.dependencies))
            .then_with(|| self.realized.cmp(&other.realized))
    }
}

impl fmt::Display for ConfigurationMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.component_id, self.name)
    }
}
