//! One resolution session: realization cache, attribute factory and schema.
//!
//! Every session owns fresh caches, so two sessions never observe each
//! other's realized metadata. Dropping the session drops its caches.

use std::sync::Arc;

use crate::attributes::{AttributeSet, AttributesFactory, FactoryStats};
use crate::component::{ComponentIdentifier, DescriptorProvider};
use crate::config::EngineConfig;
use crate::core::Result;
use crate::metadata::ConfigurationMetadata;
use crate::realize::{RealizationCache, RealizationEngine, RealizationStats};
use crate::schema::AttributesSchema;
use crate::selection::AttributeMatcher;

/// Counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Realization cache counters
    pub realization: RealizationStats,
    /// Attribute interning counters
    pub attributes: FactoryStats,
}

/// Realization and selection against one descriptor provider.
#[derive(Debug)]
pub struct ResolutionSession {
    engine: RealizationEngine,
    schema: AttributesSchema,
}

impl ResolutionSession {
    /// Create a session configured from `config`.
    ///
    /// Fails with [`VariantError::ConfigError`](crate::core::VariantError::ConfigError)
    /// when the schema rules are inconsistent.
    pub fn new(provider: Arc<dyn DescriptorProvider>, config: EngineConfig) -> Result<Self> {
        let governed_keys = config.component_governed_keys.clone();
        let schema = config.into_schema()?;
        Ok(Self::with_schema(provider, schema).governing(governed_keys))
    }

    /// Create a session with an already built schema and strict variant
    /// precedence.
    pub fn with_schema(provider: Arc<dyn DescriptorProvider>, schema: AttributesSchema) -> Self {
        let engine = RealizationEngine::new(
            provider,
            Arc::new(RealizationCache::new()),
            Arc::new(AttributesFactory::new()),
        );
        Self {
            engine,
            schema,
        }
    }

    fn governing(mut self, keys: Vec<String>) -> Self {
        if !keys.is_empty() {
            self.engine = self.engine.with_component_governed_keys(keys);
        }
        self
    }

    /// The realization engine.
    pub fn engine(&self) -> &RealizationEngine {
        &self.engine
    }

    /// The attribute schema.
    pub fn schema(&self) -> &AttributesSchema {
        &self.schema
    }

    /// Realized metadata for one variant.
    pub async fn realize(
        &self,
        component_id: &ComponentIdentifier,
        variant: &str,
    ) -> Result<Arc<ConfigurationMetadata>> {
        self.engine.get_or_realize(component_id, variant).await
    }

    /// All realized variants of a component, in declaration order.
    pub async fn variants(&self, component_id: &ComponentIdentifier) -> Result<Vec<Arc<ConfigurationMetadata>>> {
        self.engine.realize_all(component_id).await
    }

    /// Variants of a component compatible with `requested`, in canonical order.
    pub async fn matching_variants(
        &self,
        component_id: &ComponentIdentifier,
        requested: &AttributeSet,
    ) -> Result<Vec<Arc<ConfigurationMetadata>>> {
        let candidates = self.engine.realize_all(component_id).await?;
        Ok(AttributeMatcher::new(&self.schema).matching_candidates(requested, &candidates))
    }

    /// Select the variant of a component that best matches `requested`.
    pub async fn select_variant(
        &self,
        component_id: &ComponentIdentifier,
        requested: &AttributeSet,
    ) -> Result<Arc<ConfigurationMetadata>> {
        let candidates = self.engine.realize_all(component_id).await?;
        tracing::debug!(
            target: "selection",
            "selecting among {} variant(s) of {} for {}",
            candidates.len(),
            component_id,
            requested
        );
        AttributeMatcher::new(&self.schema).select(requested, &candidates)
    }

    /// Current counters.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            realization: self.engine.stats(),
            attributes: self.engine.factory().stats(),
        }
    }
}
