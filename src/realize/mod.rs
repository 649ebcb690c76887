//! Realization of raw variants into shared [`ConfigurationMetadata`].
//!
//! The [`RealizationEngine`] turns a `(component, variant)` pair into an
//! immutable `Arc<ConfigurationMetadata>`, computing each pair at most once per
//! session. The cache and attribute factory are injected so that each
//! resolution session owns its own; nothing here is process-global.
//!
//! # Concurrency
//!
//! Any number of tasks may call [`RealizationEngine::get_or_realize`] for the
//! same key. Exactly one computes; the others wait on the in-flight
//! computation and receive the identical `Arc`. A failed computation is not
//! cached: waiters wake up, and the next claimant computes again.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use variant_select::attributes::AttributesFactory;
//! use variant_select::component::{ComponentIdentifier, DescriptorRegistry};
//! use variant_select::realize::{RealizationCache, RealizationEngine};
//!
//! # async fn example() -> variant_select::core::Result<()> {
//! let registry = Arc::new(DescriptorRegistry::new());
//! let engine = RealizationEngine::new(
//!     registry,
//!     Arc::new(RealizationCache::new()),
//!     Arc::new(AttributesFactory::new()),
//! );
//! let id = ComponentIdentifier::new("org.example", "lib", "1.0");
//! let api = engine.get_or_realize(&id, "apiElements").await?;
//! println!("{api}: {}", api.attributes());
//! # Ok(())
//! # }
//! ```

mod cache;

pub use cache::{RealizationCache, RealizationKey, RealizationStats};

use futures::future::try_join_all;
use std::sync::Arc;

use crate::attributes::{AttributeSet, AttributesFactory};
use crate::component::{ComponentDescriptor, ComponentIdentifier, DescriptorProvider, RawVariant};
use crate::core::{Result, VariantError};
use crate::metadata::ConfigurationMetadata;
use cache::Claim;

/// Compute-once realization of variants for one resolution session.
pub struct RealizationEngine {
    provider: Arc<dyn DescriptorProvider>,
    cache: Arc<RealizationCache>,
    factory: Arc<AttributesFactory>,
    /// Keys for which the component-level value overrides the variant value
    governed_keys: Vec<String>,
}

impl RealizationEngine {
    /// Create an engine reading descriptors from `provider`.
    pub fn new(
        provider: Arc<dyn DescriptorProvider>,
        cache: Arc<RealizationCache>,
        factory: Arc<AttributesFactory>,
    ) -> Self {
        Self {
            provider,
            cache,
            factory,
            governed_keys: Vec::new(),
        }
    }

    /// Let the component-level value win for the given keys.
    #[must_use]
    pub fn with_component_governed_keys(mut self, keys: Vec<String>) -> Self {
        self.governed_keys = keys;
        self
    }

    /// Realize one variant without touching the cache.
    ///
    /// Pure: the same inputs always produce an equal result.
    pub fn realize(
        &self,
        component_id: &ComponentIdentifier,
        variant: &RawVariant,
        component_attributes: &AttributeSet,
    ) -> Result<ConfigurationMetadata> {
        variant.validate(component_id)?;
        ConfigurationMetadata::realize_with(
            component_id.clone(),
            variant,
            component_attributes,
            &self.factory,
            &self.governed_keys,
        )
    }

    /// Realized metadata for `variant` of `component_id`, computed at most once
    /// per session.
    pub async fn get_or_realize(
        &self,
        component_id: &ComponentIdentifier,
        variant: &str,
    ) -> Result<Arc<ConfigurationMetadata>> {
        let key = RealizationKey::new(component_id.clone(), variant);

        loop {
            match self.cache.claim(&key) {
                Claim::Ready(metadata) => return Ok(metadata),
                Claim::Wait(notify) => {
                    tracing::trace!(target: "realize", "waiting for in-flight realization of {}", key);
                    let notified = notify.notified();
                    // The leader may have finished between the claim and now.
                    if !self.cache.is_pending_with(&key, &notify) {
                        continue;
                    }
                    notified.await;
                }
                Claim::Leader(guard) => {
                    tracing::debug!(target: "realize", "realizing {}", key);
                    return match self.compute(&key) {
                        Ok(metadata) => Ok(guard.commit(metadata)),
                        Err(e) => {
                            self.cache.record_failure();
                            tracing::debug!(target: "realize", "realization of {} failed: {}", key, e);
                            drop(guard);
                            Err(e)
                        }
                    };
                }
            }
        }
    }

    /// Realize every declared variant of a component, in declaration order.
    pub async fn realize_all(
        &self,
        component_id: &ComponentIdentifier,
    ) -> Result<Vec<Arc<ConfigurationMetadata>>> {
        let descriptor = self.descriptor(component_id)?;
        let names = descriptor.variant_names();
        try_join_all(names.iter().map(|name| self.get_or_realize(component_id, name))).await
    }

    /// Forget every cached variant of a component.
    pub fn invalidate(&self, component_id: &ComponentIdentifier) -> usize {
        let removed = self.cache.invalidate_component(component_id);
        tracing::debug!(target: "realize", "invalidated {} cached variant(s) of {}", removed, component_id);
        removed
    }

    /// Counters of the underlying cache.
    pub fn stats(&self) -> RealizationStats {
        self.cache.stats()
    }

    /// The session's attribute factory.
    pub fn factory(&self) -> &Arc<AttributesFactory> {
        &self.factory
    }

    /// The session's realization cache.
    pub fn cache(&self) -> &Arc<RealizationCache> {
        &self.cache
    }

    fn descriptor(&self, component_id: &ComponentIdentifier) -> Result<Arc<ComponentDescriptor>> {
        let descriptor =
            self.provider
                .descriptor(component_id)
                .ok_or_else(|| VariantError::ComponentNotFound {
                    component: component_id.to_string(),
                })?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    fn compute(&self, key: &RealizationKey) -> Result<ConfigurationMetadata> {
        let descriptor = self.descriptor(&key.component)?;
        let raw = descriptor
            .variant(&key.variant)
            .ok_or_else(|| VariantError::VariantNotFound {
                component: key.component.to_string(),
                variant: key.variant.clone(),
                available: descriptor.variant_names(),
            })?;
        self.realize(&key.component, raw, descriptor.attributes())
    }
}

impl std::fmt::Debug for RealizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealizationEngine")
            .field("cache", &self.cache)
            .field("governed_keys", &self.governed_keys)
            .finish_non_exhaustive()
    }
}
