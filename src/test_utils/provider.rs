//! Instrumented descriptor provider.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::component::{ComponentDescriptor, ComponentIdentifier, DescriptorProvider, DescriptorRegistry};

/// Wraps a [`DescriptorRegistry`], counting lookups and optionally slowing
/// each one down so concurrent callers overlap.
#[derive(Debug, Default)]
pub struct CountingProvider {
    registry: DescriptorRegistry,
    lookups: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingProvider {
    /// Provider with no delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `delay` inside every lookup.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a descriptor.
    #[must_use]
    pub fn with_descriptor(self, descriptor: ComponentDescriptor) -> Self {
        self.registry.register(descriptor);
        self
    }

    /// Underlying registry, for replacing descriptors mid-test.
    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    /// Lookups performed so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl DescriptorProvider for CountingProvider {
    fn descriptor(&self, id: &ComponentIdentifier) -> Option<Arc<ComponentDescriptor>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.registry.descriptor(id)
    }
}
