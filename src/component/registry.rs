//! Descriptor lookup seam and its in-memory implementation.

use dashmap::DashMap;
use std::sync::Arc;

use super::{ComponentDescriptor, ComponentIdentifier};

/// Source of parsed component descriptors.
///
/// Implemented by whatever owns descriptor parsing; the realization engine only
/// reads through this trait. Implementations are shared between worker threads.
pub trait DescriptorProvider: Send + Sync {
    /// The descriptor for `id`, if known.
    fn descriptor(&self, id: &ComponentIdentifier) -> Option<Arc<ComponentDescriptor>>;
}

/// Thread-safe in-memory descriptor store.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    descriptors: DashMap<ComponentIdentifier, Arc<ComponentDescriptor>>,
}

impl DescriptorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a descriptor, returning the one it replaces.
    ///
    /// Replacing a descriptor does not touch any realization cache; callers that
    /// already realized the old descriptor must invalidate it there.
    pub fn register(&self, descriptor: ComponentDescriptor) -> Option<Arc<ComponentDescriptor>> {
        let id = descriptor.id().clone();
        tracing::debug!(target: "realize", "registering descriptor for {}", id);
        self.descriptors.insert(id, Arc::new(descriptor))
    }

    /// Number of stored descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the registry holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Stored identifiers, sorted.
    pub fn ids(&self) -> Vec<ComponentIdentifier> {
        let mut ids: Vec<_> = self.descriptors.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }
}

impl DescriptorProvider for DescriptorRegistry {
    fn descriptor(&self, id: &ComponentIdentifier) -> Option<Arc<ComponentDescriptor>> {
        self.descriptors.get(id).map(|entry| Arc::clone(entry.value()))
    }
}

impl<P: DescriptorProvider + ?Sized> DescriptorProvider for Arc<P> {
    fn descriptor(&self, id: &ComponentIdentifier) -> Option<Arc<ComponentDescriptor>> {
        (**self).descriptor(id)
    }
}
