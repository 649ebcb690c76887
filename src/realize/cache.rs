//! Session-scoped compute-once cache for realized variants.
//!
//! Each key moves through `Pending -> Ready` at most once per session. The
//! first caller for a key inserts a `Pending` entry holding a [`Notify`] and
//! becomes the leader; later callers see the `Pending` entry and wait on that
//! notify. The leader either commits `Ready` or, on failure, panic or
//! cancellation, removes its `Pending` entry through [`PendingGuard`]'s `Drop`,
//! so no partially built value is ever observable and a failed key can be
//! retried.
//!
//! DashMap shard locks are only held for the entry operation itself, never
//! across a computation, so unrelated keys never wait on each other.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

use crate::component::ComponentIdentifier;
use crate::metadata::ConfigurationMetadata;

/// Cache key: one variant of one component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RealizationKey {
    /// Owning component
    pub component: ComponentIdentifier,
    /// Variant name
    pub variant: String,
}

impl RealizationKey {
    /// Key for `variant` of `component`.
    pub fn new(component: ComponentIdentifier, variant: impl Into<String>) -> Self {
        Self {
            component,
            variant: variant.into(),
        }
    }
}

impl fmt::Display for RealizationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.component, self.variant)
    }
}

/// State of one key in the realization cache.
#[derive(Clone)]
pub(crate) enum RealizationState {
    /// Another task is computing the value. Wait on the Notify.
    Pending(Arc<Notify>),
    /// Value is committed.
    Ready(Arc<ConfigurationMetadata>),
}

/// Counters describing how a session's cache has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RealizationStats {
    /// Computations that committed a value
    pub realizations: usize,
    /// Requests answered by an already committed value
    pub hits: usize,
    /// Times a request waited for another task's computation
    pub waits: usize,
    /// Computations that failed
    pub failures: usize,
}

impl RealizationStats {
    /// Fraction of completed requests served without computing, in percent.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.realizations;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Outcome of claiming a key.
pub(crate) enum Claim<'a> {
    /// Value already committed.
    Ready(Arc<ConfigurationMetadata>),
    /// Another task is computing; wait on this notify and claim again.
    Wait(Arc<Notify>),
    /// This caller must compute the value.
    Leader(PendingGuard<'a>),
}

/// Thread-safe realization cache, owned by one resolution session.
#[derive(Default)]
pub struct RealizationCache {
    entries: DashMap<RealizationKey, RealizationState>,
    realizations: AtomicUsize,
    hits: AtomicUsize,
    waits: AtomicUsize,
    failures: AtomicUsize,
}

impl RealizationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed value for `key`, if any.
    pub fn get(&self, key: &RealizationKey) -> Option<Arc<ConfigurationMetadata>> {
        match self.entries.get(key)?.value() {
            RealizationState::Ready(metadata) => Some(Arc::clone(metadata)),
            RealizationState::Pending(_) => None,
        }
    }

    /// Number of entries, pending ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry of `component`, returning how many were removed.
    ///
    /// Pending entries are removed as well: their leaders still return the
    /// value they compute, but it is not cached.
    pub fn invalidate_component(&self, component: &ComponentIdentifier) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.component != *component);
        before.saturating_sub(self.entries.len())
    }

    /// Current counters.
    pub fn stats(&self) -> RealizationStats {
        RealizationStats {
            realizations: self.realizations.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            waits: self.waits.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    /// Atomically inspect `key`, inserting a pending entry if it is vacant.
    pub(crate) fn claim(&self, key: &RealizationKey) -> Claim<'_> {
        match self.entries.entry(key.clone()) {
            Entry::Occupied(occ) => match occ.get() {
                RealizationState::Ready(metadata) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    Claim::Ready(Arc::clone(metadata))
                }
                RealizationState::Pending(notify) => {
                    self.waits.fetch_add(1, Ordering::Relaxed);
                    Claim::Wait(Arc::clone(notify))
                }
            },
            Entry::Vacant(vac) => {
                let notify = Arc::new(Notify::new());
                vac.insert(RealizationState::Pending(Arc::clone(&notify)));
                Claim::Leader(PendingGuard {
                    cache: self,
                    key: key.clone(),
                    notify,
                })
            }
        }
    }

    /// Whether `key` is still pending on exactly this notify.
    pub(crate) fn is_pending_with(&self, key: &RealizationKey, notify: &Arc<Notify>) -> bool {
        matches!(
            self.entries.get(key).as_deref(),
            Some(RealizationState::Pending(current)) if Arc::ptr_eq(current, notify)
        )
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }
}

impl fmt::Debug for RealizationCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealizationCache")
            .field("entries", &self.entries.len())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Ownership of a pending entry.
///
/// Dropping the guard without committing removes the pending entry and wakes
/// every waiter, which then claims the key again.
pub(crate) struct PendingGuard<'a> {
    cache: &'a RealizationCache,
    key: RealizationKey,
    notify: Arc<Notify>,
}

impl PendingGuard<'_> {
    /// Publish the computed value.
    ///
    /// If the pending entry was invalidated meanwhile, the value is returned
    /// without being cached.
    pub(crate) fn commit(self, metadata: ConfigurationMetadata) -> Arc<ConfigurationMetadata> {
        let metadata = Arc::new(metadata);
        self.cache.realizations.fetch_add(1, Ordering::Relaxed);

        let committed = match self.cache.entries.get_mut(&self.key) {
            Some(mut entry) => {
                let ours = matches!(
                    entry.value(),
                    RealizationState::Pending(current) if Arc::ptr_eq(current, &self.notify)
                );
                if ours {
                    *entry.value_mut() = RealizationState::Ready(Arc::clone(&metadata));
                }
                ours
            }
            None => false,
        };

        if !committed {
            tracing::debug!(
                target: "realize",
                "{} was invalidated while realizing, returning uncached value",
                self.key
            );
        }
        metadata
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.cache.entries.remove_if(&self.key, |_, state| {
            matches!(state, RealizationState::Pending(current) if Arc::ptr_eq(current, &self.notify))
        });
        self.notify.notify_waiters();
    }
}
