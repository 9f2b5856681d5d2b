/*!
 * Resource Registry
 *
 * Per-owner tracking and deterministic release of disposable resources.
 *
 * ## Layers
 *
 * - **RegistryStore**: id -> record table
 * - **DisposalEngine**: kind dispatch behind a fault boundary
 * - **ComponentScope**: pre-tagged constructors for one component
 * - **StatsSnapshot**: read-only aggregation for diagnostics
 *
 * The registry is an explicitly constructed value. Clones share one store, so a
 * registry can be handed to every component that needs it while tests build
 * isolated instances.
 */

mod atomic_stats;
mod config;
mod disposal;
mod scope;
mod stats;
mod store;

pub use atomic_stats::LifetimeStats;
pub use config::RegistryConfig;
pub use scope::ComponentScope;
pub use stats::StatsSnapshot;
pub use store::RegistryStore;

use crate::core::errors::{RegistryError, RegistryResult};
use crate::core::types::Sequence;
use crate::resources::{ResourceInfo, ResourceRecord};
use atomic_stats::AtomicRegistryStats;
use disposal::DisposalEngine;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Shared handle to one resource registry
#[derive(Clone)]
pub struct ResourceRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    store: RegistryStore,
    engine: DisposalEngine,
    stats: Arc<AtomicRegistryStats>,
    config: RegistryConfig,
}

impl ResourceRegistry {
    /// Create an empty registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let stats = Arc::new(AtomicRegistryStats::new());
        let engine = DisposalEngine::new(&config, stats.clone());
        debug!(registry = %config.name, "resource registry created");

        Self {
            inner: Arc::new(RegistryInner {
                store: RegistryStore::new(),
                engine,
                stats,
                config,
            }),
        }
    }

    /// Façade bound to one component name
    pub fn scope(&self, component: impl Into<String>) -> ComponentScope {
        ComponentScope::new(self.clone(), component.into())
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    pub(crate) fn store(&self) -> &RegistryStore {
        &self.inner.store
    }

    pub(crate) fn stats_counters(&self) -> &AtomicRegistryStats {
        &self.inner.stats
    }

    /// Register a prepared record
    ///
    /// This is the only way in from outside the crate, so the lifetime counters
    /// see every registration. The store itself is not reachable:
    ///
    /// ```compile_fail
    /// let registry = resource_lifecycle::ResourceRegistry::new();
    /// let _ = registry.store();
    /// ```
    pub fn insert(&self, record: ResourceRecord) -> RegistryResult<()> {
        self.insert_sequenced(record).map(|_| ())
    }

    /// Register a prepared record and return the sequence it was stamped with
    pub(crate) fn insert_sequenced(&self, record: ResourceRecord) -> RegistryResult<Sequence> {
        let id = record.id().to_string();
        let kind = record.kind();
        let component = record.component().to_string();

        match self.inner.store.try_insert(record) {
            Ok((component_count, sequence)) => {
                self.inner.stats.inc_registered();
                debug!(id = %id, kind = %kind, component = %component, "resource registered");
                self.check_leak_threshold(&component, component_count);
                Ok(sequence)
            }
            Err(_rejected) => {
                self.inner.stats.inc_rejected_duplicates();
                Err(RegistryError::DuplicateId(id))
            }
        }
    }

    /// Remove a record without running its release action
    pub fn remove(&self, id: &str) -> Option<ResourceRecord> {
        self.inner.store.remove(id)
    }

    pub fn list_all(&self) -> Vec<ResourceInfo> {
        self.inner.store.list_all()
    }

    pub fn list_by_component(&self, component: &str) -> Vec<ResourceInfo> {
        self.inner.store.list_by_component(component)
    }

    /// Dispose one resource; `false` if the id was not live
    pub fn dispose_one(&self, id: &str) -> bool {
        self.inner.engine.dispose_one(&self.inner.store, id)
    }

    /// Dispose every resource of one component; returns the number disposed
    pub fn dispose_component(&self, component: &str) -> usize {
        self.inner.engine.dispose_component(&self.inner.store, component)
    }

    /// Dispose every live resource; returns the number disposed
    pub fn dispose_all(&self) -> usize {
        self.inner.engine.dispose_all(&self.inner.store)
    }

    /// Dispose everything and wait until every media close has settled
    pub async fn dispose_all_awaiting(&self) -> usize {
        self.inner
            .engine
            .dispose_all_awaiting(&self.inner.store)
            .await
    }

    pub fn stats(&self) -> StatsSnapshot {
        let listing = self.inner.store.list_all();
        StatsSnapshot::from_listing(&listing, self.inner.stats.snapshot())
    }

    pub fn active_resources(&self) -> Vec<ResourceInfo> {
        self.inner.store.list_all()
    }

    /// Drop the record of a one-shot timer that has fired
    ///
    /// Nothing is released: the timer task is the caller. A record registered
    /// later under the same id is left alone.
    pub(crate) fn retire_fired(&self, id: &str, sequence: Sequence) -> bool {
        let retired = self.inner.store.remove_if_sequence(id, sequence).is_some();
        if retired {
            self.inner.stats.inc_expired();
            debug!(id, "fired timeout retired");
        }
        retired
    }

    pub(crate) fn downgrade(&self) -> WeakRegistry {
        WeakRegistry {
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn check_leak_threshold(&self, component: &str, count: usize) {
        if let Some(threshold) = self.inner.config.leak_warning_threshold {
            // Warn once per crossing, not on every registration above it
            if count == threshold + 1 {
                warn!(
                    registry = %self.inner.config.name,
                    component,
                    count,
                    threshold,
                    "Component holds more live resources than the leak threshold"
                );
            }
        }
    }
}

/// Non-owning registry handle held by running timer tasks
#[derive(Clone)]
pub(crate) struct WeakRegistry {
    inner: Weak<RegistryInner>,
}

impl WeakRegistry {
    pub(crate) fn upgrade(&self) -> Option<ResourceRegistry> {
        self.inner.upgrade().map(|inner| ResourceRegistry { inner })
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("name", &self.inner.config.name)
            .field("resources", &self.inner.store.len())
            .finish()
    }
}

impl Drop for RegistryInner {
    fn drop(&mut self) {
        if !self.config.dispose_on_drop || self.store.is_empty() {
            return;
        }
        let leaked = self.store.len();
        warn!(
            registry = %self.config.name,
            leaked,
            "Registry dropped with live resources; releasing them"
        );
        self.engine.dispose_all(&self.store);
    }
}
