/*!
 * Registry Store
 * Authoritative id -> record mapping guarded by a single mutex
 */

use crate::core::errors::{RegistryError, RegistryResult};
use crate::core::types::{ResourceId, Sequence, Timestamp};
use crate::resources::{ResourceInfo, ResourceRecord};
use ahash::AHashMap;
use parking_lot::Mutex;
use std::time::Instant;

/// Mutex-guarded resource table
///
/// Every operation holds the lock only for the duration of the map access;
/// no user code runs under it.
pub struct RegistryStore {
    state: Mutex<StoreState>,
    epoch: Instant,
}

#[derive(Default)]
struct StoreState {
    records: AHashMap<ResourceId, ResourceRecord>,
    per_component: AHashMap<String, usize>,
    next_sequence: Sequence,
    last_timestamp: Timestamp,
}

impl RegistryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            epoch: Instant::now(),
        }
    }

    /// Insert a record, failing if its id is live
    pub fn insert(&self, record: ResourceRecord) -> RegistryResult<()> {
        self.try_insert(record)
            .map(|_| ())
            .map_err(|rejected| RegistryError::DuplicateId(rejected.id().to_string()))
    }

    /// Insert a record, handing it back untouched if its id is live
    ///
    /// On success returns the component's live count after insertion and the
    /// sequence stamped on the record.
    pub(crate) fn try_insert(
        &self,
        mut record: ResourceRecord,
    ) -> Result<(usize, Sequence), ResourceRecord> {
        let mut state = self.state.lock();
        if state.records.contains_key(record.id()) {
            return Err(record);
        }

        // Instant is monotonic, the max() keeps stamps non-decreasing across clamping
        let elapsed = self.epoch.elapsed().as_micros() as Timestamp;
        let created_at = elapsed.max(state.last_timestamp);
        let sequence = state.next_sequence;
        state.last_timestamp = created_at;
        state.next_sequence += 1;
        record.stamp(created_at, sequence);

        let count = state
            .per_component
            .entry(record.component().to_string())
            .or_insert(0);
        *count += 1;
        let count = *count;

        state.records.insert(record.id().to_string(), record);
        Ok((count, sequence))
    }

    /// Remove and return a live record; absence is not an error
    pub fn remove(&self, id: &str) -> Option<ResourceRecord> {
        self.state.lock().remove(id)
    }

    /// Remove a record only if it is the registration stamped `sequence`
    ///
    /// A later record that reused the id is left in place.
    pub(crate) fn remove_if_sequence(&self, id: &str, sequence: Sequence) -> Option<ResourceRecord> {
        let mut state = self.state.lock();
        let current = state
            .records
            .get(id)
            .is_some_and(|record| record.info().sequence == sequence);
        if !current {
            return None;
        }
        state.remove(id)
    }

    /// Snapshot of every live record, in insertion order
    pub fn list_all(&self) -> Vec<ResourceInfo> {
        let state = self.state.lock();
        let mut infos: Vec<ResourceInfo> =
            state.records.values().map(|r| r.info().clone()).collect();
        drop(state);
        infos.sort_unstable_by_key(|info| info.sequence);
        infos
    }

    /// Snapshot of one component's live records, in insertion order
    pub fn list_by_component(&self, component: &str) -> Vec<ResourceInfo> {
        let state = self.state.lock();
        let mut infos: Vec<ResourceInfo> = state
            .records
            .values()
            .filter(|r| r.component() == component)
            .map(|r| r.info().clone())
            .collect();
        drop(state);
        infos.sort_unstable_by_key(|info| info.sequence);
        infos
    }

    /// Ids of one component's live records, in insertion order
    pub(crate) fn ids_for_component(&self, component: &str) -> Vec<ResourceId> {
        self.list_by_component(component)
            .into_iter()
            .map(|info| info.id)
            .collect()
    }

    /// Ids of every live record, in insertion order
    pub(crate) fn all_ids(&self) -> Vec<ResourceId> {
        self.list_all().into_iter().map(|info| info.id).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.lock().records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }

    /// Live resource count for one component
    pub fn component_count(&self, component: &str) -> usize {
        self.state
            .lock()
            .per_component
            .get(component)
            .copied()
            .unwrap_or(0)
    }
}

impl StoreState {
    fn remove(&mut self, id: &str) -> Option<ResourceRecord> {
        let record = self.records.remove(id)?;

        let remaining = self
            .per_component
            .get_mut(record.component())
            .map(|count| {
                *count -= 1;
                *count
            });
        if remaining == Some(0) {
            self.per_component.remove(record.component());
        }
        Some(record)
    }
}

impl Default for RegistryStore {
    fn default() -> Self {
        Self::new()
    }
}
