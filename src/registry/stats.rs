/*!
 * Registry Introspection
 * Read-only aggregation over the live resource table
 */

use super::atomic_stats::LifetimeStats;
use crate::resources::{ResourceInfo, ResourceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time view of a registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_resources: usize,
    /// Live count per kind; every kind is present, zero included
    pub by_type: BTreeMap<ResourceKind, usize>,
    pub by_component: BTreeMap<String, usize>,
    pub oldest_resource: Option<ResourceInfo>,
    pub newest_resource: Option<ResourceInfo>,
    pub lifetime: LifetimeStats,
}

impl StatsSnapshot {
    /// Aggregate a listing taken in insertion order
    pub(crate) fn from_listing(resources: &[ResourceInfo], lifetime: LifetimeStats) -> Self {
        let mut by_type: BTreeMap<ResourceKind, usize> =
            ResourceKind::ALL.iter().map(|kind| (*kind, 0)).collect();
        let mut by_component = BTreeMap::new();

        for info in resources {
            *by_type.entry(info.kind).or_insert(0) += 1;
            *by_component.entry(info.component.clone()).or_insert(0) += 1;
        }

        Self {
            total_resources: resources.len(),
            by_type,
            by_component,
            oldest_resource: resources.iter().min_by_key(|i| i.sequence).cloned(),
            newest_resource: resources.iter().max_by_key(|i| i.sequence).cloned(),
            lifetime,
        }
    }

    #[inline]
    pub fn count_of(&self, kind: ResourceKind) -> usize {
        self.by_type.get(&kind).copied().unwrap_or(0)
    }

    #[inline]
    pub fn component_total(&self, component: &str) -> usize {
        self.by_component.get(component).copied().unwrap_or(0)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
