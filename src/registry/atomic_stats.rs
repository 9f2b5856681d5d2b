/*!
 * Lock-Free Registry Counters
 * Lifetime counters updated outside the store lock
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic lifetime counters for one registry
///
/// All operations use relaxed ordering; snapshots are advisory.
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub(crate) struct AtomicRegistryStats {
    registered: AtomicU64,
    disposed: AtomicU64,
    expired: AtomicU64,
    disposal_failures: AtomicU64,
    redundant_disposals: AtomicU64,
    rejected_duplicates: AtomicU64,
}

impl AtomicRegistryStats {
    pub(crate) const fn new() -> Self {
        Self {
            registered: AtomicU64::new(0),
            disposed: AtomicU64::new(0),
            expired: AtomicU64::new(0),
            disposal_failures: AtomicU64::new(0),
            redundant_disposals: AtomicU64::new(0),
            rejected_duplicates: AtomicU64::new(0),
        }
    }

    #[inline(always)]
    pub(crate) fn inc_registered(&self) {
        self.registered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_disposed(&self) {
        self.disposed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_expired(&self) {
        self.expired.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_disposal_failures(&self) {
        self.disposal_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_redundant_disposals(&self) {
        self.redundant_disposals.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_rejected_duplicates(&self) {
        self.rejected_duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> LifetimeStats {
        LifetimeStats {
            registered: self.registered.load(Ordering::Relaxed),
            disposed: self.disposed.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            disposal_failures: self.disposal_failures.load(Ordering::Relaxed),
            redundant_disposals: self.redundant_disposals.load(Ordering::Relaxed),
            rejected_duplicates: self.rejected_duplicates.load(Ordering::Relaxed),
        }
    }
}

/// Counters accumulated since the registry was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub registered: u64,
    pub disposed: u64,
    /// One-shot timers that fired and left the store on their own
    pub expired: u64,
    /// Disposals whose native release action failed (still removed)
    pub disposal_failures: u64,
    /// Disposal requests for ids that were not live
    pub redundant_disposals: u64,
    pub rejected_duplicates: u64,
}
