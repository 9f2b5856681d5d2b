/*!
 * Resource Records
 * Registry entries: metadata plus the kind-specific payload needed for disposal
 */

use super::abort::AbortHandle;
use super::event::{EventTarget, Listener, ListenerOptions};
use super::traits::{MediaContext, NetworkSocket, PerformanceObserver};
use super::types::ResourceKind;
use crate::core::types::{ComponentName, ResourceId, Sequence, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Zero-argument unsubscribe function
pub type Unsubscribe = Box<dyn FnOnce() + Send>;

/// Kind-specific payload of a tracked resource
pub enum ResourceHandle {
    AbortHandle(AbortHandle),
    Timeout(tokio::task::AbortHandle),
    Interval(tokio::task::AbortHandle),
    Subscription(Unsubscribe),
    EventListener {
        target: Arc<dyn EventTarget>,
        event: String,
        listener: Listener,
        options: ListenerOptions,
    },
    PerformanceObserver(Arc<dyn PerformanceObserver>),
    MediaContext(Arc<dyn MediaContext>),
    NetworkSocket(Arc<dyn NetworkSocket>),
}

impl ResourceHandle {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::AbortHandle(_) => ResourceKind::AbortHandle,
            Self::Timeout(_) => ResourceKind::Timeout,
            Self::Interval(_) => ResourceKind::Interval,
            Self::Subscription(_) => ResourceKind::Subscription,
            Self::EventListener { .. } => ResourceKind::EventListener,
            Self::PerformanceObserver(_) => ResourceKind::PerformanceObserver,
            Self::MediaContext(_) => ResourceKind::MediaContext,
            Self::NetworkSocket(_) => ResourceKind::NetworkSocket,
        }
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventListener { event, options, .. } => f
                .debug_struct("EventListener")
                .field("event", event)
                .field("options", options)
                .finish_non_exhaustive(),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

/// Cloneable metadata describing one live resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub component: ComponentName,
    pub description: String,
    /// Stamped by the store at insertion
    pub created_at: Timestamp,
    /// Insertion order within the owning registry
    pub sequence: Sequence,
}

/// One registry entry
///
/// Records are immutable once inserted; they only ever leave the store.
#[derive(Debug)]
pub struct ResourceRecord {
    info: ResourceInfo,
    handle: ResourceHandle,
}

impl ResourceRecord {
    pub fn new(
        id: impl Into<ResourceId>,
        component: impl Into<ComponentName>,
        description: impl Into<String>,
        handle: ResourceHandle,
    ) -> Self {
        Self {
            info: ResourceInfo {
                id: id.into(),
                kind: handle.kind(),
                component: component.into(),
                description: description.into(),
                created_at: 0,
                sequence: 0,
            },
            handle,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.info.id
    }

    #[inline]
    pub fn kind(&self) -> ResourceKind {
        self.info.kind
    }

    #[inline]
    pub fn component(&self) -> &str {
        &self.info.component
    }

    #[inline]
    pub fn info(&self) -> &ResourceInfo {
        &self.info
    }

    #[inline]
    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    pub(crate) fn stamp(&mut self, created_at: Timestamp, sequence: Sequence) {
        self.info.created_at = created_at;
        self.info.sequence = sequence;
    }

    pub fn into_parts(self) -> (ResourceInfo, ResourceHandle) {
        (self.info, self.handle)
    }
}
