/*!
 * Resource Kinds
 * Closed set of disposal strategies the registry understands
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of tracked resource; each kind has exactly one disposal action
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    AbortHandle,
    Timeout,
    Interval,
    Subscription,
    EventListener,
    PerformanceObserver,
    MediaContext,
    NetworkSocket,
}

impl ResourceKind {
    /// Every kind, in declaration order
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::AbortHandle,
        ResourceKind::Timeout,
        ResourceKind::Interval,
        ResourceKind::Subscription,
        ResourceKind::EventListener,
        ResourceKind::PerformanceObserver,
        ResourceKind::MediaContext,
        ResourceKind::NetworkSocket,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AbortHandle => "AbortHandle",
            Self::Timeout => "Timeout",
            Self::Interval => "Interval",
            Self::Subscription => "Subscription",
            Self::EventListener => "EventListener",
            Self::PerformanceObserver => "PerformanceObserver",
            Self::MediaContext => "MediaContext",
            Self::NetworkSocket => "NetworkSocket",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
