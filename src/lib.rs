/*!
 * Resource Lifecycle Library
 * Tracking and deterministic release of disposable resources per component
 */

pub mod core;
pub mod monitoring;
pub mod registry;
pub mod resources;

// Re-exports
pub use crate::core::{Guard, GuardError, RegistryError, RegistryResult, ResourceId, ScopeGuard};
pub use monitoring::init_tracing;
pub use registry::{
    ComponentScope, LifetimeStats, RegistryConfig, RegistryStore, ResourceRegistry, StatsSnapshot,
};
pub use resources::{
    AbortHandle, Event, EventEmitter, EventTarget, Listener, ListenerOptions, MediaContext,
    NetworkSocket, PerformanceObserver, ResourceHandle, ResourceInfo, ResourceKind,
    ResourceRecord, TimerHandle,
};
