/*!
 * Component Scope
 * Pre-tagged constructors bound to one component name
 */

use super::ResourceRegistry;
use crate::core::errors::{RegistryError, RegistryResult};
use crate::core::guard::ScopeGuard;
use crate::core::types::{ComponentName, ResourceId, Sequence};
use crate::resources::{
    spawn_interval, spawn_timeout, AbortHandle, EventTarget, Listener, ListenerOptions,
    MediaContext, NetworkSocket, PerformanceObserver, ResourceHandle, ResourceRecord, TimerHandle,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Façade that creates resources already tagged with its component
///
/// Each constructor starts (or accepts) the native resource and registers it in
/// one call, so a tracked resource and a running resource cannot diverge.
/// Construction fails with `RegistryError::DuplicateId` when the id is live; the
/// store is left unchanged and a timer that was started never fires.
#[derive(Clone)]
pub struct ComponentScope {
    registry: ResourceRegistry,
    component: ComponentName,
}

impl ComponentScope {
    pub(crate) fn new(registry: ResourceRegistry, component: ComponentName) -> Self {
        Self {
            registry,
            component,
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Id namespaced by component and purpose, unique per call
    pub fn unique_id(&self, purpose: &str) -> ResourceId {
        format!("{}:{}:{}", self.component, purpose, Uuid::new_v4())
    }

    pub fn create_abort_handle(
        &self,
        id: impl Into<ResourceId>,
        description: impl Into<String>,
    ) -> RegistryResult<AbortHandle> {
        let abort = AbortHandle::new();
        self.register(
            id.into(),
            description.into(),
            ResourceHandle::AbortHandle(abort.clone()),
        )?;
        Ok(abort)
    }

    /// Start a one-shot timer; disposal cancels it without running `callback`
    ///
    /// Once it fires the record leaves the store, so the id can be scheduled
    /// again, including from inside `callback`.
    pub fn create_timeout<F>(
        &self,
        id: impl Into<ResourceId>,
        callback: F,
        delay: Duration,
        description: impl Into<String>,
    ) -> RegistryResult<TimerHandle>
    where
        F: FnOnce() + Send + 'static,
    {
        let id = id.into();
        self.ensure_vacant(&id)?;

        let (armed, on_armed) = oneshot::channel();
        let registry = self.registry.downgrade();
        let timer_id = id.clone();
        let join = spawn_timeout(
            move |sequence: Sequence| {
                if let Some(registry) = registry.upgrade() {
                    registry.retire_fired(&timer_id, sequence);
                }
                callback();
            },
            delay,
            on_armed,
        )?;
        let handle = ResourceHandle::Timeout(join.abort_handle());
        let (timer, sequence) =
            self.register_timer(id, description.into(), handle, join.abort_handle())?;
        let _ = armed.send(sequence);
        Ok(timer)
    }

    /// Start a repeating timer firing every `period`, first after one period
    pub fn create_interval<F>(
        &self,
        id: impl Into<ResourceId>,
        callback: F,
        period: Duration,
        description: impl Into<String>,
    ) -> RegistryResult<TimerHandle>
    where
        F: FnMut() + Send + 'static,
    {
        let id = id.into();
        self.ensure_vacant(&id)?;

        let (armed, on_armed) = oneshot::channel();
        let join = spawn_interval(&id, callback, period, on_armed)?;
        let handle = ResourceHandle::Interval(join.abort_handle());
        let (timer, _) = self.register_timer(id, description.into(), handle, join.abort_handle())?;
        let _ = armed.send(());
        Ok(timer)
    }

    /// Track an unsubscribe function; it runs exactly once, on disposal
    pub fn add_subscription<F>(
        &self,
        id: impl Into<ResourceId>,
        unsubscribe: F,
        description: impl Into<String>,
    ) -> RegistryResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.register(
            id.into(),
            description.into(),
            ResourceHandle::Subscription(Box::new(unsubscribe)),
        )
    }

    /// Attach `listener` to `target` and track it for removal
    ///
    /// The listener is attached only after the registration is accepted.
    pub fn add_event_listener(
        &self,
        id: impl Into<ResourceId>,
        target: Arc<dyn EventTarget>,
        event: impl Into<String>,
        listener: Listener,
        options: ListenerOptions,
        description: impl Into<String>,
    ) -> RegistryResult<()> {
        let event = event.into();
        self.register(
            id.into(),
            description.into(),
            ResourceHandle::EventListener {
                target: target.clone(),
                event: event.clone(),
                listener: listener.clone(),
                options,
            },
        )?;
        target.add_event_listener(&event, listener, options);
        Ok(())
    }

    pub fn add_performance_observer(
        &self,
        id: impl Into<ResourceId>,
        observer: Arc<dyn PerformanceObserver>,
        description: impl Into<String>,
    ) -> RegistryResult<()> {
        self.register(
            id.into(),
            description.into(),
            ResourceHandle::PerformanceObserver(observer),
        )
    }

    /// Track a media context; disposal schedules its close without awaiting it
    pub fn add_media_context(
        &self,
        id: impl Into<ResourceId>,
        context: Arc<dyn MediaContext>,
        description: impl Into<String>,
    ) -> RegistryResult<()> {
        self.register(
            id.into(),
            description.into(),
            ResourceHandle::MediaContext(context),
        )
    }

    pub fn add_network_socket(
        &self,
        id: impl Into<ResourceId>,
        socket: Arc<dyn NetworkSocket>,
        description: impl Into<String>,
    ) -> RegistryResult<()> {
        self.register(
            id.into(),
            description.into(),
            ResourceHandle::NetworkSocket(socket),
        )
    }

    /// Dispose one resource early
    pub fn dispose(&self, id: &str) -> bool {
        self.registry.dispose_one(id)
    }

    /// Dispose everything this component registered
    ///
    /// Returns 0 on repeated calls with no new registrations in between.
    pub fn cleanup_component(&self) -> usize {
        self.registry.dispose_component(&self.component)
    }

    pub fn resource_count(&self) -> usize {
        self.registry.store().component_count(&self.component)
    }

    /// Wrap in a guard that cleans up this component on drop
    pub fn guard(self) -> ScopeGuard {
        ScopeGuard::new(self)
    }

    fn ensure_vacant(&self, id: &str) -> RegistryResult<()> {
        if self.registry.store().contains(id) {
            self.registry.stats_counters().inc_rejected_duplicates();
            return Err(RegistryError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    fn register(
        &self,
        id: ResourceId,
        description: String,
        handle: ResourceHandle,
    ) -> RegistryResult<()> {
        let record = ResourceRecord::new(id, self.component.clone(), description, handle);
        self.registry.insert(record)
    }

    /// Register a spawned timer task; the caller arms it on success
    fn register_timer(
        &self,
        id: ResourceId,
        description: String,
        handle: ResourceHandle,
        task: tokio::task::AbortHandle,
    ) -> RegistryResult<(TimerHandle, Sequence)> {
        let record = ResourceRecord::new(id.clone(), self.component.clone(), description, handle);
        match self.registry.insert_sequenced(record) {
            Ok(sequence) => Ok((TimerHandle::new(id, task), sequence)),
            Err(e) => {
                // Lost a race for the id after the vacancy check
                task.abort();
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for ComponentScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentScope")
            .field("component", &self.component)
            .field("resources", &self.resource_count())
            .finish()
    }
}
