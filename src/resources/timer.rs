/*!
 * Timers
 * One-shot and repeating timers driven by the tokio runtime
 */

use crate::core::errors::{RegistryError, RegistryResult};
use crate::core::types::ResourceId;
use crate::resources::ResourceKind;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Caller-facing handle for a tracked timer
///
/// A one-shot timer drops its registry record when it fires; an interval keeps
/// its record until it is disposed.
#[derive(Debug)]
pub struct TimerHandle {
    id: ResourceId,
    task: task::AbortHandle,
}

impl TimerHandle {
    pub(crate) fn new(id: ResourceId, task: task::AbortHandle) -> Self {
        Self { id, task }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True once the timer task has completed or been cancelled
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop future firings without touching the registry record
    pub fn cancel(&self) {
        self.task.abort();
    }
}

fn current_runtime(kind: ResourceKind) -> RegistryResult<Handle> {
    Handle::try_current().map_err(|_| RegistryError::NoRuntime { kind })
}

/// Spawn a one-shot timer; the callback runs at most once
///
/// The countdown starts now, but the callback only runs once `armed` has
/// delivered a value, which is handed to it. Dropping the sender unfired
/// ends the task without running the callback.
pub(crate) fn spawn_timeout<F, T>(
    callback: F,
    delay: Duration,
    armed: oneshot::Receiver<T>,
) -> RegistryResult<task::JoinHandle<()>>
where
    F: FnOnce(T) + Send + 'static,
    T: Send + 'static,
{
    let runtime = current_runtime(ResourceKind::Timeout)?;
    let deadline = Instant::now() + delay;
    let join = runtime.spawn(async move {
        let Ok(token) = armed.await else {
            return;
        };
        time::sleep_until(deadline).await;
        callback(token);
    });
    Ok(join)
}

/// Spawn a repeating timer; the first firing happens one period from now
///
/// Like `spawn_timeout`, nothing fires until `armed` delivers.
pub(crate) fn spawn_interval<F>(
    id: &str,
    mut callback: F,
    period: Duration,
    armed: oneshot::Receiver<()>,
) -> RegistryResult<task::JoinHandle<()>>
where
    F: FnMut() + Send + 'static,
{
    if period.is_zero() {
        return Err(RegistryError::InvalidPeriod { id: id.to_string() });
    }
    let runtime = current_runtime(ResourceKind::Interval)?;
    let start = Instant::now() + period;
    let join = runtime.spawn(async move {
        if armed.await.is_err() {
            return;
        }
        let mut ticker = time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            callback();
        }
    });
    Ok(join)
}
