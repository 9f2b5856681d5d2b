/*!
 * Disposal Engine
 *
 * Kind-specific release actions behind a fault boundary. Bookkeeping always
 * wins: a record leaves the store before its release action runs, and a failing
 * action is logged, never propagated.
 */

use super::atomic_stats::AtomicRegistryStats;
use super::config::RegistryConfig;
use super::store::RegistryStore;
use crate::core::errors::DisposeError;
use crate::resources::{ResourceHandle, ResourceInfo, ResourceRecord};
use futures::future::{self, BoxFuture, FutureExt};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

type CloseFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Executes disposal for records taken out of a store
pub(crate) struct DisposalEngine {
    stats: Arc<AtomicRegistryStats>,
    warn_on_redundant: bool,
}

impl DisposalEngine {
    pub(crate) fn new(config: &RegistryConfig, stats: Arc<AtomicRegistryStats>) -> Self {
        Self {
            stats,
            warn_on_redundant: config.warn_on_redundant_dispose,
        }
    }

    /// Dispose one resource by id
    ///
    /// Returns `false` when the id is not live.
    pub(crate) fn dispose_one(&self, store: &RegistryStore, id: &str) -> bool {
        match store.remove(id) {
            Some(record) => {
                if let Some(close) = self.release(record) {
                    schedule_close(close);
                }
                true
            }
            None => {
                self.note_redundant(id);
                false
            }
        }
    }

    /// Dispose every resource of one component in insertion order
    pub(crate) fn dispose_component(&self, store: &RegistryStore, component: &str) -> usize {
        let span = tracing::debug_span!("dispose_component", component);
        let _entered = span.enter();

        let ids = store.ids_for_component(component);
        let disposed = self.dispose_ids(store, &ids);
        debug!(disposed, snapshot = ids.len(), "component resources disposed");
        disposed
    }

    /// Dispose every live resource in insertion order
    pub(crate) fn dispose_all(&self, store: &RegistryStore) -> usize {
        let ids = store.all_ids();
        let disposed = self.dispose_ids(store, &ids);
        debug!(disposed, snapshot = ids.len(), "all resources disposed");
        disposed
    }

    /// Dispose every live resource and wait for asynchronous closes to finish
    pub(crate) async fn dispose_all_awaiting(&self, store: &RegistryStore) -> usize {
        let mut disposed = 0;
        let mut pending = Vec::new();

        for id in store.all_ids() {
            // Skip ids removed by re-entrant release actions
            let Some(record) = store.remove(&id) else {
                continue;
            };
            disposed += 1;
            if let Some(close) = self.release(record) {
                pending.push(close);
            }
        }

        // Close failures are logged and counted inside each future
        future::join_all(pending).await;

        debug!(disposed, "all resources disposed (awaited)");
        disposed
    }

    fn dispose_ids(&self, store: &RegistryStore, ids: &[String]) -> usize {
        ids.iter().filter(|id| self.dispose_one(store, id)).count()
    }

    /// Run the release action of an already-removed record
    ///
    /// Returns the pending close of a media context, with rejection logging
    /// attached, for the caller to schedule or await.
    pub(crate) fn release(&self, record: ResourceRecord) -> Option<CloseFuture> {
        let (info, handle) = record.into_parts();
        self.stats.inc_disposed();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| release_handle(handle)))
            .map_err(DisposeError::from_panic)
            .and_then(|result| result.map_err(DisposeError::Failed));

        match outcome {
            Ok(close) => {
                debug!(id = %info.id, kind = %info.kind, component = %info.component, "resource disposed");
                close.map(|close| self.guard_close(info, close))
            }
            Err(e) => {
                self.stats.inc_disposal_failures();
                log_failure(&info, &e);
                None
            }
        }
    }

    /// Attach failure logging to a media close for fire-and-forget scheduling
    fn guard_close(&self, info: ResourceInfo, close: CloseFuture) -> CloseFuture {
        let stats = self.stats.clone();
        async move {
            if let Err(e) = close.await {
                stats.inc_disposal_failures();
                let e = DisposeError::Failed(e);
                log_failure(&info, &e);
                return Err(anyhow::anyhow!("{}", e));
            }
            Ok(())
        }
        .boxed()
    }

    fn note_redundant(&self, id: &str) {
        self.stats.inc_redundant_disposals();
        if self.warn_on_redundant {
            warn!(id, "Disposal requested for a resource that is not registered");
        }
    }
}

/// Kind dispatch table
fn release_handle(handle: ResourceHandle) -> anyhow::Result<Option<CloseFuture>> {
    match handle {
        ResourceHandle::AbortHandle(abort) => abort.abort(),
        ResourceHandle::Timeout(task) | ResourceHandle::Interval(task) => task.abort(),
        ResourceHandle::Subscription(unsubscribe) => unsubscribe(),
        ResourceHandle::EventListener {
            target,
            event,
            listener,
            options,
        } => target.remove_event_listener(&event, &listener, options)?,
        ResourceHandle::PerformanceObserver(observer) => observer.disconnect()?,
        ResourceHandle::MediaContext(context) => return Ok(Some(context.close())),
        ResourceHandle::NetworkSocket(socket) => socket.close()?,
    }
    Ok(None)
}

/// Fire-and-forget a media close
///
/// Spawned on the current runtime when there is one; otherwise polled once.
/// Failures were already logged by `guard_close`.
fn schedule_close(close: CloseFuture) {
    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => {
            runtime.spawn(async move {
                let _ = close.await;
            });
        }
        Err(_) => {
            if close.now_or_never().is_none() {
                warn!("Media close still pending with no async runtime; abandoning it");
            }
        }
    }
}

fn log_failure(info: &ResourceInfo, error: &DisposeError) {
    warn!(
        id = %info.id,
        kind = %info.kind,
        component = %info.component,
        description = %info.description,
        error = %error,
        "Resource disposal failed; record removed anyway"
    );
}
