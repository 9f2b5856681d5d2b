/*!
 * Native Resource Traits
 * Seams for resources the registry releases but does not create
 */

use futures::future::BoxFuture;

/// Observer that stops receiving entries once disconnected
pub trait PerformanceObserver: Send + Sync {
    fn disconnect(&self) -> anyhow::Result<()>;
}

/// Media/audio context with an asynchronous close
///
/// Synchronous disposal schedules the returned future without awaiting it.
pub trait MediaContext: Send + Sync {
    fn close(&self) -> BoxFuture<'static, anyhow::Result<()>>;
}

/// Network connection (socket, realtime channel, stream)
pub trait NetworkSocket: Send + Sync {
    fn close(&self) -> anyhow::Result<()>;
}
