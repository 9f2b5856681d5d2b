/*!
 * Resource Model
 * Tracked resource kinds, records and the native handle types they wrap
 */

mod abort;
mod event;
mod record;
mod timer;
mod traits;
mod types;

pub use abort::AbortHandle;
pub use event::{same_listener, Event, EventEmitter, EventTarget, Listener, ListenerOptions};
pub use record::{ResourceHandle, ResourceInfo, ResourceRecord, Unsubscribe};
pub use timer::TimerHandle;
pub use traits::{MediaContext, NetworkSocket, PerformanceObserver};
pub use types::ResourceKind;

pub(crate) use timer::{spawn_interval, spawn_timeout};
