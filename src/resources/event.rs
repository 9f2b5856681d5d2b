/*!
 * Event Targets
 * Listener registration keyed by event name, listener identity and capture phase
 */

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Event delivered to listeners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Event handler; identity is the `Arc` allocation
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Options that accompany a listener registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerOptions {
    /// Part of the listener's identity for removal
    pub capture: bool,
    /// Remove the listener after its first invocation
    pub once: bool,
    pub passive: bool,
}

impl ListenerOptions {
    pub fn capture() -> Self {
        Self {
            capture: true,
            ..Default::default()
        }
    }

    pub fn once() -> Self {
        Self {
            once: true,
            ..Default::default()
        }
    }
}

/// Compare listener identity, ignoring vtable differences
#[inline]
pub fn same_listener(a: &Listener, b: &Listener) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const u8,
        Arc::as_ptr(b) as *const u8,
    )
}

/// Anything that accepts event listeners
pub trait EventTarget: Send + Sync {
    fn add_event_listener(&self, event: &str, listener: Listener, options: ListenerOptions);

    /// Remove the listener registered with the same event, identity and capture flag
    ///
    /// Removing an unknown listener is not an error.
    fn remove_event_listener(
        &self,
        event: &str,
        listener: &Listener,
        options: ListenerOptions,
    ) -> anyhow::Result<()>;
}

struct RegisteredListener {
    event: String,
    listener: Listener,
    options: ListenerOptions,
}

/// In-process event target
#[derive(Default)]
pub struct EventEmitter {
    listeners: Mutex<Vec<RegisteredListener>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event; returns the number of listeners invoked
    ///
    /// Listeners run outside the internal lock, so they may add or remove
    /// listeners on this target.
    pub fn dispatch(&self, event: &Event) -> usize {
        let matched: Vec<Listener> = {
            let mut listeners = self.listeners.lock();
            let matched = listeners
                .iter()
                .filter(|l| l.event == event.name)
                .map(|l| l.listener.clone())
                .collect();
            listeners.retain(|l| !(l.event == event.name && l.options.once));
            matched
        };

        for listener in &matched {
            listener(event);
        }
        matched.len()
    }

    /// Number of listeners registered for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .iter()
            .filter(|l| l.event == event)
            .count()
    }
}

impl EventTarget for EventEmitter {
    fn add_event_listener(&self, event: &str, listener: Listener, options: ListenerOptions) {
        let mut listeners = self.listeners.lock();
        let exists = listeners.iter().any(|l| {
            l.event == event
                && l.options.capture == options.capture
                && same_listener(&l.listener, &listener)
        });
        if !exists {
            listeners.push(RegisteredListener {
                event: event.to_string(),
                listener,
                options,
            });
        }
    }

    fn remove_event_listener(
        &self,
        event: &str,
        listener: &Listener,
        options: ListenerOptions,
    ) -> anyhow::Result<()> {
        self.listeners.lock().retain(|l| {
            !(l.event == event
                && l.options.capture == options.capture
                && same_listener(&l.listener, listener))
        });
        Ok(())
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.lock().len())
            .finish()
    }
}
