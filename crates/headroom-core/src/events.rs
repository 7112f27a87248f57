//! Event system for observing component behavior.
//!
//! Every component publishes events describing what it did: the cache reports
//! hits and evictions, the rate limiter reports waits, the retryer reports
//! attempts. Applications subscribe with [`EventListener`] implementations
//! (usually closures via [`FnListener`]) and forward events to whatever
//! logging or metrics backend they use.
//!
//! Listeners run synchronously on the calling task, so they should be cheap.
//! A panicking listener is isolated and never takes the component down.

use std::fmt;
use std::marker::PhantomData;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;

/// Implemented by each component's event enum.
pub trait ComponentEvent: fmt::Debug {
    /// Short machine-readable name of the event, such as `"cache_hit"`.
    fn event_type(&self) -> &'static str;

    /// When the event occurred.
    fn timestamp(&self) -> Instant;

    /// Name of the component instance that emitted the event.
    fn component_name(&self) -> &str;
}

/// Receives events from a component.
pub trait EventListener<E>: Send + Sync {
    fn on_event(&self, event: &E);
}

/// An ordered collection of listeners attached to one component instance.
pub struct EventListeners<E> {
    listeners: Vec<Arc<dyn EventListener<E>>>,
}

impl<E> EventListeners<E> {
    pub fn new() -> Self {
        EventListeners {
            listeners: Vec::new(),
        }
    }

    /// Appends a listener. Listeners are notified in registration order.
    pub fn add(&mut self, listener: Arc<dyn EventListener<E>>) {
        self.listeners.push(listener);
    }

    /// Delivers an event to every listener.
    ///
    /// A panic in one listener is swallowed so that the remaining listeners
    /// still run and the component keeps working.
    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            let _ = catch_unwind(AssertUnwindSafe(|| listener.on_event(event)));
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E> Default for EventListeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventListeners<E> {
    fn clone(&self) -> Self {
        EventListeners {
            listeners: self.listeners.clone(),
        }
    }
}

impl<E> fmt::Debug for EventListeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}

/// Wraps a closure as an [`EventListener`].
///
/// This is what the `on_*` builder hooks use under the hood:
///
/// ```
/// use headroom_core::{EventListener, FnListener};
///
/// let listener = FnListener::new(|event: &String| {
///     println!("saw {event}");
/// });
/// listener.on_event(&"hello".to_string());
/// ```
pub struct FnListener<F, E> {
    f: F,
    _event: PhantomData<fn(&E)>,
}

impl<F, E> FnListener<F, E>
where
    F: Fn(&E) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        FnListener {
            f,
            _event: PhantomData,
        }
    }
}

impl<F, E> EventListener<E> for FnListener<F, E>
where
    F: Fn(&E) + Send + Sync,
{
    fn on_event(&self, event: &E) {
        (self.f)(event);
    }
}
