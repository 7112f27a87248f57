//! Thread-safe result accumulation across tasks.

use std::fmt;
use std::sync::{Arc, Mutex};

/// Collects values from concurrent tasks, with an optional capacity bound.
///
/// Clones share the same buffer, so a collector can be handed to every
/// operation in a batch and read once afterwards. When bounded, `add`
/// refuses values beyond the cap instead of growing without limit.
pub struct Collector<T> {
    inner: Arc<Mutex<Vec<T>>>,
    max_items: usize,
}

impl<T> Collector<T> {
    /// Creates an unbounded collector.
    pub fn new() -> Self {
        Collector::with_capacity(0)
    }

    /// Creates a collector that holds at most `max_items` values.
    /// 0 means unbounded.
    pub fn with_capacity(max_items: usize) -> Self {
        Collector {
            inner: Arc::new(Mutex::new(Vec::new())),
            max_items,
        }
    }

    /// Adds a value. Returns `false`, dropping the value, when the
    /// collector is full.
    pub fn add(&self, value: T) -> bool {
        let mut items = self.inner.lock().unwrap();
        if self.max_items != 0 && items.len() >= self.max_items {
            return false;
        }
        items.push(value);
        true
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    /// `true` when a bounded collector has reached its cap.
    pub fn is_full(&self) -> bool {
        self.max_items != 0 && self.len() >= self.max_items
    }

    /// A snapshot of the current contents, in insertion order.
    pub fn items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.lock().unwrap().clone()
    }

    /// Drains the collector, leaving it empty.
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.inner.lock().unwrap())
    }
}

impl<T> Clone for Collector<T> {
    fn clone(&self) -> Self {
        Collector {
            inner: Arc::clone(&self.inner),
            max_items: self.max_items,
        }
    }
}

impl<T> Default for Collector<T> {
    fn default() -> Self {
        Collector::new()
    }
}

impl<T> fmt::Debug for Collector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("len", &self.len())
            .field("max_items", &self.max_items)
            .finish()
    }
}
