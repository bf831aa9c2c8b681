//! World-owned singletons and per-tick event queues.
//!
//! Resources replace ambient global state: anything a system needs to share
//! with later systems (event queues, statistics, grids) lives in the world's
//! [`Resources`] map, keyed by its Rust type.

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Type-keyed map of singleton values.
#[derive(Default)]
pub struct Resources {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Resources {
    /// Creates an empty resource map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value`, returning the previous resource of the same type.
    pub fn insert<R: Send + Sync + 'static>(&mut self, value: R) -> Option<R> {
        self.values
            .insert(TypeId::of::<R>(), Box::new(value))
            .and_then(|old| old.downcast::<R>().ok())
            .map(|old| *old)
    }

    /// Removes and returns the resource of type `R`.
    pub fn remove<R: Send + Sync + 'static>(&mut self) -> Option<R> {
        self.values
            .remove(&TypeId::of::<R>())
            .and_then(|old| old.downcast::<R>().ok())
            .map(|old| *old)
    }

    /// Returns the resource of type `R`.
    #[must_use]
    pub fn get<R: Send + Sync + 'static>(&self) -> Option<&R> {
        self.values.get(&TypeId::of::<R>())?.downcast_ref()
    }

    /// Returns the resource of type `R` mutably.
    pub fn get_mut<R: Send + Sync + 'static>(&mut self) -> Option<&mut R> {
        self.values.get_mut(&TypeId::of::<R>())?.downcast_mut()
    }

    /// Inserts `R::default()` unless a resource of type `R` is present.
    ///
    /// Returns `true` if a value was inserted.
    pub fn init<R: Default + Send + Sync + 'static>(&mut self) -> bool {
        if self.contains::<R>() {
            return false;
        }
        self.values.insert(TypeId::of::<R>(), Box::new(R::default()));
        true
    }

    /// Returns `true` if a resource of type `R` is present.
    #[must_use]
    pub fn contains<R: Send + Sync + 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<R>())
    }

    /// Returns the number of stored resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no resource is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources")
            .field("len", &self.values.len())
            .finish()
    }
}

/// An ordered queue of events produced during a tick.
///
/// The producer decides when the queue is cleared; consumers only read or
/// drain it. Events keep the order in which they were sent.
#[derive(Debug, Clone)]
pub struct Events<E> {
    queue: Vec<E>,
}

impl<E> Default for Events<E> {
    fn default() -> Self {
        Self { queue: Vec::new() }
    }
}

impl<E> Events<E> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn send(&mut self, event: E) {
        self.queue.push(event);
    }

    /// Iterates over queued events in send order.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.queue.iter()
    }

    /// Removes and yields all queued events.
    pub fn drain(&mut self) -> std::vec::Drain<'_, E> {
        self.queue.drain(..)
    }

    /// Discards all queued events.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Returns the number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if no event is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the queued events as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[E] {
        &self.queue
    }
}

impl<E> Extend<E> for Events<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.queue.extend(iter);
    }
}

impl<'a, E> IntoIterator for &'a Events<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.queue.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Score(u32);

    #[test]
    fn test_insert_get_remove() {
        let mut res = Resources::new();
        assert!(res.insert(Score(1)).is_none());
        assert_eq!(res.insert(Score(2)), Some(Score(1)));
        assert_eq!(res.get::<Score>(), Some(&Score(2)));
        res.get_mut::<Score>().unwrap().0 += 1;
        assert_eq!(res.remove::<Score>(), Some(Score(3)));
        assert!(!res.contains::<Score>());
    }

    #[test]
    fn test_init_inserts_once() {
        let mut res = Resources::new();
        assert!(res.init::<Score>());
        res.get_mut::<Score>().unwrap().0 = 7;
        assert!(!res.init::<Score>());
        assert_eq!(res.get::<Score>(), Some(&Score(7)));
        assert_eq!(res.len(), 1);
    }

    #[test]
    fn test_events_keep_send_order() {
        let mut events = Events::new();
        events.send(1);
        events.send(2);
        events.extend([3, 4]);
        assert_eq!(events.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        let drained: Vec<_> = events.drain().collect();
        assert_eq!(drained.len(), 4);
        assert!(events.is_empty());
    }
}
