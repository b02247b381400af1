//! Cancellable subscriptions and the listener registry behind them.
//!
//! Every callback registration in the crate hands back a [`Subscription`].
//! Dropping the handle (or calling [`Subscription::cancel`]) releases the
//! listener exactly once; there is no separate "remove listener" call to pair
//! up by hand.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Handle to a registered listener.
///
/// The release action runs at most once: on [`cancel`](Self::cancel), or on
/// drop if the handle was never cancelled.
///
/// # Example
///
/// ```rust
/// use themekeeper::ListenerSet;
///
/// let listeners: ListenerSet<u32> = ListenerSet::new();
/// let sub = listeners.subscribe(|n| println!("got {n}"));
/// assert_eq!(listeners.len(), 1);
///
/// drop(sub);
/// assert!(listeners.is_empty());
/// ```
#[must_use = "dropping a Subscription immediately releases the listener"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Creates a handle that runs `release` when cancelled or dropped.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Returns true until the release action has run.
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Releases the listener now.
    pub fn cancel(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

type Listener<T> = Rc<dyn Fn(&T)>;

struct Registry<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// Single-threaded registry of listeners for values of type `T`.
///
/// Clones share the same registry. Subscriptions hold only a weak reference,
/// so a handle outliving its registry releases nothing and does not panic.
pub struct ListenerSet<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: 'static> ListenerSet<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Registers a listener; it stays registered while the returned handle
    /// is active.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.push((id, Rc::new(listener)));
            id
        };

        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry
                    .borrow_mut()
                    .listeners
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// Calls every registered listener with `value`, in registration order.
    ///
    /// Listeners are collected before any is invoked, so a listener may
    /// subscribe or cancel re-entrantly. Changes take effect on the next
    /// notification.
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(value);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for ListenerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ListenerSet<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<T> fmt::Debug for ListenerSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.registry.borrow().listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_subscription_releases_once() {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let sub = Subscription::new(move || counter.set(counter.get() + 1));

        assert!(sub.is_active());
        sub.cancel();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_subscription_releases_on_drop() {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        {
            let _sub = Subscription::new(move || counter.set(counter.get() + 1));
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_notify_reaches_all_listeners_in_order() {
        let set: ListenerSet<i32> = ListenerSet::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = Rc::clone(&seen);
        let _s1 = set.subscribe(move |v| a.borrow_mut().push(("a", *v)));
        let b = Rc::clone(&seen);
        let _s2 = set.subscribe(move |v| b.borrow_mut().push(("b", *v)));

        set.notify(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_cancel_removes_only_that_listener() {
        let set: ListenerSet<()> = ListenerSet::new();
        let first = set.subscribe(|_| {});
        let _second = set.subscribe(|_| {});

        first.cancel();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_subscription_outliving_registry_is_harmless() {
        let set: ListenerSet<()> = ListenerSet::new();
        let sub = set.subscribe(|_| {});
        drop(set);
        sub.cancel();
    }

    #[test]
    fn test_listener_can_subscribe_during_notify() {
        let set: ListenerSet<u8> = ListenerSet::new();
        let held = Rc::new(RefCell::new(Vec::new()));

        let inner_set = set.clone();
        let inner_held = Rc::clone(&held);
        let _sub = set.subscribe(move |_| {
            inner_held.borrow_mut().push(inner_set.subscribe(|_| {}));
        });

        set.notify(&1);
        assert_eq!(set.len(), 2);
    }
}
