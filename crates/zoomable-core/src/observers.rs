//! Explicit change notification.
//!
//! Renderers either poll the latest value once per frame or subscribe here
//! and get called after every completed mutation.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct ObserversInner<T> {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
}

/// A list of listeners for values of type `T`.
pub struct Observers<T: 'static> {
    inner: Rc<ObserversInner<T>>,
}

impl<T: 'static> Observers<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ObserversInner {
                next_id: Cell::new(1),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Registers `listener`. It stays registered until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let weak: Weak<ObserversInner<T>> = Rc::downgrade(&self.inner);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner
                        .listeners
                        .borrow_mut()
                        .retain(|(listener_id, _)| *listener_id != id);
                }
            })),
        }
    }

    /// Calls every listener with `value`.
    ///
    /// Listeners may subscribe or unsubscribe while being notified; those
    /// changes apply from the next notification on.
    pub fn notify(&self, value: &T) {
        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Clone for Observers<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> std::fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Handle for a registered listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    remove: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Keeps the listener registered for as long as the observed object lives.
    pub fn detach(mut self) {
        self.remove = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_subscription_stops_notifications() {
        let observers = Observers::<i32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let subscription = observers.subscribe(move |value| sink.borrow_mut().push(*value));
        observers.notify(&1);
        drop(subscription);
        observers.notify(&2);

        assert_eq!(seen.borrow().as_slice(), &[1]);
        assert!(observers.is_empty());
    }

    #[test]
    fn detached_subscription_keeps_listening() {
        let observers = Observers::<i32>::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);

        observers
            .subscribe(move |_| counter.set(counter.get() + 1))
            .detach();
        observers.notify(&1);
        observers.notify(&2);

        assert_eq!(count.get(), 2);
    }

    #[test]
    fn listener_may_subscribe_during_notify() {
        let observers = Observers::<i32>::new();
        let nested = Rc::new(RefCell::new(Vec::new()));
        let registry = observers.clone();
        let store = Rc::clone(&nested);

        let _outer = observers.subscribe(move |_| {
            store.borrow_mut().push(registry.subscribe(|_| {}));
        });
        observers.notify(&0);

        assert_eq!(observers.len(), 2);
    }
}
