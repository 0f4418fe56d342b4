//! Single-threaded observable value.
//!
//! Listeners are held as `Weak` references and cleaned up lazily during
//! notification. The returned [`Subscription`] owns the strong reference, so
//! dropping it is what unsubscribes.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct Listener<T>(Box<dyn Fn(&T)>);

struct Inner<T> {
    value: T,
    /// Bumped on every set; a notification pass stops once it is stale.
    version: u64,
    listeners: Vec<Weak<Listener<T>>>,
}

/// A shared value that notifies listeners when it is set.
///
/// Cloning an `Observable` yields another handle to the same value.
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Create an observable holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Snapshot of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Replace the value and notify every live listener in registration
    /// order.
    ///
    /// Listeners receive the new value and may read, set or subscribe to
    /// this observable from inside the callback. A set from inside a
    /// listener notifies everyone with the newer value, and the listeners
    /// still pending for the older value are skipped, so no listener is
    /// handed a value that `get` no longer returns.
    pub fn set(&self, value: T) {
        self.set_with(value, |_| ());
    }

    /// Replace the value, run `after_swap` on it, then notify listeners.
    ///
    /// Readers already see the new value while `after_swap` runs.
    pub fn set_with<R>(&self, value: T, after_swap: impl FnOnce(&T) -> R) -> R {
        let (snapshot, version) = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version = inner.version.wrapping_add(1);
            (inner.value.clone(), inner.version)
        };

        let result = after_swap(&snapshot);

        let listeners: Vec<_> = {
            let mut inner = self.inner.borrow_mut();
            inner.listeners.retain(|listener| listener.strong_count() > 0);
            inner.listeners.iter().filter_map(Weak::upgrade).collect()
        };

        for listener in listeners {
            if self.inner.borrow().version != version {
                break;
            }
            (listener.0)(&snapshot);
        }
        result
    }

    /// Register a listener.
    ///
    /// The listener is called immediately with the current value, then on
    /// every [`Observable::set`] until the returned [`Subscription`] is
    /// dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let listener = Rc::new(Listener(Box::new(callback)));
        let current = {
            let mut inner = self.inner.borrow_mut();
            inner.listeners.push(Rc::downgrade(&listener));
            inner.value.clone()
        };

        (listener.0)(&current);

        Subscription {
            _listener: listener,
        }
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.strong_count() > 0)
            .count()
    }
}

/// Keeps a listener registered. Dropping it unsubscribes.
pub struct Subscription {
    _listener: Rc<dyn Any>,
}

impl Subscription {
    /// Unsubscribe explicitly.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_subscribe_receives_current_value() {
        let observable = Observable::new(7);
        let seen = Rc::new(Cell::new(0));

        let seen_in = Rc::clone(&seen);
        let _sub = observable.subscribe(move |v| seen_in.set(*v));

        assert_eq!(seen.get(), 7);
    }

    #[test]
    fn test_set_notifies_in_order() {
        let observable = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        let _a = observable.subscribe(move |v| first.borrow_mut().push(("a", *v)));
        let second = Rc::clone(&log);
        let _b = observable.subscribe(move |v| second.borrow_mut().push(("b", *v)));

        observable.set(1);

        assert_eq!(
            *log.borrow(),
            vec![("a", 0), ("b", 0), ("a", 1), ("b", 1)]
        );
    }

    #[test]
    fn test_dropping_subscription_unsubscribes_only_that_listener() {
        let observable = Observable::new(0);
        let a_calls = Rc::new(Cell::new(0));
        let b_calls = Rc::new(Cell::new(0));

        let a_in = Rc::clone(&a_calls);
        let a = observable.subscribe(move |_| a_in.set(a_in.get() + 1));
        let b_in = Rc::clone(&b_calls);
        let _b = observable.subscribe(move |_| b_in.set(b_in.get() + 1));
        assert_eq!(observable.listener_count(), 2);

        a.unsubscribe();
        observable.set(1);

        assert_eq!(a_calls.get(), 1);
        assert_eq!(b_calls.get(), 2);
        assert_eq!(observable.listener_count(), 1);
    }

    #[test]
    fn test_set_with_runs_between_swap_and_notify() {
        let observable = Observable::new(1);
        let log = Rc::new(RefCell::new(Vec::new()));

        let listener_log = Rc::clone(&log);
        let _sub = observable.subscribe(move |v| listener_log.borrow_mut().push(format!("notify {v}")));

        let handle = observable.clone();
        let hook_log = Rc::clone(&log);
        let returned = observable.set_with(2, move |v| {
            hook_log
                .borrow_mut()
                .push(format!("hook {v} sees {}", handle.get()));
            "done"
        });

        assert_eq!(returned, "done");
        assert_eq!(
            *log.borrow(),
            vec!["notify 1", "hook 2 sees 2", "notify 2"]
        );
    }

    #[test]
    fn test_nested_set_supersedes_pending_notifications() {
        let observable = Observable::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let handle = observable.clone();
        let _a = observable.subscribe(move |v| {
            if *v == 1 {
                handle.set(2);
            }
        });
        let seen_in = Rc::clone(&seen);
        let _b = observable.subscribe(move |v| seen_in.borrow_mut().push(*v));

        observable.set(1);

        assert_eq!(observable.get(), 2);
        assert_eq!(*seen.borrow(), vec![0, 2]);
    }

    #[test]
    fn test_listener_may_read_during_notification() {
        let observable = Observable::new(String::from("a"));
        let reads = Rc::new(RefCell::new(Vec::new()));

        let handle = observable.clone();
        let reads_in = Rc::clone(&reads);
        let _sub = observable.subscribe(move |_| reads_in.borrow_mut().push(handle.get()));

        observable.set(String::from("b"));

        assert_eq!(*reads.borrow(), vec!["a".to_string(), "b".to_string()]);
    }
}
