//! Publish/subscribe plumbing shared by the row tracker and the format catalog.
//!
//! Each rendering surface registers its own callback and receives the complete
//! current value on every change, so no intermediate container has to forward
//! state to its children.

use std::fmt;

/// Handle returned by [`Notifier::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

type Callback<T> = Box<dyn FnMut(&T) + Send>;

/// Ordered list of subscriber callbacks for values of type `T`.
pub struct Notifier<T> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T> Notifier<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Registers a callback. Callbacks run in subscription order.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a callback. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Delivers `value` to every subscriber exactly once.
    pub fn notify(&mut self, value: &T) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Notifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_notify_reaches_all_subscribers_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut notifier: Notifier<u32> = Notifier::new();

        let first = Arc::clone(&seen);
        notifier.subscribe(move |v| first.lock().unwrap().push(("a", *v)));
        let second = Arc::clone(&seen);
        notifier.subscribe(move |v| second.lock().unwrap().push(("b", *v)));

        notifier.notify(&7);

        assert_eq!(*seen.lock().unwrap(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Arc::new(Mutex::new(0));
        let mut notifier: Notifier<()> = Notifier::new();
        let c = Arc::clone(&count);
        let id = notifier.subscribe(move |_| *c.lock().unwrap() += 1);

        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.notify(&());

        assert_eq!(*count.lock().unwrap(), 0);
        assert!(notifier.is_empty());
    }
}
