use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Handler<T>)>,
}

impl<T> Listeners<T> {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }
}

fn lock<T>(listeners: &Mutex<Listeners<T>>) -> MutexGuard<'_, Listeners<T>> {
    listeners.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Push source with any number of subscribers.
///
/// - `emit` delivers to handlers in subscription order
/// - a handler unsubscribed while an emit is running is not called anymore
/// - no buffering: values emitted with no subscriber are lost
pub struct EventChannel<T: 'static> {
    listeners: Arc<Mutex<Listeners<T>>>,
}

impl<T: 'static> Clone for EventChannel<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<T: 'static> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> EventChannel<T> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 1,
                entries: Vec::new(),
            })),
        }
    }

    /// Register `handler`. It stays registered until the returned
    /// `Subscription` is cancelled or dropped.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut listeners = lock(&self.listeners);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, Arc::new(handler)));
            id
        };

        let weak: Weak<Mutex<Listeners<T>>> = Arc::downgrade(&self.listeners);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(listeners) = weak.upgrade() {
                    lock(&listeners).entries.retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    pub fn emit(&self, value: &T) {
        // Handlers may subscribe/unsubscribe re-entrantly, so never call them under the lock.
        let snapshot: Vec<(u64, Handler<T>)> = lock(&self.listeners).entries.clone();
        for (id, handler) in snapshot {
            if lock(&self.listeners).contains(id) {
                handler(value);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).entries.len()
    }
}

/// Unsubscribes its handler when cancelled or dropped
#[must_use = "dropping a Subscription unsubscribes the handler immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// Subscriptions released together (one dialog-open cycle)
#[derive(Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn release_all(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.cancel();
        }
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Box<dyn Fn(&i32) + Send + Sync>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_for_handler = log.clone();
        let make = move |name: &str| {
            let log = log_for_handler.clone();
            let name = name.to_string();
            Box::new(move |v: &i32| log.lock().unwrap().push(format!("{name}:{v}")))
                as Box<dyn Fn(&i32) + Send + Sync>
        };
        (log, make)
    }

    #[test]
    fn test_emit_in_subscription_order() {
        let channel = EventChannel::<i32>::new();
        let (log, make) = recorder();
        let _a = channel.subscribe(make("a"));
        let _b = channel.subscribe(make("b"));

        channel.emit(&1);
        channel.emit(&2);

        assert_eq!(*log.lock().unwrap(), vec!["a:1", "b:1", "a:2", "b:2"]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let channel = EventChannel::<i32>::new();
        let (log, make) = recorder();
        let sub = channel.subscribe(make("a"));
        assert_eq!(channel.listener_count(), 1);

        drop(sub);
        channel.emit(&1);

        assert_eq!(channel.listener_count(), 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unsubscribe_during_emit_skips_later_handler() {
        let channel = EventChannel::<i32>::new();
        let (log, make) = recorder();
        let second: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let second_for_first = second.clone();
        let _first = channel.subscribe(move |_| {
            second_for_first.lock().unwrap().take();
        });
        *second.lock().unwrap() = Some(channel.subscribe(make("second")));

        channel.emit(&1);

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(channel.listener_count(), 1);
    }

    #[test]
    fn test_subscription_set_release_all() {
        let channel = EventChannel::<i32>::new();
        let (log, make) = recorder();
        let mut set = SubscriptionSet::new();
        set.push(channel.subscribe(make("a")));
        set.push(channel.subscribe(make("b")));
        assert_eq!(set.len(), 2);

        set.release_all();
        channel.emit(&1);

        assert!(set.is_empty());
        assert_eq!(channel.listener_count(), 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_subscription_outlives_channel() {
        let channel = EventChannel::<i32>::new();
        let sub = channel.subscribe(|_| {});
        drop(channel);
        sub.cancel();
    }
}
