//! Viewport move notifications.
//!
//! Hosts own a [`MoveEvents`] emitter and fire it whenever the map pans or
//! zooms. Subscribers get a [`Subscription`] capability back; dropping or
//! releasing it unsubscribes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

pub type MoveListener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    listeners: Vec<(u64, MoveListener)>,
}

fn lock_table(table: &Mutex<ListenerTable>) -> MutexGuard<'_, ListenerTable> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Emitter for viewport move events.
#[derive(Default)]
pub struct MoveEvents {
    table: Arc<Mutex<ListenerTable>>,
}

impl MoveEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` until the returned subscription is released.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut table = lock_table(&self.table);
        let id = table.next_id;
        table.next_id += 1;
        table.listeners.push((id, Arc::new(listener)));
        Subscription {
            id,
            table: Arc::downgrade(&self.table),
        }
    }

    /// Calls every listener in subscription order.
    ///
    /// Listeners run outside the table lock, so they may subscribe or
    /// release subscriptions themselves.
    pub fn emit(&self) {
        let listeners: Vec<MoveListener> = lock_table(&self.table)
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        lock_table(&self.table).listeners.len()
    }
}

impl std::fmt::Debug for MoveEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Capability for one registered listener. Unsubscribes on drop.
#[must_use = "dropping a subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    table: Weak<Mutex<ListenerTable>>,
}

impl Subscription {
    /// Unsubscribes now.
    pub fn release(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            lock_table(&table).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subscribe_and_emit() {
        let events = MoveEvents::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let subscription = events.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        events.emit();
        events.emit();
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        subscription.release();
        events.emit();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn test_drop_unsubscribes_only_itself() {
        let events = MoveEvents::new();
        let a = events.subscribe(|| {});
        let b = events.subscribe(|| {});
        assert_eq!(events.listener_count(), 2);
        drop(a);
        assert_eq!(events.listener_count(), 1);
        drop(b);
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_emitter() {
        let events = MoveEvents::new();
        let subscription = events.subscribe(|| {});
        drop(events);
        subscription.release();
    }
}
