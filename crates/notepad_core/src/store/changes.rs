//! Change notification fan-out.
//!
//! # Responsibility
//! - Register subscribers at an address and deliver mutation events to them.
//! - Prune subscribers whose receiving side has gone away.
//!
//! # Invariants
//! - Delivery is fire-and-forget; no ordering guarantee between subscribers.
//! - A collection subscriber hears every event; an item subscriber hears
//!   events for its id plus collection-wide events.
//! - `notify` is called only after the mutation is durably applied.

use crate::store::selector::Selector;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::time::Duration;

/// One mutation signal, carrying the mutated address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub address: Selector,
}

struct Watcher {
    address: Selector,
    tx: Sender<ChangeEvent>,
}

/// Registry of change subscribers keyed by address.
#[derive(Default)]
pub struct ChangeHub {
    watchers: Mutex<Vec<Watcher>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber for changes at `address`.
    pub fn subscribe(&self, address: Selector) -> ChangeSubscription {
        let (tx, rx) = mpsc::channel();
        self.lock_watchers().push(Watcher { address, tx });
        ChangeSubscription { address, rx }
    }

    /// Fires a change event for `address` to every matching subscriber.
    ///
    /// Subscribers whose receiver was dropped are removed here.
    pub fn notify(&self, address: Selector) {
        let event = ChangeEvent { address };
        self.lock_watchers().retain(|watcher| {
            if !delivers_to(watcher.address, address) {
                return true;
            }
            watcher.tx.send(event).is_ok()
        });
    }

    /// Number of live subscriptions, for diagnostics.
    pub fn subscriber_count(&self) -> usize {
        self.lock_watchers().len()
    }

    fn lock_watchers(&self) -> std::sync::MutexGuard<'_, Vec<Watcher>> {
        // A poisoned lock only means another notifier panicked mid-fanout;
        // the watcher list itself stays usable.
        match self.watchers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Whether an event at `event` must reach a subscriber at `watcher`.
fn delivers_to(watcher: Selector, event: Selector) -> bool {
    watcher == Selector::Collection || event == Selector::Collection || watcher == event
}

/// Receiving side of one change registration.
///
/// Dropping the subscription detaches it; the hub prunes the entry on the
/// next `notify` touching its address.
#[derive(Debug)]
pub struct ChangeSubscription {
    address: Selector,
    rx: Receiver<ChangeEvent>,
}

impl ChangeSubscription {
    /// Address this subscription was registered at.
    pub fn address(&self) -> Selector {
        self.address
    }

    /// Returns the next pending event without blocking.
    pub fn try_next(&self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    pub fn next_timeout(&self, timeout: Duration) -> Option<ChangeEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Drains all pending events, reporting whether any arrived.
    pub fn has_pending(&self) -> bool {
        let mut seen = false;
        while self.try_next().is_some() {
            seen = true;
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeHub, Selector};

    #[test]
    fn collection_subscriber_hears_item_events() {
        let hub = ChangeHub::new();
        let sub = hub.subscribe(Selector::Collection);

        hub.notify(Selector::Item(3));
        assert_eq!(sub.try_next().map(|e| e.address), Some(Selector::Item(3)));
    }

    #[test]
    fn item_subscriber_ignores_other_items_but_hears_collection() {
        let hub = ChangeHub::new();
        let sub = hub.subscribe(Selector::Item(1));

        hub.notify(Selector::Item(2));
        assert!(sub.try_next().is_none());

        hub.notify(Selector::Item(1));
        assert!(sub.try_next().is_some());

        hub.notify(Selector::Collection);
        assert!(sub.try_next().is_some());
    }

    #[test]
    fn dropped_subscribers_are_pruned_on_notify() {
        let hub = ChangeHub::new();
        let sub = hub.subscribe(Selector::Collection);
        assert_eq!(hub.subscriber_count(), 1);

        drop(sub);
        hub.notify(Selector::Collection);
        assert_eq!(hub.subscriber_count(), 0);
    }
}
