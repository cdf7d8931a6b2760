//! Change notifications to the host.
//!
//! In server-side mode the table does not filter, sort or slice rows itself;
//! it reports the user's intent through [`ViewEvent`]s and renders whatever
//! rows the host supplies next.

mod emitter;

use std::collections::BTreeMap;
use std::fmt;

pub use emitter::CoalescingEmitter;

use crate::view::SortChange;

/// A change the host should act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// Filter texts changed. Keys are column keys; the global search travels
    /// under [`GLOBAL_FILTER_KEY`](crate::view::GLOBAL_FILTER_KEY).
    FiltersChanged(BTreeMap<String, String>),
    /// Sort keys changed. Empty means unsorted.
    SortingChanged(Vec<SortChange>),
    /// Page position or size changed.
    PaginationChanged {
        /// Zero-based page index.
        page_index: usize,
        /// Rows per page.
        page_size: usize,
    },
}

type Subscriber = Box<dyn FnMut(&ViewEvent) + Send>;

/// Fan-out of [`ViewEvent`]s to every subscriber, in subscription order.
#[derive(Default)]
pub struct Notifier {
    subscribers: Vec<Subscriber>,
}

impl Notifier {
    /// Creates a notifier without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&ViewEvent) + Send + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Delivers an event to every subscriber.
    pub fn emit(&mut self, event: &ViewEvent) {
        log::debug!("Emitting {:?} to {} subscriber(s)", event, self.subscribers.len());
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_every_subscriber_sees_every_event() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));

        let mut notifier = Notifier::new();
        let sink = first.clone();
        notifier.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        let sink = second.clone();
        notifier.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        let event = ViewEvent::PaginationChanged {
            page_index: 1,
            page_size: 10,
        };
        notifier.emit(&event);
        notifier.emit(&ViewEvent::SortingChanged(Vec::new()));

        assert_eq!(first.lock().unwrap().len(), 2);
        assert_eq!(second.lock().unwrap()[0], event);
    }
}
