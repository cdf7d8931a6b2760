//! Coalescing emitter for debounced notifications.

use std::time::Duration;

use tokio::time::Instant;

/// Collapses rapid updates into the latest value after a quiet period.
///
/// Holds at most one pending value. Pushing a new value replaces the pending
/// one and restarts the quiet period; once the period elapses with no further
/// pushes, [`poll`](Self::poll) hands out the value and the slot empties.
/// Superseded values are dropped, never queued.
///
/// The emitter never reads the clock itself, so callers decide what "now" is.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tokio::time::Instant;
/// use tableview_lib::notify::CoalescingEmitter;
///
/// let mut emitter = CoalescingEmitter::new(Duration::from_millis(500));
/// let start = Instant::now();
///
/// emitter.push("d", start);
/// emitter.push("do", start + Duration::from_millis(100));
/// emitter.push("doe", start + Duration::from_millis(200));
///
/// assert_eq!(emitter.poll(start + Duration::from_millis(600)), None);
/// assert_eq!(emitter.poll(start + Duration::from_millis(700)), Some("doe"));
/// assert!(!emitter.is_pending());
/// ```
#[derive(Debug)]
pub struct CoalescingEmitter<T> {
    window: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> CoalescingEmitter<T> {
    /// Creates an emitter with the given quiet period.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Quiet period.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Stores `value` as the pending value with a deadline of `now + window`.
    ///
    /// Returns `true` if an earlier pending value was superseded.
    pub fn push(&mut self, value: T, now: Instant) -> bool {
        let deadline = now + self.window;
        self.pending.replace(Pending { value, deadline }).is_some()
    }

    /// Takes the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Takes the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drops the pending value. Returns `true` if there was one.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Deadline of the pending value, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Returns `true` if a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
