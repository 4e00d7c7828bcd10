use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// Default capacity used by the pipeline's chunk queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

struct QueueState<T> {
    ring: VecDeque<T>,
    complete: bool,
}

/// Fixed-capacity blocking FIFO shared between one producer and many
/// consumers.
///
/// One mutex guards the ring and the completion flag together; two
/// condition variables signal "not full" (to the producer) and "has
/// work or is complete" (to consumers). Every wait predicate is
/// re-checked under the lock after a wake, so spurious and broadcast
/// wakeups are harmless, and the completion flag is never read outside
/// the lock.
pub struct BoundedQueue<T> {
    capacity: usize,
    state: Mutex<QueueState<T>>,
    not_full: Condvar,
    has_work: Condvar,
}

impl<T> BoundedQueue<T> {
    /// Creates a queue holding at most `capacity` items.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be positive");
        Self {
            capacity,
            state: Mutex::new(QueueState {
                ring: VecDeque::with_capacity(capacity),
                complete: false,
            }),
            not_full: Condvar::new(),
            has_work: Condvar::new(),
        }
    }

    /// Maximum number of items the queue can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current occupancy, in `[0, capacity]`.
    pub fn len(&self) -> usize {
        self.state.lock().expect("queue mutex poisoned").ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `item` at the tail, blocking while the queue is full.
    ///
    /// Wakes one consumer blocked in [`pop`](Self::pop).
    ///
    /// # Panics
    /// Panics if called after [`mark_complete`](Self::mark_complete);
    /// producing past completion is an invariant violation.
    pub fn push(&self, item: T) {
        let mut state = self.state.lock().expect("queue mutex poisoned");
        while state.ring.len() == self.capacity {
            state = self.not_full.wait(state).expect("queue mutex poisoned");
        }
        assert!(!state.complete, "push after mark_complete");

        state.ring.push_back(item);
        drop(state);
        self.has_work.notify_one();
    }

    /// Removes and returns the head item, blocking while the queue is
    /// empty and incomplete.
    ///
    /// Returns `None` once the queue is empty and the producer has
    /// called [`mark_complete`](Self::mark_complete): no more work will
    /// ever arrive. Wakes one producer blocked in [`push`](Self::push).
    pub fn pop(&self) -> Option<T> {
        let mut state = self.state.lock().expect("queue mutex poisoned");
        while state.ring.is_empty() && !state.complete {
            state = self.has_work.wait(state).expect("queue mutex poisoned");
        }

        match state.ring.pop_front() {
            Some(item) => {
                drop(state);
                self.not_full.notify_one();
                Some(item)
            }
            // Empty and complete: signal end of work.
            None => None,
        }
    }

    /// Marks the producer as finished.
    ///
    /// Wakes *all* consumers blocked in [`pop`](Self::pop); a single
    /// wake is insufficient because several consumers may be waiting
    /// and only the flag, not a new item, changes their predicate.
    pub fn mark_complete(&self) {
        let mut state = self.state.lock().expect("queue mutex poisoned");
        state.complete = true;
        drop(state);
        self.has_work.notify_all();
    }

    /// Returns true once [`mark_complete`](Self::mark_complete) has run.
    pub fn is_complete(&self) -> bool {
        self.state.lock().expect("queue mutex poisoned").complete
    }
}
