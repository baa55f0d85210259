//! Bounded blocking FIFO of owned strings.
//!
//! A [`BoundedQueue`] hands strings from any number of producers to a
//! single consumer through a fixed-capacity ring. Blocking is built
//! entirely on the manual-reset [`Signal`]: each blocking operation
//! resets the relevant latch, re-checks its predicate under the ring
//! mutex, and only then waits. Because every state change that makes a
//! predicate true is followed by a signal, the re-check closes the
//! lost-wakeup window without ever holding the mutex across a wait.
//!
//! The queue also carries a `finished` latch, which is independent of
//! emptiness in both directions: a queue can be empty without being
//! finished, and finished while still holding residual items.

use crate::signal::Signal;
use std::{
    error::Error,
    fmt::Display,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// The largest capacity a [`BoundedQueue`] accepts.
pub const MAX_CAPACITY: usize = 1_000_000;

/// Error returned when a queue is constructed with an unusable capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    /// The capacity that was requested
    pub requested: usize,
}

impl Display for CapacityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "queue capacity must be between 1 and {MAX_CAPACITY} (got {})",
            self.requested
        )
    }
}

impl Error for CapacityError {}

/// The storage of a [`BoundedQueue`].
///
/// Producers write only at `tail`; the consumer reads only at `head`.
/// `len` always equals the number of occupied slots, and empty slots
/// hold `None`.
#[derive(Debug)]
struct Ring {
    slots: Box<[Option<String>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl Ring {
    fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    fn push(&mut self, item: String) {
        debug_assert!(!self.is_full());
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.slots.len();
        self.len += 1;
    }

    fn pop(&mut self) -> Option<String> {
        let item = self.slots[self.head].take()?;
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        Some(item)
    }
}

/// A bounded blocking FIFO of owned strings.
///
/// Safe for one consumer and any number of producers. Ownership of
/// each string transfers to the queue on [`put`](BoundedQueue::put)
/// and to the caller on [`get`](BoundedQueue::get); whatever is still
/// queued when the value drops is freed with it.
#[derive(Debug)]
pub struct BoundedQueue {
    ring: Mutex<Ring>,
    not_full: Signal,
    not_empty: Signal,
    finished: Signal,
}

impl BoundedQueue {
    /// Creates a queue holding at most `capacity` items.
    ///
    /// `capacity` must be in `[1, MAX_CAPACITY]`.
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(CapacityError {
                requested: capacity,
            });
        }

        let queue = Self {
            ring: Mutex::new(Ring::new(capacity)),
            not_full: Signal::new(),
            not_empty: Signal::new(),
            finished: Signal::new(),
        };
        queue.not_full.signal();
        Ok(queue)
    }

    /// The fixed capacity of the queue.
    pub fn capacity(&self) -> usize {
        self.lock_ring().slots.len()
    }

    /// The number of items currently queued.
    pub fn len(&self) -> usize {
        self.lock_ring().len
    }

    /// Returns whether the queue holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends an item, blocking while the queue is full.
    ///
    /// Each completed call fills exactly one slot. When producers race,
    /// the order in which their items land is unspecified; items from a
    /// single producer keep their order.
    pub fn put(&self, item: String) {
        let mut item = Some(item);
        self.wait_on(&self.not_full, |ring| {
            if ring.is_full() {
                return None;
            }
            ring.push(item.take()?);
            Some(())
        });
        self.not_empty.signal();
    }

    /// Removes the oldest item, blocking while the queue is empty.
    pub fn get(&self) -> String {
        let item = self.wait_on(&self.not_empty, Ring::pop);
        self.not_full.signal();
        item
    }

    /// Removes the oldest item, blocking while the queue is empty,
    /// unless `cancelled` reports true.
    ///
    /// Returns `None` once the queue is empty and `cancelled()` holds.
    /// Callers flip their cancel state and then
    /// [`wake_consumers`](BoundedQueue::wake_consumers) to release a
    /// blocked consumer.
    pub fn get_or_cancel(&self, cancelled: impl Fn() -> bool) -> Option<String> {
        let item = self.wait_on(&self.not_empty, |ring| match ring.pop() {
            Some(item) => Some(Some(item)),
            None if cancelled() => Some(None),
            None => None,
        });
        if item.is_some() {
            self.not_full.signal();
        }
        item
    }

    /// Removes the oldest item without blocking.
    pub fn try_get(&self) -> Option<String> {
        let item = self.lock_ring().pop();
        if item.is_some() {
            self.not_full.signal();
        }
        item
    }

    /// Wakes blocked consumers without enqueuing anything, so they
    /// re-check their cancel predicate.
    pub fn wake_consumers(&self) {
        self.not_empty.signal();
    }

    /// Sets the `finished` latch. Idempotent.
    pub fn signal_finished(&self) {
        self.finished.signal();
    }

    /// Blocks until the `finished` latch is set.
    pub fn wait_finished(&self) {
        self.finished.wait();
    }

    /// Returns whether the `finished` latch is set.
    pub fn is_finished(&self) -> bool {
        self.finished.is_signaled()
    }

    /// Retry loop shared by every blocking operation.
    ///
    /// Each iteration resets `gate` *before* re-checking the predicate
    /// under the ring mutex: any concurrent state change either lands
    /// before the check (and `attempt` succeeds) or is followed by a
    /// signal that outlives the reset (and the wait returns). The mutex
    /// is never held across the wait.
    fn wait_on<T>(&self, gate: &Signal, mut attempt: impl FnMut(&mut Ring) -> Option<T>) -> T {
        loop {
            gate.reset();
            if let Some(value) = attempt(&mut self.lock_ring()) {
                return value;
            }
            gate.wait();
        }
    }

    // A poisoned ring is still structurally sound; mutations are
    // completed before the guard drops.
    fn lock_ring(&self) -> MutexGuard<'_, Ring> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
