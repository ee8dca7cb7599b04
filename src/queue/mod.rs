//! # Bounded task queue
//! src/queue/mod.rs
//!
//! Thread-safe bounded FIFO queue handing items from the acceptor to the
//! worker pool. Both ends block: `put` waits while the queue is full (this
//! is the server's backpressure mechanism), `get` waits while it is empty.
//!
//! Synchronization is a single mutex plus two condition variables
//! (`not_full`, `not_empty`) under standard monitor discipline: the
//! predicate is re-checked after every wakeup and the lock is released
//! while waiting, so no update can slip between a waiter's check and its
//! block.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// Bounded blocking FIFO queue.
///
/// Items are moved in by `put` and moved out by `get`; an item is never
/// delivered to two consumers. The queue length never exceeds the capacity
/// fixed at construction.
pub struct TaskQueue<T> {
    buffer: Mutex<VecDeque<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl<T> TaskQueue<T> {
    /// Creates a queue with the given fixed capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; a zero-capacity queue could never
    /// accept an item.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be >= 1");
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(capacity)),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    /// Inserts an item at the tail, blocking while the queue is full.
    ///
    /// Wakes one consumer blocked in [`get`](Self::get).
    pub fn put(&self, item: T) {
        let mut buffer = self.buffer.lock().unwrap();
        while buffer.len() == self.capacity {
            buffer = self.not_full.wait(buffer).unwrap();
        }
        buffer.push_back(item);
        self.not_empty.notify_one();
    }

    /// Removes and returns the head item, blocking while the queue is empty.
    ///
    /// Wakes one producer blocked in [`put`](Self::put).
    pub fn get(&self) -> T {
        let mut buffer = self.buffer.lock().unwrap();
        loop {
            if let Some(item) = buffer.pop_front() {
                self.not_full.notify_one();
                return item;
            }
            buffer = self.not_empty.wait(buffer).unwrap();
        }
    }

    /// Removes the head item without blocking; `None` if the queue is empty.
    pub fn try_get(&self) -> Option<T> {
        let mut buffer = self.buffer.lock().unwrap();
        let item = buffer.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Current number of queued items.
    pub fn len(&self) -> usize {
        self.buffer.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Capacity fixed at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
