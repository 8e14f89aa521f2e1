//! # Work Queue
//!
//! Thread-safe FIFO between any number of producers and one consumer.
//!
//! ## Architecture
//!
//! - **State**: one mutex around the pending items, the closed flag, and stats
//! - **Condvars**: `not_empty` wakes the consumer, `not_full` wakes blocked
//!   producers, `idle` wakes threads waiting for a full flush
//!
//! Every operation holds the mutex only long enough to push or pop; callers
//! apply items after the lock is released.
//!
//! ## Flush Tracking
//!
//! Popping an item marks it in flight. The consumer calls [`WorkQueue::complete`]
//! once it has applied the item, and [`WorkQueue::wait_until_idle`] returns only
//! when nothing is pending and nothing is in flight.

use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Backpressure policy when producers outpace the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum QueuePolicy {
    /// Grow without limit
    #[default]
    Unbounded,
    /// Producers wait for room once `capacity` items are pending
    Block {
        /// Maximum pending items
        capacity: usize,
    },
    /// The oldest pending item is evicted to make room
    DropOldest {
        /// Maximum pending items
        capacity: usize,
    },
}

impl QueuePolicy {
    /// Maximum pending items, if bounded
    pub const fn capacity(self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Block { capacity } | Self::DropOldest { capacity } => Some(capacity),
        }
    }

    /// Same policy with a bounded capacity of at least one
    ///
    /// A zero-capacity queue could never accept an item.
    #[must_use]
    pub const fn normalized(self) -> Self {
        match self {
            Self::Block { capacity: 0 } => Self::Block { capacity: 1 },
            Self::DropOldest { capacity: 0 } => Self::DropOldest { capacity: 1 },
            other => other,
        }
    }
}

/// Queue errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue no longer accepts items
    #[error("Queue is closed")]
    Closed,

    /// A blocking push gave up waiting for room
    #[error("Queue is full ({capacity} pending) and the producer timed out")]
    Full {
        /// Configured capacity
        capacity: usize,
    },
}

/// Queue counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Items accepted
    pub enqueued: u64,
    /// Items handed to the consumer
    pub dequeued: u64,
    /// Items evicted by the `DropOldest` policy
    pub evicted: u64,
    /// Largest depth observed
    pub high_water_mark: usize,
    /// Items pending right now
    pub depth: usize,
    /// Items popped but not yet completed
    pub in_flight: usize,
}

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
    in_flight: usize,
    stats: QueueStats,
}

/// Mutex + condition variable FIFO
pub struct WorkQueue<T> {
    state: Mutex<QueueState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    idle: Condvar,
    policy: QueuePolicy,
}

impl<T> WorkQueue<T> {
    /// Create a queue with the given policy
    ///
    /// A bounded capacity of zero is raised to one.
    pub fn new(policy: QueuePolicy) -> Self {
        let normalized = policy.normalized();
        if normalized != policy {
            log::warn!("Queue capacity of zero raised to one ({policy:?})");
        }
        let policy = normalized;
        let initial_capacity = policy.capacity().unwrap_or(64);
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(initial_capacity),
                closed: false,
                in_flight: 0,
                stats: QueueStats::default(),
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            idle: Condvar::new(),
            policy,
        }
    }

    /// Create an unbounded queue
    pub fn unbounded() -> Self {
        Self::new(QueuePolicy::Unbounded)
    }

    /// Backpressure policy in effect
    pub const fn policy(&self) -> QueuePolicy {
        self.policy
    }

    /// Append an item at the tail
    ///
    /// Under `Block`, waits for room (up to `timeout` when given). Under
    /// `DropOldest`, returns the evicted head item so the caller can dispose
    /// of it outside the queue lock.
    pub fn push(&self, item: T, timeout: Option<Duration>) -> Result<Option<T>, QueueError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(QueueError::Closed);
        }

        let mut evicted = None;
        match self.policy {
            QueuePolicy::Unbounded => {}
            QueuePolicy::Block { capacity } => {
                let deadline = timeout.map(|t| Instant::now() + t);
                while state.items.len() >= capacity && !state.closed {
                    match deadline {
                        Some(deadline) => {
                            let timed_out = self.not_full.wait_until(&mut state, deadline).timed_out();
                            if timed_out && state.items.len() >= capacity && !state.closed {
                                return Err(QueueError::Full { capacity });
                            }
                        }
                        None => self.not_full.wait(&mut state),
                    }
                }
                if state.closed {
                    return Err(QueueError::Closed);
                }
            }
            QueuePolicy::DropOldest { capacity } => {
                if state.items.len() >= capacity {
                    evicted = state.items.pop_front();
                    if evicted.is_some() {
                        state.stats.evicted += 1;
                    }
                }
            }
        }

        state.items.push_back(item);
        state.stats.enqueued += 1;
        state.stats.high_water_mark = state.stats.high_water_mark.max(state.items.len());
        self.not_empty.notify_one();
        Ok(evicted)
    }

    /// Remove the head item, blocking until one arrives
    ///
    /// Returns `None` once the queue is closed and drained.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = self.take_front(&mut state) {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            self.not_empty.wait(&mut state);
        }
    }

    /// Remove the head item, waiting at most `timeout`
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if let Some(item) = self.take_front(&mut state) {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            if self.not_empty.wait_until(&mut state, deadline).timed_out() {
                return self.take_front(&mut state);
            }
        }
    }

    /// Remove the head item without waiting
    pub fn try_pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        self.take_front(&mut state)
    }

    /// Remove every pending item in FIFO order
    pub fn drain(&self) -> Vec<T> {
        let mut state = self.state.lock();
        let items: Vec<T> = state.items.drain(..).collect();
        let count = items.len();
        state.in_flight += count;
        state.stats.dequeued += count as u64;
        if count > 0 {
            self.not_full.notify_all();
        }
        items
    }

    /// Mark `count` popped items as fully applied
    pub fn complete(&self, count: usize) {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(count);
        if state.items.is_empty() && state.in_flight == 0 {
            self.idle.notify_all();
        }
    }

    /// Block until nothing is pending or in flight
    ///
    /// Returns `false` if `timeout` elapsed first.
    pub fn wait_until_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while !(state.items.is_empty() && state.in_flight == 0) {
            if self.idle.wait_until(&mut state, deadline).timed_out() {
                return state.items.is_empty() && state.in_flight == 0;
            }
        }
        true
    }

    /// Stop accepting items and wake every waiter
    ///
    /// Items already queued can still be popped.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.not_empty.notify_all();
        self.not_full.notify_all();
        self.idle.notify_all();
    }

    /// Whether [`WorkQueue::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of pending items
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Whether no items are pending
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Counter snapshot
    pub fn stats(&self) -> QueueStats {
        let state = self.state.lock();
        QueueStats {
            depth: state.items.len(),
            in_flight: state.in_flight,
            ..state.stats
        }
    }

    fn take_front(&self, state: &mut QueueState<T>) -> Option<T> {
        let item = state.items.pop_front()?;
        state.in_flight += 1;
        state.stats.dequeued += 1;
        self.not_full.notify_one();
        Some(item)
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> std::fmt::Debug for WorkQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkQueue")
            .field("policy", &self.policy)
            .field("stats", &self.stats())
            .finish()
    }
}
