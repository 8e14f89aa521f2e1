//! Turn clock and per-turn render locks
//!
//! Every render request holds a reference on the turn it was created in. The
//! simulation may not treat a turn as finished until all of those references
//! are gone, which happens as the render thread dispatches each request.
//!
//! The counts stay in the table (at zero) until [`TurnLockTable::retire_completed`]
//! removes them, so the simulation can ask which turns are fully rendered and
//! free any state it kept alive for them.

use parking_lot::{Condvar, Mutex};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Simulation turn number
pub type TurnNumber = i64;

/// Turn barrier errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    /// Unlock called for a turn holding no references
    #[error("Turn {0} has no outstanding render locks")]
    NotLocked(TurnNumber),

    /// A turn did not clear within the allowed time
    #[error("Turn {turn} still has {outstanding} outstanding render locks after timeout")]
    Timeout {
        /// Turn being waited on
        turn: TurnNumber,
        /// References still held when the wait gave up
        outstanding: usize,
    },
}

/// Monotonic simulation turn counter
#[derive(Debug, Default)]
pub struct TurnClock {
    current: AtomicI64,
}

impl TurnClock {
    /// Create a clock starting at `turn`
    pub const fn new(turn: TurnNumber) -> Self {
        Self { current: AtomicI64::new(turn) }
    }

    /// Current turn number
    pub fn current(&self) -> TurnNumber {
        self.current.load(Ordering::Acquire)
    }

    /// Advance to the next turn and return it
    pub fn advance(&self) -> TurnNumber {
        self.current.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Per-turn reference counting used to gate turn completion on rendering
pub trait TurnBarrier: Send + Sync {
    /// Take one reference on `turn`
    fn lock_for_turn(&self, turn: TurnNumber);

    /// Drop one reference on `turn`
    fn unlock_for_turn(&self, turn: TurnNumber) -> Result<(), TurnError>;
}

/// Reference counts per turn, ordered by turn number
#[derive(Debug, Default)]
pub struct TurnLockTable {
    counts: Mutex<BTreeMap<TurnNumber, usize>>,
    cleared: Condvar,
}

impl TurnLockTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// References currently held on `turn`
    pub fn outstanding(&self, turn: TurnNumber) -> usize {
        self.counts.lock().get(&turn).copied().unwrap_or(0)
    }

    /// Whether every request stamped with `turn` has been dispatched
    pub fn is_turn_clear(&self, turn: TurnNumber) -> bool {
        self.outstanding(turn) == 0
    }

    /// Total references held across all turns
    pub fn total_outstanding(&self) -> usize {
        self.counts.lock().values().sum()
    }

    /// Block until `turn` has no outstanding references
    pub fn wait_for_turn(&self, turn: TurnNumber, timeout: Duration) -> Result<(), TurnError> {
        let deadline = Instant::now() + timeout;
        let mut counts = self.counts.lock();

        loop {
            let outstanding = counts.get(&turn).copied().unwrap_or(0);
            if outstanding == 0 {
                return Ok(());
            }
            if self.cleared.wait_until(&mut counts, deadline).timed_out() {
                let outstanding = counts.get(&turn).copied().unwrap_or(0);
                if outstanding == 0 {
                    return Ok(());
                }
                return Err(TurnError::Timeout { turn, outstanding });
            }
        }
    }

    /// Remove the leading run of fully rendered turns up to `up_to`
    ///
    /// Returns the latest retired turn, or `None` when the oldest tracked turn
    /// still has outstanding references.
    pub fn retire_completed(&self, up_to: TurnNumber) -> Option<TurnNumber> {
        let mut counts = self.counts.lock();
        let mut latest_retired = None;

        loop {
            let Some((turn, count)) = counts.first_key_value().map(|(&t, &c)| (t, c)) else {
                break;
            };
            if turn > up_to || count > 0 {
                break;
            }
            counts.remove(&turn);
            latest_retired = Some(turn);
        }

        if let Some(turn) = latest_retired {
            log::debug!("Retired render locks up to turn {turn}");
        }
        latest_retired
    }

    /// Snapshot of tracked turns and their counts
    pub fn snapshot(&self) -> Vec<(TurnNumber, usize)> {
        self.counts.lock().iter().map(|(&turn, &count)| (turn, count)).collect()
    }
}

impl TurnBarrier for TurnLockTable {
    fn lock_for_turn(&self, turn: TurnNumber) {
        *self.counts.lock().entry(turn).or_insert(0) += 1;
    }

    fn unlock_for_turn(&self, turn: TurnNumber) -> Result<(), TurnError> {
        let mut counts = self.counts.lock();
        match counts.get_mut(&turn) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.cleared.notify_all();
                }
                Ok(())
            }
            _ => Err(TurnError::NotLocked(turn)),
        }
    }
}

/// One reference on a turn, released exactly once
///
/// Dropping the lease releases it, so a request that is dispatched, fails,
/// is evicted, or is discarded at shutdown never leaves its turn locked.
pub struct TurnLease {
    barrier: Arc<dyn TurnBarrier>,
    turn: TurnNumber,
    released: bool,
}

impl TurnLease {
    /// Lock `turn` on `barrier` and return the lease
    pub fn acquire(barrier: Arc<dyn TurnBarrier>, turn: TurnNumber) -> Self {
        barrier.lock_for_turn(turn);
        Self {
            barrier,
            turn,
            released: false,
        }
    }

    /// Turn this lease holds
    pub const fn turn(&self) -> TurnNumber {
        self.turn
    }

    /// Release the lease, reporting barrier violations
    pub fn release(mut self) -> Result<(), TurnError> {
        self.released = true;
        self.barrier.unlock_for_turn(self.turn)
    }
}

impl Drop for TurnLease {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.barrier.unlock_for_turn(self.turn) {
                log::error!("Failed to release render lock: {e}");
            }
        }
    }
}

impl std::fmt::Debug for TurnLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnLease")
            .field("turn", &self.turn)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_advances_monotonically() {
        let clock = TurnClock::new(5);
        assert_eq!(clock.current(), 5);
        assert_eq!(clock.advance(), 6);
        assert_eq!(clock.current(), 6);
    }

    #[test]
    fn test_lock_counts_per_turn() {
        let table = TurnLockTable::new();
        table.lock_for_turn(1);
        table.lock_for_turn(1);
        table.lock_for_turn(2);

        assert_eq!(table.outstanding(1), 2);
        assert_eq!(table.outstanding(2), 1);
        assert_eq!(table.total_outstanding(), 3);

        table.unlock_for_turn(1).unwrap();
        assert!(!table.is_turn_clear(1));
        table.unlock_for_turn(1).unwrap();
        assert!(table.is_turn_clear(1));
    }

    #[test]
    fn test_unlock_without_lock_is_an_error() {
        let table = TurnLockTable::new();
        assert_eq!(table.unlock_for_turn(9), Err(TurnError::NotLocked(9)));

        table.lock_for_turn(9);
        table.unlock_for_turn(9).unwrap();
        assert_eq!(table.unlock_for_turn(9), Err(TurnError::NotLocked(9)));
    }

    #[test]
    fn test_wait_for_turn_times_out_while_locked() {
        let table = TurnLockTable::new();
        table.lock_for_turn(3);

        let result = table.wait_for_turn(3, Duration::from_millis(20));
        assert_eq!(result, Err(TurnError::Timeout { turn: 3, outstanding: 1 }));
    }

    #[test]
    fn test_wait_for_turn_wakes_on_last_unlock() {
        let table = Arc::new(TurnLockTable::new());
        table.lock_for_turn(4);
        table.lock_for_turn(4);

        let releaser = {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                table.unlock_for_turn(4).unwrap();
                thread::sleep(Duration::from_millis(10));
                table.unlock_for_turn(4).unwrap();
            })
        };

        table.wait_for_turn(4, Duration::from_secs(5)).unwrap();
        assert_eq!(table.outstanding(4), 0);
        releaser.join().unwrap();
    }

    #[test]
    fn test_retire_stops_at_first_locked_turn() {
        let table = TurnLockTable::new();
        for turn in 1..=4 {
            table.lock_for_turn(turn);
        }
        table.unlock_for_turn(1).unwrap();
        table.unlock_for_turn(2).unwrap();
        table.unlock_for_turn(4).unwrap();

        assert_eq!(table.retire_completed(10), Some(2));
        assert_eq!(table.snapshot(), vec![(3, 1), (4, 0)]);
        assert_eq!(table.retire_completed(10), None);

        table.unlock_for_turn(3).unwrap();
        assert_eq!(table.retire_completed(3), Some(3));
        assert_eq!(table.snapshot(), vec![(4, 0)]);
    }

    #[test]
    fn test_lease_releases_on_drop() {
        let table = Arc::new(TurnLockTable::new());
        let barrier: Arc<dyn TurnBarrier> = table.clone();

        let lease = TurnLease::acquire(Arc::clone(&barrier), 7);
        assert_eq!(lease.turn(), 7);
        assert_eq!(table.outstanding(7), 1);
        drop(lease);
        assert_eq!(table.outstanding(7), 0);

        let lease = TurnLease::acquire(barrier, 7);
        lease.release().unwrap();
        assert_eq!(table.outstanding(7), 0);
    }
}
