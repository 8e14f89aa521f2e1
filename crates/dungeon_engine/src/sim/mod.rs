//! Simulation-side collaborators of the render pipeline
//!
//! The render core only needs two things from the simulation: the current
//! turn number and a barrier that keeps a turn open while its render requests
//! are pending.

mod turn;

pub use turn::{TurnBarrier, TurnClock, TurnError, TurnLease, TurnLockTable, TurnNumber};
