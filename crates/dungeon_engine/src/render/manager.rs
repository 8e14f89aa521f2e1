//! Render manager
//!
//! Owns the shared pieces of the pipeline (queue, turn clock, turn lock
//! table) and hands out producer handles and dispatchers. There is no global
//! instance: whoever builds the manager passes it (or its senders) to the
//! threads that need it.

use super::dispatcher::{RenderDispatcher, RenderOutcome};
use super::queue::{QueueStats, WorkQueue};
use super::request::QueuedRequest;
use super::sender::RenderRequestSender;
use super::RenderError;
use crate::core::config::{EngineConfig, RenderQueueConfig, TurnConfig};
use crate::scene::SceneGraph;
use crate::sim::{TurnBarrier, TurnClock, TurnError, TurnLockTable, TurnNumber};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Entry point to the render pipeline
pub struct RenderManager {
    queue: Arc<WorkQueue<QueuedRequest>>,
    turns: Arc<TurnLockTable>,
    clock: Arc<TurnClock>,
    sequence: Arc<AtomicU64>,
    queue_config: RenderQueueConfig,
    turn_config: TurnConfig,
}

impl RenderManager {
    /// Create a manager from engine configuration
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: &EngineConfig) -> Result<Self, RenderError> {
        Self::with_clock(config, Arc::new(TurnClock::new(config.turns.starting_turn)))
    }

    /// Create a manager that stamps requests from an existing clock
    pub fn with_clock(config: &EngineConfig, clock: Arc<TurnClock>) -> Result<Self, RenderError> {
        config.validate()?;
        log::debug!("Render queue policy: {:?}", config.render_queue.policy);
        Ok(Self {
            queue: Arc::new(WorkQueue::new(config.render_queue.policy)),
            turns: Arc::new(TurnLockTable::new()),
            clock,
            sequence: Arc::new(AtomicU64::new(0)),
            queue_config: config.render_queue.clone(),
            turn_config: config.turns.clone(),
        })
    }

    /// New producer handle
    pub fn sender(&self) -> RenderRequestSender {
        let barrier: Arc<dyn TurnBarrier> = self.turns.clone();
        RenderRequestSender::new(
            Arc::clone(&self.queue),
            barrier,
            Arc::clone(&self.clock),
            Arc::clone(&self.sequence),
            self.queue_config.enqueue_timeout(),
        )
    }

    /// Build a dispatcher over `scene` that consumes this manager's queue
    pub fn dispatcher<S: SceneGraph>(&self, scene: S) -> Result<RenderDispatcher<S>, RenderError> {
        RenderDispatcher::new(scene, Arc::clone(&self.queue), self.queue_config.idle_poll())
    }

    /// Run a dispatcher on a dedicated "render" thread
    pub fn spawn_dispatcher<S: SceneGraph + 'static>(
        &self,
        scene: S,
    ) -> Result<JoinHandle<RenderOutcome<S>>, RenderError> {
        self.spawn(self.dispatcher(scene)?)
    }

    /// Run an already configured dispatcher on a dedicated "render" thread
    pub fn spawn<S: SceneGraph + 'static>(
        &self,
        mut dispatcher: RenderDispatcher<S>,
    ) -> Result<JoinHandle<RenderOutcome<S>>, RenderError> {
        let handle = thread::Builder::new().name("render".to_string()).spawn(move || {
            dispatcher.run();
            dispatcher.into_outcome()
        })?;
        Ok(handle)
    }

    /// Turn clock used to stamp requests
    pub const fn clock(&self) -> &Arc<TurnClock> {
        &self.clock
    }

    /// Per-turn lock table
    pub const fn turns(&self) -> &Arc<TurnLockTable> {
        &self.turns
    }

    /// Current turn number
    pub fn current_turn(&self) -> TurnNumber {
        self.clock.current()
    }

    /// Requests waiting for the render thread
    pub fn queue_depth(&self) -> usize {
        self.queue.len()
    }

    /// Queue counters
    pub fn queue_stats(&self) -> QueueStats {
        self.queue.stats()
    }

    /// Block until every request stamped with `turn` has been dispatched
    pub fn wait_for_turn(&self, turn: TurnNumber) -> Result<(), TurnError> {
        self.turns.wait_for_turn(turn, self.turn_config.wait_timeout())
    }

    /// Block until the queue is empty and the last popped request was applied
    ///
    /// Returns `false` on timeout.
    pub fn wait_until_flushed(&self, timeout: Duration) -> bool {
        self.queue.wait_until_idle(timeout)
    }

    /// Finish the current turn and start the next one
    ///
    /// Call once every producer has submitted its requests for the current
    /// turn. Advances the clock first, so anything sent while this waits is
    /// stamped with the new turn. Then waits for the finished turn to render,
    /// retires completed turns, and returns the new turn number.
    ///
    /// On timeout the clock stays advanced.
    pub fn complete_turn(&self) -> Result<TurnNumber, TurnError> {
        let next = self.clock.advance();
        let turn = next - 1;
        self.wait_for_turn(turn)?;
        self.turns.retire_completed(turn);
        log::debug!("Turn {turn} rendered, starting turn {next}");
        Ok(next)
    }

    /// Ask the render thread to stop and refuse further requests
    ///
    /// Requests queued before the sentinel are still dispatched.
    pub fn shutdown(&self) -> Result<(), RenderError> {
        log::info!("Shutting down render pipeline");
        let result = self.sender().send_shutdown();
        self.queue.close();
        result.map(|_| ())
    }
}

impl std::fmt::Debug for RenderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderManager")
            .field("current_turn", &self.clock.current())
            .field("queue", &self.queue)
            .field("turns", &self.turns)
            .finish_non_exhaustive()
    }
}
