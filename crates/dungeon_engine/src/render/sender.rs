//! Producer handle for the render queue

use super::queue::WorkQueue;
use super::request::{QueuedRequest, RenderRequest};
use super::RenderError;
use crate::sim::{TurnBarrier, TurnClock, TurnLease, TurnNumber};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cloneable handle simulation threads use to submit render requests
///
/// Every send stamps the request with the current turn and takes a lock on
/// that turn before the request becomes visible to the render thread.
#[derive(Clone)]
pub struct RenderRequestSender {
    queue: Arc<WorkQueue<QueuedRequest>>,
    barrier: Arc<dyn TurnBarrier>,
    clock: Arc<TurnClock>,
    sequence: Arc<AtomicU64>,
    enqueue_timeout: Option<Duration>,
}

impl RenderRequestSender {
    pub(crate) fn new(
        queue: Arc<WorkQueue<QueuedRequest>>,
        barrier: Arc<dyn TurnBarrier>,
        clock: Arc<TurnClock>,
        sequence: Arc<AtomicU64>,
        enqueue_timeout: Option<Duration>,
    ) -> Self {
        Self {
            queue,
            barrier,
            clock,
            sequence,
            enqueue_timeout,
        }
    }

    /// Queue a request for the render thread
    ///
    /// Returns the turn the request was stamped with. On failure the turn lock
    /// taken for the request has already been released.
    pub fn send(&self, request: RenderRequest) -> Result<TurnNumber, RenderError> {
        let turn = self.clock.current();
        let kind = request.kind();
        let lease = TurnLease::acquire(Arc::clone(&self.barrier), turn);
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);

        match self.queue.push(QueuedRequest::new(request, sequence, lease), self.enqueue_timeout) {
            Ok(Some(evicted)) => {
                log::warn!(
                    "Render queue full, evicted {} request #{} from turn {}",
                    evicted.request.kind(),
                    evicted.sequence,
                    evicted.turn
                );
            }
            Ok(None) => {
                log::trace!("Queued {kind} request #{sequence} for turn {turn}");
            }
            Err(e) => {
                log::warn!("Rejected {kind} request for turn {turn}: {e}");
                return Err(e.into());
            }
        }
        Ok(turn)
    }

    /// Queue the shutdown sentinel
    pub fn send_shutdown(&self) -> Result<TurnNumber, RenderError> {
        self.send(RenderRequest::NoRequest)
    }

    /// Requests waiting for the render thread
    pub fn queue_depth(&self) -> usize {
        self.queue.len()
    }

    /// Turn new requests are stamped with
    pub fn current_turn(&self) -> TurnNumber {
        self.clock.current()
    }
}

impl std::fmt::Debug for RenderRequestSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderRequestSender")
            .field("current_turn", &self.clock.current())
            .field("queue_depth", &self.queue.len())
            .finish_non_exhaustive()
    }
}
