//! Render pipeline
//!
//! Simulation threads describe scene changes as [`RenderRequest`]s and submit
//! them through a [`RenderRequestSender`]. A single render thread runs a
//! [`RenderDispatcher`] that applies them to the scene graph in FIFO order
//! and releases each request's turn lock once it has been handled.

pub mod queue;
pub mod request;
pub mod sender;
pub mod dispatcher;
pub mod manager;

#[cfg(test)]
mod tests;

pub use queue::{QueueError, QueuePolicy, QueueStats, WorkQueue};
pub use request::{QueuedRequest, RenderRequest, RenderRequestKind};
pub use sender::RenderRequestSender;
pub use dispatcher::{DispatchListener, DispatchRecord, DispatchStats, RenderDispatcher, RenderOutcome};
pub use manager::RenderManager;

use crate::config::ConfigError;
use crate::scene::SceneError;
use crate::sim::TurnError;
use thiserror::Error;

/// Render pipeline errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// The scene graph rejected an operation
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// The pipeline was given an invalid configuration
    #[error("Render configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The render queue rejected a request
    #[error("Render queue error: {0}")]
    Queue(#[from] QueueError),

    /// The turn barrier rejected an operation
    #[error("Turn barrier error: {0}")]
    Turn(#[from] TurnError),

    /// A tile has never been placed under an owning node
    #[error("Tile {0} has no owning node to attach to")]
    NoOwningNode(String),

    /// An orientation request gave no direction to face
    #[error("Cannot orient {0} toward a zero-length direction")]
    ZeroDirection(String),

    /// The render thread could not be started
    #[error("Failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),
}
