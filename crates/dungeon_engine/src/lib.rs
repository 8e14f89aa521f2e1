//! # Dungeon Engine
//!
//! Cross-thread render pipeline for a turn-based multiplayer dungeon game.
//!
//! ## Features
//!
//! - **Typed Render Requests**: Scene mutations described as a closed enum
//! - **Render Queue**: Many simulation threads produce, one render thread consumes
//! - **Turn Locks**: A turn is not complete until every request stamped with it is rendered
//! - **Scene Graph**: Pluggable scene collaborator with an arena-backed default
//! - **Event Queue**: Simpler FIFO sibling for string-action events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dungeon_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let manager = RenderManager::new(&config)?;
//!     let render_thread = manager.spawn_dispatcher(SimpleSceneGraph::new())?;
//!
//!     let sender = manager.sender();
//!     sender.send(RenderRequest::ShowSquareSelector { x: 5, y: 7 })?;
//!
//!     manager.shutdown()?;
//!     let outcome = render_thread.join().expect("render thread panicked");
//!     println!("dispatched {} requests", outcome.stats.dispatched);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod scene;
pub mod world;
pub mod sim;
pub mod render;
pub mod events;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{EngineConfig, LoggingConfig, RenderQueueConfig, TurnConfig},
        config::{Config, ConfigError},
        events::{Event, EventHandler, EventManager},
        foundation::{
            collections::{shared, Shared},
            math::{Quat, Vec3},
        },
        render::{
            DispatchStats, QueuePolicy, RenderDispatcher, RenderError, RenderManager,
            RenderOutcome, RenderRequest, RenderRequestKind, RenderRequestSender,
        },
        scene::{Attenuation, NodeId, SceneError, SceneGraph, SceneLight, SimpleSceneGraph},
        sim::{TurnBarrier, TurnClock, TurnError, TurnLockTable, TurnNumber},
        world::{
            Creature, MapLight, MissileObject, Player, Room, Seat, SharedCreature, SharedMapLight,
            SharedMissile, SharedPlayer, SharedRoom, SharedTile, SharedTrap, Tile, TileType, Trap,
        },
    };
}
