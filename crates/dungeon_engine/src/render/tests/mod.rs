//! Render pipeline integration tests
//!
//! `handler_integration` drives the dispatcher synchronously through
//! `process_pending`; `pipeline_integration` runs real producer and render
//! threads.

mod pipeline_integration;

use crate::core::config::EngineConfig;
use crate::foundation::collections::shared;
use crate::foundation::math::Vec3;
use crate::render::{RenderDispatcher, RenderManager, RenderRequestSender};
use crate::scene::SimpleSceneGraph;
use crate::world::{Creature, Player, Seat, SharedCreature, SharedPlayer};

fn setup() -> (RenderManager, RenderRequestSender, RenderDispatcher<SimpleSceneGraph>) {
    let manager = RenderManager::new(&EngineConfig::default()).unwrap();
    let sender = manager.sender();
    let dispatcher = manager.dispatcher(SimpleSceneGraph::new()).unwrap();
    (manager, sender, dispatcher)
}

fn keeper(color: u32) -> SharedPlayer {
    shared(Player::new("keeper", Seat { team_id: 1, color }))
}

fn imp(name: &str) -> SharedCreature {
    shared(Creature::new(name, "Kobold.mesh", Vec3::new(2.0, 3.0, 0.0), 1))
}
