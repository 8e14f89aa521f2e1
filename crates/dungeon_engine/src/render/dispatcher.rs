//! # Render Dispatcher
//!
//! Consumer side of the render queue. Owns the scene graph and applies
//! requests one at a time in queue order.
//!
//! ## Per-request Lifecycle
//!
//! 1. Pop the envelope (request, turn, lease) from the queue
//! 2. Run the handler for the request's variant
//! 3. Log and count a failed handler, then move on
//! 4. Release the turn lease
//! 5. Mark the item complete so flush waiters can wake
//!
//! The sentinel `NoRequest` stops the loop. Anything queued behind it is
//! discarded and its lease released.
//!
//! ## Scene Layout
//!
//! ```text
//! Root
//! ├── Map
//! │   ├── Tiles          <- {tile}_node
//! │   ├── Creatures      <- {creature}_node, {missile}_node
//! │   ├── Rooms          <- room pieces and traps, one node per tile
//! │   └── Lights         <- MapLight_{name}_node
//! │                         └── MapLight_{name}_flicker_node (the light)
//! └── SquareSelectorNode (entity "SquareSelector")
//!     └── Hand_node      <- creatures held by the local player
//! ```

use super::queue::WorkQueue;
use super::request::{QueuedRequest, RenderRequest, RenderRequestKind};
use super::RenderError;
use crate::foundation::math::{tile_position, uniform_scale, Quat, Vec3};
use crate::scene::{AnimationState, NodeId, SceneError, SceneGraph, SceneLight};
use crate::sim::{TurnLease, TurnNumber};
use crate::world::{
    SharedCreature, SharedMapLight, SharedMissile, SharedPlayer, SharedRoom, SharedTile, SharedTrap,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Mesh units per scene unit
pub const MESH_UNIT_SCALE: f32 = 10.0;

/// Scale factor applied to creatures while they sit in a hand
pub const HAND_SCALE: f32 = 1.0 / 3.0;

/// Creatures per row in the hand layout
pub const HAND_ROW_LENGTH: usize = 6;

/// Name of the map cursor entity
pub const SQUARE_SELECTOR_ENTITY: &str = "SquareSelector";

/// Name of the map cursor node
pub const SQUARE_SELECTOR_NODE: &str = "SquareSelectorNode";

/// Name of the node holding picked-up creatures
pub const HAND_NODE: &str = "Hand_node";

const SQUARE_SELECTOR_MESH: &str = "SquareSelector.mesh";
const LIGHT_INDICATOR_MESH: &str = "Light.mesh";
const MAP_NODE: &str = "Map";
const TILES_NODE: &str = "Tiles";
const CREATURES_NODE: &str = "Creatures";
const ROOMS_NODE: &str = "Rooms";
const LIGHTS_NODE: &str = "Lights";

// Facing and target closer to opposite than this get a half turn
const OPPOSITE_FACING_TOLERANCE: f32 = 1.0e-4;

/// Dispatch counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Requests handled, successfully or not (the sentinel excluded)
    pub dispatched: u64,
    /// Requests whose handler succeeded
    pub applied: u64,
    /// Requests whose handler reported an error
    pub failed: u64,
    /// Requests discarded after the sentinel
    pub discarded: u64,
    /// Lease releases the turn barrier rejected
    pub barrier_errors: u64,
    /// Whether the sentinel was seen
    pub shutdown_received: bool,
    /// Handled requests per kind
    pub per_kind: BTreeMap<RenderRequestKind, u64>,
}

impl DispatchStats {
    /// Handled requests of one kind
    pub fn count(&self, kind: RenderRequestKind) -> u64 {
        self.per_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// What the dispatcher observed for one request
#[derive(Debug)]
pub struct DispatchRecord<'a> {
    /// Enqueue sequence number
    pub sequence: u64,
    /// Turn the request was stamped with
    pub turn: TurnNumber,
    /// The request itself
    pub request: &'a RenderRequest,
    /// Handler error, if any
    pub error: Option<&'a RenderError>,
}

/// Observer called after each request is handled and before its lease is released
pub type DispatchListener = Box<dyn FnMut(&DispatchRecord<'_>) + Send>;

/// Scene graph and statistics left behind by a finished dispatcher
#[derive(Debug)]
pub struct RenderOutcome<S> {
    /// The scene as the last request left it
    pub scene: S,
    /// Dispatch counters
    pub stats: DispatchStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Shutdown,
}

/// Applies queued render requests to a scene graph
pub struct RenderDispatcher<S: SceneGraph> {
    scene: S,
    queue: Arc<WorkQueue<QueuedRequest>>,
    idle_poll: Duration,
    tiles_node: NodeId,
    creatures_node: NodeId,
    rooms_node: NodeId,
    lights_node: NodeId,
    selector_node: NodeId,
    hand_node: NodeId,
    stats: DispatchStats,
    listener: Option<DispatchListener>,
}

impl<S: SceneGraph> RenderDispatcher<S> {
    /// Create a dispatcher, building the fixed part of the scene layout
    ///
    /// Layout nodes that already exist in `scene` are reused.
    pub fn new(
        mut scene: S,
        queue: Arc<WorkQueue<QueuedRequest>>,
        idle_poll: Duration,
    ) -> Result<Self, RenderError> {
        let root = scene.root();
        let map_node = ensure_node(&mut scene, MAP_NODE, root)?;
        let tiles_node = ensure_node(&mut scene, TILES_NODE, map_node)?;
        let creatures_node = ensure_node(&mut scene, CREATURES_NODE, map_node)?;
        let rooms_node = ensure_node(&mut scene, ROOMS_NODE, map_node)?;
        let lights_node = ensure_node(&mut scene, LIGHTS_NODE, map_node)?;
        let selector_node = ensure_node(&mut scene, SQUARE_SELECTOR_NODE, root)?;
        let hand_node = ensure_node(&mut scene, HAND_NODE, selector_node)?;

        if !scene.has_entity(SQUARE_SELECTOR_ENTITY) {
            scene.create_entity(SQUARE_SELECTOR_ENTITY, SQUARE_SELECTOR_MESH, 0)?;
            scene.attach_entity(SQUARE_SELECTOR_ENTITY, selector_node)?;
            scene.set_entity_visible(SQUARE_SELECTOR_ENTITY, false)?;
        }

        Ok(Self {
            scene,
            queue,
            idle_poll,
            tiles_node,
            creatures_node,
            rooms_node,
            lights_node,
            selector_node,
            hand_node,
            stats: DispatchStats::default(),
            listener: None,
        })
    }

    /// Install an observer for dispatched requests
    #[must_use]
    pub fn with_listener<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&DispatchRecord<'_>) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Scene graph being rendered into
    pub const fn scene(&self) -> &S {
        &self.scene
    }

    /// Counters so far
    pub const fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Node tiles are created under
    pub const fn tiles_node(&self) -> NodeId {
        self.tiles_node
    }

    /// Node creatures are created under
    pub const fn creatures_node(&self) -> NodeId {
        self.creatures_node
    }

    /// Node room pieces and traps are created under
    pub const fn rooms_node(&self) -> NodeId {
        self.rooms_node
    }

    /// Node map lights are created under
    pub const fn lights_node(&self) -> NodeId {
        self.lights_node
    }

    /// Node holding picked-up creatures
    pub const fn hand_node(&self) -> NodeId {
        self.hand_node
    }

    /// Whether the sentinel has been handled
    pub const fn is_shut_down(&self) -> bool {
        self.stats.shutdown_received
    }

    /// Dispatch until the sentinel arrives or the queue is closed and empty
    pub fn run(&mut self) {
        log::info!("Render dispatcher started");

        while !self.stats.shutdown_received {
            match self.queue.pop_timeout(self.idle_poll) {
                Some(queued) => {
                    if self.dispatch(queued) == Flow::Shutdown {
                        let rest = self.queue.drain();
                        self.discard(rest.into_iter());
                        break;
                    }
                }
                None if self.queue.is_closed() && self.queue.is_empty() => {
                    log::info!("Render queue closed without a shutdown request");
                    break;
                }
                None => log::trace!("Render queue idle"),
            }
        }

        log::info!(
            "Render dispatcher stopped: {} dispatched, {} failed, {} discarded",
            self.stats.dispatched,
            self.stats.failed,
            self.stats.discarded
        );
    }

    /// Dispatch everything queued right now without blocking
    ///
    /// Used when the render thread is driven by a frame loop. Returns the
    /// number of requests handled (the sentinel excluded).
    pub fn process_pending(&mut self) -> usize {
        let before = self.stats.dispatched;
        let mut batch = self.queue.drain().into_iter();

        while let Some(queued) = batch.next() {
            if self.dispatch(queued) == Flow::Shutdown {
                self.discard(batch);
                break;
            }
        }

        usize::try_from(self.stats.dispatched - before).unwrap_or(usize::MAX)
    }

    /// Stop and hand back the scene and counters
    pub fn into_outcome(self) -> RenderOutcome<S> {
        RenderOutcome {
            scene: self.scene,
            stats: self.stats,
        }
    }

    fn dispatch(&mut self, queued: QueuedRequest) -> Flow {
        let sequence = queued.sequence;
        let turn = queued.turn;
        let (request, lease) = queued.into_parts();
        let kind = request.kind();

        if request.is_shutdown() {
            log::info!("Shutdown request #{sequence} received (turn {turn})");
            self.stats.shutdown_received = true;
            self.release(lease);
            self.queue.complete(1);
            return Flow::Shutdown;
        }

        let result = self.handle(&request);

        self.stats.dispatched += 1;
        *self.stats.per_kind.entry(kind).or_insert(0) += 1;
        match &result {
            Ok(()) => {
                self.stats.applied += 1;
                log::debug!("Applied {kind} request #{sequence} (turn {turn})");
            }
            Err(e) => {
                self.stats.failed += 1;
                log::warn!("Dropped {kind} request #{sequence} (turn {turn}): {e}");
            }
        }

        if let Some(listener) = self.listener.as_mut() {
            listener(&DispatchRecord {
                sequence,
                turn,
                request: &request,
                error: result.as_ref().err(),
            });
        }

        // Payload handles go before the lease so a cleared turn holds no entity references
        drop(request);
        self.release(lease);
        self.queue.complete(1);
        Flow::Continue
    }

    fn release(&mut self, lease: TurnLease) {
        let turn = lease.turn();
        if let Err(e) = lease.release() {
            self.stats.barrier_errors += 1;
            log::error!("Turn barrier rejected release for turn {turn}: {e}");
        }
    }

    fn discard(&mut self, leftover: impl ExactSizeIterator<Item = QueuedRequest>) {
        let count = leftover.len();
        if count == 0 {
            return;
        }
        self.stats.discarded += count as u64;
        log::warn!("Discarding {count} render requests queued after shutdown");

        // Dropping the envelopes releases their turn locks
        drop(leftover);
        self.queue.complete(count);
    }

    fn handle(&mut self, request: &RenderRequest) -> Result<(), RenderError> {
        match request {
            RenderRequest::CreateTile { tile } => self.create_tile(tile),
            RenderRequest::RefreshTile { tile } => self.refresh_tile(tile),
            RenderRequest::DestroyTile { tile } => self.destroy_tile(tile),
            RenderRequest::DeleteTile { tile } => {
                log::trace!("Released render handle on {}", tile.read().name);
                Ok(())
            }
            RenderRequest::AttachTile { tile } => self.attach_tile(tile),
            RenderRequest::DetachTile { tile } => self.detach_tile(tile),
            RenderRequest::ColorTile { tile, player, colored } => self.color_tile(tile, player, *colored),
            RenderRequest::CreateCreature { creature } => self.create_creature(creature),
            RenderRequest::DestroyCreature { creature } => self.destroy_creature(creature),
            RenderRequest::DeleteCreature { creature } => {
                log::trace!("Released render handle on {}", creature.read().name);
                Ok(())
            }
            RenderRequest::SetCreatureAnimationState {
                creature,
                animation,
                looping,
            } => self.set_creature_animation(creature, animation, *looping),
            RenderRequest::PickUpCreature { creature, player } => self.pick_up_creature(creature, player),
            RenderRequest::DropCreature { creature, player } => self.drop_creature(creature, player),
            RenderRequest::RotateCreaturesInHand { player } => self.layout_hand(player),
            RenderRequest::CreateRoom { room, tile } => {
                let room = room.read();
                let tile = tile.read();
                let node = self.create_mesh_node(
                    &room.entity_name(&tile),
                    &room.mesh_name(),
                    room.color,
                    self.rooms_node,
                    tile_position(tile.x, tile.y),
                )?;
                self.scene.set_scale(node, uniform_scale(MESH_UNIT_SCALE))?;
                Ok(())
            }
            RenderRequest::DestroyRoom { room, tile } => {
                let entity = room.read().entity_name(&tile.read());
                self.destroy_mesh_node(&entity, &format!("{entity}_node"))
            }
            RenderRequest::CreateTrap { trap, tile } => {
                let trap = trap.read();
                let tile = tile.read();
                self.create_mesh_node(
                    &trap.entity_name(&tile),
                    &trap.mesh_name(),
                    0,
                    self.rooms_node,
                    tile_position(tile.x, tile.y),
                )?;
                Ok(())
            }
            RenderRequest::DestroyTrap { trap, tile } => {
                let entity = trap.read().entity_name(&tile.read());
                self.destroy_mesh_node(&entity, &format!("{entity}_node"))
            }
            RenderRequest::CreateMissileObject { missile } => self.create_missile(missile),
            RenderRequest::DestroyMissileObject { missile } => {
                let missile = missile.read();
                self.destroy_mesh_node(&missile.name, &missile.node_name())
            }
            RenderRequest::CreateMapLight { light } => self.create_map_light(light),
            RenderRequest::DestroyMapLight { light } => self.destroy_map_light(light),
            RenderRequest::MoveSceneNode { node, position } => {
                let node = self.scene.require_node(node)?;
                self.scene.set_position(node, *position)?;
                Ok(())
            }
            RenderRequest::OrientSceneNodeToward { node, direction } => self.orient_toward(node, *direction),
            RenderRequest::ReorientSceneNode { node, rotation } => {
                let node = self.scene.require_node(node)?;
                self.scene.rotate(node, *rotation)?;
                Ok(())
            }
            RenderRequest::ScaleSceneNode { node, scale } => {
                let node = self.scene.require_node(node)?;
                let current = self.scene.node(node).map(|n| n.scale).ok_or(SceneError::StaleNode)?;
                self.scene.set_scale(node, current.component_mul(scale))?;
                Ok(())
            }
            RenderRequest::ShowSquareSelector { x, y } => self.show_square_selector(*x, *y),
            RenderRequest::NoRequest => Ok(()),
        }
    }

    /// Create `entity` on a new `{entity}_node` under `parent`
    fn create_mesh_node(
        &mut self,
        entity: &str,
        mesh: &str,
        color: u32,
        parent: NodeId,
        position: Vec3,
    ) -> Result<NodeId, RenderError> {
        let node_name = format!("{entity}_node");
        if self.scene.has_node(&node_name) {
            return Err(SceneError::DuplicateNode(node_name).into());
        }

        self.scene.create_entity(entity, mesh, color)?;
        let node = match self.scene.create_node(&node_name, parent) {
            Ok(node) => node,
            Err(e) => {
                self.scene.destroy_entity(entity)?;
                return Err(e.into());
            }
        };
        self.scene.attach_entity(entity, node)?;
        self.scene.set_position(node, position)?;
        Ok(node)
    }

    /// Destroy whichever of the entity and node still exist
    fn destroy_mesh_node(&mut self, entity: &str, node_name: &str) -> Result<(), RenderError> {
        if self.scene.has_entity(entity) {
            self.scene.destroy_entity(entity)?;
        }
        if let Some(node) = self.scene.find_node(node_name) {
            self.scene.destroy_node(node)?;
        }
        Ok(())
    }

    fn create_tile(&mut self, tile: &SharedTile) -> Result<(), RenderError> {
        let mut tile = tile.write();
        let node = self.create_mesh_node(
            &tile.name,
            &tile.mesh_name(),
            tile.color,
            self.tiles_node,
            tile_position(tile.x, tile.y),
        )?;
        self.scene.set_scale(node, uniform_scale(MESH_UNIT_SCALE))?;
        self.scene.set_roll(node, tile.rotation)?;

        tile.owning_node = Some(self.tiles_node);
        tile.parent_node = Some(self.tiles_node);
        Ok(())
    }

    fn refresh_tile(&mut self, tile: &SharedTile) -> Result<(), RenderError> {
        let tile = tile.read();
        let Some(node) = self.scene.find_node(&tile.node_name()) else {
            log::debug!("Skipping refresh of {}: not rendered yet", tile.name);
            return Ok(());
        };

        self.scene.refresh_mesh(&tile.name, &tile.mesh_name(), tile.color)?;
        self.scene.set_roll(node, tile.rotation)?;
        Ok(())
    }

    fn destroy_tile(&mut self, tile: &SharedTile) -> Result<(), RenderError> {
        let mut tile = tile.write();
        self.destroy_mesh_node(&tile.name, &tile.node_name())?;

        tile.owning_node = None;
        tile.parent_node = None;
        Ok(())
    }

    fn attach_tile(&mut self, tile: &SharedTile) -> Result<(), RenderError> {
        let mut tile = tile.write();
        let node = self.scene.require_node(&tile.node_name())?;
        let owner = tile
            .owning_node
            .ok_or_else(|| RenderError::NoOwningNode(tile.name.clone()))?;

        if self.scene.parent(node) != Some(owner) {
            self.scene.reparent(node, owner)?;
        }
        tile.parent_node = Some(owner);
        Ok(())
    }

    fn detach_tile(&mut self, tile: &SharedTile) -> Result<(), RenderError> {
        let mut tile = tile.write();
        let node_name = tile.node_name();
        let node = self.scene.require_node(&node_name)?;
        let grandparent = self
            .scene
            .parent(node)
            .and_then(|parent| self.scene.parent(parent))
            .ok_or(SceneError::NoAncestor(node_name))?;

        self.scene.reparent(node, grandparent)?;
        tile.parent_node = Some(grandparent);
        Ok(())
    }

    fn color_tile(&mut self, tile: &SharedTile, player: &SharedPlayer, colored: bool) -> Result<(), RenderError> {
        let color = if colored { player.read().color() } else { 0 };
        tile.write().color = color;
        self.refresh_tile(tile)
    }

    fn create_creature(&mut self, creature: &SharedCreature) -> Result<(), RenderError> {
        let mut creature = creature.write();
        let entity_name = creature.entity_name();
        let node_name = creature.node_name();
        if self.scene.has_node(&node_name) {
            return Err(SceneError::DuplicateNode(node_name).into());
        }

        self.scene.create_entity(&entity_name, &creature.mesh, creature.color)?;
        let node = self.scene.create_node(&node_name, self.creatures_node)?;
        self.scene.attach_entity(&entity_name, node)?;
        self.scene.set_position(node, creature.position)?;
        self.scene.set_scale(node, creature.scale)?;

        creature.scene_node = Some(node);
        Ok(())
    }

    fn destroy_creature(&mut self, creature: &SharedCreature) -> Result<(), RenderError> {
        let mut creature = creature.write();
        self.destroy_mesh_node(&creature.entity_name(), &creature.node_name())?;

        creature.scene_node = None;
        Ok(())
    }

    fn set_creature_animation(
        &mut self,
        creature: &SharedCreature,
        animation: &str,
        looping: bool,
    ) -> Result<(), RenderError> {
        let mut creature = creature.write();
        let state = AnimationState {
            name: animation.to_string(),
            looping,
        };
        self.scene.set_animation(&creature.entity_name(), state.clone())?;
        creature.animation = Some(state);
        Ok(())
    }

    fn pick_up_creature(&mut self, creature: &SharedCreature, player: &SharedPlayer) -> Result<(), RenderError> {
        {
            let creature = creature.read();
            let node = self.scene.require_node(&creature.node_name())?;
            self.scene.reparent(node, self.hand_node)?;
            self.scene.set_scale(node, creature.scale * HAND_SCALE)?;
        }
        self.layout_hand(player)
    }

    fn drop_creature(&mut self, creature: &SharedCreature, player: &SharedPlayer) -> Result<(), RenderError> {
        {
            let creature = creature.read();
            let node = self.scene.require_node(&creature.node_name())?;
            self.scene.reparent(node, self.creatures_node)?;
            self.scene.set_position(node, creature.position)?;
            self.scene.set_scale(node, creature.scale)?;
        }
        self.layout_hand(player)
    }

    fn layout_hand(&mut self, player: &SharedPlayer) -> Result<(), RenderError> {
        let node_names: Vec<String> = player
            .read()
            .creatures_in_hand
            .iter()
            .map(|creature| creature.read().node_name())
            .collect();

        for (slot, name) in node_names.iter().enumerate() {
            let node = self.scene.require_node(name)?;
            self.scene.set_position(node, hand_slot(slot))?;
        }
        Ok(())
    }

    fn create_missile(&mut self, missile: &SharedMissile) -> Result<(), RenderError> {
        let missile = missile.read();
        self.create_mesh_node(
            &missile.name,
            &format!("{}.mesh", missile.mesh),
            0,
            self.creatures_node,
            missile.position,
        )?;
        Ok(())
    }

    fn create_map_light(&mut self, light: &SharedMapLight) -> Result<(), RenderError> {
        let light = light.read();
        let light_name = light.light_name();
        if self.scene.has_light(&light_name) {
            return Err(SceneError::DuplicateLight(light_name).into());
        }

        let base = self.scene.create_node(&light.node_name(), self.lights_node)?;
        self.scene.set_position(base, light.position)?;
        if light.show_indicator {
            let indicator = light.indicator_name();
            self.scene.create_entity(&indicator, LIGHT_INDICATOR_MESH, 0)?;
            self.scene.attach_entity(&indicator, base)?;
        }

        // The flicker node wanders relative to the base and carries the light
        let flicker = self.scene.create_node(&light.flicker_node_name(), base)?;
        self.scene.create_light(SceneLight {
            name: light_name,
            diffuse: light.diffuse,
            specular: light.specular,
            attenuation: light.attenuation,
            node: Some(flicker),
        })?;
        Ok(())
    }

    fn destroy_map_light(&mut self, light: &SharedMapLight) -> Result<(), RenderError> {
        let light = light.read();
        let light_name = light.light_name();
        if !self.scene.has_light(&light_name) {
            return Ok(());
        }

        self.scene.destroy_light(&light_name)?;
        let indicator = light.indicator_name();
        if self.scene.has_entity(&indicator) {
            self.scene.destroy_entity(&indicator)?;
        }
        if let Some(base) = self.scene.find_node(&light.node_name()) {
            self.scene.destroy_node(base)?;
        }
        Ok(())
    }

    fn orient_toward(&mut self, name: &str, direction: Vec3) -> Result<(), RenderError> {
        let node = self.scene.require_node(name)?;
        let target = direction
            .try_normalize(f32::EPSILON)
            .ok_or_else(|| RenderError::ZeroDirection(name.to_string()))?;
        let orientation = self.scene.node(node).map(|n| n.orientation).ok_or(SceneError::StaleNode)?;
        let facing = orientation * -Vec3::y();

        // rotation_between is undefined for opposite vectors: roll half a turn instead
        let rotation = if 1.0 + facing.dot(&target) < OPPOSITE_FACING_TOLERANCE {
            Quat::from_axis_angle(&(orientation * Vec3::z_axis()), std::f32::consts::PI)
        } else {
            Quat::rotation_between(&facing, &target).unwrap_or_else(Quat::identity)
        };
        self.scene.rotate(node, rotation)?;
        Ok(())
    }

    fn show_square_selector(&mut self, x: i32, y: i32) -> Result<(), RenderError> {
        self.scene.set_entity_visible(SQUARE_SELECTOR_ENTITY, true)?;
        self.scene.set_visible(self.selector_node, true)?;
        self.scene.set_position(self.selector_node, tile_position(x, y))?;
        Ok(())
    }
}

impl<S: SceneGraph> std::fmt::Debug for RenderDispatcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderDispatcher")
            .field("stats", &self.stats)
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

/// Position of the `slot`-th creature in a hand
#[allow(clippy::cast_precision_loss)]
pub fn hand_slot(slot: usize) -> Vec3 {
    let column = (slot % HAND_ROW_LENGTH + 1) as f32;
    let row = (slot / HAND_ROW_LENGTH) as f32;
    Vec3::new(column, row, 0.0)
}

fn ensure_node<S: SceneGraph>(scene: &mut S, name: &str, parent: NodeId) -> Result<NodeId, SceneError> {
    match scene.find_node(name) {
        Some(node) => Ok(node),
        None => scene.create_node(name, parent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_slots_wrap_every_six() {
        assert_eq!(hand_slot(0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(hand_slot(5), Vec3::new(6.0, 0.0, 0.0));
        assert_eq!(hand_slot(6), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(hand_slot(13), Vec3::new(2.0, 2.0, 0.0));
    }
}
