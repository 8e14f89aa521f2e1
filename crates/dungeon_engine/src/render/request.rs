//! Render requests
//!
//! Each variant carries exactly the payload its handler needs, so the
//! dispatcher can never read a tile where it expected a creature.

use crate::foundation::math::{Quat, Vec3};
use crate::sim::{TurnLease, TurnNumber};
use crate::world::{
    SharedCreature, SharedMapLight, SharedMissile, SharedPlayer, SharedRoom, SharedTile, SharedTrap,
};
use std::fmt;

/// A scene mutation requested by the simulation
#[derive(Debug, Clone)]
pub enum RenderRequest {
    /// Build the tile's mesh and node
    CreateTile {
        /// Tile to render
        tile: SharedTile,
    },
    /// Rebuild the tile's mesh from its current type, fullness, and colour
    RefreshTile {
        /// Tile to refresh
        tile: SharedTile,
    },
    /// Remove the tile's mesh and node
    DestroyTile {
        /// Tile to remove
        tile: SharedTile,
    },
    /// Release the render thread's handle on the tile
    DeleteTile {
        /// Tile to release
        tile: SharedTile,
    },
    /// Put the tile's node back under its owning node
    AttachTile {
        /// Tile to attach
        tile: SharedTile,
    },
    /// Move the tile's node up to its grandparent
    DetachTile {
        /// Tile to detach
        tile: SharedTile,
    },
    /// Tint the tile with a player's colour, or clear the tint
    ColorTile {
        /// Tile to tint
        tile: SharedTile,
        /// Player whose seat colour is used
        player: SharedPlayer,
        /// Apply (`true`) or clear (`false`) the colour
        colored: bool,
    },
    /// Build the creature's mesh and node
    CreateCreature {
        /// Creature to render
        creature: SharedCreature,
    },
    /// Remove the creature's mesh and node
    DestroyCreature {
        /// Creature to remove
        creature: SharedCreature,
    },
    /// Release the render thread's handle on the creature
    DeleteCreature {
        /// Creature to release
        creature: SharedCreature,
    },
    /// Switch the creature's animation
    SetCreatureAnimationState {
        /// Creature to animate
        creature: SharedCreature,
        /// Animation name
        animation: String,
        /// Whether the animation loops
        looping: bool,
    },
    /// Move the creature into the player's hand
    PickUpCreature {
        /// Creature picked up
        creature: SharedCreature,
        /// Player holding it
        player: SharedPlayer,
    },
    /// Put the creature back on the map
    DropCreature {
        /// Creature dropped
        creature: SharedCreature,
        /// Player who held it
        player: SharedPlayer,
    },
    /// Lay out the player's hand again after its order changed
    RotateCreaturesInHand {
        /// Player whose hand changed
        player: SharedPlayer,
    },
    /// Place a room's piece on one of its tiles
    CreateRoom {
        /// Room being built
        room: SharedRoom,
        /// Tile the piece covers
        tile: SharedTile,
    },
    /// Remove a room's piece from a tile
    DestroyRoom {
        /// Room losing the tile
        room: SharedRoom,
        /// Tile the piece covered
        tile: SharedTile,
    },
    /// Place a trap on a tile
    CreateTrap {
        /// Trap being built
        trap: SharedTrap,
        /// Tile it sits on
        tile: SharedTile,
    },
    /// Remove a trap from a tile
    DestroyTrap {
        /// Trap being removed
        trap: SharedTrap,
        /// Tile it sat on
        tile: SharedTile,
    },
    /// Build a projectile's mesh and node
    CreateMissileObject {
        /// Projectile to render
        missile: SharedMissile,
    },
    /// Remove a projectile's mesh and node
    DestroyMissileObject {
        /// Projectile to remove
        missile: SharedMissile,
    },
    /// Build a map light with its marker and flicker node
    CreateMapLight {
        /// Light to render
        light: SharedMapLight,
    },
    /// Remove a map light and its nodes
    DestroyMapLight {
        /// Light to remove
        light: SharedMapLight,
    },
    /// Move a named scene node
    MoveSceneNode {
        /// Node name
        node: String,
        /// New position relative to its parent
        position: Vec3,
    },
    /// Turn a named node so its facing (local -Y) points along `direction`
    OrientSceneNodeToward {
        /// Node name
        node: String,
        /// Direction to face, in the parent's frame
        direction: Vec3,
    },
    /// Rotate a named node by a quaternion
    ReorientSceneNode {
        /// Node name
        node: String,
        /// Rotation applied in the parent's frame
        rotation: Quat,
    },
    /// Multiply a named node's scale
    ScaleSceneNode {
        /// Node name
        node: String,
        /// Per-axis factor
        scale: Vec3,
    },
    /// Show the map cursor over a cell
    ShowSquareSelector {
        /// Cell column
        x: i32,
        /// Cell row
        y: i32,
    },
    /// Stop the render loop
    NoRequest,
}

impl RenderRequest {
    /// Discriminant of this request
    pub const fn kind(&self) -> RenderRequestKind {
        match self {
            Self::CreateTile { .. } => RenderRequestKind::CreateTile,
            Self::RefreshTile { .. } => RenderRequestKind::RefreshTile,
            Self::DestroyTile { .. } => RenderRequestKind::DestroyTile,
            Self::DeleteTile { .. } => RenderRequestKind::DeleteTile,
            Self::AttachTile { .. } => RenderRequestKind::AttachTile,
            Self::DetachTile { .. } => RenderRequestKind::DetachTile,
            Self::ColorTile { .. } => RenderRequestKind::ColorTile,
            Self::CreateCreature { .. } => RenderRequestKind::CreateCreature,
            Self::DestroyCreature { .. } => RenderRequestKind::DestroyCreature,
            Self::DeleteCreature { .. } => RenderRequestKind::DeleteCreature,
            Self::SetCreatureAnimationState { .. } => RenderRequestKind::SetCreatureAnimationState,
            Self::PickUpCreature { .. } => RenderRequestKind::PickUpCreature,
            Self::DropCreature { .. } => RenderRequestKind::DropCreature,
            Self::RotateCreaturesInHand { .. } => RenderRequestKind::RotateCreaturesInHand,
            Self::CreateRoom { .. } => RenderRequestKind::CreateRoom,
            Self::DestroyRoom { .. } => RenderRequestKind::DestroyRoom,
            Self::CreateTrap { .. } => RenderRequestKind::CreateTrap,
            Self::DestroyTrap { .. } => RenderRequestKind::DestroyTrap,
            Self::CreateMissileObject { .. } => RenderRequestKind::CreateMissileObject,
            Self::DestroyMissileObject { .. } => RenderRequestKind::DestroyMissileObject,
            Self::CreateMapLight { .. } => RenderRequestKind::CreateMapLight,
            Self::DestroyMapLight { .. } => RenderRequestKind::DestroyMapLight,
            Self::MoveSceneNode { .. } => RenderRequestKind::MoveSceneNode,
            Self::OrientSceneNodeToward { .. } => RenderRequestKind::OrientSceneNodeToward,
            Self::ReorientSceneNode { .. } => RenderRequestKind::ReorientSceneNode,
            Self::ScaleSceneNode { .. } => RenderRequestKind::ScaleSceneNode,
            Self::ShowSquareSelector { .. } => RenderRequestKind::ShowSquareSelector,
            Self::NoRequest => RenderRequestKind::NoRequest,
        }
    }

    /// Whether this is the shutdown sentinel
    pub const fn is_shutdown(&self) -> bool {
        matches!(self, Self::NoRequest)
    }
}

/// Request discriminant, used for logging and per-kind statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum RenderRequestKind {
    CreateTile,
    RefreshTile,
    DestroyTile,
    DeleteTile,
    AttachTile,
    DetachTile,
    ColorTile,
    CreateCreature,
    DestroyCreature,
    DeleteCreature,
    SetCreatureAnimationState,
    PickUpCreature,
    DropCreature,
    RotateCreaturesInHand,
    CreateRoom,
    DestroyRoom,
    CreateTrap,
    DestroyTrap,
    CreateMissileObject,
    DestroyMissileObject,
    CreateMapLight,
    DestroyMapLight,
    MoveSceneNode,
    OrientSceneNodeToward,
    ReorientSceneNode,
    ScaleSceneNode,
    ShowSquareSelector,
    NoRequest,
}

impl RenderRequestKind {
    /// Every kind, in declaration order
    pub const ALL: [Self; 28] = [
        Self::CreateTile,
        Self::RefreshTile,
        Self::DestroyTile,
        Self::DeleteTile,
        Self::AttachTile,
        Self::DetachTile,
        Self::ColorTile,
        Self::CreateCreature,
        Self::DestroyCreature,
        Self::DeleteCreature,
        Self::SetCreatureAnimationState,
        Self::PickUpCreature,
        Self::DropCreature,
        Self::RotateCreaturesInHand,
        Self::CreateRoom,
        Self::DestroyRoom,
        Self::CreateTrap,
        Self::DestroyTrap,
        Self::CreateMissileObject,
        Self::DestroyMissileObject,
        Self::CreateMapLight,
        Self::DestroyMapLight,
        Self::MoveSceneNode,
        Self::OrientSceneNodeToward,
        Self::ReorientSceneNode,
        Self::ScaleSceneNode,
        Self::ShowSquareSelector,
        Self::NoRequest,
    ];

    /// Short name for logs
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateTile => "createTile",
            Self::RefreshTile => "refreshTile",
            Self::DestroyTile => "destroyTile",
            Self::DeleteTile => "deleteTile",
            Self::AttachTile => "attachTile",
            Self::DetachTile => "detachTile",
            Self::ColorTile => "colorTile",
            Self::CreateCreature => "createCreature",
            Self::DestroyCreature => "destroyCreature",
            Self::DeleteCreature => "deleteCreature",
            Self::SetCreatureAnimationState => "setCreatureAnimationState",
            Self::PickUpCreature => "pickUpCreature",
            Self::DropCreature => "dropCreature",
            Self::RotateCreaturesInHand => "rotateCreaturesInHand",
            Self::CreateRoom => "createRoom",
            Self::DestroyRoom => "destroyRoom",
            Self::CreateTrap => "createTrap",
            Self::DestroyTrap => "destroyTrap",
            Self::CreateMissileObject => "createMissileObject",
            Self::DestroyMissileObject => "destroyMissileObject",
            Self::CreateMapLight => "createMapLight",
            Self::DestroyMapLight => "destroyMapLight",
            Self::MoveSceneNode => "moveSceneNode",
            Self::OrientSceneNodeToward => "orientSceneNodeToward",
            Self::ReorientSceneNode => "reorientSceneNode",
            Self::ScaleSceneNode => "scaleSceneNode",
            Self::ShowSquareSelector => "showSquareSelector",
            Self::NoRequest => "noRequest",
        }
    }
}

impl fmt::Display for RenderRequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request as it sits in the render queue
///
/// The lease keeps the request's turn locked until the dispatcher releases it
/// (or the envelope is dropped unprocessed).
#[derive(Debug)]
pub struct QueuedRequest {
    /// The scene mutation
    pub request: RenderRequest,
    /// Turn the request was created in
    pub turn: TurnNumber,
    /// Enqueue sequence number, unique per render manager
    pub sequence: u64,
    lease: TurnLease,
}

impl QueuedRequest {
    /// Wrap a request together with the lease on its turn
    pub fn new(request: RenderRequest, sequence: u64, lease: TurnLease) -> Self {
        Self {
            request,
            turn: lease.turn(),
            sequence,
            lease,
        }
    }

    /// Split into the request and its lease
    pub fn into_parts(self) -> (RenderRequest, TurnLease) {
        (self.request, self.lease)
    }
}
