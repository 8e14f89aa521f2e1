//! Creatures

use crate::foundation::collections::Shared;
use crate::foundation::math::Vec3;
use crate::scene::{AnimationState, NodeId};

/// A creature on the map
#[derive(Debug, Clone)]
pub struct Creature {
    /// Unique name
    pub name: String,
    /// Mesh resource name
    pub mesh: String,
    /// World position
    pub position: Vec3,
    /// Base scale of the mesh
    pub scale: Vec3,
    /// Owner's colour index
    pub color: u32,
    /// Node recorded by the render thread once the mesh exists
    pub scene_node: Option<NodeId>,
    /// Animation recorded by the render thread
    pub animation: Option<AnimationState>,
}

impl Creature {
    /// Create a creature
    pub fn new(name: impl Into<String>, mesh: impl Into<String>, position: Vec3, color: u32) -> Self {
        Self {
            name: name.into(),
            mesh: mesh.into(),
            position,
            scale: Vec3::new(1.0, 1.0, 1.0),
            color,
            scene_node: None,
            animation: None,
        }
    }

    /// Scene entity name
    pub fn entity_name(&self) -> String {
        format!("Creature_{}", self.name)
    }

    /// Scene node name
    pub fn node_name(&self) -> String {
        format!("{}_node", self.name)
    }
}

/// Creature shared between simulation and render threads
pub type SharedCreature = Shared<Creature>;
