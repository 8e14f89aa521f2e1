//! Projectiles in flight

use crate::foundation::collections::Shared;
use crate::foundation::math::Vec3;

/// A projectile rendered alongside the creatures
#[derive(Debug, Clone)]
pub struct MissileObject {
    /// Unique name, also the scene entity name
    pub name: String,
    /// Mesh resource, without the `.mesh` suffix
    pub mesh: String,
    /// World position
    pub position: Vec3,
}

impl MissileObject {
    /// Create a missile
    pub fn new(name: impl Into<String>, mesh: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            mesh: mesh.into(),
            position,
        }
    }

    /// Scene node name
    pub fn node_name(&self) -> String {
        format!("{}_node", self.name)
    }
}

/// Missile shared between simulation and render threads
pub type SharedMissile = Shared<MissileObject>;
