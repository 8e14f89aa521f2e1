//! Rooms and traps built on claimed tiles

use crate::foundation::collections::Shared;
use crate::world::Tile;

/// A room covering one or more tiles
#[derive(Debug, Clone)]
pub struct Room {
    /// Unique name
    pub name: String,
    /// Mesh resource placed on each covered tile, without the `.mesh` suffix
    pub mesh: String,
    /// Owner's colour index
    pub color: u32,
}

impl Room {
    /// Create a room
    pub fn new(name: impl Into<String>, mesh: impl Into<String>, color: u32) -> Self {
        Self {
            name: name.into(),
            mesh: mesh.into(),
            color,
        }
    }

    /// Scene entity name of the room's piece on `tile`
    pub fn entity_name(&self, tile: &Tile) -> String {
        format!("{}_{}_{}", self.name, tile.x, tile.y)
    }

    /// Mesh resource name
    pub fn mesh_name(&self) -> String {
        format!("{}.mesh", self.mesh)
    }
}

/// A trap placed on a tile
#[derive(Debug, Clone)]
pub struct Trap {
    /// Unique name
    pub name: String,
    /// Mesh resource, without the `.mesh` suffix
    pub mesh: String,
}

impl Trap {
    /// Create a trap
    pub fn new(name: impl Into<String>, mesh: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mesh: mesh.into(),
        }
    }

    /// Scene entity name of the trap on `tile`
    pub fn entity_name(&self, tile: &Tile) -> String {
        format!("Trap_{}_tile_{}_{}", self.name, tile.x, tile.y)
    }

    /// Mesh resource name
    pub fn mesh_name(&self) -> String {
        format!("{}.mesh", self.mesh)
    }
}

/// Room shared between simulation and render threads
pub type SharedRoom = Shared<Room>;

/// Trap shared between simulation and render threads
pub type SharedTrap = Shared<Trap>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TileType;

    #[test]
    fn test_piece_names_include_tile_coordinates() {
        let tile = Tile::new(4, 7, TileType::Claimed, 0.0);
        let room = Room::new("Quarters1", "Quarters", 2);
        let trap = Trap::new("Cannon3", "Cannon");

        assert_eq!(room.entity_name(&tile), "Quarters1_4_7");
        assert_eq!(room.mesh_name(), "Quarters.mesh");
        assert_eq!(trap.entity_name(&tile), "Trap_Cannon3_tile_4_7");
    }
}
