//! Map tiles

use crate::foundation::collections::Shared;
use crate::scene::NodeId;
use std::fmt;

/// Terrain type of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileType {
    /// Diggable earth
    Dirt,
    /// Diggable earth containing gold
    Gold,
    /// Impassable rock
    Rock,
    /// Shallow water
    Water,
    /// Lava, passable only when flying
    Lava,
    /// Floor claimed by a player
    Claimed,
}

impl TileType {
    /// Name used in mesh resources
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dirt => "Dirt",
            Self::Gold => "Gold",
            Self::Rock => "Rock",
            Self::Water => "Water",
            Self::Lava => "Lava",
            Self::Claimed => "Claimed",
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single map cell
#[derive(Debug, Clone)]
pub struct Tile {
    /// Unique name, also the scene entity name
    pub name: String,
    /// Map column
    pub x: i32,
    /// Map row
    pub y: i32,
    /// Terrain type
    pub tile_type: TileType,
    /// How full the tile is, 0.0 (dug out) to 100.0 (solid)
    pub fullness: f64,
    /// Mesh roll in degrees
    pub rotation: f32,
    /// Team colour index applied to the mesh, 0 when uncoloured
    pub color: u32,
    /// Node the tile's own node belongs under when shown
    pub owning_node: Option<NodeId>,
    /// Parent of the tile's node as last recorded by the render thread
    pub parent_node: Option<NodeId>,
}

impl Tile {
    /// Create a tile at map coordinates
    pub fn new(x: i32, y: i32, tile_type: TileType, fullness: f64) -> Self {
        Self {
            name: format!("Tile_{x}_{y}"),
            x,
            y,
            tile_type,
            fullness: fullness.clamp(0.0, 100.0),
            rotation: 0.0,
            color: 0,
            owning_node: None,
            parent_node: None,
        }
    }

    /// Name of the scene node carrying this tile's mesh
    pub fn node_name(&self) -> String {
        format!("{}_node", self.name)
    }

    /// Fullness bucket used to pick the mesh
    pub fn fullness_mesh_number(&self) -> u32 {
        match self.fullness {
            f if f <= 0.0 => 0,
            f if f <= 25.0 => 25,
            f if f <= 50.0 => 50,
            f if f <= 75.0 => 75,
            _ => 100,
        }
    }

    /// Mesh resource for the tile's type and fullness
    pub fn mesh_name(&self) -> String {
        let postfix = if self.fullness_mesh_number() > 0 { "11111111" } else { "00000000" };
        format!("{}_{postfix}.mesh", self.tile_type)
    }
}

/// Tile shared between simulation and render threads
pub type SharedTile = Shared<Tile>;
