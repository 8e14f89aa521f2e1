//! Game entities the render pipeline reads
//!
//! Only the accessors the dispatcher needs live here: names, positions, team
//! colours, and the scene bookkeeping the dispatcher records back onto them.
//! Gameplay logic belongs to the simulation layer.

mod tile;
mod player;
mod creature;
mod room;
mod map_light;
mod missile;

pub use tile::{Tile, TileType, SharedTile};
pub use player::{Player, Seat, SharedPlayer};
pub use creature::{Creature, SharedCreature};
pub use room::{Room, Trap, SharedRoom, SharedTrap};
pub use map_light::{MapLight, SharedMapLight};
pub use missile::{MissileObject, SharedMissile};
