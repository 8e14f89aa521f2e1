//! Players and their seats

use crate::foundation::collections::Shared;
use crate::world::SharedCreature;

/// A seat at the table: team and colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    /// Team the seat plays for
    pub team_id: u32,
    /// Colour index used to tint claimed tiles and creatures
    pub color: u32,
}

/// A connected player
#[derive(Debug, Clone)]
pub struct Player {
    /// Display name
    pub nick: String,
    /// Seat the player occupies
    pub seat: Seat,
    /// Creatures currently held in the player's hand, in pick-up order
    pub creatures_in_hand: Vec<SharedCreature>,
}

impl Player {
    /// Create a player at a seat
    pub fn new(nick: impl Into<String>, seat: Seat) -> Self {
        Self {
            nick: nick.into(),
            seat,
            creatures_in_hand: Vec::new(),
        }
    }

    /// Colour of the player's seat
    pub const fn color(&self) -> u32 {
        self.seat.color
    }
}

/// Player shared between simulation and render threads
pub type SharedPlayer = Shared<Player>;
