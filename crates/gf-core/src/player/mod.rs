//! The player

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::combat::Resists;
use crate::consts::{COLNO, ROWNO};
use crate::dungeon::Position;

/// Bodily transformation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Shape {
    #[default]
    Normal = 0,
    /// Living statue
    Stone = 1,
    /// Body of ice
    Ice = 2,
    /// Scythe-like blade hands
    Blades = 3,
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct You {
    pub pos: Position,
    pub hp: i32,
    pub hp_max: i32,
    pub resists: Resists,
    pub shape: Shape,

    /// Airborne by flight or levitation
    pub airborne: bool,

    pub invisible: bool,

    /// Poisonous body; burns when poison is ignited
    pub venomous: bool,

    /// Poison in the system
    pub poison: u8,
}

impl Default for You {
    fn default() -> Self {
        Self {
            pos: Position::new((COLNO / 2) as i8, (ROWNO / 2) as i8),
            hp: 50,
            hp_max: 50,
            resists: Resists::NONE,
            shape: Shape::Normal,
            airborne: false,
            invisible: false,
            venomous: false,
            poison: 0,
        }
    }
}

impl You {
    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }

    pub fn alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_poisoned(&self) -> bool {
        self.poison > 0
    }
}
