//! Floor objects
//!
//! Items only matter to this crate as far as area effects can break,
//! burn, or scatter them, so the model is a thin floor-stack entry
//! rather than a full inventory system.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::dungeon::Position;

/// Unique identifier for object instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    pub const NONE: ObjectId = ObjectId(0);

    pub fn next(self) -> Self {
        ObjectId(self.0 + 1)
    }
}

/// Potion varieties
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum PotionKind {
    #[default]
    Healing = 0,
    Poison = 1,
    StrongPoison = 2,
    Degeneration = 3,
}

impl PotionKind {
    /// Fuel contributed to a fire cloud when the potion combusts.
    /// Zero means the potion is not flammable.
    pub const fn ignite_strength(self) -> i32 {
        match self {
            PotionKind::Healing => 0,
            PotionKind::Poison => 10,
            PotionKind::StrongPoison => 40,
            PotionKind::Degeneration => 20,
        }
    }
}

/// Remains decay stage
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CorpseKind {
    #[default]
    Body = 0,
    Skeleton = 1,
}

/// What an object is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Potion(PotionKind),
    Corpse(CorpseKind),
    Rock,
    Weapon,
}

impl ObjectKind {
    pub const fn is_potion(self) -> bool {
        matches!(self, ObjectKind::Potion(_))
    }

    pub const fn name(self) -> &'static str {
        match self {
            ObjectKind::Potion(PotionKind::Healing) => "potion of healing",
            ObjectKind::Potion(PotionKind::Poison) => "potion of poison",
            ObjectKind::Potion(PotionKind::StrongPoison) => "potion of strong poison",
            ObjectKind::Potion(PotionKind::Degeneration) => "potion of degeneration",
            ObjectKind::Corpse(CorpseKind::Body) => "corpse",
            ObjectKind::Corpse(CorpseKind::Skeleton) => "skeleton",
            ObjectKind::Rock => "rock",
            ObjectKind::Weapon => "weapon",
        }
    }
}

/// Object instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    /// Unique identifier
    pub id: ObjectId,

    /// What it is
    pub kind: ObjectKind,

    /// Position on the floor
    pub pos: Position,

    /// Quantity (for stackable items)
    pub quantity: i32,
}

impl Object {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::NONE,
            kind,
            pos: Position::new(0, 0),
            quantity: 1,
        }
    }

    pub fn potion(kind: PotionKind) -> Self {
        Self::new(ObjectKind::Potion(kind))
    }

    pub fn corpse(kind: CorpseKind) -> Self {
        Self::new(ObjectKind::Corpse(kind))
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}
