//! Monster instances

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::{MAGIC_IMMUNE, Material, MonsterKind, SpeciesFlags};
use crate::combat::{DamageType, Resists};
use crate::dungeon::Position;
use crate::rng::GameRng;

/// Unique identifier for monster instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

impl MonsterId {
    pub const NONE: MonsterId = MonsterId(0);
}

/// Progress of petrification
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum StoneState {
    #[default]
    Normal = 0,
    /// Turning to stone, still moving
    Petrifying = 1,
    /// Solid stone
    Petrified = 2,
}

/// Transient monster condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MonsterStatus {
    /// Invisible; unseen by sight-driven effects
    pub invisible: bool,

    /// Submerged below the surface
    pub submerged: bool,

    /// Protected; effect application is vetoed
    pub warded: bool,

    /// Slowed
    pub slowed: bool,
}

/// A monster on the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub kind: MonsterKind,
    pub pos: Position,
    pub hp: i32,
    pub hp_max: i32,
    pub ac: i32,
    pub resists: Resists,
    pub status: MonsterStatus,
    /// Venom in the body; drives poison damage over time
    pub poison: u8,
    pub stone: StoneState,
}

impl Monster {
    /// Create a monster of the given kind from its species template
    pub fn spawn(kind: MonsterKind, pos: Position) -> Self {
        let data = kind.data();
        Self {
            id: MonsterId::NONE,
            kind,
            pos,
            hp: data.hp,
            hp_max: data.hp,
            ac: data.ac,
            resists: data.resists,
            status: MonsterStatus::default(),
            poison: 0,
            stone: StoneState::Normal,
        }
    }

    /// Species name
    pub fn name(&self) -> &'static str {
        self.kind.data().name
    }

    /// What this body is made of
    pub fn material(&self) -> Material {
        self.kind.data().material
    }

    pub fn alive(&self) -> bool {
        self.hp > 0
    }

    pub fn flies(&self) -> bool {
        self.kind.data().flags.contains(SpeciesFlags::FLIES)
    }

    pub fn cold_blooded(&self) -> bool {
        self.kind.data().flags.contains(SpeciesFlags::COLD_BLOOD)
    }

    pub fn venomous(&self) -> bool {
        self.kind.data().flags.contains(SpeciesFlags::VENOMOUS)
    }

    pub fn resists_blink(&self) -> bool {
        self.kind.data().flags.contains(SpeciesFlags::BLINK_RESIST)
    }

    /// Signed resistance level against a damage flavor
    pub fn resist_level(&self, flavor: DamageType) -> i8 {
        self.resists.level(flavor)
    }

    /// Willpower check against a hostile enchantment of the given power
    ///
    /// Returns true if the monster shrugs it off.
    pub fn check_res_magic(&self, power: i32, rng: &mut GameRng) -> bool {
        let magic_res = self.kind.data().magic_res;
        if magic_res >= MAGIC_IMMUNE {
            return true;
        }
        let chance = 100 + magic_res - power;
        rng.rn2(100) + rng.rn2(101) < chance
    }
}
