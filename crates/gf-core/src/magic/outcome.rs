//! Outcome classification tables
//!
//! Pure functions from target category and ambient power to damage
//! shape. Individual kinds override their material group; the group
//! rules catch the rest. Nothing here draws randomness or touches game
//! state; chance gates are carried as data and rolled by the caster.

use crate::combat::{DamageType, Dice};
use crate::dungeon::TerrainKind;
use crate::monster::{Material, Monster, MonsterKind, StoneState};

// ==================== brittle sweep ====================

/// Damage dice for one body caught in a brittle sweep.
///
/// Just because a name says ice, rock, or iron doesn't mean the body
/// is actually made of the substance, so the kind overrides come
/// first. Rolled damage is reduced by `rn2(ac)` and clamped at zero
/// by the caller.
pub fn shatter_dice(mon: &Monster, power: i32) -> Dice {
    let size = 5 + power / 3;

    let num = match mon.kind {
        // 3/2 damage
        MonsterKind::SilverSentinel => 4,

        // double damage
        MonsterKind::CursedSkull
        | MonsterKind::ClayGolem
        | MonsterKind::StoneGolem
        | MonsterKind::IronGolem
        | MonsterKind::CrystalGolem
        | MonsterKind::AmberSentinel
        | MonsterKind::AnimatedStatue
        | MonsterKind::EarthElemental
        | MonsterKind::GraniteGargoyle => 6,

        // soft earth creatures, airborne or not; sensitive to this
        MonsterKind::DancingBlade
        | MonsterKind::MoltenGargoyle
        | MonsterKind::QuicksilverDrake => 2,

        _ => {
            if mon.material() == Material::Gelatinous {
                return Dice::new(1, size / 2);
            }

            if mon.material() == Material::Vaporous {
                0
            } else if mon.flies() {
                1
            } else if mon.material() == Material::Icy {
                4
            } else if mon.material() == Material::Skeletal {
                6
            } else {
                match mon.stone {
                    StoneState::Petrifying => 4,
                    StoneState::Petrified => 6,
                    StoneState::Normal => 3,
                }
            }
        }
    };

    Dice::new(num, size)
}

/// Percent chance that a brittle sweep brings down this feature
pub fn shatter_wall_chance(terrain: TerrainKind, power: i32) -> i32 {
    match terrain {
        TerrainKind::SecretDoor | TerrainKind::ClosedDoor | TerrainKind::OpenDoor => 100,
        TerrainKind::MetalWall => power / 10,
        TerrainKind::Idol | TerrainKind::GraniteStatue => 50,
        TerrainKind::StoneWall => power / 6,
        TerrainKind::RockWall | TerrainKind::SlimeWall => power / 4,
        TerrainKind::CrystalWall => 50,
        _ => 0,
    }
}

// ==================== fragmentation ====================

/// Blast shape for a detonating fragmentation target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragDetonation {
    pub radius: i32,
    pub flavor: DamageType,
}

/// How a struck body takes the direct fragmentation hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragHit {
    /// Roll the row's dice as disintegration
    Normal,
    /// Rolled damage is doubled; at power 50 and up the body shatters
    /// outright 1 time in 10
    Doubled,
    /// Bursts with its own bone message; blown apart outright with
    /// probability `power/5`-in-50, leaving a 4-die blast
    Skeletal,
    /// Shudders and splinters without detonating
    Shudder,
    /// Not susceptible: a token disintegration die, then the terrain
    /// beneath resolves
    Unsusceptible,
}

/// Fragmentation row for a struck body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragMonsterRow {
    pub dice_num: i32,
    pub hit: FragHit,
    /// Extra blast dice when the direct hit destroys the body
    pub bonus_if_died: i32,
    pub detonation: Option<FragDetonation>,
}

const FRAG: FragDetonation = FragDetonation {
    radius: 1,
    flavor: DamageType::Fragment,
};

const BIG_FRAG: FragDetonation = FragDetonation {
    radius: 2,
    flavor: DamageType::Fragment,
};

/// Classify a body for fragmentation
pub fn fragment_monster_row(mon: &Monster) -> FragMonsterRow {
    match mon.kind {
        MonsterKind::WoodGolem => FragMonsterRow {
            dice_num: 2,
            hit: FragHit::Shudder,
            bonus_if_died: 0,
            detonation: None,
        },

        MonsterKind::IronGolem | MonsterKind::MetalGargoyle => FragMonsterRow {
            dice_num: 4,
            hit: FragHit::Normal,
            bonus_if_died: 2,
            detonation: Some(FRAG),
        },

        // baked clay, not wet loam
        MonsterKind::ClayGolem
        | MonsterKind::StoneGolem
        | MonsterKind::EarthElemental
        | MonsterKind::GraniteGargoyle
        | MonsterKind::AnimatedStatue => FragMonsterRow {
            dice_num: 3,
            hit: FragHit::Normal,
            bonus_if_died: 1,
            detonation: Some(BIG_FRAG),
        },

        MonsterKind::SilverSentinel => FragMonsterRow {
            dice_num: 3,
            hit: FragHit::Doubled,
            bonus_if_died: 2,
            detonation: Some(BIG_FRAG),
        },

        MonsterKind::AmberSentinel => FragMonsterRow {
            dice_num: 6,
            hit: FragHit::Doubled,
            bonus_if_died: 2,
            detonation: Some(BIG_FRAG),
        },

        MonsterKind::CrystalGolem => FragMonsterRow {
            dice_num: 4,
            hit: FragHit::Normal,
            bonus_if_died: 2,
            detonation: Some(BIG_FRAG),
        },

        _ => {
            if mon.material() == Material::Icy {
                FragMonsterRow {
                    dice_num: 2,
                    hit: FragHit::Normal,
                    bonus_if_died: 1,
                    detonation: Some(FragDetonation {
                        radius: 1,
                        flavor: DamageType::Ice,
                    }),
                }
            } else if mon.material() == Material::Skeletal {
                FragMonsterRow {
                    dice_num: 2,
                    hit: FragHit::Skeletal,
                    bonus_if_died: 2,
                    detonation: Some(FRAG),
                }
            } else {
                match mon.stone {
                    StoneState::Petrifying => FragMonsterRow {
                        dice_num: 2,
                        hit: FragHit::Normal,
                        bonus_if_died: 1,
                        detonation: Some(FRAG),
                    },
                    StoneState::Petrified => FragMonsterRow {
                        dice_num: 3,
                        hit: FragHit::Normal,
                        bonus_if_died: 1,
                        detonation: Some(BIG_FRAG),
                    },
                    StoneState::Normal => FragMonsterRow {
                        dice_num: 1,
                        hit: FragHit::Unsusceptible,
                        bonus_if_died: 0,
                        detonation: None,
                    },
                }
            }
        }
    }
}

/// When a fragmented feature converts to floor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragConvert {
    Never,
    Always,
    /// power 40 and up, 1 in 3
    SoftRock,
    /// power 60 and up, 1 in 10
    HardStone,
    /// power 80 and up, `power/5` in 500
    Metal,
    /// coin-flip; a second flip widens the blast
    Crystal,
}

/// Fragmentation row for a terrain feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragTerrainRow {
    /// Subject of the "shatters!" message; None blows up without one
    pub feature: Option<&'static str>,
    /// Whether this feature detonates at all
    pub blast: bool,
    pub dice_num: i32,
    pub radius: i32,
    /// A holed blast leaves the center cell untouched; doors and traps
    /// blast solid so bodies standing on them are caught
    pub hole: bool,
    pub convert: FragConvert,
    pub bonus_if_converted: i32,
    pub radius_if_converted: i32,
    /// Message subject when the feature is simply too hard
    pub hard: Option<&'static str>,
}

impl FragTerrainRow {
    /// A feature nothing happens to
    const fn inert(hard: Option<&'static str>) -> Self {
        Self {
            feature: None,
            blast: false,
            dice_num: 0,
            radius: 1,
            hole: true,
            convert: FragConvert::Never,
            bonus_if_converted: 0,
            radius_if_converted: 1,
            hard,
        }
    }
}

/// Classify a terrain feature for fragmentation
pub fn fragment_terrain_row(terrain: TerrainKind) -> FragTerrainRow {
    match terrain {
        // a hidden door fragments like the rock it pretends to be
        TerrainKind::RockWall | TerrainKind::SecretDoor => FragTerrainRow {
            feature: Some("wall"),
            blast: true,
            dice_num: 3,
            radius: 1,
            hole: true,
            convert: FragConvert::SoftRock,
            bonus_if_converted: 0,
            radius_if_converted: 2,
            hard: None,
        },

        TerrainKind::StoneWall => FragTerrainRow {
            feature: Some("wall"),
            blast: true,
            dice_num: 3,
            radius: 1,
            hole: true,
            convert: FragConvert::HardStone,
            bonus_if_converted: 0,
            radius_if_converted: 2,
            hard: None,
        },

        TerrainKind::Idol => FragTerrainRow {
            feature: Some("stone idol"),
            blast: true,
            dice_num: 3,
            radius: 1,
            hole: true,
            convert: FragConvert::Always,
            bonus_if_converted: 0,
            radius_if_converted: 2,
            hard: None,
        },

        // normal rock, big explosion
        TerrainKind::GraniteStatue => FragTerrainRow {
            feature: Some("statue"),
            blast: true,
            dice_num: 3,
            radius: 1,
            hole: true,
            convert: FragConvert::Always,
            bonus_if_converted: 0,
            radius_if_converted: 2,
            hard: None,
        },

        // small but nasty
        TerrainKind::MetalWall => FragTerrainRow {
            feature: Some("metal wall"),
            blast: true,
            dice_num: 4,
            radius: 1,
            hole: true,
            convert: FragConvert::Metal,
            bonus_if_converted: 2,
            radius_if_converted: 1,
            hard: None,
        },

        // large and nasty
        TerrainKind::CrystalWall => FragTerrainRow {
            feature: Some("crystal wall"),
            blast: true,
            dice_num: 5,
            radius: 2,
            hole: true,
            convert: FragConvert::Crystal,
            bonus_if_converted: 0,
            radius_if_converted: 3,
            hard: None,
        },

        TerrainKind::MechanicalTrap => FragTerrainRow {
            feature: Some("trap"),
            blast: true,
            dice_num: 2,
            radius: 1,
            hole: false,
            convert: FragConvert::Always,
            bonus_if_converted: 0,
            radius_if_converted: 1,
            hard: None,
        },

        // an undiscovered trap appears to explode from the bare floor
        TerrainKind::HiddenTrap => FragTerrainRow {
            feature: Some("floor"),
            blast: true,
            dice_num: 2,
            radius: 1,
            hole: false,
            convert: FragConvert::Always,
            bonus_if_converted: 0,
            radius_if_converted: 1,
            hard: None,
        },

        // doors always blow up
        TerrainKind::OpenDoor | TerrainKind::ClosedDoor => FragTerrainRow {
            feature: None,
            blast: true,
            dice_num: 2,
            radius: 1,
            hole: false,
            convert: FragConvert::Always,
            bonus_if_converted: 0,
            radius_if_converted: 1,
            hard: None,
        },

        // arches never do
        TerrainKind::StoneArch => FragTerrainRow {
            feature: None,
            blast: true,
            dice_num: 2,
            radius: 1,
            hole: false,
            convert: FragConvert::Never,
            bonus_if_converted: 0,
            radius_if_converted: 1,
            hard: None,
        },

        TerrainKind::PermaWall => FragTerrainRow::inert(Some("That wall")),
        TerrainKind::Floor => FragTerrainRow::inert(Some("The dungeon floor")),

        TerrainKind::SlimeWall | TerrainKind::Water | TerrainKind::Lava => {
            FragTerrainRow::inert(None)
        }
    }
}

// ==================== poison ignition ====================

/// Dice for burning the poison inside a body: three for a venomous
/// nature, one more per degree of poison already in the blood
pub fn ignite_poison_dice(venomous: bool, poison: u8, power: i32) -> Dice {
    let mut num = i32::from(poison);
    if venomous {
        num += 3;
    }
    Dice::new(num, 5 + power / 7)
}
