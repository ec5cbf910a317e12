//! Damage flavors, dice, and resistance adjustment

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::rng::GameRng;

/// Damage flavor - what kind of damage is dealt
///
/// Used both to roll damage and to look up the target's resistance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum DamageType {
    #[default]
    Physical = 0,

    Fire = 1,

    Cold = 2,

    /// Jagged ice; checked against cold resistance one step weaker
    Ice = 3,

    Electricity = 4,

    Poison = 5,

    /// Flying debris from shattered matter
    Fragment = 6,

    /// Matter unbinding; nothing resists it
    Disintegration = 7,
}

/// Damage dice: `count` rolls of `1..=size`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {
    pub count: i32,
    pub size: i32,
}

impl Dice {
    pub const fn new(count: i32, size: i32) -> Self {
        Self { count, size }
    }

    /// Roll the dice; zero or negative count or size rolls 0
    pub fn roll(&self, rng: &mut GameRng) -> i32 {
        rng.dice(self.count, self.size)
    }
}

/// A resolved damage formula: dice plus the flavor for resistance lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageSpec {
    pub dice: Dice,
    pub flavor: DamageType,
}

impl DamageSpec {
    pub const fn new(count: i32, size: i32, flavor: DamageType) -> Self {
        Self {
            dice: Dice::new(count, size),
            flavor,
        }
    }
}

/// Signed elemental resistance levels
///
/// 0 is unprotected, 1 resistant (half damage), 2 strongly resistant
/// (quarter), 3 and up immune. Negative levels are vulnerabilities and
/// amplify damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resists {
    pub fire: i8,
    pub cold: i8,
    pub elec: i8,
    pub poison: i8,
}

impl Resists {
    pub const NONE: Resists = Resists::new(0, 0, 0, 0);

    pub const fn new(fire: i8, cold: i8, elec: i8, poison: i8) -> Self {
        Self {
            fire,
            cold,
            elec,
            poison,
        }
    }

    /// Resistance level against a damage flavor
    pub const fn level(&self, flavor: DamageType) -> i8 {
        match flavor {
            DamageType::Fire => self.fire,
            DamageType::Cold => self.cold,
            // Ice is part frozen matter, part impact; resistance helps less
            DamageType::Ice => {
                if self.cold > 0 {
                    self.cold - 1
                } else {
                    self.cold
                }
            }
            DamageType::Electricity => self.elec,
            DamageType::Poison => self.poison,
            DamageType::Physical | DamageType::Fragment | DamageType::Disintegration => 0,
        }
    }
}

/// Split a damage budget across `count` dice.
///
/// The die size is the budget divided by the count, rounded up with
/// probability proportional to the remainder so the expected maximum
/// stays on budget. Degenerate budgets collapse to single-die or
/// one-point-dice forms.
pub fn calc_dice(count: i32, damage_budget: i32, rng: &mut GameRng) -> Dice {
    if count <= 1 {
        return Dice::new(1, damage_budget);
    }
    if damage_budget <= count {
        return Dice::new(damage_budget, 1);
    }
    let mut size = damage_budget / count;
    if rng.rn2(count) < damage_budget % count {
        size += 1;
    }
    Dice::new(count, size)
}

/// Scale rolled damage by a signed resistance level, clamping at zero
pub fn adjust_for_resistance(damage: i32, level: i8) -> i32 {
    let adjusted = match level {
        l if l >= 3 => 0,
        2 => damage / 4,
        1 => damage / 2,
        0 => damage,
        l => damage * (2 - l as i32) / 2,
    };
    adjusted.max(0)
}

/// Resistance-adjusted damage for a flavored hit
pub fn adjust_damage(damage: i32, flavor: DamageType, resists: &Resists) -> i32 {
    adjust_for_resistance(damage, resists.level(flavor))
}
