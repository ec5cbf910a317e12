//! Combat primitives shared by every effect

mod damage;

pub use damage::{
    DamageSpec, DamageType, Dice, Resists, adjust_damage, adjust_for_resistance, calc_dice,
};
