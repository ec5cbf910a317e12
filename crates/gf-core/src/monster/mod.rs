//! Monsters: species data and live instances

mod monst;
mod species;

pub use monst::{Monster, MonsterId, MonsterStatus, StoneState};
pub use species::{MAGIC_IMMUNE, Material, MonsterKind, SpeciesData, SpeciesFlags};
