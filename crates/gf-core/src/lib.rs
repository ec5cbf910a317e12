//! gf-core: area-effect and chain-propagation engine for Gridfire
//!
//! All game logic with no I/O dependencies. A cast is a pure function
//! of the level, the player, and a seeded RNG; everything it did comes
//! back in a [`magic::CastResult`], so whole encounters replay from a
//! seed.

pub mod combat;
pub mod dungeon;
pub mod magic;
pub mod monster;
pub mod object;
pub mod player;

mod consts;
mod rng;

pub use consts::*;
pub use rng::GameRng;
