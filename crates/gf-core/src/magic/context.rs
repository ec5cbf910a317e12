//! Cast context and result reporting

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::dungeon::Level;
use crate::monster::MonsterId;
use crate::player::You;
use crate::rng::GameRng;

/// Why a cast stopped
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Termination {
    /// Nothing eligible at invocation start; the effect fizzled
    #[default]
    NoInitialTarget = 0,
    /// A chain found no next hop
    Grounded = 1,
    /// Power ran out, or a single-shot sweep ran to completion
    Exhausted = 2,
}

/// Mutable world handle threaded through a cast
///
/// Bundles the level, the player, and the draw source so the engine
/// never touches ambient state. The application layer is the only
/// code that writes through it.
pub struct EffectContext<'a> {
    pub level: &'a mut Level,
    pub you: &'a mut You,
    pub rng: &'a mut GameRng,
}

impl<'a> EffectContext<'a> {
    pub fn new(level: &'a mut Level, you: &'a mut You, rng: &'a mut GameRng) -> Self {
        Self { level, you, rng }
    }
}

/// Per-invocation summary of what a cast did
#[derive(Debug, Clone, Default)]
pub struct CastResult {
    /// Messages to display, in order of occurrence
    pub messages: Vec<String>,

    /// Damage dealt to monsters, summed over every strike
    pub total_damage: i32,

    /// Bodies struck (player included)
    pub targets_hit: i32,

    /// Monsters that died
    pub killed: Vec<MonsterId>,

    /// Floor items destroyed
    pub items_destroyed: i32,

    /// Gas clouds set alight
    pub clouds_ignited: i32,

    /// Cells whose terrain was converted
    pub terrain_changed: i32,

    /// Damage dealt to the player
    pub player_damage: i32,

    pub termination: Termination,
}

impl CastResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn msg(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
    }

    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        self.messages.push(text.into());
        self
    }

    /// True when the cast touched anything at all; distinguishes
    /// "did nothing" from "did something for zero damage"
    pub fn affected_anything(&self) -> bool {
        self.targets_hit > 0
            || self.items_destroyed > 0
            || self.clouds_ignited > 0
            || self.terrain_changed > 0
            || self.player_damage > 0
    }
}
