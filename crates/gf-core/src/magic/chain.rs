//! Chain target selection and propagation
//!
//! Two propagation styles share this module: the distance-triggered
//! arc ([`Chain`]) that hops to a selected body and decays by a fixed
//! random step, and the area-triggered arc
//! ([`propagate_discharge_arc`]) that re-arcs to a random neighbouring
//! cell while a power-scaled probability gate holds.

use crate::consts::{ARC_DECAY_BASE, ARC_DECAY_RAND, ARC_RANGE};
use crate::dungeon::{Level, Position};
use crate::monster::MonsterId;
use crate::player::You;
use crate::rng::GameRng;

use super::area::random_cells_within;
use super::{CastResult, EffectContext};

/// Who launched an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agent {
    Player,
    Monster(MonsterId),
}

impl Agent {
    /// Current position of the agent, if it is still on the level
    pub fn pos(self, level: &Level, you: &You) -> Option<Position> {
        match self {
            Agent::Player => Some(you.pos),
            Agent::Monster(id) => level.monster(id).map(|m| m.pos),
        }
    }
}

/// Select the next hop for an arc leaving `source`.
///
/// Usually the nearest body wins, but not reliably: distances are
/// jittered by one, a strictly closer candidate is ignored 1 time in
/// 10, and ties are broken by a running reservoir so every tied body
/// ends up equally likely. The player competes last under the same
/// rules. Bodies on the source cell itself are never eligible.
pub fn select_chain_target(
    level: &Level,
    you: &You,
    source: Position,
    rng: &mut GameRng,
) -> Option<Position> {
    // (range - 1) because the jitter below can shift a distance by one
    let mut min_dist = ARC_RANGE - 1;
    let mut target: Option<Position> = None;
    let mut count = 0;

    for monster in &level.monsters {
        if !monster.alive() {
            continue;
        }

        let mut dist = source.distance(monster.pos);

        // the source of this arc
        if dist == 0 {
            continue;
        }

        // arcs don't care about a couple of feet
        dist += rng.rn2(3) - 1;

        // always ignore bodies further than the current target
        if dist > min_dist {
            continue;
        }

        if !level.has_line_of_sight(source, monster.pos) {
            continue;
        }

        count += 1;

        if dist < min_dist {
            // switch to hunting closer targets, but not always
            if !rng.one_in(10) {
                min_dist = dist;
                target = Some(monster.pos);
                count = 0;
            }
        } else if target.is_none() || rng.one_in(count) {
            // either the first target, or a fresh reservoir pick at
            // the current minimum
            target = Some(monster.pos);
        }
    }

    // now check whether the player draws the arc
    let dist = source.distance(you.pos);
    if dist != 0 {
        let dist = dist + rng.rn2(3) - 1;
        if (target.is_none() || dist < min_dist || (dist == min_dist && rng.one_in(count + 1)))
            && level.has_line_of_sight(source, you.pos)
        {
            target = Some(you.pos);
        }
    }

    target
}

/// Loop state for a distance-triggered chain
///
/// Owns the origin and the remaining power; each accepted hop moves
/// the origin to the struck cell and decays power by
/// `ARC_DECAY_BASE + rn2(ARC_DECAY_RAND)`, so the loop always
/// terminates.
#[derive(Debug, Clone, Copy)]
pub struct Chain {
    pub source: Position,
    pub power: i32,
    pub hops: u32,
}

impl Chain {
    pub fn new(source: Position, power: i32) -> Self {
        Self {
            source,
            power,
            hops: 0,
        }
    }

    pub const fn exhausted(&self) -> bool {
        self.power <= 0
    }

    /// Select the next hop from the current source
    pub fn select(&self, level: &Level, you: &You, rng: &mut GameRng) -> Option<Position> {
        select_chain_target(level, you, self.source, rng)
    }

    /// Move the origin to the struck cell and decay power
    pub fn advance(&mut self, target: Position, rng: &mut GameRng) {
        self.power -= ARC_DECAY_BASE + rng.rn2(ARC_DECAY_RAND);
        self.source = target;
        self.hops += 1;
    }
}

/// What one discharge strike did at a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcStrike {
    /// The arc hit a conductive body for this much damage
    Hit(i32),
    /// The arc found nothing conductive and dies here
    Dead,
}

/// Drive one area-triggered arc from `start`.
///
/// The strike callback resolves one cell; after each hit the arc
/// continues while the probability gate holds (2-in-3 at power 10 and
/// up, 1-in-10 down to power 3), its power divided by 2 or 3 per
/// re-arc, jumping to a random neighbouring cell. An arc that jumps
/// onto nothing conductive grounds out silently.
///
/// Returns the damage total for the whole arc.
pub fn propagate_discharge_arc<F>(
    ctx: &mut EffectContext,
    result: &mut CastResult,
    start: Position,
    mut power: i32,
    mut strike: F,
) -> i32
where
    F: FnMut(&mut EffectContext, &mut CastResult, Position, i32) -> ArcStrike,
{
    let mut total = 0;
    let mut pos = start;

    loop {
        let dealt = match strike(ctx, result, pos, power) {
            ArcStrike::Dead => break,
            ArcStrike::Hit(dam) => dam,
        };
        total += dealt;

        let arcs =
            (power >= 10 && !ctx.rng.one_in(3)) || (power >= 3 && ctx.rng.one_in(10));
        if !arcs {
            if dealt > 0 {
                result.msg("The lightning grounds out.");
            }
            break;
        }

        result.msg("The lightning arcs!");
        power /= if ctx.rng.coinflip() { 2 } else { 3 };

        let picks = random_cells_within(ctx.level, pos, 1, true, 1, ctx.rng);
        let Some(&next) = picks.first() else {
            break;
        };
        pos = next;
    }

    total
}
