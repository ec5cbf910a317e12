//! Candidate enumeration and single-shot area dispatch
//!
//! Enumeration resolves cells to candidates fresh each call and never
//! mutates anything; the `apply_*` drivers walk cells in enumeration
//! order, finishing each cell before visiting the next so later
//! lookups see earlier destructions.

use crate::dungeon::{Level, Position, TerrainKind};
use crate::monster::MonsterId;
use crate::object::ObjectId;
use crate::rng::GameRng;

use super::EffectContext;

/// What occupies an enumerated cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupant {
    Monster(MonsterId),
    Player,
    /// A non-empty item stack, topmost first
    Items(Vec<ObjectId>),
    /// A terrain feature other than plain floor
    Feature(TerrainKind),
    /// Plain floor with nothing on it
    Nothing,
}

/// One enumerated cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub pos: Position,
    pub occupant: Occupant,
}

impl EffectContext<'_> {
    /// Resolve what occupies a cell right now
    ///
    /// Monsters shadow the player, the player shadows items, items
    /// shadow the terrain feature beneath them.
    pub fn candidate_at(&self, pos: Position) -> Candidate {
        let occupant = if let Some(mon) = self.level.monster_at(pos) {
            Occupant::Monster(mon.id)
        } else if self.you.pos == pos {
            Occupant::Player
        } else {
            let items = self.level.object_ids_at(pos);
            if !items.is_empty() {
                Occupant::Items(items)
            } else {
                match self.level.terrain_at(pos) {
                    TerrainKind::Floor => Occupant::Nothing,
                    feature => Occupant::Feature(feature),
                }
            }
        };
        Candidate { pos, occupant }
    }
}

/// Every in-bounds cell within Chebyshev `radius` of `origin`,
/// resolved to candidates
pub fn candidates_within_radius(
    ctx: &EffectContext,
    origin: Position,
    radius: i32,
) -> Vec<Candidate> {
    ctx.level
        .cells_within_radius(origin, radius)
        .into_iter()
        .map(|pos| ctx.candidate_at(pos))
        .collect()
}

/// Every currently visible cell, resolved to candidates
pub fn visible_candidates(ctx: &EffectContext) -> Vec<Candidate> {
    ctx.level
        .visible_cells()
        .into_iter()
        .map(|pos| ctx.candidate_at(pos))
        .collect()
}

/// Draw up to `count` distinct in-bounds cells within `radius` of
/// `origin` by reservoir sampling, optionally excluding the origin
/// cell itself
///
/// Used for pseudo-random bolt scatter; empty cells are fair picks.
pub fn random_cells_within(
    level: &Level,
    origin: Position,
    radius: i32,
    exclude_center: bool,
    count: usize,
    rng: &mut GameRng,
) -> Vec<Position> {
    if count == 0 {
        return Vec::new();
    }

    let mut picked: Vec<Position> = Vec::with_capacity(count);
    let mut seen: i32 = 0;

    for pos in level.cells_within_radius(origin, radius) {
        if exclude_center && pos == origin {
            continue;
        }
        seen += 1;
        if picked.len() < count {
            picked.push(pos);
        } else if (rng.rn2(seen) as usize) < count {
            let slot = rng.rn2(count as i32) as usize;
            picked[slot] = pos;
        }
    }

    picked
}

/// Apply a per-cell effect to every cell within `radius` of `origin`
///
/// Returns the sum of the per-cell results.
pub fn apply_area_within_radius<F>(
    ctx: &mut EffectContext,
    origin: Position,
    radius: i32,
    mut cell_fn: F,
) -> i32
where
    F: FnMut(&mut EffectContext, Position) -> i32,
{
    let cells = ctx.level.cells_within_radius(origin, radius);
    let mut total = 0;
    for pos in cells {
        total += cell_fn(ctx, pos);
    }
    total
}

/// Apply a per-cell effect to every currently visible cell
pub fn apply_area_visible<F>(ctx: &mut EffectContext, mut cell_fn: F) -> i32
where
    F: FnMut(&mut EffectContext, Position) -> i32,
{
    let cells = ctx.level.visible_cells();
    let mut total = 0;
    for pos in cells {
        total += cell_fn(ctx, pos);
    }
    total
}

/// Apply a per-cell effect to the in-bounds cells adjacent to `origin`
pub fn apply_area_around_square<F>(ctx: &mut EffectContext, origin: Position, mut cell_fn: F) -> i32
where
    F: FnMut(&mut EffectContext, Position) -> i32,
{
    let cells = ctx.level.cells_within_radius(origin, 1);
    let mut total = 0;
    for pos in cells {
        if pos == origin {
            continue;
        }
        total += cell_fn(ctx, pos);
    }
    total
}

/// Apply a per-cell effect to up to `count` randomly drawn cells
/// adjacent to `origin`
pub fn apply_random_around_square<F>(
    ctx: &mut EffectContext,
    origin: Position,
    exclude_center: bool,
    count: usize,
    mut cell_fn: F,
) -> i32
where
    F: FnMut(&mut EffectContext, Position) -> i32,
{
    let picks = random_cells_within(ctx.level, origin, 1, exclude_center, count, ctx.rng);
    let mut total = 0;
    for pos in picks {
        total += cell_fn(ctx, pos);
    }
    total
}
