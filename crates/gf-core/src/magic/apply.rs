//! Effect application layer
//!
//! The only code that writes game state during a cast. Every function
//! takes the [`EffectContext`] and the running [`CastResult`], applies
//! one mutation, and keeps the result's counters in step, so the
//! resolver and selector layers above stay read-only.

use crate::consts::SIGHT_RANGE;
use crate::dungeon::{CloudKind, Position, TerrainKind};
use crate::monster::MonsterId;
use crate::object::ObjectId;

use super::{CastResult, EffectContext};

/// A status effect an application step can land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Slow,
    Poison(u8),
}

/// Deal damage to a monster; returns whether it died.
///
/// A warded body is skipped outright: no damage, no counters, and the
/// surrounding sweep or chain carries on. Every unwarded strike counts
/// as a hit even at zero damage. A destroyed monster is removed from
/// the roster and grid immediately, so later lookups in the same pass
/// no longer see it.
pub fn hurt_monster(
    ctx: &mut EffectContext,
    result: &mut CastResult,
    id: MonsterId,
    damage: i32,
) -> bool {
    let Some(mon) = ctx.level.monster(id) else {
        return false;
    };
    if !mon.alive() || mon.status.warded {
        return false;
    }

    result.targets_hit += 1;
    if damage > 0 {
        result.total_damage += damage;
    }

    let Some(mon) = ctx.level.monster_mut(id) else {
        return false;
    };
    mon.hp -= damage.max(0);

    if mon.hp <= 0 {
        let name = mon.name();
        result.msg(format!("The {name} is killed!"));
        result.killed.push(id);
        ctx.level.remove_monster(id);
        return true;
    }

    false
}

/// Poison the player's blood unless poison resistance blocks it
pub fn poison_player(ctx: &mut EffectContext, degree: u8) {
    if ctx.you.resists.poison > 0 {
        return;
    }
    ctx.you.poison = ctx.you.poison.saturating_add(degree);
}

/// Deal damage to the player; zero or negative damage does nothing
pub fn hurt_player(ctx: &mut EffectContext, result: &mut CastResult, damage: i32) {
    if damage <= 0 {
        return;
    }
    ctx.you.hp = (ctx.you.hp - damage).max(0);
    result.player_damage += damage;
    result.targets_hit += 1;
}

/// Remove an object from the level; returns whether it existed
pub fn destroy_object(ctx: &mut EffectContext, result: &mut CastResult, id: ObjectId) -> bool {
    if ctx.level.remove_object(id).is_some() {
        result.items_destroyed += 1;
        true
    } else {
        false
    }
}

/// Convert the terrain at a cell
pub fn set_terrain(
    ctx: &mut EffectContext,
    result: &mut CastResult,
    pos: Position,
    kind: TerrainKind,
) {
    if !ctx.level.is_valid_pos(pos) {
        return;
    }
    ctx.level.cell_mut(pos).typ = kind;
    result.terrain_changed += 1;
}

/// Land a status effect on a monster; returns whether anything changed
pub fn apply_status(ctx: &mut EffectContext, id: MonsterId, status: Status) -> bool {
    let Some(mon) = ctx.level.monster_mut(id) else {
        return false;
    };
    match status {
        Status::Slow => {
            if mon.status.slowed {
                false
            } else {
                mon.status.slowed = true;
                true
            }
        }
        Status::Poison(degree) => {
            if degree == 0 || mon.resists.poison > 0 {
                false
            } else {
                mon.poison = mon.poison.saturating_add(degree);
                true
            }
        }
    }
}

/// Flush all poison out of a monster's blood
pub fn cure_poison(ctx: &mut EffectContext, id: MonsterId) {
    if let Some(mon) = ctx.level.monster_mut(id) {
        mon.poison = 0;
    }
}

/// Send a monster to a random open cell anywhere on the level.
///
/// Returns false when no open cell exists, leaving the monster where
/// it stands.
pub fn teleport_monster(ctx: &mut EffectContext, result: &mut CastResult, id: MonsterId) -> bool {
    let Some(mon) = ctx.level.monster(id) else {
        return false;
    };
    let name = mon.name();

    match ctx.level.random_open_cell(ctx.rng, ctx.you.pos) {
        Some(to) => {
            result.msg(format!("The {name} suddenly disappears!"));
            ctx.level.move_monster(id, to);
            true
        }
        None => false,
    }
}

/// Short-range translocation: a random open cell within sight range
pub fn blink_monster(ctx: &mut EffectContext, result: &mut CastResult, id: MonsterId) -> bool {
    let Some(mon) = ctx.level.monster(id) else {
        return false;
    };
    let name = mon.name();
    let from = mon.pos;

    match ctx
        .level
        .random_open_cell_near(from, SIGHT_RANGE, ctx.rng, ctx.you.pos)
    {
        Some(to) => {
            result.msg(format!("The {name} blinks!"));
            ctx.level.move_monster(id, to);
            true
        }
        None => false,
    }
}

/// Drop a cloud on a cell, replacing any cloud already there
pub fn spawn_cloud(ctx: &mut EffectContext, pos: Position, kind: CloudKind, decay: i32) {
    ctx.level.place_cloud(pos, kind, decay);
}

/// Set a poisonous cloud alight.
///
/// A stinking cloud burns fast and loses half its remaining life; a
/// poison cloud converts outright. Fire stays fire.
pub fn ignite_cloud(ctx: &mut EffectContext, result: &mut CastResult, pos: Position) -> bool {
    let Some(cloud) = ctx.level.cloud_at_mut(pos) else {
        return false;
    };
    match cloud.kind {
        CloudKind::Stinking => {
            cloud.kind = CloudKind::Fire;
            cloud.decay = (cloud.decay / 2).max(1);
        }
        CloudKind::Poison => {
            cloud.kind = CloudKind::Fire;
        }
        CloudKind::Fire => return false,
    }
    result.clouds_ignited += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Cell, Level};
    use crate::monster::{Monster, MonsterKind};
    use crate::object::{Object, PotionKind};
    use crate::player::You;
    use crate::rng::GameRng;

    fn open_level() -> Level {
        let mut level = Level::new();
        for x in 1..40 {
            for y in 1..20 {
                level.cells[x][y] = Cell::floor();
            }
        }
        level
    }

    #[test]
    fn test_hurt_monster_kills_and_removes() {
        let mut level = open_level();
        let mut you = You::default();
        let mut rng = GameRng::new(42);
        let pos = Position::new(5, 5);
        let id = level.add_monster(Monster::spawn(MonsterKind::Kobold, pos));

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        let mut result = CastResult::new();

        assert!(hurt_monster(&mut ctx, &mut result, id, 100));
        assert_eq!(result.killed, vec![id]);
        assert_eq!(result.targets_hit, 1);
        assert_eq!(result.total_damage, 100);
        assert_eq!(result.messages, vec!["The kobold is killed!"]);
        assert!(level.monster_at(pos).is_none());
    }

    #[test]
    fn test_hurt_monster_survivor_keeps_hp() {
        let mut level = open_level();
        let mut you = You::default();
        let mut rng = GameRng::new(42);
        let id = level.add_monster(Monster::spawn(MonsterKind::IronGolem, Position::new(5, 5)));

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        let mut result = CastResult::new();

        assert!(!hurt_monster(&mut ctx, &mut result, id, 10));
        assert!(result.killed.is_empty());
        let golem = level.monster(id).expect("still alive");
        assert_eq!(golem.hp, golem.hp_max - 10);
    }

    #[test]
    fn test_warded_monster_skipped() {
        let mut level = open_level();
        let mut you = You::default();
        let mut rng = GameRng::new(42);
        let id = level.add_monster(Monster::spawn(MonsterKind::Kobold, Position::new(5, 5)));
        level.monster_mut(id).unwrap().status.warded = true;

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        let mut result = CastResult::new();

        assert!(!hurt_monster(&mut ctx, &mut result, id, 100));
        assert_eq!(result.targets_hit, 0);
        assert_eq!(result.total_damage, 0);
        assert!(level.monster(id).is_some());
    }

    #[test]
    fn test_zero_damage_still_counts_the_target() {
        let mut level = open_level();
        let mut you = You::default();
        let mut rng = GameRng::new(42);
        let id = level.add_monster(Monster::spawn(MonsterKind::Kobold, Position::new(5, 5)));

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        let mut result = CastResult::new();

        assert!(!hurt_monster(&mut ctx, &mut result, id, 0));
        assert_eq!(result.targets_hit, 1);
        assert_eq!(result.total_damage, 0);
        assert!(result.affected_anything());
    }

    #[test]
    fn test_hurt_player() {
        let mut level = open_level();
        let mut you = You::default();
        let mut rng = GameRng::new(42);
        let hp = you.hp;

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        let mut result = CastResult::new();

        hurt_player(&mut ctx, &mut result, 7);
        hurt_player(&mut ctx, &mut result, 0);
        hurt_player(&mut ctx, &mut result, -3);

        assert_eq!(result.player_damage, 7);
        assert_eq!(result.targets_hit, 1);
        assert_eq!(you.hp, hp - 7);
    }

    #[test]
    fn test_hurt_player_clamps_at_zero() {
        let mut level = open_level();
        let mut you = You::default();
        let mut rng = GameRng::new(42);

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        let mut result = CastResult::new();

        hurt_player(&mut ctx, &mut result, 9999);
        assert_eq!(you.hp, 0);
        assert!(!you.alive());
    }

    #[test]
    fn test_destroy_object() {
        let mut level = open_level();
        let mut you = You::default();
        let mut rng = GameRng::new(42);
        let pos = Position::new(5, 5);
        let id = level.add_object(Object::potion(PotionKind::Poison), pos);

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        let mut result = CastResult::new();

        assert!(destroy_object(&mut ctx, &mut result, id));
        assert_eq!(result.items_destroyed, 1);
        assert!(level.objects_at(pos).is_empty());
        // a second destruction of the same id is a no-op
        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        assert!(!destroy_object(&mut ctx, &mut result, id));
        assert_eq!(result.items_destroyed, 1);
    }

    #[test]
    fn test_set_terrain_counts_conversion() {
        let mut level = open_level();
        let mut you = You::default();
        let mut rng = GameRng::new(42);
        let pos = Position::new(3, 3);
        level.cells[3][3] = Cell::of(TerrainKind::RockWall);

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        let mut result = CastResult::new();

        set_terrain(&mut ctx, &mut result, pos, TerrainKind::Floor);
        assert_eq!(level.terrain_at(pos), TerrainKind::Floor);
        assert_eq!(result.terrain_changed, 1);
    }

    #[test]
    fn test_apply_status_slow_only_once() {
        let mut level = open_level();
        let mut you = You::default();
        let mut rng = GameRng::new(42);
        let id = level.add_monster(Monster::spawn(MonsterKind::Newt, Position::new(5, 5)));

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        assert!(apply_status(&mut ctx, id, Status::Slow));
        assert!(!apply_status(&mut ctx, id, Status::Slow));
        assert!(level.monster(id).unwrap().status.slowed);
    }

    #[test]
    fn test_apply_status_poison_accumulates() {
        let mut level = open_level();
        let mut you = You::default();
        let mut rng = GameRng::new(42);
        let id = level.add_monster(Monster::spawn(MonsterKind::Kobold, Position::new(5, 5)));

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        assert!(apply_status(&mut ctx, id, Status::Poison(1)));
        assert!(apply_status(&mut ctx, id, Status::Poison(2)));
        assert!(!apply_status(&mut ctx, id, Status::Poison(0)));
        assert_eq!(level.monster(id).unwrap().poison, 3);

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        cure_poison(&mut ctx, id);
        assert_eq!(level.monster(id).unwrap().poison, 0);
    }

    #[test]
    fn test_poison_respects_resistance() {
        let mut level = open_level();
        let mut you = You::default();
        let mut rng = GameRng::new(42);
        let id = level.add_monster(Monster::spawn(MonsterKind::PitViper, Position::new(5, 5)));

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        assert!(!apply_status(&mut ctx, id, Status::Poison(4)));
        assert_eq!(level.monster(id).unwrap().poison, 0);

        you.resists.poison = 1;
        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        poison_player(&mut ctx, 2);
        assert_eq!(you.poison, 0);
        you.resists.poison = 0;
        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        poison_player(&mut ctx, 2);
        assert_eq!(you.poison, 2);
    }

    #[test]
    fn test_teleport_moves_off_the_cell() {
        let mut level = open_level();
        let mut you = You::new(Position::new(30, 10));
        let mut rng = GameRng::new(42);
        let pos = Position::new(5, 5);
        let id = level.add_monster(Monster::spawn(MonsterKind::Kobold, pos));

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        let mut result = CastResult::new();

        for _ in 0..20 {
            assert!(teleport_monster(&mut ctx, &mut result, id));
            let now = ctx.level.monster(id).unwrap().pos;
            assert_ne!(now, ctx.you.pos);
            assert!(ctx.level.cell(now).is_walkable());
        }
        assert!(
            result
                .messages
                .iter()
                .all(|m| m == "The kobold suddenly disappears!")
        );
    }

    #[test]
    fn test_blink_stays_close() {
        let mut level = open_level();
        let mut you = You::new(Position::new(30, 10));
        let mut rng = GameRng::new(42);
        let pos = Position::new(10, 10);
        let id = level.add_monster(Monster::spawn(MonsterKind::Kobold, pos));

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        let mut result = CastResult::new();

        let from = ctx.level.monster(id).unwrap().pos;
        assert!(blink_monster(&mut ctx, &mut result, id));
        let to = ctx.level.monster(id).unwrap().pos;
        assert_ne!(from, to);
        assert!(from.distance(to) <= SIGHT_RANGE);
    }

    #[test]
    fn test_ignite_cloud_rules() {
        let mut level = open_level();
        let mut you = You::default();
        let mut rng = GameRng::new(42);
        let stink = Position::new(4, 4);
        let poison = Position::new(6, 6);
        let fire = Position::new(8, 8);
        level.place_cloud(stink, CloudKind::Stinking, 9);
        level.place_cloud(poison, CloudKind::Poison, 12);
        level.place_cloud(fire, CloudKind::Fire, 5);

        let mut ctx = EffectContext::new(&mut level, &mut you, &mut rng);
        let mut result = CastResult::new();

        assert!(ignite_cloud(&mut ctx, &mut result, stink));
        assert!(ignite_cloud(&mut ctx, &mut result, poison));
        assert!(!ignite_cloud(&mut ctx, &mut result, fire));
        assert!(!ignite_cloud(&mut ctx, &mut result, Position::new(2, 2)));

        assert_eq!(result.clouds_ignited, 2);
        let burning = level.cloud_at(stink).unwrap();
        assert_eq!(burning.kind, CloudKind::Fire);
        assert_eq!(burning.decay, 4);
        assert_eq!(level.cloud_at(poison).unwrap().decay, 12);
    }
}
