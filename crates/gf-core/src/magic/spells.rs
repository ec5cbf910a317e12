//! The cast entry points
//!
//! Each cast builds a [`CastResult`] by driving the selection and
//! resolution layers and mutating the world through the application
//! layer only. Nothing here touches ambient state; everything a cast
//! did is readable off the result.

use crate::combat::{DamageSpec, DamageType, Dice, adjust_damage, calc_dice};
use crate::consts::SIGHT_RANGE;
use crate::dungeon::{CloudKind, Position, TerrainKind, VetoFlags};
use crate::monster::MonsterId;
use crate::object::ObjectKind;
use crate::player::Shape;

use super::apply::{
    Status, apply_status, blink_monster, cure_poison, destroy_object, hurt_monster, hurt_player,
    ignite_cloud, poison_player, set_terrain, spawn_cloud, teleport_monster,
};
use super::area::{
    Occupant, apply_area_around_square, apply_area_visible, apply_area_within_radius,
    random_cells_within,
};
use super::chain::{Agent, ArcStrike, Chain, propagate_discharge_arc};
use super::outcome::{
    FragConvert, FragHit, fragment_monster_row, fragment_terrain_row, ignite_poison_dice,
    shatter_dice, shatter_wall_chance,
};
use super::{CastResult, EffectContext, Termination};

/// Whether the player's sight reaches a cell
fn player_sees(ctx: &EffectContext, pos: Position) -> bool {
    ctx.you.pos.distance(pos) <= SIGHT_RANGE && ctx.level.has_line_of_sight(ctx.you.pos, pos)
}

/// Ids of every living monster within the player's line of sight
fn monsters_in_sight(ctx: &EffectContext) -> Vec<MonsterId> {
    ctx.level
        .monsters
        .iter()
        .filter(|m| m.alive() && player_sees(ctx, m.pos))
        .map(|m| m.id)
        .collect()
}

/// A single-shot cast either ran to completion or never found anything
fn close_out(mut result: CastResult) -> CastResult {
    result.termination = if result.affected_anything() {
        Termination::Exhausted
    } else {
        Termination::NoInitialTarget
    };
    result
}

// ==================== chain lightning ====================

/// Loose a lightning arc that leaps from body to body until its power
/// runs out or no next hop is in reach.
///
/// The caster's own cell is a legal later hop, struck with softened
/// dice. An arc whose target leaves the player's sight loses half its
/// remaining power.
pub fn cast_chain_lightning(ctx: &mut EffectContext, caster: Agent, power: i32) -> CastResult {
    let mut result = CastResult::new();
    let Some(origin) = caster.pos(ctx.level, ctx.you) else {
        return result;
    };

    let mut chain = Chain::new(origin, power);
    let mut first = true;

    while !chain.exhausted() {
        let Some(target) = chain.select(ctx.level, ctx.you, ctx.rng) else {
            result.msg("The lightning grounds out.");
            result.termination = if first {
                Termination::NoInitialTarget
            } else {
                Termination::Grounded
            };
            return result;
        };

        if first {
            result.msg("You hear a mighty clap of thunder!");
            first = false;
        }

        let see_source = player_sees(ctx, chain.source);
        let see_target = player_sees(ctx, target);
        if see_source && !see_target {
            result.msg("The lightning arcs out of your line of sight!");
        } else if !see_source && see_target {
            result.msg("The lightning arc suddenly appears!");
        }

        // out of the caster's influence
        if !see_target {
            chain.power = chain.power / 2 + 1;
        }

        let mut dice = calc_dice(5, 12 + chain.power * 2 / 3, ctx.rng);
        if caster.pos(ctx.level, ctx.you) == Some(target) {
            // be kinder to the caster
            dice.count = (dice.count / 2).max(1);
            dice.size = (dice.size / 2).max(3);
        }

        strike_chain_target(ctx, &mut result, target, dice);
        chain.advance(target, ctx.rng);
    }

    result.termination = Termination::Exhausted;
    result
}

fn strike_chain_target(
    ctx: &mut EffectContext,
    result: &mut CastResult,
    target: Position,
    dice: Dice,
) {
    let roll = dice.roll(ctx.rng);
    match ctx.candidate_at(target).occupant {
        Occupant::Monster(id) => {
            let Some(mon) = ctx.level.monster(id) else {
                return;
            };
            let name = mon.name();
            let damage = adjust_damage(roll, DamageType::Electricity, &mon.resists);
            result.msg(format!("The lightning arc hits the {name}!"));
            hurt_monster(ctx, result, id, damage);
        }
        Occupant::Player => {
            let damage = adjust_damage(roll, DamageType::Electricity, &ctx.you.resists);
            result.msg("The lightning arc hits you!");
            hurt_player(ctx, result, damage);
        }
        _ => {}
    }
}

// ==================== static discharge ====================

/// Loose one or more short-lived arcs into the cells around the
/// caster. Each arc strikes its cell and then keeps jumping to random
/// neighbouring cells while the re-arc gate holds.
pub fn cast_discharge(ctx: &mut EffectContext, power: i32) -> CastResult {
    let mut result = CastResult::new();

    let num_targs = 1 + ctx.rng.rn2(1 + power / 25);
    let origin = ctx.you.pos;
    let picks = random_cells_within(ctx.level, origin, 1, true, num_targs as usize, ctx.rng);

    let mut dam = 0;
    for start in picks {
        dam += propagate_discharge_arc(ctx, &mut result, start, power, discharge_strike);
    }

    if dam == 0 {
        if ctx.rng.coinflip() {
            result.msg("The air around you crackles with electrical energy.");
        } else if ctx.rng.coinflip() {
            result.msg("Some blue arcs ground themselves harmlessly around you.");
        } else {
            let place = if ctx.rng.coinflip() {
                "beside"
            } else if ctx.rng.coinflip() {
                "behind"
            } else {
                "before"
            };
            result.msg(format!("A blue arc grounds itself harmlessly {place} you."));
        }
    }

    close_out(result)
}

/// Resolve one discharge strike. Empty cells, insulated bodies, and
/// airborne bodies kill the arc outright; the player conducts even
/// while airborne, for half damage.
fn discharge_strike(
    ctx: &mut EffectContext,
    result: &mut CastResult,
    pos: Position,
    power: i32,
) -> ArcStrike {
    if pos == ctx.you.pos {
        result.msg("You are struck by lightning.");
        let roll = 3 + ctx.rng.rn2(5 + power / 10);
        let mut damage = adjust_damage(roll, DamageType::Electricity, &ctx.you.resists);
        if ctx.you.airborne {
            damage /= 2;
        }
        hurt_player(ctx, result, damage);
        return ArcStrike::Hit(damage);
    }

    let Some(mon) = ctx.level.monster_at(pos) else {
        return ArcStrike::Dead;
    };
    if mon.resists.elec > 0 || mon.flies() {
        return ArcStrike::Dead;
    }
    let id = mon.id;
    let name = mon.name();
    let resists = mon.resists;

    let roll = 3 + ctx.rng.rn2(5 + power / 10);
    let damage = adjust_damage(roll, DamageType::Electricity, &resists);
    if damage > 0 {
        result.msg(format!("The {name} is struck by lightning."));
        hurt_monster(ctx, result, id, damage);
    }
    ArcStrike::Hit(damage)
}

// ==================== shatter ====================

/// Rattle everything around the caster: glassware breaks, rigid
/// bodies take material-scaled damage, and walls crumble by their
/// hardness. The caster's own body resonates by shape.
pub fn cast_shatter(ctx: &mut EffectContext, power: i32) -> CastResult {
    let mut result = CastResult::new();
    result.msg("The dungeon rumbles!");

    let self_damage = match ctx.you.shape {
        Shape::Normal => 0,
        Shape::Stone => 15 + ctx.rng.rn2avg(power / 5, 4),
        Shape::Ice => 10 + ctx.rng.rn2avg(power / 5, 4) / 2,
        Shape::Blades => {
            result.msg("Your scythe-like blades vibrate painfully!");
            2 + ctx.rng.rn2avg(5, 2)
        }
    };
    hurt_player(ctx, &mut result, self_damage);

    let origin = ctx.you.pos;
    let radius = 3 + power / 40;

    apply_area_within_radius(ctx, origin, radius, |ctx, pos| {
        shatter_items_at(ctx, &mut result, pos)
    });
    apply_area_within_radius(ctx, origin, radius, |ctx, pos| {
        shatter_monster_at(ctx, &mut result, pos, power)
    });
    let destroyed = apply_area_within_radius(ctx, origin, radius, |ctx, pos| {
        shatter_wall_at(ctx, &mut result, pos, power)
    });

    if destroyed > 0 {
        result.msg("Ka-crash!");
    }

    close_out(result)
}

/// Break the glassware in one cell; a potion survives 1 time in 10
fn shatter_items_at(ctx: &mut EffectContext, result: &mut CastResult, pos: Position) -> i32 {
    let mut broke = 0;
    for id in ctx.level.object_ids_at(pos) {
        let is_potion = ctx
            .level
            .object(id)
            .is_some_and(|obj| obj.kind.is_potion());
        if is_potion && !ctx.rng.one_in(10) {
            destroy_object(ctx, result, id);
            broke += 1;
        }
    }
    if broke > 0 {
        result.msg("You hear glass break.");
        1
    } else {
        0
    }
}

fn shatter_monster_at(
    ctx: &mut EffectContext,
    result: &mut CastResult,
    pos: Position,
    power: i32,
) -> i32 {
    let hit = ctx
        .level
        .monster_at(pos)
        .map(|mon| (mon.id, mon.ac, shatter_dice(mon, power)));
    let Some((id, ac, dice)) = hit else {
        return 0;
    };

    let damage = (dice.roll(ctx.rng) - ctx.rng.rn2(ac)).max(0);
    if damage > 0 {
        hurt_monster(ctx, result, id, damage);
    }
    damage
}

fn shatter_wall_at(
    ctx: &mut EffectContext,
    result: &mut CastResult,
    pos: Position,
    power: i32,
) -> i32 {
    let cell = ctx.level.cell(pos);
    if cell.veto.contains(VetoFlags::PRESERVE_SHATTER) {
        return 0;
    }
    let terrain = cell.typ;

    let chance = shatter_wall_chance(terrain, power);
    if !ctx.rng.x_in_y(chance, 100) {
        return 0;
    }

    match terrain {
        TerrainKind::SecretDoor => result.msg("A secret door shatters!"),
        TerrainKind::ClosedDoor | TerrainKind::OpenDoor => result.msg("A door shatters!"),
        _ => {}
    }
    set_terrain(ctx, result, pos, TerrainKind::Floor);
    1
}

// ==================== fragmentation ====================

/// Deconstruct the matter at one cell. What happens depends on what
/// is there: a susceptible body takes a direct disintegration hit and
/// bursts, remains explode harmlessly, terrain blasts by its row and
/// may convert to floor. Most outcomes then detonate over an area.
pub fn cast_fragmentation(ctx: &mut EffectContext, power: i32, target: Position) -> CastResult {
    if !ctx.level.has_line_of_sight(ctx.you.pos, target) {
        return CastResult::new().with_message("There's a wall in the way!");
    }

    let mut result = CastResult::new();

    let size = 5 + power / 10;
    let grid = ctx.level.terrain_at(target);

    let mut num = 0;
    let mut explode = false;
    let mut hole = true;
    let mut radius = 1;
    let mut flavor = DamageType::Fragment;
    let mut what: Option<&'static str> = None;

    let mut do_terrain = false;
    let mut skip_veto = false;

    let struck = ctx
        .level
        .monster_at(target)
        .map(|mon| (mon.id, mon.name(), mon.kind, mon.hp, fragment_monster_row(mon)));

    if let Some((id, name, kind, hp, row)) = struck {
        if let Some(det) = row.detonation {
            radius = det.radius;
            flavor = det.flavor;
        }

        match row.hit {
            FragHit::Shudder => {
                num = row.dice_num;
                result.msg(format!("The {name} shudders violently!"));
                let roll = Dice::new(num, size).roll(ctx.rng);
                hurt_monster(ctx, &mut result, id, roll);
                result.msg(format!("The {name} shatters!"));
            }
            FragHit::Normal => {
                explode = true;
                num = row.dice_num;
                let roll = Dice::new(num, size).roll(ctx.rng);
                if hurt_monster(ctx, &mut result, id, roll) {
                    num += row.bonus_if_died;
                }
                result.msg(format!("The {name} shatters!"));
            }
            FragHit::Doubled => {
                explode = true;
                num = row.dice_num;
                let mut direct = Dice::new(num, size).roll(ctx.rng) * 2;
                if power >= 50 && ctx.rng.one_in(10) {
                    direct = hp;
                }
                if hurt_monster(ctx, &mut result, id, direct) {
                    num += row.bonus_if_died;
                }
                result.msg(format!("The {name} shatters!"));
            }
            FragHit::Skeletal => {
                explode = true;
                let bones = if kind.is_bare_skull() { "skull" } else { "skeleton" };
                result.msg(format!("The {bones} explodes into sharp fragments of bone!"));
                if ctx.rng.x_in_y(power / 5, 50) {
                    // blown clean apart
                    hurt_monster(ctx, &mut result, id, hp);
                    num = 4;
                } else {
                    num = row.dice_num;
                    let roll = Dice::new(num, size).roll(ctx.rng);
                    if hurt_monster(ctx, &mut result, id, roll) {
                        num += row.bonus_if_died;
                    }
                }
            }
            FragHit::Unsusceptible => {
                // a token die, then whatever it stands on resolves
                num = row.dice_num;
                let roll = ctx.rng.dice(1, 5 + power / 25);
                hurt_monster(ctx, &mut result, id, roll);
                do_terrain = true;
                skip_veto = true;
            }
        }
    } else if let Some((corpse_id, remains)) = ctx.level.object_ids_at(target).into_iter().find_map(
        |id| {
            ctx.level.object(id).and_then(|obj| match obj.kind {
                ObjectKind::Corpse(_) => Some((id, obj.name())),
                _ => None,
            })
        },
    ) {
        result.msg(format!("The {remains} explodes!"));
        destroy_object(ctx, &mut result, corpse_id);
    } else {
        do_terrain = true;
    }

    if do_terrain {
        if !skip_veto
            && ctx.level.is_valid_pos(target)
            && ctx
                .level
                .cell(target)
                .veto
                .contains(VetoFlags::PRESERVE_FRAGMENT)
        {
            result.msg(format!("The {} seems to be unnaturally hard.", grid.name()));
            result.msg("The spell fizzles.");
            return result;
        }

        let row = fragment_terrain_row(grid);
        if row.blast {
            explode = true;
            what = row.feature;
            num = row.dice_num;
            radius = row.radius;
            hole = row.hole;

            let converted = match row.convert {
                FragConvert::Never => false,
                FragConvert::Always => true,
                FragConvert::SoftRock => power >= 40 && ctx.rng.one_in(3),
                FragConvert::HardStone => power >= 60 && ctx.rng.one_in(10),
                FragConvert::Metal => power >= 80 && ctx.rng.x_in_y(power / 5, 500),
                FragConvert::Crystal => ctx.rng.coinflip(),
            };
            if converted {
                num += row.bonus_if_converted;
                radius = if row.convert == FragConvert::Crystal && !ctx.rng.coinflip() {
                    row.radius
                } else {
                    row.radius_if_converted
                };
                set_terrain(ctx, &mut result, target, TerrainKind::Floor);
            }
        } else if let Some(subject) = row.hard {
            result.msg(format!("{subject} seems to be unnaturally hard."));
        }
    }

    if explode && num > 0 {
        if let Some(what) = what {
            result.msg(format!("The {what} shatters!"));
        }
        let spec = DamageSpec::new(num, size, flavor);
        detonate(ctx, &mut result, target, spec, radius, hole);
    } else if num == 0 && !result.affected_anything() {
        result.msg("The spell fizzles.");
    }

    close_out(result)
}

/// Sweep a blast over every cell in reach of the center, rolling the
/// dice fresh per body. A holed blast spares the center cell.
fn detonate(
    ctx: &mut EffectContext,
    result: &mut CastResult,
    center: Position,
    spec: DamageSpec,
    radius: i32,
    hole: bool,
) {
    for pos in ctx.level.cells_within_radius(center, radius) {
        if hole && pos == center {
            continue;
        }
        if !ctx.level.has_line_of_sight(center, pos) {
            continue;
        }
        match ctx.candidate_at(pos).occupant {
            Occupant::Monster(id) => {
                let Some(mon) = ctx.level.monster(id) else {
                    continue;
                };
                let resists = mon.resists;
                let damage = adjust_damage(spec.dice.roll(ctx.rng), spec.flavor, &resists);
                hurt_monster(ctx, result, id, damage);
            }
            Occupant::Player => {
                let damage = adjust_damage(spec.dice.roll(ctx.rng), spec.flavor, &ctx.you.resists);
                if damage > 0 {
                    result.msg("You are caught in the blast!");
                }
                hurt_player(ctx, result, damage);
            }
            _ => {}
        }
    }
}

// ==================== poison ignition ====================

/// Set every trace of poison in sight alight: the caster's own blood,
/// poisonous clouds, flammable potions on the floor, and the venom
/// inside bodies.
pub fn cast_ignite_poison(ctx: &mut EffectContext, power: i32) -> CastResult {
    let mut result = CastResult::new();
    ctx.level.update_visibility(ctx.you.pos, SIGHT_RANGE);

    // the caster's own blood burns first
    let mut damage = 0;
    if ctx.you.venomous {
        damage += ctx.rng.dice(3, 5 + power / 7);
    }
    damage += ctx.rng.dice(i32::from(ctx.you.poison), 6);
    if damage > 0 {
        if ctx.you.resists.fire > 0 {
            result.msg("You feel like your blood is boiling!");
            damage /= 3;
        } else if ctx.you.resists.fire < 0 {
            result.msg("The poison in your system burns terribly!");
            damage *= 3;
        } else {
            result.msg("The poison in your system burns!");
        }
        hurt_player(ctx, &mut result, damage);
        if ctx.you.poison > 0 {
            result.msg("You feel that the poison has left your system.");
            ctx.you.poison = 0;
        }
    }

    apply_area_visible(ctx, |ctx, pos| {
        i32::from(ignite_cloud(ctx, &mut result, pos))
    });
    apply_area_visible(ctx, |ctx, pos| ignite_objects_at(ctx, &mut result, pos));
    apply_area_visible(ctx, |ctx, pos| {
        ignite_monster_at(ctx, &mut result, pos, power)
    });

    close_out(result)
}

/// Burn the flammable potions in one cell into a fire cloud whose
/// strength is the sum of their fuel
fn ignite_objects_at(ctx: &mut EffectContext, result: &mut CastResult, pos: Position) -> i32 {
    let mut strength = 0;
    for id in ctx.level.object_ids_at(pos) {
        let fuel = match ctx.level.object(id) {
            Some(obj) => match obj.kind {
                ObjectKind::Potion(p) => p.ignite_strength() * obj.quantity,
                _ => 0,
            },
            None => 0,
        };
        if fuel > 0 {
            destroy_object(ctx, result, id);
            strength += fuel;
        }
    }
    if strength == 0 {
        return 0;
    }

    let decay = strength + ctx.rng.dice(3, strength / 4);
    spawn_cloud(ctx, pos, CloudKind::Fire, decay);
    1
}

fn ignite_monster_at(
    ctx: &mut EffectContext,
    result: &mut CastResult,
    pos: Position,
    power: i32,
) -> i32 {
    let Some(mon) = ctx.level.monster_at(pos) else {
        return 0;
    };
    let id = mon.id;
    let name = mon.name();
    let resists = mon.resists;
    let dice = ignite_poison_dice(mon.venomous(), mon.poison, power);

    let roll = dice.roll(ctx.rng);
    if roll <= 0 {
        return 0;
    }
    let damage = adjust_damage(roll, DamageType::Fire, &resists);
    result.msg(format!("The {name} seems to burn from within!"));
    if !hurt_monster(ctx, result, id, damage) {
        // the poison burned away
        cure_poison(ctx, id);
    }
    1
}

// ==================== mass refrigeration ====================

/// Drain the heat from everything in sight, the caster included.
/// Every monster in line of sight is chilled whether or not the
/// player can see it; cold-blooded survivors may be slowed.
pub fn cast_refrigeration(ctx: &mut EffectContext, power: i32) -> CastResult {
    let mut result = CastResult::new();
    result.msg("The heat is drained from your surroundings.");

    let dice = Dice::new(3, 5 + power / 10);

    let roll = dice.roll(ctx.rng);
    let hurted = adjust_damage(roll, DamageType::Cold, &ctx.you.resists);
    if hurted > 0 {
        result.msg("You feel very cold.");
        hurt_player(ctx, &mut result, hurted);
    }

    let ids = monsters_in_sight(ctx);
    let any_seen = ids.iter().any(|&id| {
        ctx.level
            .monster(id)
            .is_some_and(|m| !m.status.invisible && !m.status.submerged)
    });
    if any_seen {
        result.msg("The monsters around you are frozen!");
    }

    for id in ids {
        let Some(mon) = ctx.level.monster(id) else {
            continue;
        };
        let resists = mon.resists;
        let cold_blooded = mon.cold_blooded();

        let damage = adjust_damage(dice.roll(ctx.rng), DamageType::Cold, &resists);
        let died = hurt_monster(ctx, &mut result, id, damage);
        if !died && cold_blooded && ctx.rng.coinflip() {
            apply_status(ctx, id, Status::Slow);
        }
    }

    close_out(result)
}

// ==================== toxic radiance ====================

/// Radiate sickly light that poisons every exposed body in sight.
/// Invisible bodies let the light pass through, the caster's own
/// included; submerged bodies are shielded by the surface.
pub fn cast_toxic_radiance(ctx: &mut EffectContext) -> CastResult {
    let mut result = CastResult::new();
    result.msg("You radiate a sickly green light!");

    if ctx.you.invisible {
        result.msg("The light passes straight through your body.");
    } else if ctx.you.resists.poison <= 0 {
        result.msg("You feel rather sick.");
        poison_player(ctx, 2);
    }

    let mut affected = 0;
    for id in monsters_in_sight(ctx) {
        let exposed = ctx
            .level
            .monster(id)
            .is_some_and(|m| !m.status.submerged && !m.status.invisible);
        if !exposed {
            continue;
        }
        let mut hit = apply_status(ctx, id, Status::Poison(1));
        if ctx.rng.coinflip() && apply_status(ctx, id, Status::Poison(1)) {
            hit = true;
        }
        if hit {
            affected += 1;
            result.targets_hit += 1;
        }
    }
    if affected > 0 {
        result.msg("The monsters around you are poisoned!");
    }

    close_out(result)
}

// ==================== dispersal ====================

/// Fling the bodies around the caster away. Blink-resistant kinds
/// shrug it off; a magic-resistance save downgrades the effect to a
/// coin-flipped short blink or nothing.
pub fn cast_dispersal(ctx: &mut EffectContext, power: i32) -> CastResult {
    let mut result = CastResult::new();

    let origin = ctx.you.pos;
    let affected = apply_area_around_square(ctx, origin, |ctx, pos| {
        disperse_monster_at(ctx, &mut result, pos, power)
    });

    if affected == 0 {
        result.msg("The air shimmers briefly around you.");
    }

    close_out(result)
}

fn disperse_monster_at(
    ctx: &mut EffectContext,
    result: &mut CastResult,
    pos: Position,
    power: i32,
) -> i32 {
    let Some(mon) = ctx.level.monster_at(pos) else {
        return 0;
    };
    let id = mon.id;
    let name = mon.name();

    if mon.resists_blink() {
        result.msg(format!("The {name} resists."));
    } else if mon.check_res_magic(power, ctx.rng) {
        if ctx.rng.coinflip() {
            result.msg(format!("The {name} partially resists."));
            blink_monster(ctx, result, id);
        } else {
            result.msg(format!("The {name} resists."));
        }
    } else {
        teleport_monster(ctx, result, id);
    }

    result.targets_hit += 1;
    1
}

// ==================== airstrike ====================

/// Slam the air together around one body. Fliers, held aloft by the
/// very medium striking them, take half again as much.
pub fn cast_airstrike(ctx: &mut EffectContext, power: i32, target: Position) -> CastResult {
    let Some(mon) = ctx.level.monster_at(target) else {
        return CastResult::new().with_message("The spell fizzles.");
    };
    let mut result = CastResult::new();
    let id = mon.id;
    let name = mon.name();
    let flies = mon.flies();
    let ac = mon.ac;

    result.msg(format!("The air twists around and strikes the {name}!"));

    let spread = ctx.rng.rn2(4) + ctx.rng.rn2(power) / 6 + ctx.rng.rn2(power) / 7;
    let mut hurted = 8 + ctx.rng.rn2(spread);
    if flies {
        hurted = hurted * 3 / 2;
    }
    hurted -= ctx.rng.rn2(1 + ac);
    hurted = hurted.max(0);

    hurt_monster(ctx, &mut result, id, hurted);
    close_out(result)
}
