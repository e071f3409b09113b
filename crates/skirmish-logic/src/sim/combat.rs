//! Melee exchange resolution.
//!
//! `resolve_hit` and the energy and injury helpers are pure functions of
//! their arguments. `resolve_attack` reads the world but never writes it:
//! the kernel buffers the resulting impact and applies it after every
//! attack of the tick has been resolved.

use crate::body::{region_from_hit, BodyRegion, HitArea};
use crate::channels::DamageChannel;
use crate::equipment::{
    derive_armour_profile, derive_weapon_handling, find_weapon, unarmed_handling, weapon_reach_m, Handedness,
    WeaponDamageProfile, WeaponHandling,
};
use crate::rng::{make_rng, RngLike};
use crate::seeds::{event_seed, SALT_ARMOUR, SALT_HIT, SALT_SIDE};
use crate::units::{clamp01, clamp_i32, clamp_q, mul_div, mul_div_wide, q, q_mul, scale, to, I32, Q};

use super::entity::{Entity, EntityId};
use super::events::ImpactEvent;
use super::impairment::derive_functional_state;
use super::indexing::WorldIndex;
use super::injury::InjuryState;
use super::intent::DefenceMode;
use super::kernel::{KernelContext, TICK_HZ};
use super::occlusion::is_melee_lane_occluded_by_friendly;
use super::spatial::SpatialIndex;
use super::vec3::{dist2, dot_dir_q, normalise_dir_cheap_q, scale_dir_to_speed, Vec3};
use super::world::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitResolution {
    pub hit: bool,
    pub area: HitArea,
    /// 0..1
    pub hit_quality: Q,
    pub blocked: bool,
    pub parried: bool,
}

pub fn choose_area(r01: Q) -> HitArea {
    if r01 < q(0.12) {
        HitArea::Head
    } else if r01 < q(0.62) {
        HitArea::Torso
    } else if r01 < q(0.82) {
        HitArea::Arm
    } else {
        HitArea::Leg
    }
}

/// Resolve one swing from its event seed.
///
/// Draw order is fixed: hit roll, area roll, then one defence roll only
/// when the swing hit and the defender is actively defending.
pub fn resolve_hit(
    seed: u32,
    attack_skill: Q,
    defence_skill: Q,
    geometry_dot_q: Q,
    defence_mode: DefenceMode,
    defence_intensity: Q,
) -> HitResolution {
    let mut rng = make_rng(seed, scale::Q);

    // Attacks from behind (dot < 0) are easier, head-on ones harder.
    let geom = clamp_q(q(1.05) - mul_div(geometry_dot_q, q(0.10), scale::Q), q(0.85), q(1.20));
    let atk = q_mul(attack_skill, geom);

    let p = clamp_q(q(0.55) + mul_div(atk - defence_skill, q(0.35), scale::Q), q(0.10), q(0.95));

    let roll = rng.q01();
    let hit = roll < p;
    let area = choose_area(rng.q01());

    let hit_quality = clamp_q(q_mul(atk, q(0.60) + mul_div(p - roll, q(0.40), scale::Q)), q(0.05), q(0.99));

    let mut res = HitResolution {
        hit,
        area,
        hit_quality,
        blocked: false,
        parried: false,
    };

    if !hit || defence_mode == DefenceMode::None || defence_intensity <= 0 {
        return res;
    }

    let d = q_mul(defence_intensity, defence_skill);
    match defence_mode {
        DefenceMode::Block => {
            let pb = clamp_q(q(0.10) + q_mul(d, q(0.60)), q(0.05), q(0.85));
            res.blocked = rng.q01() < pb;
        }
        DefenceMode::Parry => {
            let pp = clamp_q(q(0.08) + q_mul(d, q(0.55)), q(0.03), q(0.75));
            res.parried = rng.q01() < pp;
        }
        DefenceMode::Dodge => {
            let pd = clamp_q(q_mul(d, q(0.65)), q(0.05), q(0.80));
            if rng.q01() < pd {
                res.hit = false;
            }
        }
        DefenceMode::None => {}
    }
    res
}

// ── Leverage ────────────────────────────────────────────────────────────

pub fn handedness_mul(h: Handedness) -> Q {
    match h {
        Handedness::TwoHand => q(1.15),
        Handedness::Mounted => q(1.05),
        Handedness::OneHand => q(1.0),
        Handedness::Natural => q(0.90),
    }
}

/// Lever advantage of a weapon for its wielder: moment arm relative to a
/// fifth of stature, scaled by grip. 1.0 is an average one-handed lever.
pub fn parry_leverage_q(handling: &WeaponHandling, wielder_stature_m: I32) -> Q {
    let ref_arm = mul_div(wielder_stature_m, q(0.20), scale::Q).max(1);
    let raw = mul_div(handling.moment_arm_m, scale::Q, ref_arm);
    clamp_q(q_mul(raw, handedness_mul(handling.handedness)), q(0.40), q(2.50))
}

/// Energy fraction left after a successful parry.
pub fn post_parry_mul(leverage: Q) -> Q {
    clamp_q(q(0.25) - q_mul(q(0.15), leverage - scale::Q), q(0.10), q(0.45))
}

/// Energy fraction left after a successful block.
pub fn post_block_mul(leverage: Q) -> Q {
    clamp_q(q(0.40) - q_mul(q(0.10), leverage - scale::Q), q(0.25), q(0.55))
}

/// Leverage the defender brings: their first weapon, else bare hands.
pub fn defender_leverage_q(defender: &Entity) -> Q {
    let stature = defender.attributes.morphology.stature_m;
    let handling = match find_weapon(&defender.loadout, None) {
        Some((_, w)) => derive_weapon_handling(w, stature),
        None => unarmed_handling(stature),
    };
    parry_leverage_q(&handling, stature)
}

// ── Energy ──────────────────────────────────────────────────────────────

/// Base strike speed from peak power, 2 to 12 m/s.
pub fn base_strike_speed_mps(peak_power_w: I32) -> I32 {
    let v = (peak_power_w as i64 * scale::MPS as i64 / 200) as I32;
    clamp_i32(v, to::mps(2.0), to::mps(12.0))
}

/// `½ m v²` with effective mass = weapon mass + a fraction of body mass.
pub fn impact_energy_j(weapon_mass_kg: I32, body_mass_kg: I32, effective_mass_frac: Q, rel_vel_mps: Vec3) -> I32 {
    let m_eff = weapon_mass_kg as i128 + mul_div(body_mass_kg, effective_mass_frac, scale::Q) as i128;
    let (vx, vy, vz) = (rel_vel_mps.x as i128, rel_vel_mps.y as i128, rel_vel_mps.z as i128);
    let v2 = vx * vx + vy * vy + vz * vz;
    let denom = 2 * scale::KG as i128 * scale::MPS as i128 * scale::MPS as i128;
    (m_eff * v2 / denom).clamp(0, I32::MAX as i128) as I32
}

/// Coverage is a probability: roll `seed % 1.0` against it.
pub fn armour_covers_hit(world_seed: u32, tick: u32, coverage: Q, a_id: u32, b_id: u32) -> bool {
    if coverage <= 0 {
        return false;
    }
    if coverage >= scale::Q {
        return true;
    }
    let roll = (event_seed(world_seed, tick, a_id, b_id, SALT_ARMOUR) % scale::Q as u32) as Q;
    roll < coverage
}

/// Flat resist capacity first, then the protected-damage multiplier.
pub fn apply_kinetic_armour_penetration(energy_j: I32, resist_j: I32, post_mul: Q) -> I32 {
    let remaining = (energy_j - resist_j.max(0)).max(0);
    mul_div(remaining, post_mul, scale::Q)
}

// ── Injury ──────────────────────────────────────────────────────────────

const SURFACE_J: i64 = 100;
const INTERNAL_J: i64 = 160;
const STRUCTURAL_J: i64 = 220;

fn area_multipliers(region: BodyRegion) -> (Q, Q, Q) {
    match region {
        BodyRegion::Head => (scale::Q, q(1.25), q(0.85)),
        BodyRegion::Torso => (scale::Q, q(1.05), scale::Q),
        _ => (scale::Q, q(0.80), q(1.20)),
    }
}

/// Distribute impact energy over the struck region's damage channels.
pub fn apply_impact_to_injury(
    injury: &mut InjuryState,
    damage: &WeaponDamageProfile,
    energy_j: I32,
    region: BodyRegion,
    armoured: bool,
) {
    if energy_j <= 0 {
        return;
    }

    let (area_surf, area_int, area_str) = area_multipliers(region);
    let armour_shift = if armoured { q(0.75) } else { scale::Q };

    let bias = damage.penetration_bias;
    let surf_frac = clamp_q(damage.surface_frac - q_mul(bias, q(0.12)), q(0.05), q(0.95));
    let int_frac = clamp_q(damage.internal_frac + q_mul(bias, q(0.12)), q(0.05), q(0.95));

    let energy_q = energy_j as i64 * scale::Q as i64;
    let inc = |frac: Q, per_unit_j: i64| -> Q {
        mul_div_wide(energy_q, frac as i64, per_unit_j * scale::Q as i64).min(scale::Q as i64) as Q
    };
    let surf_inc = inc(q_mul(q_mul(surf_frac, area_surf), armour_shift), SURFACE_J);
    let int_inc = inc(q_mul(int_frac, area_int), INTERNAL_J);
    let str_inc = inc(q_mul(damage.structural_frac, area_str), STRUCTURAL_J);

    let r = injury.region_mut(region);
    r.surface_damage = clamp01(r.surface_damage + surf_inc);
    r.internal_damage = clamp01(r.internal_damage + int_inc);
    r.structural_damage = clamp01(r.structural_damage + str_inc);

    let bleed_base = clamp01((surf_inc + int_inc) >> 1);
    let bleed_delta = q_mul(bleed_base, damage.bleed_factor);
    r.bleeding_rate = clamp01(r.bleeding_rate + q_mul(bleed_delta, q(0.004)));

    injury.shock = clamp01(injury.shock + q_mul(bleed_base, q(0.010)));
}

// ── Attack ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRequest<'a> {
    pub target_id: EntityId,
    pub weapon_id: Option<&'a str>,
    pub intensity: Option<Q>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Nothing happened: cooling down, no weapon, out of reach, lane blocked
    /// or the target is gone.
    Skipped,
    /// A swing was made. The attacker's cooldown restarts either way.
    Swung {
        cooldown_ticks: u32,
        impact: Option<ImpactEvent>,
    },
}

/// Resolve one attack against the current world state.
pub fn resolve_attack(
    world: &WorldState,
    index: &WorldIndex,
    spatial: &SpatialIndex,
    ctx: &KernelContext,
    attacker: &Entity,
    req: &AttackRequest<'_>,
) -> AttackOutcome {
    if attacker.action.attack_cooldown_ticks > 0 || req.target_id == attacker.id {
        return AttackOutcome::Skipped;
    }
    let Some(target) = index.get(world, req.target_id).filter(|t| t.is_alive()) else {
        return AttackOutcome::Skipped;
    };
    let Some((item, wpn)) = find_weapon(&attacker.loadout, req.weapon_id) else {
        return AttackOutcome::Skipped;
    };

    let func = derive_functional_state(attacker, &ctx.tuning);
    if !func.can_act || func.both_arms_disabled() {
        return AttackOutcome::Skipped;
    }

    let reach_m = weapon_reach_m(wpn, attacker.attributes.morphology.stature_m) as i128;
    if dist2(attacker.position_m, target.position_m) > reach_m * reach_m {
        return AttackOutcome::Skipped;
    }

    if let Some(occlusion) = &ctx.occlusion {
        if is_melee_lane_occluded_by_friendly(world, index, spatial, attacker, target, occlusion) {
            log::trace!("attack {} -> {} blocked by a friendly in the lane", attacker.id, target.id);
            return AttackOutcome::Skipped;
        }
    }

    let ready_time_s = wpn.ready_time_s.unwrap_or_else(|| to::s(0.6));
    let cooldown_ticks = (ready_time_s as i64 * TICK_HZ as i64 / scale::S as i64).max(1) as u32;

    let dir_to_target = normalise_dir_cheap_q(target.position_m - attacker.position_m);

    let target_func = derive_functional_state(target, &ctx.tuning);
    let ac = &attacker.attributes.control;
    let tc = &target.attributes.control;
    let attack_skill = clamp_q(
        q_mul(q_mul(ac.control_quality, ac.fine_control), func.coordination_mul),
        q(0.05),
        q(0.99),
    );
    let defence_skill = clamp_q(
        q_mul(q_mul(tc.control_quality, tc.stability), target_func.coordination_mul),
        q(0.05),
        q(0.99),
    );
    let geom_dot = dot_dir_q(attacker.action.facing_dir_q, dir_to_target);

    let seed = event_seed(world.seed, world.tick, attacker.id, target.id, SALT_HIT);
    let defence = target.intent.defence;
    let res = resolve_hit(seed, attack_skill, defence_skill, geom_dot, defence.mode, defence.intensity);

    log::trace!(
        "attack {} -> {} tick {}: hit={} blocked={} parried={} quality={}",
        attacker.id,
        target.id,
        world.tick,
        res.hit,
        res.blocked,
        res.parried,
        res.hit_quality
    );

    if !res.hit {
        return AttackOutcome::Swung {
            cooldown_ticks,
            impact: None,
        };
    }

    let side_bit = event_seed(world.seed, world.tick, attacker.id, target.id, SALT_SIDE) & 1;
    let region = region_from_hit(res.area, side_bit);

    let intensity = clamp_q(req.intensity.unwrap_or(scale::Q), q(0.1), scale::Q);
    let quality_mul = q(0.70) + q_mul(res.hit_quality, q(0.30));
    let v_strike = [
        wpn.strike_speed_mul.unwrap_or(scale::Q),
        ac.control_quality,
        func.manipulation_mul,
        intensity,
        quality_mul,
    ]
    .into_iter()
    .fold(base_strike_speed_mps(attacker.attributes.performance.peak_power_w), |v, m| {
        mul_div(v, m, scale::Q)
    });

    let rel = attacker.velocity_mps - target.velocity_mps + scale_dir_to_speed(dir_to_target, v_strike);
    let energy_j = impact_energy_j(
        item.mass_kg,
        attacker.attributes.morphology.mass_kg,
        wpn.strike_effective_mass_frac.unwrap_or(q(0.10)),
        rel,
    );

    let mut mitigated = energy_j;
    if res.blocked {
        mitigated = mul_div(mitigated, post_block_mul(defender_leverage_q(target)), scale::Q);
    }
    if res.parried {
        mitigated = mul_div(mitigated, post_parry_mul(defender_leverage_q(target)), scale::Q);
    }

    let armour = derive_armour_profile(&target.loadout);
    let covered = armour_covers_hit(
        world.seed,
        world.tick,
        *armour.coverage_by_region.get(region),
        attacker.id,
        target.id,
    );
    let protected_by_armour = covered && armour.protects(DamageChannel::Kinetic);
    let final_energy = if protected_by_armour {
        apply_kinetic_armour_penetration(mitigated, armour.resist_j, armour.protected_damage_mul)
    } else {
        mitigated
    };

    AttackOutcome::Swung {
        cooldown_ticks,
        impact: Some(ImpactEvent {
            attacker_id: attacker.id,
            target_id: target.id,
            region,
            energy_j: final_energy,
            protected_by_armour,
            weapon_id: item.id.clone(),
            damage: wpn.damage,
        }),
    }
}
