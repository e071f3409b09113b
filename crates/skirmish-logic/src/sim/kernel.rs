//! The tick pipeline.
//!
//! [`step_world`] advances a [`WorldState`] by exactly one tick. Ordering is
//! fixed and every cross-entity read goes through the per-tick indices:
//!
//! 1. sort entities by id
//! 2. build the id and spatial indices
//! 3. density field
//! 4. timers and cooldowns
//! 5. functional gating and command application
//! 6. facing
//! 7. movement
//! 8. push and repulsion
//! 9. attack resolution into buffered impacts
//! 10. frontage cap
//! 11. impact ordering
//! 12. impact application
//! 13. hazards, injury progression and energy
//! 14. tick counter

use serde::{Deserialize, Serialize};

use crate::derive::{derive_movement_caps, step_energy_and_fatigue, DeriveContext};
use crate::equipment::{find_weapon, weapon_reach_m, CarryRules};
use crate::seeds::{event_seed, SALT_STUMBLE};
use crate::units::{clamp01, clamp_i32, clamp_q, mul_div, q, q_mul, scale, I32, Q};

use super::combat::{apply_impact_to_injury, resolve_attack, AttackOutcome, AttackRequest};
use super::commands::{Command, CommandMap};
use super::density::{compute_density_field, crowd_speed_mul, DensityTuning};
use super::engagement::{pick_nearest_enemy_in_reach, EngagementQuery};
use super::entity::{Entity, EntityId};
use super::events::{sort_events_deterministic, ImpactEvent};
use super::frontage::{apply_frontage_cap, FrontageRules};
use super::hazards::step_conditions_to_injury;
use super::impairment::{derive_functional_state, FunctionalState};
use super::indexing::{build_world_index, WorldIndex};
use super::injury::{region_ko_factor, total_bleeding_rate};
use super::intent::{DefenceIntent, MoveIntent, MoveMode};
use super::occlusion::OcclusionQuery;
use super::push::{step_push_and_repulsion, PushTuning};
use super::spatial::{build_spatial_index, default_cell_size_m, SpatialIndex};
use super::tuning::{Realism, SimulationTuning};
use super::vec3::{integrate_pos, normalise_dir_cheap_q, scale_dir_to_speed, Vec3};
use super::world::WorldState;

pub const TICK_HZ: u32 = 20;
/// One tick in seconds (0.05 s).
pub const DT_S: I32 = scale::S / TICK_HZ as i32;

const PRONE_SPEED_MUL: Q = 2_500;
const MOVING_THRESHOLD_MPS: I32 = 500;
const MOVING_DEMAND_W: I32 = 250;
const IDLE_DEMAND_W: I32 = 80;
const IDLE_RECOVERY_PER_TICK: Q = 20;
const IDLE_RECOVERY_MAX_SHOCK: Q = 4_000;

/// Everything `step_world` needs beyond the world and the commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelContext {
    pub traction_coeff: Q,
    pub tuning: SimulationTuning,
    /// Spatial grid cell edge. `None` uses the default 4 m.
    pub cell_size_m: Option<I32>,
    pub density: DensityTuning,
    pub push: PushTuning,
    pub frontage: Option<FrontageRules>,
    pub occlusion: Option<OcclusionQuery>,
    pub carry_rules: CarryRules,
}

impl Default for KernelContext {
    fn default() -> Self {
        Self {
            traction_coeff: q(0.9),
            tuning: SimulationTuning::default(),
            cell_size_m: None,
            density: DensityTuning::default(),
            push: PushTuning::default(),
            frontage: None,
            occlusion: None,
            carry_rules: CarryRules::default(),
        }
    }
}

impl KernelContext {
    pub fn with_realism(realism: Realism) -> Self {
        Self {
            tuning: SimulationTuning::for_realism(realism),
            ..Self::default()
        }
    }

    pub fn derive_context(&self) -> DeriveContext {
        DeriveContext {
            traction_coeff: self.traction_coeff,
            carry_rules: self.carry_rules,
        }
    }

    pub fn cell_size(&self) -> I32 {
        self.cell_size_m.filter(|c| *c > 0).unwrap_or_else(default_cell_size_m)
    }
}

/// An attack command queued in step 5 and resolved in step 9.
struct QueuedAttack {
    attacker_id: EntityId,
    command: Command,
}

/// Advance the world by one tick.
pub fn step_world(world: &mut WorldState, cmds: &CommandMap, ctx: &KernelContext) {
    world.sort_entities();

    let index = build_world_index(world);
    let spatial = build_spatial_index(world, ctx.cell_size());
    let density = compute_density_field(world, &index, &spatial, &ctx.density);

    for e in &mut world.entities {
        tick_timers(e);
    }

    let mut queued = Vec::new();
    for e in world.entities.iter_mut().filter(|e| e.is_alive()) {
        let commands = cmds.get(&e.id).map(Vec::as_slice).unwrap_or(&[]);
        apply_commands(e, commands, &ctx.tuning, &mut queued);
    }

    for e in &mut world.entities {
        let dir = e.intent.movement.dir;
        if !dir.is_zero() {
            e.action.facing_dir_q = normalise_dir_cheap_q(dir);
        }
    }

    let derive_ctx = ctx.derive_context();
    let (seed, tick) = (world.seed, world.tick);
    for e in world.entities.iter_mut().filter(|e| e.is_alive()) {
        let crowding = density.crowding(e.id);
        step_movement(e, ctx, &derive_ctx, crowding, seed, tick);
    }

    let spatial = build_spatial_index(world, ctx.cell_size());
    step_push_and_repulsion(world, &index, &spatial, &ctx.push);

    let mut impacts = resolve_queued_attacks(world, &index, &spatial, ctx, &queued);

    if let Some(rules) = &ctx.frontage {
        impacts = apply_frontage_cap(impacts, world, &index, rules);
    }

    sort_events_deterministic(&mut impacts);

    for ev in &impacts {
        if let Some(target) = index.get_mut(world, ev.target_id).filter(|t| t.is_alive()) {
            apply_impact_to_injury(&mut target.injury, &ev.damage, ev.energy_j, ev.region, ev.protected_by_armour);
        }
    }

    for e in world.entities.iter_mut().filter(|e| e.is_alive()) {
        step_conditions_to_injury(seed, tick, e);
        step_injury_progression(e);
        step_energy(e, &derive_ctx);
    }

    world.tick = world.tick.wrapping_add(1);
}

fn tick_timers(e: &mut Entity) {
    e.action.attack_cooldown_ticks = e.action.attack_cooldown_ticks.saturating_sub(1);
    e.action.defence_cooldown_ticks = e.action.defence_cooldown_ticks.saturating_sub(1);
    e.condition.stand_blocked_ticks = e.condition.stand_blocked_ticks.saturating_sub(1);
    e.condition.unconscious_ticks = e.condition.unconscious_ticks.saturating_sub(1);
}

fn go_prone(e: &mut Entity) {
    e.condition.prone = true;
    e.condition.standing_up = false;
}

fn knock_out(e: &mut Entity, tuning: &SimulationTuning) {
    log::debug!("entity {} knocked out for {} ticks", e.id, tuning.unconscious_base_ticks);
    e.condition.unconscious_ticks = tuning.unconscious_base_ticks;
    if tuning.drop_weapons_on_unconscious {
        let before = e.loadout.items.len();
        e.loadout.items.retain(|item| !item.is_weapon());
        if e.loadout.items.len() != before {
            log::debug!("entity {} dropped its weapons", e.id);
        }
    }
}

/// Ticks needed to get up, longer with lost mobility.
fn stand_up_delay(func: &FunctionalState, tuning: &SimulationTuning) -> u32 {
    let extra = mul_div(
        tuning.stand_up_max_extra_ticks as i32,
        scale::Q - func.mobility_mul,
        scale::Q,
    );
    tuning.stand_up_base_ticks + extra.max(0) as u32
}

fn request_stand(e: &mut Entity, func: &FunctionalState, tuning: &SimulationTuning) {
    if !e.condition.prone || e.condition.stand_blocked_ticks > 0 || e.condition.standing_up {
        return;
    }
    let delay = stand_up_delay(func, tuning);
    if delay == 0 && func.can_stand {
        e.condition.prone = false;
        return;
    }
    e.condition.stand_blocked_ticks = delay;
    e.condition.standing_up = func.can_stand;
}

fn apply_commands(e: &mut Entity, commands: &[Command], tuning: &SimulationTuning, queued: &mut Vec<QueuedAttack>) {
    let func = derive_functional_state(e, tuning);

    if !func.can_act && e.condition.unconscious_ticks == 0 {
        knock_out(e, tuning);
    }
    if !func.can_act || e.condition.unconscious_ticks > 0 {
        go_prone(e);
        e.intent.movement = MoveIntent::default();
        e.intent.defence = DefenceIntent::default();
        e.intent.prone = true;
        return;
    }

    e.intent.defence = DefenceIntent::default();

    if !func.can_stand && !e.condition.prone {
        log::debug!("entity {} cannot stand and falls prone", e.id);
        go_prone(e);
    }

    if e.condition.standing_up && e.condition.stand_blocked_ticks == 0 {
        e.condition.standing_up = false;
        if func.can_stand {
            log::debug!("entity {} is back on its feet", e.id);
            e.condition.prone = false;
        }
    }

    for c in commands {
        match c {
            Command::Move { dir, intensity, mode } => {
                e.intent.movement = MoveIntent {
                    dir: *dir,
                    intensity: clamp01(*intensity),
                    mode: *mode,
                };
            }
            Command::SetProne { prone: true } => go_prone(e),
            Command::SetProne { prone: false } => request_stand(e, &func, tuning),
            Command::Defend { mode, intensity } => {
                e.intent.defence = DefenceIntent {
                    mode: *mode,
                    intensity: clamp01(*intensity),
                };
            }
            Command::Attack { .. } | Command::AttackNearest { .. } => queued.push(QueuedAttack {
                attacker_id: e.id,
                command: c.clone(),
            }),
        }
    }

    e.intent.prone = e.condition.prone;
}

fn accel_toward(v: Vec3, target: Vec3, amax_mps2: I32) -> Vec3 {
    let max_dv = mul_div(amax_mps2, DT_S, scale::S);
    Vec3 {
        x: v.x + clamp_i32(target.x - v.x, -max_dv, max_dv),
        y: v.y + clamp_i32(target.y - v.y, -max_dv, max_dv),
        z: v.z + clamp_i32(target.z - v.z, -max_dv, max_dv),
    }
}

fn clamp_speed(v: Vec3, vmax_mps: I32) -> Vec3 {
    Vec3 {
        x: clamp_i32(v.x, -vmax_mps, vmax_mps),
        y: clamp_i32(v.y, -vmax_mps, vmax_mps),
        z: clamp_i32(v.z, -vmax_mps, vmax_mps),
    }
}

/// Velocity and position update for one living entity.
pub fn step_movement(
    e: &mut Entity,
    ctx: &KernelContext,
    derive_ctx: &DeriveContext,
    crowding: Q,
    world_seed: u32,
    tick: u32,
) {
    let caps = derive_movement_caps(&e.attributes, &e.loadout, derive_ctx);
    let func = derive_functional_state(e, &ctx.tuning);

    let control_mul = clamp_q(scale::Q - q_mul(q(0.7), e.condition.stunned), q(0.1), scale::Q);
    let prone_mul = if e.condition.prone { PRONE_SPEED_MUL } else { scale::Q };
    let crowd_mul = crowd_speed_mul(crowding, &ctx.density);
    let mul = [control_mul, func.mobility_mul, prone_mul, crowd_mul]
        .into_iter()
        .fold(scale::Q, q_mul);

    let eff_vmax = mul_div(caps.max_sprint_speed_mps, mul, scale::Q);
    let eff_amax = mul_div(caps.max_acceleration_mps2, mul, scale::Q);

    let intent = e.intent.movement;
    let dir = normalise_dir_cheap_q(intent.dir);
    let intensity = clamp01(intent.intensity);
    let v_target = mul_div(mul_div(eff_vmax, intensity, scale::Q), intent.mode.speed_mul(), scale::Q);
    let target_vel = scale_dir_to_speed(dir, v_target);

    e.velocity_mps = clamp_speed(accel_toward(e.velocity_mps, target_vel, eff_amax), eff_vmax);

    let hurrying = matches!(intent.mode, MoveMode::Run | MoveMode::Sprint) && intensity > 0 && !dir.is_zero();
    if ctx.tuning.realism == Realism::Sim && hurrying && !e.condition.prone {
        roll_stumble(e, &ctx.tuning, &func, crowding, world_seed, tick);
    }

    e.position_m = integrate_pos(e.position_m, e.velocity_mps, DT_S);
}

fn roll_stumble(
    e: &mut Entity,
    tuning: &SimulationTuning,
    func: &FunctionalState,
    crowding: Q,
    world_seed: u32,
    tick: u32,
) {
    let risk_mul = scale::Q + crowding + (scale::Q - func.mobility_mul);
    let fall_chance = q_mul(tuning.fall_base_chance, risk_mul);
    let stumble_chance = q_mul(tuning.stumble_base_chance, risk_mul);

    let roll = (event_seed(world_seed, tick, e.id, 0, SALT_STUMBLE) % scale::Q as u32) as Q;
    if roll < fall_chance {
        log::debug!("entity {} fell at tick {}", e.id, tick);
        go_prone(e);
        e.intent.prone = true;
        e.velocity_mps = Vec3::ZERO;
    } else if roll < fall_chance + stumble_chance {
        log::trace!("entity {} stumbled at tick {}", e.id, tick);
        e.velocity_mps = e.velocity_mps.scale_q(scale::Q / 2);
    }
}

fn resolve_queued_attacks(
    world: &mut WorldState,
    index: &WorldIndex,
    spatial: &SpatialIndex,
    ctx: &KernelContext,
    queued: &[QueuedAttack],
) -> Vec<ImpactEvent> {
    let mut impacts = Vec::new();

    for pending in queued {
        let outcome = {
            let world_ref: &WorldState = world;
            let Some(attacker) = index.get(world_ref, pending.attacker_id).filter(|a| a.is_alive()) else {
                continue;
            };
            let Some(req) = attack_request(world_ref, index, spatial, attacker, &pending.command) else {
                continue;
            };
            resolve_attack(world_ref, index, spatial, ctx, attacker, &req)
        };

        if let AttackOutcome::Swung { cooldown_ticks, impact } = outcome {
            if let Some(attacker) = index.get_mut(world, pending.attacker_id) {
                attacker.action.attack_cooldown_ticks = cooldown_ticks;
            }
            impacts.extend(impact);
        }
    }

    impacts
}

/// Turn a queued command into a concrete request, resolving the target of
/// `AttackNearest` through engagement rules.
fn attack_request<'a>(
    world: &WorldState,
    index: &WorldIndex,
    spatial: &SpatialIndex,
    attacker: &Entity,
    command: &'a Command,
) -> Option<AttackRequest<'a>> {
    match command {
        Command::Attack {
            target_id,
            weapon_id,
            intensity,
        } => Some(AttackRequest {
            target_id: *target_id,
            weapon_id: weapon_id.as_deref(),
            intensity: *intensity,
        }),
        Command::AttackNearest { weapon_id, intensity } => {
            let (_, wpn) = find_weapon(&attacker.loadout, weapon_id.as_deref())?;
            let reach = weapon_reach_m(wpn, attacker.attributes.morphology.stature_m);
            let query = EngagementQuery::for_reach(reach);
            let target_id = pick_nearest_enemy_in_reach(world, index, spatial, attacker, &query)?;
            Some(AttackRequest {
                target_id,
                weapon_id: weapon_id.as_deref(),
                intensity: *intensity,
            })
        }
        _ => None,
    }
}

/// Bleeding into fluid loss, fluid loss and torso trauma into shock, shock
/// into lost consciousness. Death is permanent.
pub fn step_injury_progression(e: &mut Entity) {
    if e.injury.dead {
        return;
    }
    let inj = &mut e.injury;

    let bleed = mul_div(total_bleeding_rate(inj), DT_S, scale::S);
    inj.fluid_loss = clamp01(inj.fluid_loss + bleed);

    inj.shock = clamp01(inj.shock + q_mul(inj.fluid_loss, q(0.004)) + q_mul(inj.by_region.torso.internal_damage, q(0.002)));

    let loss = clamp01(
        q_mul(inj.shock, q(0.01)) + q_mul(e.condition.suffocation, q(0.02)) + q_mul(region_ko_factor(inj), q(0.01)),
    );
    inj.consciousness = clamp01(inj.consciousness - loss);

    if inj.shock >= scale::Q || inj.consciousness == 0 {
        log::debug!("entity {} died (shock {}, consciousness {})", e.id, inj.shock, inj.consciousness);
        inj.kill();
        e.velocity_mps = Vec3::ZERO;
    }
}

/// Metabolic cost of the tick plus idle recovery.
pub fn step_energy(e: &mut Entity, derive_ctx: &DeriveContext) {
    let moving = e.velocity_mps.max_abs() > MOVING_THRESHOLD_MPS;
    let demand = if moving { MOVING_DEMAND_W } else { IDLE_DEMAND_W };

    step_energy_and_fatigue(&e.attributes, &mut e.energy, &e.loadout, demand, DT_S, derive_ctx);

    if !moving && e.injury.shock < IDLE_RECOVERY_MAX_SHOCK {
        let recovered = q_mul(IDLE_RECOVERY_PER_TICK, e.attributes.resilience.recovery_rate);
        e.energy.fatigue = clamp01(e.energy.fatigue - recovered);
    }
}
