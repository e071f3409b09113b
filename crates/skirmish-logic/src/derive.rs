//! Movement capability and energy expenditure.
//!
//! All formulas are physical analogies evaluated in fixed point: acceleration
//! is force over mass capped by traction, sprint speed scales with the cube
//! root of power-to-mass, jump height is usable energy over `m g`.

use serde::{Deserialize, Serialize};

use crate::equipment::{compute_encumbrance, derive_armour_profile, CarryRules, Loadout};
use crate::types::{EnergyState, IndividualAttributes};
use crate::units::{cbrt_q, clamp_q, mul_div, mul_div_wide, q, q_mul, scale, sqrt_q, I32, Q, G_MPS2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementCaps {
    pub max_sprint_speed_mps: I32,
    pub max_acceleration_mps2: I32,
    pub jump_height_m: I32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeriveContext {
    pub traction_coeff: Q,
    #[serde(default)]
    pub carry_rules: CarryRules,
}

impl Default for DeriveContext {
    fn default() -> Self {
        Self {
            traction_coeff: q(0.9),
            carry_rules: CarryRules::default(),
        }
    }
}

fn control_factor(a: &IndividualAttributes, base: Q, span: Q) -> Q {
    base + q_mul(span, a.control.control_quality)
}

/// Peak force after actuator scale and control quality.
pub fn derive_peak_force_eff_n(a: &IndividualAttributes) -> I32 {
    let combined = q_mul(a.morphology.actuator_scale, control_factor(a, q(0.7), q(0.3)));
    mul_div(a.performance.peak_force_n, combined, scale::Q)
}

pub fn derive_max_acceleration_mps2(a: &IndividualAttributes, traction_coeff: Q) -> I32 {
    let m = a.morphology.mass_kg.max(1) as i64;

    let normal_force_n = mul_div_wide(
        m,
        G_MPS2 as i64 * scale::N as i64,
        scale::MPS2 as i64 * scale::KG as i64,
    );
    let traction_limit_n = mul_div_wide(normal_force_n, traction_coeff as i64, scale::Q as i64);
    let usable_n = (derive_peak_force_eff_n(a) as i64).min(traction_limit_n);

    mul_div_wide(usable_n, (scale::KG * scale::MPS2) as i64, m * scale::N as i64) as I32
}

pub fn derive_max_sprint_speed_mps(a: &IndividualAttributes) -> I32 {
    let m = a.morphology.mass_kg.max(1) as i64;
    let p = a.performance.peak_power_w as i64;

    let p2m = mul_div_wide(p * scale::Q as i64, scale::KG as i64, m) as Q;
    let c = cbrt_q(p2m.max(1));
    let reach_sqrt = sqrt_q(a.morphology.reach_scale);

    let k = q(6.2);
    let mult = q_mul(
        q_mul(q_mul(q_mul(k, c), reach_sqrt), control_factor(a, q(0.6), q(0.4))),
        a.performance.conversion_efficiency,
    );
    mul_div(mult, scale::MPS, scale::Q)
}

/// Height reached by spending up to `reserve_spend_j` of reserve energy.
pub fn derive_jump_height_m(a: &IndividualAttributes, reserve_spend_j: I32) -> I32 {
    let m = a.morphology.mass_kg.max(1);
    let e_use = a.performance.reserve_energy_j.min(reserve_spend_j);

    let e_eff = mul_div(
        mul_div(e_use, a.performance.conversion_efficiency, scale::Q),
        control_factor(a, q(0.7), q(0.3)),
        scale::Q,
    );

    let weight = mul_div(m, 9_810, scale::KG);
    mul_div(e_eff, scale::M, weight.max(1))
}

/// Sprint, acceleration and jump limits after encumbrance and armour.
pub fn derive_movement_caps(a: &IndividualAttributes, loadout: &Loadout, ctx: &DeriveContext) -> MovementCaps {
    let penalties = compute_encumbrance(a, loadout, &ctx.carry_rules).penalties;
    let armour = derive_armour_profile(loadout);

    let speed_mul = q_mul(penalties.speed_mul, armour.mobility_mul);
    let accel_mul = q_mul(penalties.accel_mul, armour.mobility_mul);
    let jump_mul = q_mul(penalties.jump_mul, armour.mobility_mul);

    let base_v = derive_max_sprint_speed_mps(a);
    let base_a = derive_max_acceleration_mps2(a, ctx.traction_coeff);
    let base_h = derive_jump_height_m(a, a.performance.reserve_energy_j / 6);

    MovementCaps {
        max_sprint_speed_mps: mul_div(base_v, speed_mul, scale::Q),
        max_acceleration_mps2: mul_div(base_a, accel_mul, scale::Q),
        jump_height_m: mul_div(base_h, jump_mul, scale::Q),
    }
}

/// Spend energy for `demanded_power_w` over `dt_s`.
///
/// Demand up to continuous power is free; the excess drains reserve
/// (divided by conversion efficiency) and raises fatigue in proportion to
/// the fraction of reserve capacity drained.
pub fn step_energy_and_fatigue(
    a: &IndividualAttributes,
    state: &mut EnergyState,
    loadout: &Loadout,
    demanded_power_w: I32,
    dt_s: I32,
    ctx: &DeriveContext,
) {
    let penalties = compute_encumbrance(a, loadout, &ctx.carry_rules).penalties;
    let armour = derive_armour_profile(loadout);
    let demand_mul = q_mul(penalties.energy_demand_mul, armour.fatigue_mul);

    let p = mul_div(demanded_power_w, demand_mul, scale::Q);
    let e_need = mul_div(p, dt_s, scale::S);
    let e_sustain = mul_div(p.min(a.performance.continuous_power_w), dt_s, scale::S);
    let e_excess = (e_need - e_sustain).max(0);

    let eff = a.performance.conversion_efficiency.max(1);
    let drain = mul_div(e_excess, scale::Q, eff);

    state.reserve_energy_j = (state.reserve_energy_j - drain).max(0);

    let cap = a.performance.reserve_energy_j.max(1);
    let step_frac = mul_div(drain, scale::Q, cap);

    let delta = q_mul(q_mul(q(0.15), step_frac), a.resilience.fatigue_rate);
    state.fatigue = clamp_q(state.fatigue + delta, 0, scale::Q);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes::HUMAN_BASE;
    use crate::equipment::starter_armour;
    use crate::generate::generate_individual;
    use crate::units::to;

    #[test]
    fn test_armour_slows_movement_caps() {
        let a = generate_individual(999, &HUMAN_BASE);
        let ctx = DeriveContext::default();
        let none = derive_movement_caps(&a, &Loadout::default(), &ctx);
        let mail = Loadout::new(vec![starter_armour()[1].clone()]);
        let armoured = derive_movement_caps(&a, &mail, &ctx);
        assert!(armoured.max_sprint_speed_mps < none.max_sprint_speed_mps);
        assert!(armoured.max_acceleration_mps2 < none.max_acceleration_mps2);
    }

    #[test]
    fn test_acceleration_capped_by_traction() {
        let a = generate_individual(5, &HUMAN_BASE);
        let grippy = derive_max_acceleration_mps2(&a, q(0.9));
        let icy = derive_max_acceleration_mps2(&a, q(0.05));
        assert!(icy < grippy);
        // 0.05 g is the ceiling on ice.
        assert!(icy <= mul_div(G_MPS2, q(0.05), scale::Q) + 1);
    }

    #[test]
    fn test_movement_caps_positive_for_humans() {
        for seed in 1..20 {
            let a = generate_individual(seed, &HUMAN_BASE);
            let caps = derive_movement_caps(&a, &Loadout::default(), &DeriveContext::default());
            assert!(caps.max_sprint_speed_mps > to::mps(1.0), "seed {seed}");
            assert!(caps.max_acceleration_mps2 > 0);
            assert!(caps.jump_height_m > 0);
        }
    }

    #[test]
    fn test_sustainable_demand_costs_nothing() {
        let a = generate_individual(3, &HUMAN_BASE);
        let mut e = EnergyState::rested(&a);
        let before = e;
        step_energy_and_fatigue(&a, &mut e, &Loadout::default(), 10, to::s(0.05), &DeriveContext::default());
        assert_eq!(e, before);
    }

    #[test]
    fn test_excess_demand_drains_and_fatigues() {
        let a = generate_individual(3, &HUMAN_BASE);
        let mut e = EnergyState::rested(&a);
        for _ in 0..200 {
            step_energy_and_fatigue(&a, &mut e, &Loadout::default(), 5_000, to::s(0.05), &DeriveContext::default());
        }
        assert!(e.reserve_energy_j < a.performance.reserve_energy_j);
        assert!(e.fatigue > 0);
        assert!(e.fatigue <= scale::Q);
    }
}
