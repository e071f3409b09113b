//! Procedural generation of individuals from an archetype and a seed.
//!
//! Size deliberately has damped influence on strength: actuator scale
//! takes only a quarter of the combined stature/mass deviation, structure
//! scale an eighth. Every output is clamped to a fixed band.
//!
//! The draw order below is part of the determinism contract. Each field
//! consumes exactly one symmetric triangular sample, in this order, with
//! no data-dependent branching:
//!
//! stature, mass, reach, actuator scale, structure scale, actuator mass
//! fraction, peak force, peak power, continuous power, reserve energy,
//! efficiency, control, reaction time, stability, fine control, surface,
//! bulk and structure integrity, distress, shock and concussion tolerance,
//! heat and cold tolerance, fatigue rate, recovery rate.

use crate::archetypes::Archetype;
use crate::dist::{mul_from_variation, skew_up, tri_sym};
use crate::rng::{make_rng, Rng};
use crate::types::{Control, IndividualAttributes, Morphology, Performance, Resilience};
use crate::units::{clamp_i32, clamp_q, mul_div, q, q_mul, scale, Q};

fn apply_mult(base: i32, mult: Q) -> i32 {
    mul_div(base, mult, scale::Q)
}

/// Cheap stand-in for the square root of a multiplier near 1.
fn sqrt_near1(mult: Q) -> Q {
    (mult + scale::Q) >> 1
}

fn vary(rng: &mut Rng, amplitude: Q) -> Q {
    mul_from_variation(tri_sym(rng), amplitude)
}

fn scaled(base: Q, rng: &mut Rng, amplitude: Q, lo: f64, hi: f64) -> Q {
    clamp_q(q_mul(base, vary(rng, amplitude)), q(lo), q(hi))
}

pub fn generate_individual(seed: u32, arch: &Archetype) -> IndividualAttributes {
    let mut rng = make_rng(seed, scale::Q);

    let stature_mult = vary(&mut rng, arch.stature_var);
    let mass_mult = vary(&mut rng, arch.mass_var);
    let reach_mult = vary(&mut rng, arch.reach_var);
    let actuator_scale_base = vary(&mut rng, arch.actuator_scale_var);

    let size_composite = q_mul(sqrt_near1(stature_mult), sqrt_near1(mass_mult));
    let size_dev = size_composite - scale::Q;

    let actuator_scale = clamp_q(
        q_mul(actuator_scale_base, scale::Q + (size_dev >> 2)),
        q(0.6),
        q(1.8),
    );

    let structure_scale_base = vary(&mut rng, arch.structure_scale_var);
    let structure_scale = clamp_q(
        q_mul(structure_scale_base, scale::Q + (size_dev >> 3)),
        q(0.7),
        q(2.0),
    );

    let stature_m = apply_mult(arch.stature_m, stature_mult);
    let mass_kg = apply_mult(arch.mass_kg, mass_mult);

    let actuator_frac_var = vary(&mut rng, arch.actuator_mass_var);
    let actuator_frac = clamp_q(q_mul(arch.actuator_mass_frac, actuator_frac_var), q(0.15), q(0.70));
    let actuator_mass_kg = clamp_i32(
        mul_div(mass_kg, actuator_frac, scale::Q),
        mul_div(mass_kg, q(0.15), scale::Q),
        mul_div(mass_kg, q(0.70), scale::Q),
    );

    let force_rand = vary(&mut rng, arch.peak_force_var);
    let force_couple = clamp_q(
        q_mul(actuator_scale, scale::Q + ((actuator_frac - arch.actuator_mass_frac) >> 1)),
        q(0.6),
        q(2.2),
    );
    let peak_force_mult = clamp_q(q_mul(force_rand, force_couple), q(0.5), q(2.5));

    let power_rand = vary(&mut rng, arch.peak_power_var);
    let power_mult = clamp_q(skew_up(q_mul(power_rand, actuator_scale), 1), q(0.5), q(3.0));

    let cont_rand = vary(&mut rng, arch.continuous_power_var);
    let cont_mult = clamp_q(q_mul(cont_rand, sqrt_near1(actuator_frac)), q(0.4), q(3.0));

    let reserve_rand = vary(&mut rng, arch.reserve_energy_var);
    let reserve_mult = clamp_q(q_mul(reserve_rand, sqrt_near1(actuator_frac)), q(0.3), q(4.0));

    let conversion_efficiency = scaled(arch.conversion_efficiency, &mut rng, arch.efficiency_var, 0.45, 0.98);

    let control_quality = scaled(arch.control_quality, &mut rng, arch.control_var, 0.15, 0.98);

    let react_mult = vary(&mut rng, arch.reaction_time_var);
    let react_couple = clamp_q(scale::Q + ((scale::Q - control_quality) >> 2), q(0.75), q(1.30));
    let reaction_time_s = apply_mult(arch.reaction_time_s, q_mul(react_mult, react_couple));

    let stability = scaled(arch.stability, &mut rng, arch.stability_var, 0.05, 0.99);
    let fine_control = scaled(arch.fine_control, &mut rng, arch.fine_control_var, 0.05, 0.99);

    let surface_integrity = scaled(arch.surface_integrity, &mut rng, arch.surface_var, 0.4, 3.0);
    let bulk_integrity = scaled(arch.bulk_integrity, &mut rng, arch.bulk_var, 0.4, 3.0);
    let structure_integrity = scaled(arch.structure_integrity, &mut rng, arch.struct_var, 0.4, 3.0);

    let distress_tolerance = scaled(arch.distress_tolerance, &mut rng, arch.distress_var, 0.01, 0.98);
    let shock_tolerance = scaled(arch.shock_tolerance, &mut rng, arch.shock_var, 0.01, 0.98);
    let concussion_tolerance = scaled(arch.concussion_tolerance, &mut rng, arch.conc_var, 0.01, 0.98);

    let heat_tolerance = scaled(arch.heat_tolerance, &mut rng, arch.heat_var, 0.01, 0.98);
    let cold_tolerance = scaled(arch.cold_tolerance, &mut rng, arch.cold_var, 0.01, 0.98);

    let fatigue_rate = scaled(arch.fatigue_rate, &mut rng, arch.fatigue_var, 0.4, 2.5);
    let recovery_rate = scaled(arch.recovery_rate, &mut rng, arch.recovery_var, 0.4, 2.5);

    IndividualAttributes {
        morphology: Morphology {
            stature_m,
            mass_kg,
            actuator_mass_kg,
            actuator_scale,
            structure_scale,
            reach_scale: reach_mult,
        },
        performance: Performance {
            peak_force_n: apply_mult(arch.peak_force_n, peak_force_mult),
            peak_power_w: apply_mult(arch.peak_power_w, power_mult),
            continuous_power_w: apply_mult(arch.continuous_power_w, cont_mult),
            reserve_energy_j: apply_mult(arch.reserve_energy_j, reserve_mult),
            conversion_efficiency,
        },
        control: Control {
            control_quality,
            reaction_time_s,
            stability,
            fine_control,
        },
        resilience: Resilience {
            surface_integrity,
            bulk_integrity,
            structure_integrity,
            distress_tolerance,
            shock_tolerance,
            concussion_tolerance,
            heat_tolerance,
            cold_tolerance,
            fatigue_rate,
            recovery_rate,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes::{HUMAN_BASE, SERVICE_ROBOT};

    #[test]
    fn test_generation_is_pure() {
        assert_eq!(generate_individual(123, &HUMAN_BASE), generate_individual(123, &HUMAN_BASE));
        assert_eq!(generate_individual(9, &SERVICE_ROBOT), generate_individual(9, &SERVICE_ROBOT));
    }

    #[test]
    fn test_different_seeds_differ() {
        let distinct = (1..=20u32)
            .filter(|s| generate_individual(*s, &HUMAN_BASE) != generate_individual(s + 1000, &HUMAN_BASE))
            .count();
        assert_eq!(distinct, 20);
    }

    #[test]
    fn test_fields_within_bands() {
        for seed in 0..500u32 {
            let a = generate_individual(seed, &HUMAN_BASE);
            let m = a.morphology;
            assert!((q(0.6)..=q(1.8)).contains(&m.actuator_scale));
            assert!((q(0.7)..=q(2.0)).contains(&m.structure_scale));
            assert!(m.actuator_mass_kg >= mul_div(m.mass_kg, q(0.15), scale::Q));
            assert!(m.actuator_mass_kg <= mul_div(m.mass_kg, q(0.70), scale::Q));

            let c = a.control;
            assert!((q(0.15)..=q(0.98)).contains(&c.control_quality));
            assert!((q(0.05)..=q(0.99)).contains(&c.stability));
            assert!((q(0.05)..=q(0.99)).contains(&c.fine_control));

            let p = a.performance;
            assert!((q(0.45)..=q(0.98)).contains(&p.conversion_efficiency));
            assert!(p.peak_force_n >= HUMAN_BASE.peak_force_n / 2);
            assert!(p.peak_force_n <= HUMAN_BASE.peak_force_n * 5 / 2);

            let r = a.resilience;
            assert!((q(0.4)..=q(2.5)).contains(&r.fatigue_rate));
            assert!((q(0.01)..=q(0.98)).contains(&r.shock_tolerance));
        }
    }

    #[test]
    fn test_human_near_archetype_baseline() {
        let n = 200;
        let total: i64 = (0..n)
            .map(|s| generate_individual(s, &HUMAN_BASE).morphology.stature_m as i64)
            .sum();
        let mean = total / n as i64;
        assert!((mean - HUMAN_BASE.stature_m as i64).abs() < 300, "mean stature {}", mean);
    }
}
