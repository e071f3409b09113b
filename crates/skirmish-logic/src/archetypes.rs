//! Archetype templates for procedural generation.
//!
//! An archetype fixes the baseline physiology of a kind of individual and
//! the amplitude of random variation around each baseline. Values are in
//! the fixed scales of [`crate::units`].

use serde::{Deserialize, Serialize};

use crate::units::{I32, Q};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archetype {
    pub stature_m: I32,
    pub mass_kg: I32,

    pub stature_var: Q,
    pub mass_var: Q,

    pub reach_var: Q,
    pub actuator_scale_var: Q,
    pub structure_scale_var: Q,

    pub actuator_mass_frac: Q,
    pub actuator_mass_var: Q,

    pub peak_force_n: I32,
    pub peak_force_var: Q,

    pub peak_power_w: I32,
    pub peak_power_var: Q,

    pub continuous_power_w: I32,
    pub continuous_power_var: Q,

    pub reserve_energy_j: I32,
    pub reserve_energy_var: Q,

    pub conversion_efficiency: Q,
    pub efficiency_var: Q,

    pub reaction_time_s: I32,
    pub reaction_time_var: Q,
    pub control_quality: Q,
    pub control_var: Q,

    pub stability: Q,
    pub stability_var: Q,
    pub fine_control: Q,
    pub fine_control_var: Q,

    pub surface_integrity: Q,
    pub surface_var: Q,
    pub bulk_integrity: Q,
    pub bulk_var: Q,
    pub structure_integrity: Q,
    pub struct_var: Q,

    pub distress_tolerance: Q,
    pub distress_var: Q,
    pub shock_tolerance: Q,
    pub shock_var: Q,
    pub concussion_tolerance: Q,
    pub conc_var: Q,

    pub heat_tolerance: Q,
    pub heat_var: Q,
    pub cold_tolerance: Q,
    pub cold_var: Q,

    pub fatigue_rate: Q,
    pub fatigue_var: Q,
    pub recovery_rate: Q,
    pub recovery_var: Q,
}

/// Baseline adult human: 1.75 m, 75 kg, 1840 N peak force, 1200 W peak power.
pub const HUMAN_BASE: Archetype = Archetype {
    stature_m: 17_500,
    mass_kg: 75_000,

    stature_var: 800,
    mass_var: 1_800,

    reach_var: 1_000,
    actuator_scale_var: 1_800,
    structure_scale_var: 1_400,

    actuator_mass_frac: 4_000,
    actuator_mass_var: 2_000,

    peak_force_n: 184_000,
    peak_force_var: 2_200,

    peak_power_w: 1_200,
    peak_power_var: 3_000,

    continuous_power_w: 200,
    continuous_power_var: 2_500,

    reserve_energy_j: 20_000,
    reserve_energy_var: 3_500,

    conversion_efficiency: 8_500,
    efficiency_var: 1_000,

    reaction_time_s: 2_000,
    reaction_time_var: 2_500,
    control_quality: 7_500,
    control_var: 2_000,

    stability: 7_000,
    stability_var: 2_200,
    fine_control: 7_000,
    fine_control_var: 2_500,

    surface_integrity: 10_000,
    surface_var: 1_800,
    bulk_integrity: 10_000,
    bulk_var: 1_800,
    structure_integrity: 10_000,
    struct_var: 1_800,

    distress_tolerance: 5_000,
    distress_var: 3_000,
    shock_tolerance: 5_000,
    shock_var: 3_000,
    concussion_tolerance: 5_000,
    conc_var: 3_000,

    heat_tolerance: 5_000,
    heat_var: 3_000,
    cold_tolerance: 5_000,
    cold_var: 3_000,

    fatigue_rate: 10_000,
    fatigue_var: 2_500,
    recovery_rate: 10_000,
    recovery_var: 2_500,
};

/// Light service robot: tight tolerances, large reserve, fast reactions.
pub const SERVICE_ROBOT: Archetype = Archetype {
    stature_m: 16_000,
    mass_kg: 55_000,

    stature_var: 300,
    mass_var: 600,

    reach_var: 500,
    actuator_scale_var: 1_200,
    structure_scale_var: 2_000,

    actuator_mass_frac: 2_200,
    actuator_mass_var: 1_200,

    peak_force_n: 250_000,
    peak_force_var: 1_000,

    peak_power_w: 900,
    peak_power_var: 1_200,

    continuous_power_w: 350,
    continuous_power_var: 1_000,

    reserve_energy_j: 60_000,
    reserve_energy_var: 1_500,

    conversion_efficiency: 9_200,
    efficiency_var: 300,

    reaction_time_s: 800,
    reaction_time_var: 1_000,
    control_quality: 8_800,
    control_var: 800,

    stability: 8_000,
    stability_var: 1_200,
    fine_control: 8_500,
    fine_control_var: 1_000,

    surface_integrity: 16_000,
    surface_var: 1_000,
    bulk_integrity: 12_000,
    bulk_var: 1_000,
    structure_integrity: 18_000,
    struct_var: 1_200,

    distress_tolerance: 9_500,
    distress_var: 500,
    shock_tolerance: 8_500,
    shock_var: 800,
    concussion_tolerance: 9_500,
    conc_var: 500,

    heat_tolerance: 7_000,
    heat_var: 1_200,
    cold_tolerance: 9_000,
    cold_var: 800,

    fatigue_rate: 7_000,
    fatigue_var: 1_000,
    recovery_rate: 12_000,
    recovery_var: 1_000,
};
