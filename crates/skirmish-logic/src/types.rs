//! Physiology records shared by generation, derivation and the kernel.

use serde::{Deserialize, Serialize};

use crate::units::{I32, Q};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morphology {
    pub stature_m: I32,
    pub mass_kg: I32,
    pub actuator_mass_kg: I32,
    pub actuator_scale: Q,
    pub structure_scale: Q,
    pub reach_scale: Q,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performance {
    pub peak_force_n: I32,
    pub peak_power_w: I32,
    pub continuous_power_w: I32,
    pub reserve_energy_j: I32,
    pub conversion_efficiency: Q,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    /// 0..1
    pub control_quality: Q,
    pub reaction_time_s: I32,
    /// 0..1
    pub stability: Q,
    /// 0..1
    pub fine_control: Q,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resilience {
    pub surface_integrity: Q,
    pub bulk_integrity: Q,
    pub structure_integrity: Q,

    pub distress_tolerance: Q,
    pub shock_tolerance: Q,
    pub concussion_tolerance: Q,

    pub heat_tolerance: Q,
    pub cold_tolerance: Q,

    /// 1.0 is baseline.
    pub fatigue_rate: Q,
    /// 1.0 is baseline.
    pub recovery_rate: Q,
}

/// Complete physiology of one individual. Read-only during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualAttributes {
    pub morphology: Morphology,
    pub performance: Performance,
    pub control: Control,
    pub resilience: Resilience,
}

/// Mutable energy budget. Only `derive::step_energy_and_fatigue` and the
/// kernel's idle recovery touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnergyState {
    pub reserve_energy_j: I32,
    /// 0..1
    pub fatigue: Q,
}

impl EnergyState {
    /// Full reserve, no fatigue.
    pub fn rested(attrs: &IndividualAttributes) -> Self {
        Self {
            reserve_energy_j: attrs.performance.reserve_energy_j,
            fatigue: 0,
        }
    }
}
