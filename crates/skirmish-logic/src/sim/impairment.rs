//! Functional capability from injury, fatigue, stun and consciousness.
//!
//! A pure read of the entity. Recompute it whenever it is needed; never
//! carry a result across a point where damage may have landed.

use crate::units::{clamp_q, q, q_mul, scale, Q};

use super::entity::Entity;
use super::tuning::SimulationTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionalState {
    pub mobility_mul: Q,
    pub manipulation_mul: Q,
    pub coordination_mul: Q,
    pub stamina_mul: Q,

    pub left_arm_disabled: bool,
    pub right_arm_disabled: bool,
    pub left_leg_disabled: bool,
    pub right_leg_disabled: bool,

    pub can_stand: bool,
    pub can_act: bool,
}

impl FunctionalState {
    pub fn both_arms_disabled(&self) -> bool {
        self.left_arm_disabled && self.right_arm_disabled
    }

    pub fn both_legs_disabled(&self) -> bool {
        self.left_leg_disabled && self.right_leg_disabled
    }
}

fn mean2(a: Q, b: Q) -> Q {
    (a + b) / 2
}

/// `base - Σ value·weight`, clamped.
fn impaired(base: Q, min_out: Q, max_out: Q, terms: &[(Q, Q)]) -> Q {
    let out = terms.iter().fold(base, |acc, &(value, weight)| acc - q_mul(value, weight));
    clamp_q(out, min_out, max_out)
}

pub fn derive_functional_state(e: &Entity, tuning: &SimulationTuning) -> FunctionalState {
    let r = &e.injury.by_region;

    let leg_str = mean2(r.left_leg.structural_damage, r.right_leg.structural_damage);
    let leg_int = mean2(r.left_leg.internal_damage, r.right_leg.internal_damage);
    let arm_str = mean2(r.left_arm.structural_damage, r.right_arm.structural_damage);
    let arm_int = mean2(r.left_arm.internal_damage, r.right_arm.internal_damage);
    let head_int = r.head.internal_damage;
    let head_str = r.head.structural_damage;

    let shock = e.injury.shock;
    let fatigue = e.energy.fatigue;
    let stun = e.condition.stunned;
    let conc_loss = scale::Q - e.injury.consciousness;
    let fluid_loss = e.injury.fluid_loss;

    let mobility_mul = impaired(
        scale::Q,
        q(0.05),
        scale::Q,
        &[
            (leg_str, q(0.60)),
            (leg_int, q(0.25)),
            (shock, q(0.15)),
            (fatigue, q(0.25)),
            (stun, q(0.35)),
            (conc_loss, q(0.10)),
        ],
    );

    let manipulation_mul = impaired(
        scale::Q,
        q(0.05),
        scale::Q,
        &[
            (arm_str, q(0.55)),
            (arm_int, q(0.20)),
            (shock, q(0.10)),
            (fatigue, q(0.20)),
            (stun, q(0.25)),
            (conc_loss, q(0.20)),
        ],
    );

    let coordination_mul = impaired(
        scale::Q,
        q(0.05),
        scale::Q,
        &[
            (head_int, q(0.45)),
            (head_str, q(0.15)),
            (shock, q(0.20)),
            (fatigue, q(0.20)),
            (stun, q(0.40)),
            (conc_loss, q(0.35)),
        ],
    );

    let stamina_mul = impaired(
        scale::Q,
        0,
        scale::Q,
        &[(fatigue, q(0.65)), (shock, q(0.15)), (fluid_loss, q(0.35))],
    );

    let left_arm_disabled = r.left_arm.structural_damage >= tuning.arm_disable_threshold;
    let right_arm_disabled = r.right_arm.structural_damage >= tuning.arm_disable_threshold;
    let left_leg_disabled = r.left_leg.structural_damage >= tuning.leg_disable_threshold;
    let right_leg_disabled = r.right_leg.structural_damage >= tuning.leg_disable_threshold;

    let can_act = e.injury.consciousness >= tuning.unconscious_threshold && !e.injury.dead;
    let legs_out = left_leg_disabled && right_leg_disabled;
    let can_stand = can_act && !legs_out && mobility_mul >= tuning.stand_fail_threshold;

    FunctionalState {
        mobility_mul,
        manipulation_mul,
        coordination_mul,
        stamina_mul,
        left_arm_disabled,
        right_arm_disabled,
        left_leg_disabled,
        right_leg_disabled,
        can_stand,
        can_act,
    }
}
