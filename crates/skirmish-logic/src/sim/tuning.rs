//! Realism profiles: disable thresholds, knockout and stand-up timing, and
//! the per-tick chance of stumbles and falls.

use serde::{Deserialize, Serialize};

use crate::units::{q, Q};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Realism {
    Arcade,
    #[default]
    Tactical,
    Sim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationTuning {
    pub realism: Realism,

    /// Regional structural damage at which a limb stops working.
    pub arm_disable_threshold: Q,
    pub leg_disable_threshold: Q,

    /// Mobility below this cannot stand.
    pub stand_fail_threshold: Q,
    /// Consciousness below this cannot act.
    pub unconscious_threshold: Q,

    pub stumble_base_chance: Q,
    pub fall_base_chance: Q,

    pub drop_weapons_on_unconscious: bool,
    pub stand_up_base_ticks: u32,
    pub stand_up_max_extra_ticks: u32,
    pub unconscious_base_ticks: u32,
}

impl SimulationTuning {
    pub fn for_realism(realism: Realism) -> Self {
        match realism {
            Realism::Arcade => Self {
                realism,
                arm_disable_threshold: q(0.98),
                leg_disable_threshold: q(0.98),
                stand_fail_threshold: q(0.05),
                unconscious_threshold: q(0.03),
                stumble_base_chance: 0,
                fall_base_chance: 0,
                drop_weapons_on_unconscious: false,
                stand_up_base_ticks: 0,
                stand_up_max_extra_ticks: 0,
                unconscious_base_ticks: 5,
            },
            Realism::Tactical => Self {
                realism,
                arm_disable_threshold: q(0.85),
                leg_disable_threshold: q(0.90),
                stand_fail_threshold: q(0.20),
                unconscious_threshold: q(0.10),
                stumble_base_chance: q(0.002),
                fall_base_chance: q(0.001),
                drop_weapons_on_unconscious: false,
                stand_up_base_ticks: 15,
                stand_up_max_extra_ticks: 45,
                unconscious_base_ticks: 30,
            },
            Realism::Sim => Self {
                realism,
                arm_disable_threshold: q(0.75),
                leg_disable_threshold: q(0.80),
                stand_fail_threshold: q(0.30),
                unconscious_threshold: q(0.15),
                stumble_base_chance: q(0.010),
                fall_base_chance: q(0.005),
                drop_weapons_on_unconscious: true,
                stand_up_base_ticks: 25,
                stand_up_max_extra_ticks: 80,
                unconscious_base_ticks: 60,
            },
        }
    }
}

impl Default for SimulationTuning {
    fn default() -> Self {
        Self::for_realism(Realism::Tactical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_get_stricter_with_realism() {
        let [a, t, s] = [Realism::Arcade, Realism::Tactical, Realism::Sim].map(SimulationTuning::for_realism);
        assert!(a.arm_disable_threshold > t.arm_disable_threshold);
        assert!(t.arm_disable_threshold > s.arm_disable_threshold);
        assert!(a.unconscious_base_ticks < t.unconscious_base_ticks);
        assert!(s.drop_weapons_on_unconscious && !t.drop_weapons_on_unconscious);
        assert_eq!(a.stumble_base_chance, 0);
    }

    #[test]
    fn test_default_is_tactical() {
        assert_eq!(SimulationTuning::default().realism, Realism::Tactical);
    }
}
