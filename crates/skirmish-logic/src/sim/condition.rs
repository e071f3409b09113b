use serde::{Deserialize, Serialize};

use crate::units::Q;

/// Environmental exposure and posture. Intensities are `0..1` in `Q`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionState {
    /// Thermal exposure.
    pub on_fire: Q,
    pub corrosive_exposure: Q,
    pub radiation: Q,
    pub electrical_overload: Q,
    /// Hypoxia, vacuum or fluid intrusion.
    pub suffocation: Q,
    /// Control disruption.
    pub stunned: Q,

    pub prone: bool,

    /// Ticks before another stand-up attempt is allowed.
    pub stand_blocked_ticks: u32,
    /// Ticks of enforced unconsciousness remaining.
    pub unconscious_ticks: u32,
    /// A stand-up completes once `stand_blocked_ticks` runs out.
    pub standing_up: bool,
}
