use serde::{Deserialize, Serialize};

use crate::units::{q, Q};

use super::vec3::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveMode {
    #[default]
    Walk,
    Run,
    Sprint,
}

impl MoveMode {
    /// Fraction of sprint speed targeted in this gait.
    pub fn speed_mul(self) -> Q {
        match self {
            MoveMode::Walk => q(0.40),
            MoveMode::Run => q(0.70),
            MoveMode::Sprint => q(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenceMode {
    #[default]
    None,
    Block,
    Parry,
    Dodge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveIntent {
    pub dir: Vec3,
    /// 0..1
    pub intensity: Q,
    pub mode: MoveMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DefenceIntent {
    pub mode: DefenceMode,
    /// 0..1
    pub intensity: Q,
}

/// What the entity is trying to do this tick. Re-derived from commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntentState {
    pub movement: MoveIntent,
    pub defence: DefenceIntent,
    pub prone: bool,
}

/// Per-entity AI memory: current focus and how long to keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AiState {
    /// 0 means no focus.
    pub focus_target_id: u32,
    pub retarget_cooldown_ticks: u32,
}
