use serde::{Deserialize, Serialize};

use crate::units::scale;

use super::vec3::{v3, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
    pub attack_cooldown_ticks: u32,
    pub defence_cooldown_ticks: u32,
    /// Cheap-normalised facing (largest component is `Q`).
    pub facing_dir_q: Vec3,
}

impl Default for ActionState {
    fn default() -> Self {
        Self {
            attack_cooldown_ticks: 0,
            defence_cooldown_ticks: 0,
            facing_dir_q: v3(scale::Q, 0, 0),
        }
    }
}
