use serde::{Deserialize, Serialize};

use crate::units::{I32, Q};

/// Fighting style an AI policy is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiArchetype {
    /// Keeps a longer range, prefers dodging, switches targets readily.
    Skirmisher,
    /// Holds close formation range, parries, sticks to a target.
    LineInfantry,
    /// Closes hard, barely defends, never retreats.
    Berserker,
    /// Holds ground behind a block and defends early.
    Defender,
}

/// Tunables for one AI-driven entity. Distances are in metres (`SCALE.m`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiPolicy {
    pub archetype: AiArchetype,

    /// Range the entity tries to hold to its target.
    pub desired_range_m: I32,
    /// Beyond this it sprints instead of running.
    pub engage_range_m: I32,
    /// Closer than this it backs off.
    pub retreat_range_m: I32,

    pub threat_range_m: I32,
    /// Defence intensity used while threatened.
    pub defend_when_threatened: Q,
    pub parry_bias: Q,
    pub dodge_bias: Q,

    pub retarget_cooldown_ticks: u32,
    /// Chance of keeping the previous target when the cooldown has run out.
    pub focus_stickiness: Q,
}
