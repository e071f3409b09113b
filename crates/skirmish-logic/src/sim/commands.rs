//! Externally supplied per-tick intents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::equipment::ItemId;
use crate::units::{scale, Q};

use super::entity::EntityId;
use super::intent::{DefenceMode, MoveMode};
use super::vec3::Vec3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    Move {
        dir: Vec3,
        intensity: Q,
        mode: MoveMode,
    },
    SetProne {
        prone: bool,
    },
    Defend {
        mode: DefenceMode,
        intensity: Q,
    },
    Attack {
        target_id: EntityId,
        weapon_id: Option<ItemId>,
        intensity: Option<Q>,
    },
    /// Attack whichever enemy the engagement rules pick this tick.
    AttackNearest {
        weapon_id: Option<ItemId>,
        intensity: Option<Q>,
    },
}

/// Commands per entity for one tick, in issue order.
pub type CommandMap = BTreeMap<EntityId, Vec<Command>>;

pub fn make_attack_command(target_id: EntityId, weapon_id: Option<&str>, intensity: Option<Q>) -> Command {
    Command::Attack {
        target_id,
        weapon_id: weapon_id.map(str::to_owned),
        intensity,
    }
}

pub fn attack_nearest(weapon_id: Option<&str>, intensity: Option<Q>) -> Command {
    Command::AttackNearest {
        weapon_id: weapon_id.map(str::to_owned),
        intensity,
    }
}

pub fn move_dir(dir: Vec3, intensity: Q, mode: MoveMode) -> Command {
    Command::Move { dir, intensity, mode }
}

pub fn no_move() -> Command {
    Command::Move {
        dir: Vec3::ZERO,
        intensity: 0,
        mode: MoveMode::Walk,
    }
}

pub fn set_prone(prone: bool) -> Command {
    Command::SetProne { prone }
}

pub fn defend_none() -> Command {
    Command::Defend {
        mode: DefenceMode::None,
        intensity: 0,
    }
}

pub fn defend_block(intensity: Q) -> Command {
    Command::Defend {
        mode: DefenceMode::Block,
        intensity,
    }
}

pub fn defend_parry(intensity: Q) -> Command {
    Command::Defend {
        mode: DefenceMode::Parry,
        intensity,
    }
}

pub fn defend_dodge(intensity: Q) -> Command {
    Command::Defend {
        mode: DefenceMode::Dodge,
        intensity,
    }
}

/// Full-intensity defence in the given mode.
pub fn defend_full(mode: DefenceMode) -> Command {
    let intensity = if mode == DefenceMode::None { 0 } else { scale::Q };
    Command::Defend { mode, intensity }
}
