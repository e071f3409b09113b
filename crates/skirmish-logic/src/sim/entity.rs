use serde::{Deserialize, Serialize};

use crate::equipment::Loadout;
use crate::traits::TraitId;
use crate::types::{EnergyState, IndividualAttributes};

use super::action::ActionState;
use super::condition::ConditionState;
use super::injury::InjuryState;
use super::intent::{AiState, IntentState};
use super::vec3::Vec3;

pub type EntityId = u32;
pub type TeamId = u32;

/// One embodied agent. Other entities are only ever referred to by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub team_id: TeamId,

    pub attributes: IndividualAttributes,
    pub energy: EnergyState,

    pub loadout: Loadout,
    pub traits: Vec<TraitId>,

    pub position_m: Vec3,
    pub velocity_mps: Vec3,

    pub intent: IntentState,
    pub action: ActionState,
    pub condition: ConditionState,
    pub injury: InjuryState,

    #[serde(default)]
    pub ai: AiState,
}

impl Entity {
    /// Fresh, uninjured, rested entity at rest at `position_m`.
    pub fn new(id: EntityId, team_id: TeamId, attributes: IndividualAttributes, position_m: Vec3) -> Self {
        Self {
            id,
            team_id,
            energy: EnergyState::rested(&attributes),
            attributes,
            loadout: Loadout::default(),
            traits: Vec::new(),
            position_m,
            velocity_mps: Vec3::ZERO,
            intent: IntentState::default(),
            action: ActionState::default(),
            condition: ConditionState::default(),
            injury: InjuryState::default(),
            ai: AiState::default(),
        }
    }

    pub fn with_loadout(mut self, loadout: Loadout) -> Self {
        self.loadout = loadout;
        self
    }

    pub fn with_traits(mut self, traits: Vec<TraitId>) -> Self {
        self.traits = traits;
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.injury.dead
    }
}
