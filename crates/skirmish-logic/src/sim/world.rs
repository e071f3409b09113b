use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};

/// The whole persisted simulation state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorldState {
    pub tick: u32,
    pub seed: u32,
    pub entities: Vec<Entity>,
}

impl WorldState {
    pub fn new(seed: u32, entities: Vec<Entity>) -> Self {
        let mut world = Self {
            tick: 0,
            seed,
            entities,
        };
        world.sort_entities();
        world
    }

    /// Canonical order: ascending id.
    pub fn sort_entities(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }

    /// Linear lookup. Hot paths go through `WorldIndex` instead.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn alive_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_alive()).count()
    }
}
