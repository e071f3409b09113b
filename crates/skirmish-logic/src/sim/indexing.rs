//! Id to arena-slot lookup, rebuilt whenever `WorldState::entities` may have
//! been reordered.

use std::collections::HashMap;

use super::entity::{Entity, EntityId};
use super::world::WorldState;

#[derive(Debug, Clone, Default)]
pub struct WorldIndex {
    slots: HashMap<EntityId, usize>,
}

pub fn build_world_index(world: &WorldState) -> WorldIndex {
    let slots = world
        .entities
        .iter()
        .enumerate()
        .map(|(slot, e)| (e.id, slot))
        .collect();
    WorldIndex { slots }
}

impl WorldIndex {
    pub fn slot(&self, id: EntityId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    pub fn get<'w>(&self, world: &'w WorldState, id: EntityId) -> Option<&'w Entity> {
        self.slot(id).and_then(|s| world.entities.get(s))
    }

    pub fn get_mut<'w>(&self, world: &'w mut WorldState, id: EntityId) -> Option<&'w mut Entity> {
        self.slot(id).and_then(move |s| world.entities.get_mut(s))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
