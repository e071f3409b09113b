use crate::sim::commands::CommandMap;
use crate::sim::entity::EntityId;
use crate::sim::indexing::WorldIndex;
use crate::sim::intent::AiState;
use crate::sim::spatial::SpatialIndex;
use crate::sim::world::WorldState;

use super::decide::decide_commands_for_entity;
use super::types::AiPolicy;

/// Decide commands for every entity `policy_for` returns a policy for.
///
/// Decisions all read the same pre-decision world. Updated focus memory is
/// written back to the entities afterwards.
pub fn build_ai_commands<F>(
    world: &mut WorldState,
    index: &WorldIndex,
    spatial: &SpatialIndex,
    policy_for: F,
) -> CommandMap
where
    F: Fn(EntityId) -> Option<AiPolicy>,
{
    let mut out = CommandMap::new();
    let mut memory: Vec<(EntityId, AiState)> = Vec::new();

    for e in &world.entities {
        let Some(policy) = policy_for(e.id) else {
            continue;
        };
        let mut ai = e.ai;
        let cmds = decide_commands_for_entity(world, index, spatial, e, &mut ai, &policy);
        memory.push((e.id, ai));
        if !cmds.is_empty() {
            out.insert(e.id, cmds);
        }
    }

    for (id, ai) in memory {
        if let Some(e) = index.get_mut(world, id) {
            e.ai = ai;
        }
    }

    out
}
