//! Nearest-enemy selection for `AttackNearest`.

use serde::{Deserialize, Serialize};

use crate::units::{to, I32, Q};

use super::entity::{Entity, EntityId};
use super::indexing::WorldIndex;
use super::spatial::{query_nearby_ids, SpatialIndex};
use super::team::is_enemy;
use super::vec3::{dist2, dot_dir_q, normalise_dir_cheap_q};
use super::world::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementQuery {
    pub reach_m: I32,
    pub buffer_m: I32,
    /// Candidate cap.
    pub max_targets: usize,
    pub require_front_arc: bool,
    /// Minimum facing dot when `require_front_arc` is set. 0 is a 180° arc.
    pub min_dot_q: Q,
}

impl EngagementQuery {
    pub fn for_reach(reach_m: I32) -> Self {
        Self {
            reach_m,
            buffer_m: to::m(0.2),
            max_targets: 12,
            require_front_arc: false,
            min_dot_q: 0,
        }
    }
}

/// Closest living enemy among nearby candidates, ties broken on lower id.
pub fn pick_nearest_enemy_in_reach(
    world: &WorldState,
    index: &WorldIndex,
    spatial: &SpatialIndex,
    attacker: &Entity,
    query: &EngagementQuery,
) -> Option<EntityId> {
    let radius = query.reach_m.saturating_add(query.buffer_m);

    let candidates = query_nearby_ids(spatial, attacker.position_m, radius)
        .into_iter()
        .filter(|&id| id != attacker.id)
        .filter_map(|id| index.get(world, id))
        .filter(|e| e.is_alive() && is_enemy(attacker, e))
        .filter(|e| {
            if !query.require_front_arc {
                return true;
            }
            let dir = normalise_dir_cheap_q(e.position_m - attacker.position_m);
            dot_dir_q(attacker.action.facing_dir_q, dir) >= query.min_dot_q
        })
        .take(query.max_targets);

    candidates
        .min_by_key(|e| (dist2(attacker.position_m, e.position_m), e.id))
        .map(|e| e.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes::HUMAN_BASE;
    use crate::generate::generate_individual;
    use crate::sim::indexing::build_world_index;
    use crate::sim::spatial::build_spatial_index;
    use crate::sim::vec3::v3;
    use crate::units::q;

    fn at(id: u32, team: u32, x: f64, y: f64) -> Entity {
        Entity::new(id, team, generate_individual(id, &HUMAN_BASE), v3(to::m(x), to::m(y), 0))
    }

    fn pick(entities: Vec<Entity>, query: EngagementQuery) -> Option<EntityId> {
        let world = WorldState::new(3, entities);
        let index = build_world_index(&world);
        let spatial = build_spatial_index(&world, to::m(4.0));
        let attacker = index.get(&world, 1).cloned().expect("attacker");
        pick_nearest_enemy_in_reach(&world, &index, &spatial, &attacker, &query)
    }

    #[test]
    fn test_picks_nearest_enemy_skipping_allies() {
        let entities = vec![at(1, 1, 0.0, 0.0), at(2, 1, 0.2, 0.0), at(3, 2, 0.9, 0.0), at(4, 2, 0.6, 0.0)];
        assert_eq!(pick(entities, EngagementQuery::for_reach(to::m(1.0))), Some(4));
    }

    #[test]
    fn test_tie_breaks_on_lower_id() {
        let entities = vec![at(1, 1, 0.0, 0.0), at(7, 2, 0.5, 0.0), at(5, 2, -0.5, 0.0)];
        assert_eq!(pick(entities, EngagementQuery::for_reach(to::m(1.0))), Some(5));
    }

    #[test]
    fn test_front_arc_excludes_enemies_behind() {
        let entities = vec![at(1, 1, 0.0, 0.0), at(5, 2, -0.5, 0.0), at(7, 2, 0.8, 0.0)];
        let query = EngagementQuery {
            require_front_arc: true,
            min_dot_q: q(0.3),
            ..EngagementQuery::for_reach(to::m(1.0))
        };
        // Default facing is +x.
        assert_eq!(pick(entities, query), Some(7));
    }

    #[test]
    fn test_no_enemy_gives_none() {
        assert_eq!(pick(vec![at(1, 1, 0.0, 0.0), at(2, 1, 0.3, 0.0)], EngagementQuery::for_reach(to::m(1.0))), None);
    }
}
