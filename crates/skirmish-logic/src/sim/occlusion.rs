//! Friendly bodies blocking a melee lane.

use serde::{Deserialize, Serialize};

use crate::units::{to, I32};

use super::entity::Entity;
use super::indexing::WorldIndex;
use super::spatial::{query_nearby_ids, SpatialIndex};
use super::team::{is_ally, is_enemy};
use super::vec3::{approx_dist, v3};
use super::world::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcclusionQuery {
    /// Half-width of the corridor between attacker and target.
    pub lane_radius_m: I32,
}

impl Default for OcclusionQuery {
    fn default() -> Self {
        Self {
            lane_radius_m: to::m(0.35),
        }
    }
}

/// True when a living ally of the attacker stands strictly between attacker
/// and an enemy target, within the lane radius of the segment joining them.
pub fn is_melee_lane_occluded_by_friendly(
    world: &WorldState,
    index: &WorldIndex,
    spatial: &SpatialIndex,
    attacker: &Entity,
    target: &Entity,
    query: &OcclusionQuery,
) -> bool {
    if !is_enemy(attacker, target) {
        return false;
    }

    let a = attacker.position_m;
    let t = target.position_m;
    let (dx, dy, dz) = (t.x - a.x, t.y - a.y, t.z - a.z);

    let mid = v3(a.x + (dx >> 1), a.y + (dy >> 1), a.z + (dz >> 1));
    let search_r = (approx_dist(dx, dy) >> 1).saturating_add(query.lane_radius_m);

    query_nearby_ids(spatial, mid, search_r).into_iter().any(|id| {
        if id == attacker.id || id == target.id {
            return false;
        }
        match index.get(world, id) {
            Some(e) if e.is_alive() && is_ally(e, attacker) => point_near_segment(
                (e.position_m.x, e.position_m.y),
                (a.x, a.y),
                (t.x, t.y),
                query.lane_radius_m,
            ),
            _ => false,
        }
    })
}

/// Whether `p` projects strictly inside segment `a -> b` and lies within
/// `lane_r` of it, in the plane. Exact integer arithmetic.
pub fn point_near_segment(p: (I32, I32), a: (I32, I32), b: (I32, I32), lane_r: I32) -> bool {
    let vx = b.0 as i128 - a.0 as i128;
    let vy = b.1 as i128 - a.1 as i128;
    let wx = p.0 as i128 - a.0 as i128;
    let wy = p.1 as i128 - a.1 as i128;

    let vv = vx * vx + vy * vy;
    if vv == 0 {
        return false;
    }

    let t_num = wx * vx + wy * vy;
    if t_num <= 0 || t_num >= vv {
        return false;
    }

    // |w|² - (w·v)² / |v|²
    let ww = wx * wx + wy * wy;
    let dist2 = ww - t_num * t_num / vv;
    dist2 <= lane_r as i128 * lane_r as i128
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes::HUMAN_BASE;
    use crate::generate::generate_individual;
    use crate::sim::indexing::build_world_index;
    use crate::sim::spatial::build_spatial_index;

    fn at(id: u32, team: u32, x: f64, y: f64) -> Entity {
        Entity::new(id, team, generate_individual(id, &HUMAN_BASE), v3(to::m(x), to::m(y), 0))
    }

    fn occluded(entities: Vec<Entity>) -> bool {
        let world = WorldState::new(1, entities);
        let index = build_world_index(&world);
        let spatial = build_spatial_index(&world, to::m(4.0));
        let attacker = index.get(&world, 1).cloned().expect("attacker");
        let target = index.get(&world, 2).cloned().expect("target");
        is_melee_lane_occluded_by_friendly(&world, &index, &spatial, &attacker, &target, &OcclusionQuery::default())
    }

    #[test]
    fn test_friendly_in_lane_blocks() {
        assert!(occluded(vec![at(1, 1, 0.0, 0.0), at(2, 2, 2.0, 0.0), at(3, 1, 1.0, 0.1)]));
    }

    #[test]
    fn test_enemy_in_lane_does_not_block() {
        assert!(!occluded(vec![at(1, 1, 0.0, 0.0), at(2, 2, 2.0, 0.0), at(3, 2, 1.0, 0.1)]));
    }

    #[test]
    fn test_friendly_off_lane_or_behind_does_not_block() {
        assert!(!occluded(vec![at(1, 1, 0.0, 0.0), at(2, 2, 2.0, 0.0), at(3, 1, 1.0, 1.0)]));
        assert!(!occluded(vec![at(1, 1, 0.0, 0.0), at(2, 2, 2.0, 0.0), at(3, 1, -0.5, 0.0)]));
    }

    #[test]
    fn test_same_team_target_never_occluded() {
        assert!(!occluded(vec![at(1, 1, 0.0, 0.0), at(2, 1, 2.0, 0.0), at(3, 1, 1.0, 0.0)]));
    }

    #[test]
    fn test_point_near_segment_endpoints_excluded() {
        assert!(!point_near_segment((0, 0), (0, 0), (100, 0), 10));
        assert!(!point_near_segment((100, 0), (0, 0), (100, 0), 10));
        assert!(point_near_segment((50, 10), (0, 0), (100, 0), 10));
        assert!(!point_near_segment((50, 11), (0, 0), (100, 0), 10));
    }
}
