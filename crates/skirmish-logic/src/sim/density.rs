//! Crowding ratio per entity from true-radius neighbour counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::units::{clamp_q, clamp01, q, q_mul, scale, to, I32, Q};

use super::entity::EntityId;
use super::indexing::WorldIndex;
use super::spatial::{query_nearby_ids, SpatialIndex};
use super::vec3::dist2;
use super::world::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DensityTuning {
    pub personal_radius_m: I32,
    /// Counting stops here.
    pub max_neighbours: usize,
    /// Neighbour count that maps to a crowding of 1.0.
    pub crowding_at: u32,
    /// Speed lost at full crowding.
    pub speed_damping: Q,
}

impl Default for DensityTuning {
    fn default() -> Self {
        Self {
            personal_radius_m: to::m(0.45),
            max_neighbours: 12,
            crowding_at: 8,
            speed_damping: q(0.6),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DensityField {
    pub crowding_q: BTreeMap<EntityId, Q>,
}

impl DensityField {
    pub fn crowding(&self, id: EntityId) -> Q {
        self.crowding_q.get(&id).copied().unwrap_or(0)
    }
}

pub fn compute_density_field(
    world: &WorldState,
    index: &WorldIndex,
    spatial: &SpatialIndex,
    t: &DensityTuning,
) -> DensityField {
    let r = t.personal_radius_m;
    let r2 = r as i128 * r as i128;
    let mut crowding_q = BTreeMap::new();

    for e in world.entities.iter().filter(|e| e.is_alive()) {
        let mut n: u32 = 0;
        for id in query_nearby_ids(spatial, e.position_m, r) {
            if id == e.id {
                continue;
            }
            let Some(o) = index.get(world, id) else { continue };
            if !o.is_alive() {
                continue;
            }
            if dist2(e.position_m, o.position_m) <= r2 {
                n += 1;
            }
            if n as usize >= t.max_neighbours {
                break;
            }
        }

        let crowd = clamp01((n as i64 * scale::Q as i64 / t.crowding_at.max(1) as i64) as Q);
        crowding_q.insert(e.id, crowd);
    }

    DensityField { crowding_q }
}

/// Movement multiplier for a crowding ratio, never below 0.2.
pub fn crowd_speed_mul(crowding: Q, t: &DensityTuning) -> Q {
    clamp_q(scale::Q - q_mul(crowding, t.speed_damping), q(0.2), scale::Q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes::HUMAN_BASE;
    use crate::generate::generate_individual;
    use crate::sim::entity::Entity;
    use crate::sim::indexing::build_world_index;
    use crate::sim::spatial::build_spatial_index;
    use crate::sim::vec3::v3;

    fn at(id: u32, x: f64, y: f64) -> Entity {
        Entity::new(id, 1, generate_individual(id, &HUMAN_BASE), v3(to::m(x), to::m(y), 0))
    }

    #[test]
    fn test_crowding_counts_true_radius_only() {
        let world = WorldState::new(1, vec![at(1, 0.0, 0.0), at(2, 0.3, 0.0), at(3, 0.4, 0.4), at(4, 3.0, 0.0)]);
        let index = build_world_index(&world);
        let spatial = build_spatial_index(&world, to::m(4.0));
        let field = compute_density_field(&world, &index, &spatial, &DensityTuning::default());
        // (0.4, 0.4) is 0.566 m away, outside 0.45 m.
        assert_eq!(field.crowding(1), scale::Q / 8);
        assert_eq!(field.crowding(4), 0);
        assert_eq!(field.crowding(99), 0);
    }

    #[test]
    fn test_crowd_speed_mul_bounds() {
        let t = DensityTuning::default();
        assert_eq!(crowd_speed_mul(0, &t), scale::Q);
        assert_eq!(crowd_speed_mul(scale::Q, &t), q(0.4));
        let harsh = DensityTuning {
            speed_damping: q(2.0),
            ..t
        };
        assert_eq!(crowd_speed_mul(scale::Q, &harsh), q(0.2));
    }
}
