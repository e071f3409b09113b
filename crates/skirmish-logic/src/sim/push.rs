//! Pairwise repulsion between entities closer than their personal radius.
//!
//! Each unordered pair is handled once, from the lower id, and receives
//! equal and opposite velocity changes. Deltas are gathered first and
//! applied afterwards so no pair observes another pair's impulse.

use serde::{Deserialize, Serialize};

use crate::units::{clamp01, scale, to, I32, Q};

use super::entity::EntityId;
use super::indexing::WorldIndex;
use super::spatial::{query_nearby_ids, SpatialIndex};
use super::vec3::{approx_dist, dist2};
use super::world::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushTuning {
    pub personal_radius_m: I32,
    /// Velocity change at full overlap (dt folded in).
    pub repel_accel_mps2: I32,
    pub max_neighbours: usize,
}

impl Default for PushTuning {
    fn default() -> Self {
        Self {
            personal_radius_m: to::m(0.45),
            repel_accel_mps2: to::mps2(1.5),
            max_neighbours: 12,
        }
    }
}

struct Impulse {
    from: EntityId,
    to: EntityId,
    ax: I32,
    ay: I32,
}

pub fn step_push_and_repulsion(world: &mut WorldState, index: &WorldIndex, spatial: &SpatialIndex, t: &PushTuning) {
    let r = t.personal_radius_m.max(1);
    let r2 = r as i128 * r as i128;
    let mut impulses = Vec::new();

    for e in world.entities.iter().filter(|e| e.is_alive()) {
        let mut checked = 0usize;
        for id in query_nearby_ids(spatial, e.position_m, r) {
            if id <= e.id {
                continue;
            }
            let Some(o) = index.get(world, id) else { continue };
            if !o.is_alive() {
                continue;
            }

            let d2 = dist2(e.position_m, o.position_m);
            if d2 == 0 || d2 >= r2 {
                continue;
            }

            let dx = o.position_m.x - e.position_m.x;
            let dy = o.position_m.y - e.position_m.y;
            let d = approx_dist(dx, dy);
            let overlap = r - d;
            if overlap <= 0 {
                continue;
            }

            let strength = clamp01((overlap as i64 * scale::Q as i64 / r as i64) as Q) as i64;
            let denom = d.max(1) as i64 * scale::Q as i64;
            let repel = t.repel_accel_mps2 as i64;
            impulses.push(Impulse {
                from: e.id,
                to: id,
                ax: (dx as i64 * repel * strength / denom) as I32,
                ay: (dy as i64 * repel * strength / denom) as I32,
            });

            checked += 1;
            if checked >= t.max_neighbours {
                break;
            }
        }
    }

    for imp in impulses {
        if let Some(e) = index.get_mut(world, imp.from) {
            e.velocity_mps.x -= imp.ax;
            e.velocity_mps.y -= imp.ay;
        }
        if let Some(o) = index.get_mut(world, imp.to) {
            o.velocity_mps.x += imp.ax;
            o.velocity_mps.y += imp.ay;
        }
    }
}
