//! What an entity can see around itself.

use crate::sim::entity::Entity;
use crate::sim::indexing::WorldIndex;
use crate::sim::spatial::{query_nearby_ids, SpatialIndex};
use crate::sim::team::is_enemy;
use crate::sim::vec3::dist2_xy;
use crate::sim::world::WorldState;
use crate::units::I32;

/// Default perception radius (6 m).
pub const PERCEPTION_RADIUS_M: I32 = 60_000;
pub const PERCEPTION_MAX_COUNT: usize = 24;

/// Living neighbours split by allegiance, nearest first, ties by id.
#[derive(Debug, Default)]
pub struct Perception<'w> {
    pub enemies: Vec<&'w Entity>,
    pub allies: Vec<&'w Entity>,
}

pub fn perceive_local<'w>(
    observer: &Entity,
    world: &'w WorldState,
    index: &WorldIndex,
    spatial: &SpatialIndex,
    radius_m: I32,
    max_count: usize,
) -> Perception<'w> {
    let r2 = radius_m as i128 * radius_m as i128;

    let mut seen: Vec<(i128, &'w Entity)> = query_nearby_ids(spatial, observer.position_m, radius_m)
        .into_iter()
        .filter(|id| *id != observer.id)
        .filter_map(|id| index.get(world, id))
        .filter(|e| e.is_alive())
        .map(|e| (dist2_xy(observer.position_m, e.position_m), e))
        .filter(|(d2, _)| *d2 <= r2)
        .collect();

    seen.sort_by_key(|(d2, e)| (*d2, e.id));
    seen.truncate(max_count);

    let (enemies, allies): (Vec<&'w Entity>, Vec<&'w Entity>) = seen
        .into_iter()
        .map(|(_, e)| e)
        .partition(|e| is_enemy(observer, e));

    Perception { enemies, allies }
}
