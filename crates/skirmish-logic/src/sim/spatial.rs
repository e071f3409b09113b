//! Uniform grid over entity positions.
//!
//! Cell lists are kept sorted by id and query results are sorted once more
//! after merging, so the output never depends on insertion order. Queries
//! return every id in the overlapping cells; callers apply their own exact
//! distance test.

use std::collections::HashMap;

use crate::units::{to, I32};

use super::entity::EntityId;
use super::vec3::Vec3;
use super::world::WorldState;

pub fn default_cell_size_m() -> I32 {
    to::m(4.0)
}

#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    pub cell_m: I32,
    cells: HashMap<(i32, i32), Vec<EntityId>>,
}

fn cell_coord(pos_m: I32, cell_m: I32) -> i32 {
    pos_m.div_euclid(cell_m)
}

/// Bucket every living entity by its planar cell.
pub fn build_spatial_index(world: &WorldState, cell_size_m: I32) -> SpatialIndex {
    let cell_m = cell_size_m.max(1);
    let mut cells: HashMap<(i32, i32), Vec<EntityId>> = HashMap::new();

    for e in world.entities.iter().filter(|e| e.is_alive()) {
        let key = (cell_coord(e.position_m.x, cell_m), cell_coord(e.position_m.y, cell_m));
        cells.entry(key).or_default().push(e.id);
    }
    for ids in cells.values_mut() {
        ids.sort_unstable();
    }

    SpatialIndex { cell_m, cells }
}

impl SpatialIndex {
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Ids in every cell touched by the square of half-width `radius_m`
/// around `pos`, ascending.
pub fn query_nearby_ids(index: &SpatialIndex, pos: Vec3, radius_m: I32) -> Vec<EntityId> {
    let cell_m = index.cell_m.max(1);
    let r = radius_m.max(0);

    let cx0 = cell_coord(pos.x.saturating_sub(r), cell_m);
    let cx1 = cell_coord(pos.x.saturating_add(r), cell_m);
    let cy0 = cell_coord(pos.y.saturating_sub(r), cell_m);
    let cy1 = cell_coord(pos.y.saturating_add(r), cell_m);

    let mut out = Vec::new();
    for cy in cy0..=cy1 {
        for cx in cx0..=cx1 {
            if let Some(ids) = index.cells.get(&(cx, cy)) {
                out.extend_from_slice(ids);
            }
        }
    }
    out.sort_unstable();
    out
}
