//! Cap on simultaneous melee engagers per target.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::events::ImpactEvent;
use super::indexing::WorldIndex;
use super::vec3::dist2;
use super::world::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontageRules {
    pub max_engagers_per_target: usize,
}

impl Default for FrontageRules {
    fn default() -> Self {
        Self {
            max_engagers_per_target: 3,
        }
    }
}

/// Keep at most K impacts per target, closest attackers first, ties on id.
/// An over-subscribed target that no longer exists loses all its impacts.
pub fn apply_frontage_cap(
    impacts: Vec<ImpactEvent>,
    world: &WorldState,
    index: &WorldIndex,
    rules: &FrontageRules,
) -> Vec<ImpactEvent> {
    let max_k = rules.max_engagers_per_target.max(1);

    let mut by_target: BTreeMap<EntityId, Vec<ImpactEvent>> = BTreeMap::new();
    for ev in impacts {
        by_target.entry(ev.target_id).or_default().push(ev);
    }

    let mut kept = Vec::new();
    for (target_id, mut group) in by_target {
        if group.len() <= max_k {
            kept.extend(group);
            continue;
        }
        let Some(target) = index.get(world, target_id) else {
            log::trace!("frontage: target {target_id} missing, dropping {} impacts", group.len());
            continue;
        };

        group.sort_by_cached_key(|ev| {
            let d2 = index
                .get(world, ev.attacker_id)
                .map_or(i128::MAX, |a| dist2(a.position_m, target.position_m));
            (d2, ev.attacker_id)
        });
        group.truncate(max_k);
        kept.extend(group);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes::HUMAN_BASE;
    use crate::body::BodyRegion;
    use crate::equipment::starter_weapons;
    use crate::generate::generate_individual;
    use crate::sim::entity::Entity;
    use crate::sim::indexing::build_world_index;
    use crate::sim::vec3::v3;
    use crate::units::to;

    fn at(id: u32, team: u32, x: f64) -> Entity {
        Entity::new(id, team, generate_individual(id, &HUMAN_BASE), v3(to::m(x), 0, 0))
    }

    fn hit(attacker_id: u32, target_id: u32) -> ImpactEvent {
        let club = starter_weapons().remove(0);
        let damage = club.as_weapon().map(|w| w.damage).expect("club is a weapon");
        ImpactEvent {
            attacker_id,
            target_id,
            region: BodyRegion::Torso,
            energy_j: 50,
            protected_by_armour: false,
            weapon_id: club.id,
            damage,
        }
    }

    #[test]
    fn test_cap_keeps_closest_attackers() {
        let world = WorldState::new(
            1,
            vec![at(1, 2, 0.0), at(10, 1, 1.0), at(11, 1, -0.5), at(12, 1, 0.5), at(13, 1, 0.8)],
        );
        let index = build_world_index(&world);
        let impacts = vec![hit(10, 1), hit(11, 1), hit(12, 1), hit(13, 1)];
        let rules = FrontageRules {
            max_engagers_per_target: 2,
        };
        let kept = apply_frontage_cap(impacts, &world, &index, &rules);
        let mut ids: Vec<u32> = kept.iter().map(|e| e.attacker_id).collect();
        ids.sort_unstable();
        // 11 and 12 are both 0.5 m away.
        assert_eq!(ids, vec![11, 12]);
    }

    #[test]
    fn test_under_cap_untouched_and_missing_target_dropped() {
        let world = WorldState::new(1, vec![at(1, 2, 0.0), at(10, 1, 1.0), at(11, 1, 1.0)]);
        let index = build_world_index(&world);
        let rules = FrontageRules {
            max_engagers_per_target: 1,
        };
        let kept = apply_frontage_cap(vec![hit(10, 1)], &world, &index, &rules);
        assert_eq!(kept.len(), 1);
        let kept = apply_frontage_cap(vec![hit(10, 99), hit(11, 99)], &world, &index, &rules);
        assert!(kept.is_empty());
    }
}
