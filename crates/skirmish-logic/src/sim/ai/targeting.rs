//! Target choice with focus memory.

use crate::seeds::{event_seed, SALT_FOCUS};
use crate::sim::entity::Entity;
use crate::sim::indexing::WorldIndex;
use crate::sim::intent::AiState;
use crate::sim::spatial::SpatialIndex;
use crate::sim::world::WorldState;
use crate::units::scale;

use super::perception::{perceive_local, PERCEPTION_MAX_COUNT, PERCEPTION_RADIUS_M};
use super::types::AiPolicy;

/// Pick this tick's target.
///
/// A living focus is kept outright while the retarget cooldown runs. Once it
/// expires the focus is kept with probability `focus_stickiness`, otherwise
/// the nearest perceived enemy wins.
pub fn pick_target<'w>(
    world: &'w WorldState,
    index: &WorldIndex,
    spatial: &SpatialIndex,
    me: &Entity,
    ai: &AiState,
    policy: &AiPolicy,
) -> Option<&'w Entity> {
    let focused = match ai.focus_target_id {
        0 => None,
        id => index.get(world, id).filter(|t| t.is_alive()),
    };

    if let Some(f) = focused {
        if ai.retarget_cooldown_ticks > 0 {
            return Some(f);
        }
    }

    let seen = perceive_local(me, world, index, spatial, PERCEPTION_RADIUS_M, PERCEPTION_MAX_COUNT);
    let nearest = seen.enemies.first().copied()?;

    if let Some(f) = focused {
        let seed = event_seed(world.seed, world.tick, me.id, ai.focus_target_id, SALT_FOCUS);
        if ((seed % scale::Q as u32) as i32) < policy.focus_stickiness {
            return Some(f);
        }
    }

    Some(nearest)
}

/// Remember the chosen target and restart the retarget cooldown.
pub fn update_focus(ai: &mut AiState, target: Option<&Entity>, policy: &AiPolicy) {
    match target {
        Some(t) => {
            ai.focus_target_id = t.id;
            ai.retarget_cooldown_ticks = policy.retarget_cooldown_ticks;
        }
        None => *ai = AiState::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes::HUMAN_BASE;
    use crate::generate::generate_individual;
    use crate::sim::ai::presets::line_infantry;
    use crate::sim::indexing::build_world_index;
    use crate::sim::spatial::build_spatial_index;
    use crate::sim::vec3::v3;
    use crate::units::{q, to};

    fn at(id: u32, team: u32, x: f64) -> Entity {
        Entity::new(id, team, generate_individual(id, &HUMAN_BASE), v3(to::m(x), 0, 0))
    }

    fn pick(world: &WorldState, ai: &AiState, policy: &AiPolicy) -> Option<u32> {
        let index = build_world_index(world);
        let spatial = build_spatial_index(world, to::m(4.0));
        let me = index.get(world, 1).unwrap();
        pick_target(world, &index, &spatial, me, ai, policy).map(|t| t.id)
    }

    fn duel_world() -> WorldState {
        WorldState::new(9, vec![at(1, 1, 0.0), at(2, 2, 1.0), at(3, 2, 3.0)])
    }

    #[test]
    fn test_picks_nearest_without_focus() {
        assert_eq!(pick(&duel_world(), &AiState::default(), &line_infantry()), Some(2));
    }

    #[test]
    fn test_keeps_focus_during_cooldown() {
        let ai = AiState {
            focus_target_id: 3,
            retarget_cooldown_ticks: 5,
        };
        assert_eq!(pick(&duel_world(), &ai, &line_infantry()), Some(3));
    }

    #[test]
    fn test_stickiness_extremes() {
        let ai = AiState {
            focus_target_id: 3,
            retarget_cooldown_ticks: 0,
        };
        let mut always = line_infantry();
        always.focus_stickiness = q(1.0);
        assert_eq!(pick(&duel_world(), &ai, &always), Some(3));

        let mut never = line_infantry();
        never.focus_stickiness = 0;
        assert_eq!(pick(&duel_world(), &ai, &never), Some(2));
    }

    #[test]
    fn test_dead_focus_is_dropped() {
        let mut world = duel_world();
        world.entities[2].injury.kill();
        let ai = AiState {
            focus_target_id: 3,
            retarget_cooldown_ticks: 5,
        };
        assert_eq!(pick(&world, &ai, &line_infantry()), Some(2));
    }

    #[test]
    fn test_no_enemies_no_target() {
        let world = WorldState::new(9, vec![at(1, 1, 0.0), at(2, 1, 1.0)]);
        assert_eq!(pick(&world, &AiState::default(), &line_infantry()), None);
    }

    #[test]
    fn test_update_focus() {
        let world = duel_world();
        let policy = line_infantry();
        let mut ai = AiState::default();
        update_focus(&mut ai, world.entity(2), &policy);
        assert_eq!(ai.focus_target_id, 2);
        assert_eq!(ai.retarget_cooldown_ticks, policy.retarget_cooldown_ticks);

        update_focus(&mut ai, None, &policy);
        assert_eq!(ai, AiState::default());
    }
}
