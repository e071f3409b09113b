//! One entity's commands for one tick.

use crate::equipment::{find_weapon, weapon_reach_m};
use crate::sim::commands::{make_attack_command, move_dir, no_move, Command};
use crate::sim::entity::Entity;
use crate::sim::indexing::WorldIndex;
use crate::sim::intent::{AiState, DefenceMode, MoveMode};
use crate::sim::spatial::SpatialIndex;
use crate::sim::vec3::{approx_dist, dist2_xy, normalise_dir_cheap_q, v3};
use crate::sim::world::WorldState;
use crate::units::{clamp01, q, scale, I32, Q};

use super::targeting::{pick_target, update_focus};
use super::types::AiPolicy;

/// Extra distance past weapon reach at which the AI already swings.
const ATTACK_SLACK_M: I32 = 2_500;

/// Defence mode implied by the policy biases. No randomness.
pub fn preferred_defence_mode(policy: &AiPolicy) -> DefenceMode {
    if policy.dodge_bias > policy.parry_bias && policy.dodge_bias > q(0.50) {
        DefenceMode::Dodge
    } else if policy.parry_bias > q(0.35) {
        DefenceMode::Parry
    } else {
        DefenceMode::Block
    }
}

/// Decide `me`'s commands and update its AI memory in `ai`.
///
/// The list always starts with a defend command and always contains a move
/// command; an attack is appended when the target is within reach.
pub fn decide_commands_for_entity(
    world: &WorldState,
    index: &WorldIndex,
    spatial: &SpatialIndex,
    me: &Entity,
    ai: &mut AiState,
    policy: &AiPolicy,
) -> Vec<Command> {
    if !me.is_alive() {
        return Vec::new();
    }

    ai.retarget_cooldown_ticks = ai.retarget_cooldown_ticks.saturating_sub(1);
    let target = pick_target(world, index, spatial, me, ai, policy);
    update_focus(ai, target, policy);

    let (mut defend_mode, mut defend_intensity): (DefenceMode, Q) = (DefenceMode::None, 0);
    if let Some(t) = target {
        let threat_r = policy.threat_range_m.max(1) as i128;
        if dist2_xy(me.position_m, t.position_m) < threat_r * threat_r {
            defend_mode = preferred_defence_mode(policy);
            defend_intensity = clamp01(policy.defend_when_threatened);
        }
    }

    let mut cmds = vec![Command::Defend {
        mode: defend_mode,
        intensity: defend_intensity,
    }];

    let Some(target) = target else {
        cmds.push(no_move());
        return cmds;
    };

    let dx = target.position_m.x - me.position_m.x;
    let dy = target.position_m.y - me.position_m.y;
    let dist = approx_dist(dx, dy);

    let toward = if dist > policy.desired_range_m {
        Some((dx, dy))
    } else if dist < policy.retreat_range_m {
        Some((-dx, -dy))
    } else {
        None
    };

    cmds.push(match toward {
        Some((x, y)) => {
            let mode = if dist > policy.engage_range_m {
                MoveMode::Sprint
            } else {
                MoveMode::Run
            };
            move_dir(normalise_dir_cheap_q(v3(x, y, 0)), scale::Q, mode)
        }
        None => no_move(),
    });

    if let Some((item, wpn)) = find_weapon(&me.loadout, None) {
        let reach = weapon_reach_m(wpn, me.attributes.morphology.stature_m);
        if dist <= reach + ATTACK_SLACK_M {
            cmds.push(make_attack_command(target.id, Some(item.id.as_str()), Some(scale::Q)));
        }
    }

    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes::HUMAN_BASE;
    use crate::equipment::{starter_weapons, Loadout, CLUB_ID};
    use crate::generate::generate_individual;
    use crate::sim::ai::presets::{berserker, defender, line_infantry, skirmisher};
    use crate::sim::indexing::build_world_index;
    use crate::sim::spatial::build_spatial_index;
    use crate::units::to;

    fn at(id: u32, team: u32, x: f64) -> Entity {
        let e = Entity::new(id, team, generate_individual(id, &HUMAN_BASE), v3(to::m(x), 0, 0));
        e.with_loadout(Loadout::new(vec![starter_weapons()[0].clone()]))
    }

    fn decide(world: &WorldState, policy: &AiPolicy) -> (Vec<Command>, AiState) {
        let index = build_world_index(world);
        let spatial = build_spatial_index(world, to::m(4.0));
        let me = index.get(world, 1).unwrap();
        let mut ai = me.ai;
        let cmds = decide_commands_for_entity(world, &index, &spatial, me, &mut ai, policy);
        (cmds, ai)
    }

    #[test]
    fn test_defence_mode_from_biases() {
        assert_eq!(preferred_defence_mode(&line_infantry()), DefenceMode::Parry);
        assert_eq!(preferred_defence_mode(&skirmisher()), DefenceMode::Block);
        assert_eq!(preferred_defence_mode(&berserker()), DefenceMode::Block);
        assert_eq!(preferred_defence_mode(&defender()), DefenceMode::Block);

        let mut evasive = skirmisher();
        evasive.dodge_bias = q(0.6);
        assert_eq!(preferred_defence_mode(&evasive), DefenceMode::Dodge);
    }

    #[test]
    fn test_far_target_sprint_no_attack() {
        let world = WorldState::new(1, vec![at(1, 1, 0.0), at(2, 2, 4.0)]);
        let (cmds, ai) = decide(&world, &line_infantry());

        assert_eq!(cmds.len(), 2);
        assert_eq!(
            cmds[0],
            Command::Defend {
                mode: DefenceMode::None,
                intensity: 0
            }
        );
        assert_eq!(cmds[1], move_dir(v3(scale::Q, 0, 0), scale::Q, MoveMode::Sprint));
        assert_eq!(ai.focus_target_id, 2);
        assert_eq!(ai.retarget_cooldown_ticks, line_infantry().retarget_cooldown_ticks);
    }

    #[test]
    fn test_close_target_defend_and_attack() {
        let world = WorldState::new(1, vec![at(1, 1, 0.0), at(2, 2, 0.6)]);
        let policy = line_infantry();
        let (cmds, _) = decide(&world, &policy);

        assert_eq!(
            cmds[0],
            Command::Defend {
                mode: DefenceMode::Parry,
                intensity: policy.defend_when_threatened
            }
        );
        assert_eq!(cmds[1], no_move());
        assert_eq!(cmds[2], make_attack_command(2, Some(CLUB_ID), Some(scale::Q)));
    }

    #[test]
    fn test_too_close_backs_off() {
        let world = WorldState::new(1, vec![at(1, 1, 0.0), at(2, 2, 0.2)]);
        let (cmds, _) = decide(&world, &line_infantry());
        assert_eq!(cmds[1], move_dir(v3(-scale::Q, 0, 0), scale::Q, MoveMode::Run));
    }

    #[test]
    fn test_no_enemy_no_move() {
        let world = WorldState::new(1, vec![at(1, 1, 0.0), at(2, 1, 0.6)]);
        let (cmds, ai) = decide(&world, &line_infantry());
        assert_eq!(cmds, vec![Command::Defend { mode: DefenceMode::None, intensity: 0 }, no_move()]);
        assert_eq!(ai, AiState::default());
    }

    #[test]
    fn test_dead_entity_decides_nothing() {
        let mut world = WorldState::new(1, vec![at(1, 1, 0.0), at(2, 2, 0.6)]);
        world.entities[0].injury.kill();
        let (cmds, _) = decide(&world, &line_infantry());
        assert!(cmds.is_empty());
    }
}
