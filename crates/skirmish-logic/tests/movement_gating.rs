//! Crowd damping and injury gating of movement, end to end.

mod common;

use common::{mk_humanoid, run};
use skirmish_logic::body::BodyRegion;
use skirmish_logic::sim::commands::{move_dir, set_prone, CommandMap};
use skirmish_logic::sim::entity::Entity;
use skirmish_logic::sim::intent::MoveMode;
use skirmish_logic::sim::kernel::{step_world, KernelContext};
use skirmish_logic::sim::vec3::v3;
use skirmish_logic::sim::world::WorldState;
use skirmish_logic::units::{q, scale};

fn sprint_east() -> CommandMap {
    let mut cmds = CommandMap::new();
    cmds.insert(1, vec![move_dir(v3(scale::Q, 0, 0), scale::Q, MoveMode::Sprint)]);
    cmds
}

/// Runner id 1 at the origin with eight neighbours on a square grid.
fn runner_with_neighbours(spacing_m: f64) -> WorldState {
    let mut entities = vec![mk_humanoid(1, 1, 0.0, 0.0)];
    let mut id = 2;
    for gx in -1..=1 {
        for gy in -1..=1 {
            if gx == 0 && gy == 0 {
                continue;
            }
            entities.push(mk_humanoid(id, 1, gx as f64 * spacing_m, gy as f64 * spacing_m));
            id += 1;
        }
    }
    WorldState::new(17, entities)
}

fn distance_after(world: &mut WorldState, ticks: u32) -> i32 {
    let start = world.entities[0].position_m.x;
    let cmds = sprint_east();
    run(world, &KernelContext::default(), ticks, |_| cmds.clone());
    world.entities[0].position_m.x - start
}

#[test]
fn sprinting_through_a_crowd_is_slower() {
    let packed = distance_after(&mut runner_with_neighbours(0.3), 1);
    let open = distance_after(&mut runner_with_neighbours(5.0), 1);
    assert!(open > 0);
    assert!(packed < open, "packed {packed} >= open {open}");
}

fn with_broken_legs(mut e: Entity) -> Entity {
    for r in [BodyRegion::LeftLeg, BodyRegion::RightLeg] {
        e.injury.region_mut(r).structural_damage = q(0.9);
    }
    e
}

#[test]
fn broken_legs_cover_less_ground() {
    let mut healthy = WorldState::new(5, vec![mk_humanoid(1, 1, 0.0, 0.0)]);
    let mut broken = WorldState::new(5, vec![with_broken_legs(mk_humanoid(1, 1, 0.0, 0.0))]);

    let d_healthy = distance_after(&mut healthy, 10);
    let d_broken = distance_after(&mut broken, 10);

    assert!(d_broken < d_healthy);
    assert!(broken.entities[0].condition.prone);
}

#[test]
fn broken_legs_cannot_stand_up() {
    let mut world = WorldState::new(5, vec![with_broken_legs(mk_humanoid(1, 1, 0.0, 0.0))]);
    let mut cmds = CommandMap::new();
    cmds.insert(1, vec![set_prone(false)]);
    run(&mut world, &KernelContext::default(), 200, |_| cmds.clone());
    assert!(world.entities[0].condition.prone);
}

#[test]
fn prone_crawl_is_slower_than_sprint() {
    let mut standing = WorldState::new(5, vec![mk_humanoid(1, 1, 0.0, 0.0)]);
    let mut prone = WorldState::new(5, vec![mk_humanoid(1, 1, 0.0, 0.0)]);
    prone.entities[0].condition.prone = true;

    assert!(distance_after(&mut prone, 10) < distance_after(&mut standing, 10));
}

#[test]
fn stun_slows_movement() {
    let mut clear = WorldState::new(5, vec![mk_humanoid(1, 1, 0.0, 0.0)]);
    let mut dazed = WorldState::new(5, vec![mk_humanoid(1, 1, 0.0, 0.0)]);
    dazed.entities[0].condition.stunned = q(0.8);

    assert!(distance_after(&mut dazed, 5) < distance_after(&mut clear, 5));
}

#[test]
fn knocked_out_entity_stays_down_then_recovers_control() {
    let ctx = KernelContext::default();
    let mut world = WorldState::new(5, vec![mk_humanoid(1, 1, 0.0, 0.0)]);
    world.entities[0].injury.consciousness = q(0.05);

    step_world(&mut world, &sprint_east(), &ctx);
    let e = &world.entities[0];
    assert!(e.condition.prone);
    assert_eq!(e.condition.unconscious_ticks, ctx.tuning.unconscious_base_ticks);
    assert_eq!(e.position_m.x, 0);

    // consciousness restored externally: the timer still has to run out
    world.entities[0].injury.consciousness = scale::Q;
    for _ in 1..ctx.tuning.unconscious_base_ticks {
        step_world(&mut world, &sprint_east(), &ctx);
        assert_eq!(world.entities[0].position_m.x, 0);
    }
    step_world(&mut world, &sprint_east(), &ctx);
    assert_eq!(world.entities[0].condition.unconscious_ticks, 0);
    assert!(world.entities[0].intent.movement.intensity > 0);
}
