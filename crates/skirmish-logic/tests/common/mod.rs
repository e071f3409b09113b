//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use skirmish_logic::archetypes::HUMAN_BASE;
use skirmish_logic::body::ALL_REGIONS;
use skirmish_logic::equipment::{starter_armour, starter_weapons, Item, Loadout};
use skirmish_logic::generate::generate_individual;
use skirmish_logic::sim::commands::CommandMap;
use skirmish_logic::sim::entity::{Entity, EntityId, TeamId};
use skirmish_logic::sim::kernel::{step_world, KernelContext};
use skirmish_logic::sim::vec3::v3;
use skirmish_logic::sim::world::WorldState;
use skirmish_logic::units::{q, to};

pub fn club() -> Item {
    starter_weapons()[0].clone()
}

pub fn knife() -> Item {
    starter_weapons()[1].clone()
}

pub fn mail() -> Item {
    starter_armour()[1].clone()
}

/// Generated human at `(x, y)` metres, with steady hands.
pub fn mk_humanoid(id: EntityId, team: TeamId, x_m: f64, y_m: f64) -> Entity {
    let mut attrs = generate_individual(id, &HUMAN_BASE);
    attrs.control.control_quality = q(0.95);
    attrs.control.fine_control = q(0.95);
    Entity::new(id, team, attrs, v3(to::m(x_m), to::m(y_m), 0))
}

pub fn mk_armed(id: EntityId, team: TeamId, x_m: f64, y_m: f64, items: Vec<Item>) -> Entity {
    mk_humanoid(id, team, x_m, y_m).with_loadout(Loadout::new(items))
}

/// Sum of surface, internal and structural damage over every region.
pub fn total_damage(e: &Entity) -> i64 {
    ALL_REGIONS
        .iter()
        .map(|r| {
            let i = e.injury.region(*r);
            i.surface_damage as i64 + i.internal_damage as i64 + i.structural_damage as i64
        })
        .sum()
}

/// Step `ticks` times, rebuilding commands each tick.
pub fn run<F>(world: &mut WorldState, ctx: &KernelContext, ticks: u32, mut commands: F)
where
    F: FnMut(&WorldState) -> CommandMap,
{
    for _ in 0..ticks {
        let cmds = commands(world);
        step_world(world, &cmds, ctx);
    }
}

pub fn damage_of(world: &WorldState, id: EntityId) -> i64 {
    world.entity(id).map(total_damage).unwrap_or(0)
}
