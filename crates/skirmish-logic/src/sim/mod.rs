//! Entities, the world, and the tick kernel that advances them.

pub mod action;
pub mod ai;
pub mod combat;
pub mod commands;
pub mod condition;
pub mod density;
pub mod engagement;
pub mod entity;
pub mod events;
pub mod frontage;
pub mod hazards;
pub mod impairment;
pub mod indexing;
pub mod injury;
pub mod intent;
pub mod kernel;
pub mod occlusion;
pub mod push;
pub mod spatial;
pub mod team;
pub mod tuning;
pub mod vec3;
pub mod world;

pub use commands::{Command, CommandMap};
pub use entity::{Entity, EntityId, TeamId};
pub use kernel::{step_world, KernelContext, DT_S, TICK_HZ};
pub use world::WorldState;
