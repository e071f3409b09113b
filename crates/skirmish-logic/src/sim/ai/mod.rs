//! Per-entity melee AI.
//!
//! A pure decision layer: it reads the world through the per-tick indices
//! and produces a [`CommandMap`](super::commands::CommandMap). The only
//! state it keeps is the focus/cooldown pair stored on each entity.

pub mod decide;
pub mod perception;
pub mod presets;
pub mod system;
pub mod targeting;
pub mod types;

pub use decide::decide_commands_for_entity;
pub use system::build_ai_commands;
pub use types::{AiArchetype, AiPolicy};
