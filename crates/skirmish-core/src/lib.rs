//! Skirmish Core - Tactical Simulation Engine
//!
//! Owns a [`WorldState`](skirmish_logic::sim::WorldState) and advances it one
//! tick at a time through the deterministic kernel in `skirmish-logic`.
//!
//! # Architecture
//!
//! - **Engine**: world ownership, AI driving, atomic ticks
//! - **Scenario**: seeded squad generation into a ready-to-run world
//! - **Config**: JSON-loadable engine and kernel settings
//! - **Persistence**: versioned saves in bincode or JSON
//!
//! # Example
//!
//! ```rust,no_run
//! use skirmish_core::prelude::*;
//!
//! let mut engine = SimulationEngine::from_scenario(&ScenarioConfig::default(), EngineConfig::default());
//!
//! // Let the AI fight it out
//! let outcome = engine.run_until_resolved();
//! println!("{outcome:?} after {} ticks", engine.tick());
//! ```

pub mod config;
pub mod engine;
pub mod persistence;
pub mod scenario;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::engine::{Outcome, SimulationEngine};
    pub use crate::persistence::{SaveData, SaveError};
    pub use crate::scenario::{generate_scenario, Scenario, ScenarioConfig, SquadSpec};
}
