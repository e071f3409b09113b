//! Simulation engine - main entry point for running a skirmish

use std::collections::BTreeMap;
use std::io::{Read, Write};

use skirmish_logic::sim::ai::{build_ai_commands, AiPolicy};
use skirmish_logic::sim::indexing::build_world_index;
use skirmish_logic::sim::spatial::build_spatial_index;
use skirmish_logic::sim::{step_world, CommandMap, Entity, EntityId, TeamId, WorldState};

use crate::config::EngineConfig;
use crate::persistence::{self, SaveData, SaveError};
use crate::scenario::{generate_scenario, ScenarioConfig};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Only this team has living members.
    Victory(TeamId),
    /// Nobody is left alive.
    Annihilation,
    /// `max_ticks` elapsed with more than one team standing.
    TimedOut,
}

/// Main simulation engine
///
/// Holds the world, the AI policy table and the config. Each `step` works on
/// a copy of the world and only replaces the live state once the whole tick
/// has been applied.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    world: WorldState,
    config: EngineConfig,
    /// AI policy per entity; entities without one only obey external commands
    policies: BTreeMap<EntityId, AiPolicy>,
}

impl SimulationEngine {
    /// Create an empty simulation
    pub fn new(config: EngineConfig) -> Self {
        Self::with_world(WorldState::default(), config)
    }

    pub fn with_world(mut world: WorldState, config: EngineConfig) -> Self {
        world.sort_entities();
        Self {
            world,
            config,
            policies: BTreeMap::new(),
        }
    }

    /// Generate a scenario and take over its world and policies
    pub fn from_scenario(scenario: &ScenarioConfig, config: EngineConfig) -> Self {
        let generated = generate_scenario(scenario);
        let mut engine = Self::with_world(generated.world, config);
        engine.policies = generated.policies;
        engine
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tick(&self) -> u32 {
        self.world.tick
    }

    pub fn policy(&self, id: EntityId) -> Option<AiPolicy> {
        self.policies.get(&id).copied()
    }

    /// Attach or replace the AI policy for `id`. `None` hands it back to
    /// external control.
    pub fn set_policy(&mut self, id: EntityId, policy: Option<AiPolicy>) {
        match policy {
            Some(p) => {
                self.policies.insert(id, p);
            }
            None => {
                self.policies.remove(&id);
            }
        }
    }

    /// Add an entity; it keeps the canonical id order.
    pub fn spawn(&mut self, entity: Entity) {
        self.world.entities.push(entity);
        self.world.sort_entities();
    }

    /// Advance one tick. `external` replaces the AI's commands for every
    /// entity it mentions.
    pub fn step(&mut self, external: &CommandMap) {
        let mut next = self.world.clone();
        next.sort_entities();

        let mut commands = if self.config.ai_enabled && !self.policies.is_empty() {
            let index = build_world_index(&next);
            let spatial = build_spatial_index(&next, self.config.ai_cell_size());
            let policies = &self.policies;
            build_ai_commands(&mut next, &index, &spatial, |id| policies.get(&id).copied())
        } else {
            CommandMap::new()
        };
        for (id, cmds) in external {
            commands.insert(*id, cmds.clone());
        }

        let alive_before: Vec<EntityId> = next.entities.iter().filter(|e| e.is_alive()).map(|e| e.id).collect();

        step_world(&mut next, &commands, &self.config.kernel);

        for id in alive_before {
            if next.entity(id).is_some_and(|e| !e.is_alive()) {
                log::info!("tick {}: entity {} died", next.tick, id);
            }
        }

        self.world = next;
    }

    /// Advance one tick driven by the AI alone.
    pub fn step_ai(&mut self) {
        self.step(&CommandMap::new());
    }

    pub fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.step_ai();
        }
    }

    /// Living members per team. Teams with nobody left are absent.
    pub fn alive_by_team(&self) -> BTreeMap<TeamId, usize> {
        let mut counts = BTreeMap::new();
        for e in self.world.entities.iter().filter(|e| e.is_alive()) {
            *counts.entry(e.team_id).or_insert(0) += 1;
        }
        counts
    }

    /// The outcome if the fight is over, `None` while two or more teams stand.
    pub fn resolution(&self) -> Option<Outcome> {
        let alive = self.alive_by_team();
        let mut teams = alive.keys();
        match (teams.next(), teams.next()) {
            (None, _) => Some(Outcome::Annihilation),
            (Some(&team), None) => Some(Outcome::Victory(team)),
            _ => None,
        }
    }

    /// Step with AI until one team is left or `max_ticks` have elapsed.
    pub fn run_until_resolved(&mut self) -> Outcome {
        for _ in 0..self.config.max_ticks {
            if let Some(outcome) = self.resolution() {
                log::info!("resolved at tick {}: {:?}", self.world.tick, outcome);
                return outcome;
            }
            self.step_ai();
        }
        let outcome = self.resolution().unwrap_or(Outcome::TimedOut);
        log::info!("stopped at tick {}: {:?}", self.world.tick, outcome);
        outcome
    }

    pub fn snapshot(&self) -> SaveData {
        SaveData::new(self.world.clone(), self.policies.clone(), self.config.clone())
    }

    /// Save simulation state to a writer
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_to_writer(writer, &self.snapshot())
    }

    /// Load simulation state from a reader. On error the engine is unchanged.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let data = persistence::load_from_reader(reader)?;
        self.world = data.world;
        self.world.sort_entities();
        self.policies = data.policies;
        self.config = data.config;
        Ok(())
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
