//! Seeded squad-vs-squad scenarios.
//!
//! A scenario is generated once from a `u64` seed with `StdRng`. The result
//! is a plain `WorldState`; from then on only the kernel's own determinism
//! applies.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use skirmish_logic::archetypes::{Archetype, HUMAN_BASE, SERVICE_ROBOT};
use skirmish_logic::equipment::{starter_armour, starter_weapons, Item, ItemId, Loadout, CLUB_ID, KNIFE_ID, LEATHER_ID};
use skirmish_logic::generate::generate_individual;
use skirmish_logic::sim::ai::{AiArchetype, AiPolicy};
use skirmish_logic::sim::entity::{Entity, EntityId, TeamId};
use skirmish_logic::sim::vec3::{v3, Vec3};
use skirmish_logic::sim::world::WorldState;
use skirmish_logic::units::{to, I32};

/// Physiology template for a squad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPlan {
    #[default]
    Human,
    ServiceRobot,
}

impl BodyPlan {
    pub fn archetype(self) -> &'static Archetype {
        match self {
            BodyPlan::Human => &HUMAN_BASE,
            BodyPlan::ServiceRobot => &SERVICE_ROBOT,
        }
    }
}

/// One squad: a file of `count` entities along +y from `origin_m`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadSpec {
    pub team_id: TeamId,
    pub count: u32,
    pub body: BodyPlan,
    /// `None` leaves the squad without AI.
    pub ai: Option<AiArchetype>,
    /// Starter catalogue ids, e.g. `wpn_club` or `arm_mail`.
    pub items: Vec<ItemId>,
    pub origin_m: Vec3,
    pub spacing_m: I32,
}

impl Default for SquadSpec {
    fn default() -> Self {
        Self {
            team_id: 1,
            count: 4,
            body: BodyPlan::Human,
            ai: Some(AiArchetype::LineInfantry),
            items: vec![CLUB_ID.to_string()],
            origin_m: Vec3::ZERO,
            spacing_m: to::m(1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub seed: u64,
    /// Uniform spawn jitter on x and y, in metres.
    pub jitter_m: I32,
    pub squads: Vec<SquadSpec>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            jitter_m: to::m(0.1),
            squads: vec![
                SquadSpec::default(),
                SquadSpec {
                    team_id: 2,
                    ai: Some(AiArchetype::Skirmisher),
                    items: vec![KNIFE_ID.to_string(), LEATHER_ID.to_string()],
                    origin_m: v3(to::m(4.0), 0, 0),
                    ..SquadSpec::default()
                },
            ],
        }
    }
}

/// A generated world plus the AI policy of every AI-driven entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub world: WorldState,
    pub policies: BTreeMap<EntityId, AiPolicy>,
}

fn catalogue_item(id: &str) -> Option<Item> {
    let found = starter_weapons()
        .into_iter()
        .chain(starter_armour())
        .find(|item| item.id == id);
    if found.is_none() {
        log::warn!("unknown item id {id:?} in scenario, skipped");
    }
    found
}

/// Generate the world for `cfg`. Entity ids run from 1 in squad order.
pub fn generate_scenario(cfg: &ScenarioConfig) -> Scenario {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let world_seed: u32 = rng.gen();
    let jitter = cfg.jitter_m.max(0);

    let mut entities = Vec::new();
    let mut policies = BTreeMap::new();
    let mut next_id: EntityId = 1;

    for squad in &cfg.squads {
        let loadout = Loadout::new(squad.items.iter().filter_map(|id| catalogue_item(id)).collect());

        for slot in 0..squad.count {
            let attrs = generate_individual(rng.gen(), squad.body.archetype());
            let (jx, jy) = if jitter > 0 {
                (rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter))
            } else {
                (0, 0)
            };
            let pos = squad.origin_m + v3(jx, squad.spacing_m.saturating_mul(slot as i32) + jy, 0);

            entities.push(Entity::new(next_id, squad.team_id, attrs, pos).with_loadout(loadout.clone()));
            if let Some(ai) = squad.ai {
                policies.insert(next_id, ai.policy());
            }
            next_id += 1;
        }
    }

    log::info!(
        "generated scenario seed {} with {} entities in {} squads",
        cfg.seed,
        entities.len(),
        cfg.squads.len()
    );

    Scenario {
        world: WorldState::new(world_seed, entities),
        policies,
    }
}
