//! Skirmish Headless Simulation Harness
//!
//! Runs the catalogue scenarios and a set of statistical sweeps over the
//! kernel entirely in-process. No rendering, no I/O beyond stdout.
//!
//! Usage:
//!   cargo run -p skirmish-simtest
//!   cargo run -p skirmish-simtest -- --verbose

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;
use skirmish_core::prelude::*;
use skirmish_logic::archetypes::HUMAN_BASE;
use skirmish_logic::body::{BodyRegion, ALL_REGIONS};
use skirmish_logic::equipment::{
    derive_weapon_handling, starter_armour, starter_weapons, Item, Loadout, CLUB_ID, KNIFE_ID, MAIL_ID,
};
use skirmish_logic::generate::generate_individual;
use skirmish_logic::sim::combat::parry_leverage_q;
use skirmish_logic::sim::commands::{attack_nearest, defend_full, make_attack_command, move_dir};
use skirmish_logic::sim::intent::{DefenceMode, MoveMode};
use skirmish_logic::sim::tuning::{Realism, SimulationTuning};
use skirmish_logic::sim::vec3::v3;
use skirmish_logic::sim::{step_world, CommandMap, Entity, EntityId, KernelContext, WorldState};
use skirmish_logic::units::{q, scale, to};

// ── Scenario catalogue ──────────────────────────────────────────────────
const SCENARIOS_JSON: &str = include_str!("../../../data/scenarios.json");

#[derive(Debug, Deserialize)]
struct ScenarioEntry {
    name: String,
    description: String,
    #[serde(default)]
    engine: EngineConfig,
    scenario: ScenarioConfig,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Skirmish Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Catalogue scenarios, each run twice
    results.extend(validate_scenarios(verbose));

    // 2. Entity order and save/load invariance
    results.extend(validate_determinism(verbose));

    // 3. Defence modes against a club
    results.extend(validate_defence(verbose));

    // 4. Armour and weapon leverage
    results.extend(validate_equipment(verbose));

    // 5. Crowd damping and injury gating of movement
    results.extend(validate_movement(verbose));

    // 6. Realism tier ordering
    results.extend(validate_realism_tiers(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!("\n=== RESULT: {}/{} passed, {} failed ===", passed, total, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Fixtures ────────────────────────────────────────────────────────────

fn item(id: &str) -> Option<Item> {
    starter_weapons().into_iter().chain(starter_armour()).find(|i| i.id == id)
}

fn fighter(id: EntityId, team: u32, x_m: f64, items: &[&str]) -> Entity {
    let mut attrs = generate_individual(id, &HUMAN_BASE);
    attrs.control.control_quality = q(0.95);
    attrs.control.fine_control = q(0.95);
    let loadout = Loadout::new(items.iter().filter_map(|i| item(i)).collect());
    Entity::new(id, team, attrs, v3(to::m(x_m), 0, 0)).with_loadout(loadout)
}

fn total_damage(e: &Entity) -> i64 {
    ALL_REGIONS
        .iter()
        .map(|r| {
            let i = e.injury.region(*r);
            i.surface_damage as i64 + i.internal_damage as i64 + i.structural_damage as i64
        })
        .sum()
}

/// Club wielder (id 1) swings at id 2 for `ticks`; returns damage taken,
/// summed over `seeds` world seeds.
fn duel_sweep(defence: DefenceMode, target_items: &[&str], seeds: u32, ticks: u32) -> i64 {
    let ctx = KernelContext::default();
    let mut cmds = CommandMap::new();
    cmds.insert(1, vec![make_attack_command(2, Some(CLUB_ID), None)]);
    cmds.insert(2, vec![defend_full(defence)]);

    (1..=seeds)
        .map(|seed| {
            let mut world = WorldState::new(
                seed,
                vec![fighter(1, 1, 0.0, &[CLUB_ID]), fighter(2, 2, 0.55, target_items)],
            );
            for _ in 0..ticks {
                step_world(&mut world, &cmds, &ctx);
            }
            world.entity(2).map(total_damage).unwrap_or(0)
        })
        .sum()
}

fn sprint_distance(world: &mut WorldState, ticks: u32) -> i32 {
    let ctx = KernelContext::default();
    let mut cmds = CommandMap::new();
    cmds.insert(1, vec![move_dir(v3(scale::Q, 0, 0), scale::Q, MoveMode::Sprint)]);
    let start = world.entities[0].position_m.x;
    for _ in 0..ticks {
        step_world(world, &cmds, &ctx);
    }
    world.entities[0].position_m.x - start
}

// ── 1. Scenario Catalogue ───────────────────────────────────────────────

fn validate_scenarios(verbose: bool) -> Vec<TestResult> {
    println!("--- Scenario Catalogue ---");
    let mut results = Vec::new();

    let catalogue: Vec<ScenarioEntry> = match serde_json::from_str(SCENARIOS_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "catalogue_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let names: BTreeSet<&str> = catalogue.iter().map(|s| s.name.as_str()).collect();
    results.push(TestResult {
        name: "catalogue_unique_names".into(),
        passed: !catalogue.is_empty() && names.len() == catalogue.len(),
        detail: format!("{} scenarios, {} distinct names", catalogue.len(), names.len()),
    });

    for entry in &catalogue {
        let teams: BTreeSet<u32> = entry.scenario.squads.iter().map(|s| s.team_id).collect();
        results.push(TestResult {
            name: format!("{}_has_opponents", entry.name),
            passed: teams.len() >= 2,
            detail: format!("{} teams", teams.len()),
        });

        let mut first = SimulationEngine::from_scenario(&entry.scenario, entry.engine.clone());
        let mut second = SimulationEngine::from_scenario(&entry.scenario, entry.engine.clone());
        let outcome_a = first.run_until_resolved();
        let outcome_b = second.run_until_resolved();

        if verbose {
            println!(
                "  {} ({}): {:?} at tick {}, survivors {:?}",
                entry.name,
                entry.description,
                outcome_a,
                first.tick(),
                first.alive_by_team()
            );
        }

        results.push(TestResult {
            name: format!("{}_reproducible", entry.name),
            passed: outcome_a == outcome_b && first.world() == second.world(),
            detail: format!("{:?} at tick {}", outcome_a, first.tick()),
        });

        let dealt: i64 = first.world().entities.iter().map(total_damage).sum();
        results.push(TestResult {
            name: format!("{}_contact_made", entry.name),
            passed: dealt > 0,
            detail: format!("total damage {}", dealt),
        });
    }

    results
}

// ── 2. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(verbose: bool) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let ctx = KernelContext::default();
    let mut mismatches = 0;
    for seed in 1..=10u64 {
        let base = generate_scenario(&ScenarioConfig {
            seed,
            ..ScenarioConfig::default()
        })
        .world;
        let mut shuffled = base.clone();
        shuffled.entities.shuffle(&mut StdRng::seed_from_u64(seed ^ 0x5eed));

        let cmds: CommandMap = base
            .entities
            .iter()
            .map(|e| {
                let dir = if e.team_id == 1 { scale::Q } else { -scale::Q };
                (
                    e.id,
                    vec![
                        move_dir(v3(dir, 0, 0), scale::Q, MoveMode::Run),
                        attack_nearest(None, Some(scale::Q)),
                    ],
                )
            })
            .collect();

        let mut a = base;
        let mut b = shuffled;
        for _ in 0..80 {
            step_world(&mut a, &cmds, &ctx);
            step_world(&mut b, &cmds, &ctx);
        }
        if a != b {
            mismatches += 1;
            if verbose {
                println!("  seed {} diverged after shuffle", seed);
            }
        }
    }
    results.push(TestResult {
        name: "entity_order_invariant".into(),
        passed: mismatches == 0,
        detail: format!("{}/10 seeds diverged", mismatches),
    });

    let mut engine = SimulationEngine::from_scenario(&ScenarioConfig::default(), EngineConfig::default());
    engine.run(25);
    let mut buffer = Vec::new();
    let resumed = match engine.save(&mut buffer) {
        Ok(()) => {
            let mut loaded = SimulationEngine::default();
            loaded.load(&buffer[..]).map(|_| loaded)
        }
        Err(e) => Err(e),
    };
    let (passed, detail) = match resumed {
        Ok(mut loaded) => {
            engine.run(50);
            loaded.run(50);
            (
                loaded.world() == engine.world(),
                format!("{} byte save, resumed to tick {}", buffer.len(), loaded.tick()),
            )
        }
        Err(e) => (false, format!("save/load failed: {}", e)),
    };
    results.push(TestResult {
        name: "save_load_resume".into(),
        passed,
        detail,
    });

    results
}

// ── 3. Defence ──────────────────────────────────────────────────────────

fn validate_defence(verbose: bool) -> Vec<TestResult> {
    println!("--- Defence ---");
    let mut results = Vec::new();

    let none = duel_sweep(DefenceMode::None, &[], 100, 60);
    let block = duel_sweep(DefenceMode::Block, &[], 100, 60);
    let parry = duel_sweep(DefenceMode::Parry, &[], 100, 60);
    let dodge = duel_sweep(DefenceMode::Dodge, &[], 100, 60);

    if verbose {
        println!("  damage none={} block={} parry={} dodge={}", none, block, parry, dodge);
    }

    results.push(TestResult {
        name: "undefended_takes_damage".into(),
        passed: none > 0,
        detail: format!("{} over 100 duels", none),
    });
    results.push(TestResult {
        name: "block_reduces_damage".into(),
        passed: block <= none,
        detail: format!("block {} vs none {}", block, none),
    });
    results.push(TestResult {
        name: "parry_reduces_damage".into(),
        passed: parry <= none,
        detail: format!("parry {} vs none {}", parry, none),
    });
    results.push(TestResult {
        name: "dodge_reduces_damage".into(),
        passed: dodge <= none,
        detail: format!("dodge {} vs none {}", dodge, none),
    });

    results
}

// ── 4. Equipment ────────────────────────────────────────────────────────

fn validate_equipment(verbose: bool) -> Vec<TestResult> {
    println!("--- Equipment ---");
    let mut results = Vec::new();

    let bare = duel_sweep(DefenceMode::None, &[], 100, 60);
    let mail = duel_sweep(DefenceMode::None, &[MAIL_ID], 100, 60);
    results.push(TestResult {
        name: "mail_absorbs".into(),
        passed: mail < bare,
        detail: format!("mail {} vs bare {}", mail, bare),
    });

    let stature = to::m(1.75);
    let lever = |id: &str| {
        item(id)
            .and_then(|i| i.as_weapon().cloned())
            .map(|w| parry_leverage_q(&derive_weapon_handling(&w, stature), stature))
    };
    let (passed, detail) = match (lever(CLUB_ID), lever(KNIFE_ID)) {
        (Some(club), Some(knife)) => (club > knife, format!("club {} vs knife {}", club, knife)),
        _ => (false, "starter weapons missing".to_string()),
    };
    if verbose {
        println!("  leverage {}", detail);
    }
    results.push(TestResult {
        name: "club_out_levers_knife".into(),
        passed,
        detail,
    });

    results
}

// ── 5. Movement ─────────────────────────────────────────────────────────

fn validate_movement(verbose: bool) -> Vec<TestResult> {
    println!("--- Movement ---");
    let mut results = Vec::new();

    let crowd = |spacing: f64| {
        let mut entities = vec![fighter(1, 1, 0.0, &[])];
        let mut id = 2;
        for gx in -1..=1 {
            for gy in -1..=1 {
                if gx == 0 && gy == 0 {
                    continue;
                }
                let mut e = fighter(id, 1, gx as f64 * spacing, &[]);
                e.position_m.y = to::m(gy as f64 * spacing);
                entities.push(e);
                id += 1;
            }
        }
        WorldState::new(17, entities)
    };
    let packed = sprint_distance(&mut crowd(0.3), 1);
    let open = sprint_distance(&mut crowd(5.0), 1);
    results.push(TestResult {
        name: "crowd_damps_sprint".into(),
        passed: open > 0 && packed < open,
        detail: format!("packed {} vs open {}", packed, open),
    });

    let mut healthy = WorldState::new(5, vec![fighter(1, 1, 0.0, &[])]);
    let mut broken = healthy.clone();
    for r in [BodyRegion::LeftLeg, BodyRegion::RightLeg] {
        broken.entities[0].injury.region_mut(r).structural_damage = q(0.9);
    }
    let d_healthy = sprint_distance(&mut healthy, 10);
    let d_broken = sprint_distance(&mut broken, 10);
    if verbose {
        println!("  10-tick sprint healthy={} broken_legs={}", d_healthy, d_broken);
    }
    results.push(TestResult {
        name: "broken_legs_gate_movement".into(),
        passed: d_broken < d_healthy && broken.entities[0].condition.prone,
        detail: format!("healthy {} vs broken {}", d_healthy, d_broken),
    });

    results
}

// ── 6. Realism Tiers ────────────────────────────────────────────────────

fn validate_realism_tiers(_verbose: bool) -> Vec<TestResult> {
    println!("--- Realism Tiers ---");
    let arcade = SimulationTuning::for_realism(Realism::Arcade);
    let tactical = SimulationTuning::for_realism(Realism::Tactical);
    let sim = SimulationTuning::for_realism(Realism::Sim);

    vec![
        TestResult {
            name: "disable_thresholds_tighten".into(),
            passed: arcade.leg_disable_threshold >= tactical.leg_disable_threshold
                && tactical.leg_disable_threshold >= sim.leg_disable_threshold
                && arcade.arm_disable_threshold >= tactical.arm_disable_threshold
                && tactical.arm_disable_threshold >= sim.arm_disable_threshold,
            detail: format!(
                "legs {}/{}/{}",
                arcade.leg_disable_threshold, tactical.leg_disable_threshold, sim.leg_disable_threshold
            ),
        },
        TestResult {
            name: "stand_up_slows".into(),
            passed: arcade.stand_up_base_ticks <= tactical.stand_up_base_ticks
                && tactical.stand_up_base_ticks <= sim.stand_up_base_ticks,
            detail: format!(
                "base ticks {}/{}/{}",
                arcade.stand_up_base_ticks, tactical.stand_up_base_ticks, sim.stand_up_base_ticks
            ),
        },
        TestResult {
            name: "arcade_never_stumbles".into(),
            passed: arcade.stumble_base_chance == 0 && arcade.fall_base_chance == 0,
            detail: format!("stumble {} fall {}", arcade.stumble_base_chance, arcade.fall_base_chance),
        },
    ]
}
