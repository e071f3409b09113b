//! Deterministic tactical simulation kernel for Skirmish.
//!
//! Everything here is plain data and pure integer arithmetic. There is no
//! engine, no I/O and no floating point on the simulation path, so the same
//! world, commands and seed always produce bit-identical results on every
//! platform.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`archetypes`] | Baseline physiology templates (human, service robot) |
//! | [`body`] | Six body regions, per-region storage, hit-area mapping |
//! | [`channels`] | Damage channels and channel bitmasks |
//! | [`derive`] | Movement caps and energy/fatigue expenditure |
//! | [`dist`] | Triangular and skewed draws for attribute generation |
//! | [`equipment`] | Items, loadouts, encumbrance, armour and weapon handling |
//! | [`generate`] | Seeded generation of individual attributes |
//! | [`rng`] | `splitmix32` + `sfc32` deterministic generator |
//! | [`seeds`] | Per-event seed hashing and named salts |
//! | [`sim`] | Entities, indices, crowding, combat, AI and the tick kernel |
//! | [`traits`] | Trait catalogue, immunities and attribute modifiers |
//! | [`types`] | Individual attribute records and energy state |
//! | [`units`] | Fixed-point scales, conversions and integer math |

pub mod archetypes;
pub mod body;
pub mod channels;
pub mod derive;
pub mod dist;
pub mod equipment;
pub mod generate;
pub mod rng;
pub mod seeds;
pub mod sim;
pub mod traits;
pub mod types;
pub mod units;
