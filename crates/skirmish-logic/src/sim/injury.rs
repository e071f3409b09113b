//! Regional injury accumulation.

use serde::{Deserialize, Serialize};

use crate::body::{BodyRegion, ByRegion};
use crate::units::{clamp01, q, q_mul, scale, Q};

/// Damage on one body region. Every field is `0..1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegionInjury {
    pub surface_damage: Q,
    pub internal_damage: Q,
    pub structural_damage: Q,
    pub bleeding_rate: Q,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjuryState {
    pub by_region: ByRegion<RegionInjury>,

    pub fluid_loss: Q,
    pub shock: Q,
    /// 1.0 is fully conscious.
    pub consciousness: Q,

    /// Once set, never cleared.
    pub dead: bool,
}

impl Default for InjuryState {
    fn default() -> Self {
        Self {
            by_region: ByRegion::default(),
            fluid_loss: 0,
            shock: 0,
            consciousness: scale::Q,
            dead: false,
        }
    }
}

impl InjuryState {
    pub fn region(&self, r: BodyRegion) -> &RegionInjury {
        self.by_region.get(r)
    }

    pub fn region_mut(&mut self, r: BodyRegion) -> &mut RegionInjury {
        self.by_region.get_mut(r)
    }

    /// Sticky transition into death.
    pub fn kill(&mut self) {
        self.dead = true;
        self.consciousness = 0;
    }
}

fn sum_by(i: &InjuryState, f: impl Fn(&RegionInjury) -> Q) -> Q {
    clamp01(i.by_region.iter().map(|(_, r)| f(r)).sum())
}

pub fn total_surface_damage(i: &InjuryState) -> Q {
    sum_by(i, |r| r.surface_damage)
}

pub fn total_internal_damage(i: &InjuryState) -> Q {
    sum_by(i, |r| r.internal_damage)
}

pub fn total_structural_damage(i: &InjuryState) -> Q {
    sum_by(i, |r| r.structural_damage)
}

pub fn total_bleeding_rate(i: &InjuryState) -> Q {
    sum_by(i, |r| r.bleeding_rate)
}

/// Knockout pressure from head and torso internal damage.
pub fn region_ko_factor(i: &InjuryState) -> Q {
    let head = i.by_region.head.internal_damage;
    let torso = i.by_region.torso.internal_damage;
    clamp01(q_mul(head, q(1.2)) + q_mul(torso, q(0.6)))
}
