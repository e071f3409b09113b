//! Environmental exposure to injury, per tick.
//!
//! Each exposure is spread over the body by channel-specific weights, then
//! filtered per region by trait immunity/resistance and a seeded armour
//! coverage roll. Suffocation is systemic and only feeds shock.

use crate::body::{BodyRegion, ByRegion, ALL_REGIONS, DEFAULT_REGION_WEIGHTS};
use crate::channels::DamageChannel;
use crate::equipment::{derive_armour_profile, ProtectionProfile};
use crate::traits::{build_trait_profile, TraitProfile};
use crate::units::{clamp01, clamp_q, q, q_mul, scale, Q};

use super::combat::armour_covers_hit;
use super::entity::Entity;

const FIRE_SURFACE_PER_TICK: Q = 20;
const FIRE_SHOCK_PER_TICK: Q = 10;
const CORR_SURFACE_PER_TICK: Q = 15;
const CORR_INTERNAL_PER_TICK: Q = 8;
const ELEC_INTERNAL_PER_TICK: Q = 10;
const ELEC_STUN_RISE: Q = 200;
const SUFF_SHOCK_PER_TICK: Q = 15;

/// Resist capacity at which armour reaches its best (0.2) dose factor.
const RESIST_CAP_J: i32 = 800;

/// How exposed each region is to a systemic hazard on this channel.
pub fn exposure_weights(channel: DamageChannel) -> ByRegion<Q> {
    let w = |head, torso, arm, leg| ByRegion {
        head,
        torso,
        left_arm: arm,
        right_arm: arm,
        left_leg: leg,
        right_leg: leg,
    };
    match channel {
        DamageChannel::Thermal => w(q(0.18), q(0.28), q(0.14), q(0.13)),
        DamageChannel::Chemical => w(q(0.16), q(0.36), q(0.12), q(0.12)),
        DamageChannel::Electrical => w(q(0.10), q(0.22), q(0.22), q(0.12)),
        _ => DEFAULT_REGION_WEIGHTS,
    }
}

fn distribute(channel: DamageChannel, dose: Q) -> ByRegion<Q> {
    let w = exposure_weights(channel);
    ByRegion::from_fn(|r| q_mul(dose, *w.get(r)))
}

struct Exposure<'a> {
    world_seed: u32,
    tick: u32,
    entity_id: u32,
    traits: &'a TraitProfile,
    armour: &'a ProtectionProfile,
}

impl Exposure<'_> {
    fn halve_if_resistant(&self, channel: DamageChannel, dose: Q) -> Q {
        if self.traits.is_resistant(channel) {
            dose / 2
        } else {
            dose
        }
    }

    fn dose_to_region(&self, channel: DamageChannel, region: BodyRegion, dose: Q) -> Q {
        if dose <= 0 || self.traits.is_immune(channel) {
            return 0;
        }
        let mut out = self.halve_if_resistant(channel, dose);

        let b = (self.entity_id ^ 0xBEEF)
            .wrapping_add((channel as u32) << 8)
            .wrapping_add(region.salt());
        let coverage = *self.armour.coverage_by_region.get(region);
        let covered = armour_covers_hit(self.world_seed, self.tick, coverage, self.entity_id, b);

        if covered && self.armour.protects(channel) {
            let capped = self.armour.resist_j.min(RESIST_CAP_J);
            let resist_factor = clamp_q(
                scale::Q - (capped as i64 * scale::Q as i64 / RESIST_CAP_J as i64) as Q,
                q(0.20),
                scale::Q,
            );
            out = q_mul(q_mul(out, resist_factor), self.armour.protected_damage_mul);
            out = q_mul(out, self.armour.channel_mul(channel));
        }
        out
    }

    fn suffocation_dose(&self, raw: Q) -> Q {
        let ch = DamageChannel::Suffocation;
        if raw <= 0 || self.traits.is_immune(ch) {
            return 0;
        }
        let mut out = self.halve_if_resistant(ch, raw);
        let covered = armour_covers_hit(
            self.world_seed,
            self.tick,
            self.armour.coverage_by_region.head,
            self.entity_id,
            self.entity_id ^ 0x5AFF,
        );
        if covered && self.armour.protects(ch) {
            out = q_mul(out, self.armour.protected_damage_mul);
        }
        out
    }
}

/// Apply one tick of fire, corrosive, electrical and suffocation exposure.
pub fn step_conditions_to_injury(world_seed: u32, tick: u32, e: &mut Entity) {
    let c = &e.condition;
    if c.on_fire <= 0 && c.corrosive_exposure <= 0 && c.electrical_overload <= 0 && c.suffocation <= 0 {
        return;
    }

    let traits = build_trait_profile(&e.traits);
    let armour = derive_armour_profile(&e.loadout);
    let exposure = Exposure {
        world_seed,
        tick,
        entity_id: e.id,
        traits: &traits,
        armour: &armour,
    };

    let fire_by = distribute(DamageChannel::Thermal, c.on_fire);
    let corr_by = distribute(DamageChannel::Chemical, c.corrosive_exposure);
    let elec_by = distribute(DamageChannel::Electrical, c.electrical_overload);
    let suff = exposure.suffocation_dose(c.suffocation);

    for r in ALL_REGIONS {
        let fire = exposure.dose_to_region(DamageChannel::Thermal, r, *fire_by.get(r));
        let corr = exposure.dose_to_region(DamageChannel::Chemical, r, *corr_by.get(r));
        let elec = exposure.dose_to_region(DamageChannel::Electrical, r, *elec_by.get(r));

        let region = e.injury.by_region.get_mut(r);
        if fire > 0 {
            region.surface_damage = clamp01(region.surface_damage + q_mul(fire, FIRE_SURFACE_PER_TICK));
        }
        if corr > 0 {
            region.surface_damage = clamp01(region.surface_damage + q_mul(corr, CORR_SURFACE_PER_TICK));
            region.internal_damage = clamp01(region.internal_damage + q_mul(corr, CORR_INTERNAL_PER_TICK));
        }
        if elec > 0 {
            region.internal_damage = clamp01(region.internal_damage + q_mul(elec, ELEC_INTERNAL_PER_TICK));
            e.condition.stunned = clamp01(e.condition.stunned + q_mul(elec, ELEC_STUN_RISE));
        }
        if fire > 0 {
            e.injury.shock = clamp01(e.injury.shock + q_mul(fire, FIRE_SHOCK_PER_TICK));
        }
    }

    if suff > 0 {
        e.injury.shock = clamp01(e.injury.shock + q_mul(suff, SUFF_SHOCK_PER_TICK));
    }
}
