//! Intrinsic traits: channel immunities/resistances and attribute multipliers.
//!
//! Traits are applied in sorted id order so the result never depends on the
//! order a caller lists them in. Each multiplied field is clamped to
//! `[0, 10]`.

use serde::{Deserialize, Serialize};

use crate::channels::{channel_mask, ChannelMask, DamageChannel};
use crate::types::IndividualAttributes;
use crate::units::{clamp_q, q_mul, scale, Q};

/// Variants are declared in the canonical application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TraitId {
    ChemicalImmune,
    DistributedControl,
    FragileStructure,
    HighThermalMass,
    NoBulkMedium,
    NoSurfaceLayer,
    NonConductive,
    RadiationHardened,
    ReinforcedStructure,
    Sealed,
}

/// Attribute fields a trait may scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitField {
    ActuatorScale,
    StructureScale,
    ConversionEfficiency,
    ControlQuality,
    Stability,
    SurfaceIntegrity,
    BulkIntegrity,
    StructureIntegrity,
    ConcussionTolerance,
    ShockTolerance,
    HeatTolerance,
    ColdTolerance,
    FatigueRate,
    RecoveryRate,
}

#[derive(Debug, Clone, Copy)]
pub struct TraitDef {
    pub id: TraitId,
    pub name: &'static str,
    pub description: &'static str,
    pub immune_to: ChannelMask,
    pub resistant_to: ChannelMask,
    pub mult: &'static [(TraitField, Q)],
}

use DamageChannel::*;
use TraitField::*;

pub fn trait_def(id: TraitId) -> TraitDef {
    match id {
        TraitId::Sealed => TraitDef {
            id,
            name: "Sealed",
            description: "Resistant to chemical exposure and suffocation-like hazards (sealed system).",
            immune_to: 0,
            resistant_to: channel_mask(&[Chemical, Suffocation]),
            mult: &[(ShockTolerance, 11_000)],
        },
        TraitId::NonConductive => TraitDef {
            id,
            name: "Non-conductive",
            description: "Highly resistant to electrical hazards.",
            immune_to: channel_mask(&[Electrical]),
            resistant_to: 0,
            mult: &[],
        },
        TraitId::DistributedControl => TraitDef {
            id,
            name: "Distributed control",
            description: "No single control core; more tolerant of local disruption.",
            immune_to: 0,
            resistant_to: channel_mask(&[ControlDisruption]),
            mult: &[(ConcussionTolerance, 12_000), (ShockTolerance, 11_000)],
        },
        TraitId::NoSurfaceLayer => TraitDef {
            id,
            name: "No surface layer",
            description: "Surface injuries are largely irrelevant.",
            immune_to: 0,
            resistant_to: 0,
            mult: &[(SurfaceIntegrity, 99_900)],
        },
        TraitId::NoBulkMedium => TraitDef {
            id,
            name: "No bulk medium",
            description: "Bulk trauma effects are reduced.",
            immune_to: 0,
            resistant_to: 0,
            mult: &[(BulkIntegrity, 20_000), (ShockTolerance, 12_500)],
        },
        TraitId::HighThermalMass => TraitDef {
            id,
            name: "High thermal mass",
            description: "Temperature changes slowly; tolerant of thermal exposure.",
            immune_to: 0,
            resistant_to: 0,
            mult: &[(HeatTolerance, 13_000), (ColdTolerance, 13_000)],
        },
        TraitId::FragileStructure => TraitDef {
            id,
            name: "Fragile structure",
            description: "More susceptible to structural failure.",
            immune_to: 0,
            resistant_to: 0,
            mult: &[(StructureIntegrity, 7_500), (StructureScale, 9_000)],
        },
        TraitId::ReinforcedStructure => TraitDef {
            id,
            name: "Reinforced structure",
            description: "Upgraded load-bearing structure.",
            immune_to: 0,
            resistant_to: 0,
            mult: &[(StructureIntegrity, 12_500), (StructureScale, 11_000)],
        },
        TraitId::ChemicalImmune => TraitDef {
            id,
            name: "Chemical immune",
            description: "Unaffected by chemical/toxin hazards.",
            immune_to: channel_mask(&[Chemical]),
            resistant_to: 0,
            mult: &[],
        },
        TraitId::RadiationHardened => TraitDef {
            id,
            name: "Radiation hardened",
            description: "Resistant to radiation damage and radiation-induced control glitches.",
            immune_to: 0,
            resistant_to: channel_mask(&[Radiation, ControlDisruption]),
            mult: &[(ControlQuality, 10_500)],
        },
    }
}

/// Combined channel masks for a set of traits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraitProfile {
    pub traits: Vec<TraitId>,
    pub immune_mask: ChannelMask,
    pub resistant_mask: ChannelMask,
}

impl TraitProfile {
    pub fn is_immune(&self, ch: DamageChannel) -> bool {
        self.immune_mask & ch.bit() != 0
    }

    pub fn is_resistant(&self, ch: DamageChannel) -> bool {
        self.resistant_mask & ch.bit() != 0
    }
}

pub fn build_trait_profile(traits: &[TraitId]) -> TraitProfile {
    let mut sorted = traits.to_vec();
    sorted.sort();
    let (immune_mask, resistant_mask) = sorted.iter().fold((0, 0), |(im, rs), id| {
        let def = trait_def(*id);
        (im | def.immune_to, rs | def.resistant_to)
    });
    TraitProfile {
        traits: sorted,
        immune_mask,
        resistant_mask,
    }
}

fn field_mut(a: &mut IndividualAttributes, field: TraitField) -> &mut Q {
    match field {
        ActuatorScale => &mut a.morphology.actuator_scale,
        StructureScale => &mut a.morphology.structure_scale,
        ConversionEfficiency => &mut a.performance.conversion_efficiency,
        ControlQuality => &mut a.control.control_quality,
        Stability => &mut a.control.stability,
        SurfaceIntegrity => &mut a.resilience.surface_integrity,
        BulkIntegrity => &mut a.resilience.bulk_integrity,
        StructureIntegrity => &mut a.resilience.structure_integrity,
        ConcussionTolerance => &mut a.resilience.concussion_tolerance,
        ShockTolerance => &mut a.resilience.shock_tolerance,
        HeatTolerance => &mut a.resilience.heat_tolerance,
        ColdTolerance => &mut a.resilience.cold_tolerance,
        FatigueRate => &mut a.resilience.fatigue_rate,
        RecoveryRate => &mut a.resilience.recovery_rate,
    }
}

/// Returns a copy of `base` with every trait's multipliers applied.
pub fn apply_traits_to_attributes(base: &IndividualAttributes, traits: &[TraitId]) -> IndividualAttributes {
    let mut ids = traits.to_vec();
    ids.sort();
    let mut out = *base;
    for id in ids {
        for &(field, mult) in trait_def(id).mult {
            let slot = field_mut(&mut out, field);
            *slot = clamp_q(q_mul(*slot, mult), 0, 10 * scale::Q);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes::HUMAN_BASE;
    use crate::generate::generate_individual;

    #[test]
    fn test_trait_order_independent() {
        let base = generate_individual(77, &HUMAN_BASE);
        let a = apply_traits_to_attributes(
            &base,
            &[TraitId::Sealed, TraitId::NoBulkMedium, TraitId::DistributedControl],
        );
        let b = apply_traits_to_attributes(
            &base,
            &[TraitId::DistributedControl, TraitId::Sealed, TraitId::NoBulkMedium],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_multiplier_clamped_to_ten() {
        let mut base = generate_individual(3, &HUMAN_BASE);
        base.resilience.surface_integrity = 50_000;
        let out = apply_traits_to_attributes(&base, &[TraitId::NoSurfaceLayer]);
        assert_eq!(out.resilience.surface_integrity, 10 * scale::Q);
    }

    #[test]
    fn test_profile_masks() {
        let p = build_trait_profile(&[TraitId::Sealed, TraitId::NonConductive]);
        assert!(p.is_immune(Electrical));
        assert!(p.is_resistant(Chemical));
        assert!(p.is_resistant(Suffocation));
        assert!(!p.is_immune(Chemical));
        assert_eq!(p.traits, vec![TraitId::NonConductive, TraitId::Sealed]);
    }

    #[test]
    fn test_no_traits_is_identity() {
        let base = generate_individual(11, &HUMAN_BASE);
        assert_eq!(apply_traits_to_attributes(&base, &[]), base);
    }
}
