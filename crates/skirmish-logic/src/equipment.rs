//! Loadouts, encumbrance and armour aggregation.
//!
//! Every fold over a loadout walks the items sorted by id, so two loadouts
//! holding the same items in a different order derive identical results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::body::{weighted_mean01, ByRegion, DEFAULT_REGION_WEIGHTS};
use crate::channels::{channel_mask, ChannelMask, DamageChannel};
use crate::types::IndividualAttributes;
use crate::units::{clamp_q, mul_div, mul_div_wide, q, q_mul, scale, to, I32, Q};

pub type ItemId = String;

/// Damage split of a weapon across the three injury channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponDamageProfile {
    pub surface_frac: Q,
    pub internal_frac: Q,
    pub structural_frac: Q,

    pub bleed_factor: Q,
    /// Shifts damage from surface toward internal.
    pub penetration_bias: Q,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Handedness {
    #[default]
    OneHand,
    TwoHand,
    Mounted,
    Natural,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub reach_m: Option<I32>,
    pub handling_mul: Option<Q>,
    pub ready_time_s: Option<I32>,

    pub strike_effective_mass_frac: Option<Q>,
    pub strike_speed_mul: Option<Q>,

    pub damage: WeaponDamageProfile,

    pub handedness: Option<Handedness>,
    /// Lever arm used for parry and block effectiveness.
    pub moment_arm_m: Option<I32>,
    /// How tiring the weapon is to wield.
    pub handling_load_mul: Option<Q>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armour {
    pub protects: ChannelMask,
    pub coverage_by_region: ByRegion<Q>,

    pub resist_j: I32,
    pub protected_damage_mul: Q,

    pub channel_resist_mul: BTreeMap<DamageChannel, Q>,

    pub mobility_mul: Option<Q>,
    pub fatigue_mul: Option<Q>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon(Weapon),
    Armour(Armour),
    Gear,
}

/// Shared item fields plus the kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub mass_kg: I32,
    pub bulk: Q,
    pub kind: ItemKind,
}

impl Item {
    pub fn as_weapon(&self) -> Option<&Weapon> {
        match &self.kind {
            ItemKind::Weapon(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_armour(&self) -> Option<&Armour> {
        match &self.kind {
            ItemKind::Armour(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Loadout {
    pub items: Vec<Item>,
}

impl Loadout {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    fn sorted(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.iter().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }
}

// ── Encumbrance ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncumbranceTotals {
    pub carried_mass_kg: I32,
    pub carried_bulk: Q,
    pub worn_mass_kg: I32,
    pub worn_bulk: Q,
    pub carried_mass_frac_of_body: Q,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncumbrancePenalties {
    pub speed_mul: Q,
    pub accel_mul: Q,
    pub jump_mul: Q,
    pub energy_demand_mul: Q,
    pub control_mul: Q,
    pub stability_mul: Q,
    pub encumbrance_ratio: Q,
    pub overloaded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encumbrance {
    pub totals: EncumbranceTotals,
    pub penalties: EncumbrancePenalties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryRules {
    /// Fraction of peak force usable as sustained carrying load.
    pub capacity_factor: Q,
    /// Mass-equivalent of each unit of bulk above 1.0.
    pub bulk_to_mass_factor: Q,
}

impl Default for CarryRules {
    fn default() -> Self {
        Self {
            capacity_factor: 2_500,
            bulk_to_mass_factor: 600,
        }
    }
}

pub fn compute_loadout_totals(loadout: &Loadout, armour_is_worn: bool) -> EncumbranceTotals {
    let mut t = EncumbranceTotals::default();
    for it in loadout.sorted() {
        t.carried_mass_kg += it.mass_kg;
        t.carried_bulk += it.bulk;
        if armour_is_worn && it.as_armour().is_some() {
            t.worn_mass_kg += it.mass_kg;
            t.worn_bulk += it.bulk;
        }
    }
    t
}

/// Mass that can be carried without penalty, from peak force under 1 g.
///
/// `g` is taken as 9.810 (kept in milli-units, hence the extra 1000).
pub fn derive_carry_capacity_mass_kg(a: &IndividualAttributes, rules: &CarryRules) -> I32 {
    let numerator =
        a.performance.peak_force_n as i128 * scale::KG as i128 * rules.capacity_factor as i128 * 1_000;
    let denom = scale::N as i128 * scale::Q as i128 * 9_810;
    ((numerator / denom) as I32).max(1)
}

pub fn compute_encumbrance(a: &IndividualAttributes, loadout: &Loadout, rules: &CarryRules) -> Encumbrance {
    let mut totals = compute_loadout_totals(loadout, true);
    let body_mass = a.morphology.mass_kg.max(1) as i64;

    totals.carried_mass_frac_of_body =
        mul_div_wide(totals.carried_mass_kg as i64, scale::Q as i64, body_mass) as Q;

    let capacity = derive_carry_capacity_mass_kg(a, rules).max(1) as i64;
    let mass_ratio = mul_div_wide(totals.carried_mass_kg as i64, scale::Q as i64, capacity);

    let bulk_above_one = (totals.carried_bulk - scale::Q).max(0);
    let bulk_term = q_mul(bulk_above_one, rules.bulk_to_mass_factor) as i64;

    let r = (mass_ratio + bulk_term).clamp(0, 5 * scale::Q as i64) as Q;
    Encumbrance {
        totals,
        penalties: encumbrance_curve(r, a),
    }
}

fn encumbrance_curve(r: Q, a: &IndividualAttributes) -> EncumbrancePenalties {
    let base_demand = piecewise_mul(r, q(1.0), q(1.10), q(1.30), q(1.65));
    EncumbrancePenalties {
        speed_mul: piecewise_mul(r, q(1.0), q(0.92), q(0.78), q(0.55)),
        accel_mul: piecewise_mul(r, q(1.0), q(0.88), q(0.70), q(0.45)),
        jump_mul: piecewise_mul(r, q(1.0), q(0.90), q(0.68), q(0.40)),
        energy_demand_mul: clamp_q(q_mul(base_demand, a.resilience.fatigue_rate), q(0.5), q(3.0)),
        control_mul: piecewise_mul(r, q(1.0), q(0.96), q(0.88), q(0.75)),
        stability_mul: piecewise_mul(r, q(1.0), q(0.94), q(0.82), q(0.65)),
        encumbrance_ratio: r,
        overloaded: r > q(1.5),
    }
}

/// Three-segment interpolation through `a` (r <= 0.5), `b` (1.0), `c` (1.5)
/// and a flat `d` beyond 1.5.
fn piecewise_mul(r: Q, a: Q, b: Q, c: Q, d: Q) -> Q {
    let (r05, r10, r15) = (q(0.5), q(1.0), q(1.5));
    if r <= r05 {
        a
    } else if r <= r10 {
        let t = mul_div(r - r05, scale::Q, r10 - r05);
        a + mul_div(b - a, t, scale::Q)
    } else if r <= r15 {
        let t = mul_div(r - r10, scale::Q, r15 - r10);
        b + mul_div(c - b, t, scale::Q)
    } else {
        d
    }
}

// ── Armour aggregation ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionProfile {
    pub protects: ChannelMask,
    pub coverage_by_region: ByRegion<Q>,
    pub coverage_overall: Q,
    pub resist_j: I32,
    pub protected_damage_mul: Q,
    pub mobility_mul: Q,
    pub fatigue_mul: Q,
    pub channel_resist_mul: BTreeMap<DamageChannel, Q>,
}

impl ProtectionProfile {
    pub fn protects(&self, ch: DamageChannel) -> bool {
        self.protects & ch.bit() != 0
    }

    pub fn channel_mul(&self, ch: DamageChannel) -> Q {
        self.channel_resist_mul.get(&ch).copied().unwrap_or(scale::Q)
    }
}

/// Combine all worn armour into one profile.
///
/// Coverage combines as independent layers (`1 - (1-a)(1-b)`); damage,
/// mobility and fatigue multipliers multiply; resist capacity adds.
pub fn derive_armour_profile(loadout: &Loadout) -> ProtectionProfile {
    let mut protects: ChannelMask = 0;
    let mut protected_mul = scale::Q;
    let mut mobility_mul = scale::Q;
    let mut fatigue_mul = scale::Q;
    let mut coverage: ByRegion<Q> = ByRegion::default();
    let mut resist_j: I32 = 0;
    let mut channel_resist_mul: BTreeMap<DamageChannel, Q> = BTreeMap::new();

    for armour in loadout.sorted().into_iter().filter_map(Item::as_armour) {
        protects |= armour.protects;
        protected_mul = q_mul(protected_mul, armour.protected_damage_mul);
        mobility_mul = q_mul(mobility_mul, armour.mobility_mul.unwrap_or(scale::Q));
        fatigue_mul = q_mul(fatigue_mul, armour.fatigue_mul.unwrap_or(scale::Q));

        coverage = ByRegion::from_fn(|r| {
            let uncovered = scale::Q - *armour.coverage_by_region.get(r);
            scale::Q - q_mul(scale::Q - *coverage.get(r), uncovered)
        });

        resist_j += armour.resist_j;

        for (&ch, &mul) in &armour.channel_resist_mul {
            channel_resist_mul
                .entry(ch)
                .and_modify(|m| *m = q_mul(*m, mul))
                .or_insert(mul);
        }
    }

    ProtectionProfile {
        protects,
        coverage_overall: weighted_mean01(&coverage, &DEFAULT_REGION_WEIGHTS),
        coverage_by_region: coverage,
        resist_j: resist_j.max(0),
        protected_damage_mul: clamp_q(protected_mul, q(0.05), q(1.0)),
        mobility_mul: clamp_q(mobility_mul, q(0.30), q(1.0)),
        fatigue_mul: clamp_q(fatigue_mul, q(0.80), q(3.0)),
        channel_resist_mul,
    }
}

// ── Weapons ─────────────────────────────────────────────────────────────

/// The weapon with `weapon_id`, or the first weapon carried when no id is
/// given. An id that is not carried finds nothing.
pub fn find_weapon<'a>(loadout: &'a Loadout, weapon_id: Option<&str>) -> Option<(&'a Item, &'a Weapon)> {
    let mut weapons = loadout
        .items
        .iter()
        .filter_map(|it| it.as_weapon().map(|w| (it, w)));
    match weapon_id {
        Some(id) => weapons.find(|(it, _)| it.id == id),
        None => weapons.next(),
    }
}

/// Default reach for a weapon (or bare hands) with no explicit reach.
pub fn default_reach_m(stature_m: I32) -> I32 {
    mul_div(stature_m, 4_500, scale::Q)
}

pub fn weapon_reach_m(w: &Weapon, stature_m: I32) -> I32 {
    w.reach_m.unwrap_or_else(|| default_reach_m(stature_m))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponHandling {
    pub handedness: Handedness,
    pub reach_m: I32,
    pub moment_arm_m: I32,
    pub handling_load_mul: Q,
}

pub fn derive_weapon_handling(w: &Weapon, owner_stature_m: I32) -> WeaponHandling {
    let reach_m = weapon_reach_m(w, owner_stature_m);
    WeaponHandling {
        handedness: w.handedness.unwrap_or_default(),
        reach_m,
        moment_arm_m: w.moment_arm_m.unwrap_or_else(|| mul_div(reach_m, 5_500, scale::Q)),
        handling_load_mul: w.handling_load_mul.unwrap_or(scale::Q),
    }
}

/// Bare-handed lever: default reach and moment arm, natural handedness.
pub fn unarmed_handling(owner_stature_m: I32) -> WeaponHandling {
    let reach_m = default_reach_m(owner_stature_m);
    WeaponHandling {
        handedness: Handedness::Natural,
        reach_m,
        moment_arm_m: mul_div(reach_m, 5_500, scale::Q),
        handling_load_mul: scale::Q,
    }
}

// ── Starter fixtures ────────────────────────────────────────────────────

pub const CLUB_ID: &str = "wpn_club";
pub const KNIFE_ID: &str = "wpn_knife";
pub const LEATHER_ID: &str = "arm_leather";
pub const MAIL_ID: &str = "arm_mail";

pub fn starter_weapons() -> Vec<Item> {
    vec![
        Item {
            id: CLUB_ID.into(),
            name: "Wooden club".into(),
            mass_kg: to::kg(1.2),
            bulk: q(1.4),
            kind: ItemKind::Weapon(Weapon {
                reach_m: Some(to::m(0.7)),
                handling_mul: Some(q(1.10)),
                ready_time_s: None,
                strike_effective_mass_frac: Some(q(0.18)),
                strike_speed_mul: Some(q(0.95)),
                damage: WeaponDamageProfile {
                    surface_frac: q(0.35),
                    internal_frac: q(0.20),
                    structural_frac: q(0.45),
                    bleed_factor: q(0.25),
                    penetration_bias: q(0.10),
                },
                handedness: Some(Handedness::OneHand),
                moment_arm_m: Some(to::m(0.45)),
                handling_load_mul: None,
            }),
        },
        Item {
            id: KNIFE_ID.into(),
            name: "Knife".into(),
            mass_kg: to::kg(0.3),
            bulk: q(1.1),
            kind: ItemKind::Weapon(Weapon {
                reach_m: Some(to::m(0.2)),
                handling_mul: Some(q(0.85)),
                ready_time_s: None,
                strike_effective_mass_frac: Some(q(0.10)),
                strike_speed_mul: Some(q(1.05)),
                damage: WeaponDamageProfile {
                    surface_frac: q(0.30),
                    internal_frac: q(0.60),
                    structural_frac: q(0.10),
                    bleed_factor: q(0.95),
                    penetration_bias: q(0.85),
                },
                handedness: Some(Handedness::OneHand),
                moment_arm_m: Some(to::m(0.18)),
                handling_load_mul: None,
            }),
        },
    ]
}

pub fn starter_armour() -> Vec<Item> {
    vec![
        Item {
            id: LEATHER_ID.into(),
            name: "Leather armour".into(),
            mass_kg: to::kg(6.0),
            bulk: q(1.6),
            kind: ItemKind::Armour(Armour {
                protects: channel_mask(&[DamageChannel::Kinetic, DamageChannel::Thermal]),
                coverage_by_region: ByRegion {
                    head: q(0.10),
                    torso: q(0.70),
                    left_arm: q(0.45),
                    right_arm: q(0.45),
                    left_leg: q(0.25),
                    right_leg: q(0.25),
                },
                resist_j: 150,
                protected_damage_mul: q(0.85),
                channel_resist_mul: BTreeMap::from([(DamageChannel::Thermal, q(1.10))]),
                mobility_mul: Some(q(0.95)),
                fatigue_mul: Some(q(1.08)),
            }),
        },
        Item {
            id: MAIL_ID.into(),
            name: "Mail armour".into(),
            mass_kg: to::kg(10.0),
            bulk: q(1.9),
            kind: ItemKind::Armour(Armour {
                protects: channel_mask(&[DamageChannel::Kinetic]),
                coverage_by_region: ByRegion {
                    head: q(0.05),
                    torso: q(0.78),
                    left_arm: q(0.55),
                    right_arm: q(0.55),
                    left_leg: q(0.20),
                    right_leg: q(0.20),
                },
                resist_j: 350,
                protected_damage_mul: q(0.75),
                channel_resist_mul: BTreeMap::new(),
                mobility_mul: Some(q(0.90)),
                fatigue_mul: Some(q(1.15)),
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes::HUMAN_BASE;
    use crate::body::BodyRegion;
    use crate::generate::generate_individual;

    fn gear(id: &str, mass: f64, bulk: f64) -> Item {
        Item {
            id: id.into(),
            name: id.into(),
            mass_kg: to::kg(mass),
            bulk: q(bulk),
            kind: ItemKind::Gear,
        }
    }

    #[test]
    fn test_empty_loadout_has_no_penalty() {
        let a = generate_individual(1, &HUMAN_BASE);
        let enc = compute_encumbrance(&a, &Loadout::default(), &CarryRules::default());
        assert_eq!(enc.penalties.speed_mul, q(1.0));
        assert_eq!(enc.penalties.encumbrance_ratio, 0);
        assert!(!enc.penalties.overloaded);
    }

    #[test]
    fn test_carry_capacity_from_peak_force() {
        let mut a = generate_individual(1, &HUMAN_BASE);
        a.performance.peak_force_n = to::n(1840.0);
        // 1840 N * 0.25 / 9.81 = 46.89 kg
        assert_eq!(derive_carry_capacity_mass_kg(&a, &CarryRules::default()), 46_890);
        a.performance.peak_force_n = 0;
        assert_eq!(derive_carry_capacity_mass_kg(&a, &CarryRules::default()), 1);
    }

    #[test]
    fn test_heavy_load_penalises_and_overloads() {
        let a = generate_individual(2, &HUMAN_BASE);
        let heavy = Loadout::new(vec![gear("crate", 200.0, 3.0)]);
        let enc = compute_encumbrance(&a, &heavy, &CarryRules::default());
        assert!(enc.penalties.overloaded);
        assert_eq!(enc.penalties.speed_mul, q(0.55));
        assert_eq!(enc.penalties.accel_mul, q(0.45));
        assert_eq!(enc.totals.carried_mass_kg, to::kg(200.0));
    }

    #[test]
    fn test_piecewise_interpolates_between_breakpoints() {
        let a = q(1.0);
        assert_eq!(piecewise_mul(q(0.5), a, q(0.9), q(0.8), q(0.5)), a);
        assert_eq!(piecewise_mul(q(0.75), a, q(0.9), q(0.8), q(0.5)), q(0.95));
        assert_eq!(piecewise_mul(q(1.25), a, q(0.9), q(0.8), q(0.5)), q(0.85));
        assert_eq!(piecewise_mul(q(2.0), a, q(0.9), q(0.8), q(0.5)), q(0.5));
    }

    #[test]
    fn test_armour_layers_combine_independently() {
        let both = Loadout::new(starter_armour());
        let p = derive_armour_profile(&both);
        // torso: 1 - (1 - 0.70)(1 - 0.78) = 0.934
        assert_eq!(*p.coverage_by_region.get(BodyRegion::Torso), q(0.934));
        assert_eq!(p.resist_j, 500);
        assert!(p.protects(DamageChannel::Kinetic));
        assert!(p.protects(DamageChannel::Thermal));
        assert_eq!(p.channel_mul(DamageChannel::Thermal), q(1.10));
        assert_eq!(p.channel_mul(DamageChannel::Chemical), q(1.0));
        assert!(p.coverage_overall > 0 && p.coverage_overall < q(1.0));
    }

    #[test]
    fn test_armour_profile_order_independent() {
        let mut items = starter_armour();
        let a = derive_armour_profile(&Loadout::new(items.clone()));
        items.reverse();
        let b = derive_armour_profile(&Loadout::new(items));
        assert_eq!(a, b);
    }

    #[test]
    fn test_find_weapon_by_id_or_first() {
        let l = Loadout::new(starter_weapons());
        assert_eq!(find_weapon(&l, Some(KNIFE_ID)).map(|(i, _)| i.id.as_str()), Some(KNIFE_ID));
        assert!(find_weapon(&l, Some("missing")).is_none());
        assert_eq!(find_weapon(&l, None).map(|(i, _)| i.id.as_str()), Some(CLUB_ID));
        assert!(find_weapon(&Loadout::new(starter_armour()), None).is_none());
    }

    #[test]
    fn test_weapon_handling_defaults() {
        let mut w = starter_weapons()[0].as_weapon().cloned().expect("club");
        w.reach_m = None;
        w.moment_arm_m = None;
        w.handedness = None;
        let h = derive_weapon_handling(&w, to::m(2.0));
        assert_eq!(h.reach_m, to::m(0.9));
        assert_eq!(h.moment_arm_m, to::m(0.495));
        assert_eq!(h.handedness, Handedness::OneHand);
    }
}
