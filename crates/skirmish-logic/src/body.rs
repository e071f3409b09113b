//! Body regions and per-region storage.

use serde::{Deserialize, Serialize};

use crate::units::{scale, Q};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BodyRegion {
    Head,
    Torso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

pub const ALL_REGIONS: [BodyRegion; 6] = [
    BodyRegion::Head,
    BodyRegion::Torso,
    BodyRegion::LeftArm,
    BodyRegion::RightArm,
    BodyRegion::LeftLeg,
    BodyRegion::RightLeg,
];

impl BodyRegion {
    pub fn is_arm(self) -> bool {
        matches!(self, Self::LeftArm | Self::RightArm)
    }

    pub fn is_leg(self) -> bool {
        matches!(self, Self::LeftLeg | Self::RightLeg)
    }

    pub fn is_limb(self) -> bool {
        self.is_arm() || self.is_leg()
    }

    /// Distinguishes per-region armour rolls for the same entity and channel.
    pub fn salt(self) -> u32 {
        match self {
            Self::Head => 0x11,
            Self::Torso => 0x22,
            Self::LeftArm => 0x33,
            Self::RightArm => 0x44,
            Self::LeftLeg => 0x55,
            Self::RightLeg => 0x66,
        }
    }
}

/// Coarse hit location before the side of the body is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitArea {
    Head,
    Torso,
    Arm,
    Leg,
}

/// Resolve a hit area to a concrete region. `side_bit` 0 is left.
pub fn region_from_hit(area: HitArea, side_bit: u32) -> BodyRegion {
    match (area, side_bit & 1) {
        (HitArea::Head, _) => BodyRegion::Head,
        (HitArea::Torso, _) => BodyRegion::Torso,
        (HitArea::Arm, 0) => BodyRegion::LeftArm,
        (HitArea::Arm, _) => BodyRegion::RightArm,
        (HitArea::Leg, 0) => BodyRegion::LeftLeg,
        (HitArea::Leg, _) => BodyRegion::RightLeg,
    }
}

/// One value per body region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ByRegion<T> {
    pub head: T,
    pub torso: T,
    pub left_arm: T,
    pub right_arm: T,
    pub left_leg: T,
    pub right_leg: T,
}

impl<T> ByRegion<T> {
    pub fn from_fn(mut f: impl FnMut(BodyRegion) -> T) -> Self {
        Self {
            head: f(BodyRegion::Head),
            torso: f(BodyRegion::Torso),
            left_arm: f(BodyRegion::LeftArm),
            right_arm: f(BodyRegion::RightArm),
            left_leg: f(BodyRegion::LeftLeg),
            right_leg: f(BodyRegion::RightLeg),
        }
    }

    pub fn get(&self, r: BodyRegion) -> &T {
        match r {
            BodyRegion::Head => &self.head,
            BodyRegion::Torso => &self.torso,
            BodyRegion::LeftArm => &self.left_arm,
            BodyRegion::RightArm => &self.right_arm,
            BodyRegion::LeftLeg => &self.left_leg,
            BodyRegion::RightLeg => &self.right_leg,
        }
    }

    pub fn get_mut(&mut self, r: BodyRegion) -> &mut T {
        match r {
            BodyRegion::Head => &mut self.head,
            BodyRegion::Torso => &mut self.torso,
            BodyRegion::LeftArm => &mut self.left_arm,
            BodyRegion::RightArm => &mut self.right_arm,
            BodyRegion::LeftLeg => &mut self.left_leg,
            BodyRegion::RightLeg => &mut self.right_leg,
        }
    }

    /// Regions in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyRegion, &T)> {
        ALL_REGIONS.into_iter().map(move |r| (r, self.get(r)))
    }
}

/// Approximate share of exposed body area per region.
pub const DEFAULT_REGION_WEIGHTS: ByRegion<Q> = ByRegion {
    head: 1_200,
    torso: 5_000,
    left_arm: 950,
    right_arm: 950,
    left_leg: 950,
    right_leg: 950,
};

pub fn weighted_mean01(values: &ByRegion<Q>, weights: &ByRegion<Q>) -> Q {
    ALL_REGIONS
        .iter()
        .map(|&r| (*values.get(r) as i64 * *weights.get(r) as i64 / scale::Q as i64) as Q)
        .sum()
}
