//! Stock policies, one per [`AiArchetype`].

use crate::units::{q, to};

use super::types::{AiArchetype, AiPolicy};

pub fn line_infantry() -> AiPolicy {
    AiPolicy {
        archetype: AiArchetype::LineInfantry,
        desired_range_m: to::m(0.9),
        engage_range_m: to::m(1.2),
        retreat_range_m: to::m(0.35),
        threat_range_m: to::m(1.6),
        defend_when_threatened: q(0.35),
        parry_bias: q(0.55),
        dodge_bias: q(0.10),
        retarget_cooldown_ticks: 15,
        focus_stickiness: q(0.75),
    }
}

pub fn skirmisher() -> AiPolicy {
    AiPolicy {
        archetype: AiArchetype::Skirmisher,
        desired_range_m: to::m(1.4),
        engage_range_m: to::m(1.6),
        retreat_range_m: to::m(0.50),
        threat_range_m: to::m(1.6),
        defend_when_threatened: q(0.25),
        parry_bias: q(0.35),
        dodge_bias: q(0.45),
        retarget_cooldown_ticks: 10,
        focus_stickiness: q(0.55),
    }
}

pub fn berserker() -> AiPolicy {
    AiPolicy {
        archetype: AiArchetype::Berserker,
        desired_range_m: to::m(0.6),
        engage_range_m: to::m(2.0),
        retreat_range_m: 0,
        threat_range_m: to::m(1.0),
        defend_when_threatened: q(0.10),
        parry_bias: q(0.20),
        dodge_bias: q(0.10),
        retarget_cooldown_ticks: 25,
        focus_stickiness: q(0.90),
    }
}

pub fn defender() -> AiPolicy {
    AiPolicy {
        archetype: AiArchetype::Defender,
        desired_range_m: to::m(1.0),
        engage_range_m: to::m(1.0),
        retreat_range_m: to::m(0.50),
        threat_range_m: to::m(2.0),
        defend_when_threatened: q(0.60),
        parry_bias: q(0.30),
        dodge_bias: q(0.10),
        retarget_cooldown_ticks: 20,
        focus_stickiness: q(0.80),
    }
}

impl AiArchetype {
    /// Stock policy for this archetype.
    pub fn policy(self) -> AiPolicy {
        match self {
            AiArchetype::Skirmisher => skirmisher(),
            AiArchetype::LineInfantry => line_infantry(),
            AiArchetype::Berserker => berserker(),
            AiArchetype::Defender => defender(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [AiArchetype; 4] = [
        AiArchetype::Skirmisher,
        AiArchetype::LineInfantry,
        AiArchetype::Berserker,
        AiArchetype::Defender,
    ];

    #[test]
    fn test_preset_archetype_matches() {
        for a in ALL {
            assert_eq!(a.policy().archetype, a);
        }
    }

    #[test]
    fn test_ranges_are_ordered() {
        for a in ALL {
            let p = a.policy();
            assert!(p.retreat_range_m < p.desired_range_m, "{a:?}");
            assert!(p.desired_range_m <= p.engage_range_m, "{a:?}");
        }
    }

    #[test]
    fn test_skirmisher_outranges_line_infantry() {
        assert!(skirmisher().desired_range_m > line_infantry().desired_range_m);
        assert!(skirmisher().dodge_bias > line_infantry().dodge_bias);
    }
}
