//! Damage channels and channel bitmasks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DamageChannel {
    Kinetic = 0,
    Thermal = 1,
    Electrical = 2,
    Chemical = 3,
    Radiation = 4,
    Corrosive = 5,
    Suffocation = 6,
    ControlDisruption = 7,
}

impl DamageChannel {
    pub const ALL: [DamageChannel; 8] = [
        Self::Kinetic,
        Self::Thermal,
        Self::Electrical,
        Self::Chemical,
        Self::Radiation,
        Self::Corrosive,
        Self::Suffocation,
        Self::ControlDisruption,
    ];

    pub fn bit(self) -> ChannelMask {
        1 << (self as u32)
    }
}

/// One bit per [`DamageChannel`].
pub type ChannelMask = u32;

pub fn channel_mask(channels: &[DamageChannel]) -> ChannelMask {
    channels.iter().fold(0, |m, c| m | c.bit())
}

pub fn has_channel(mask: ChannelMask, ch: DamageChannel) -> bool {
    mask & ch.bit() != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_roundtrip() {
        let m = channel_mask(&[DamageChannel::Kinetic, DamageChannel::Chemical]);
        assert_eq!(m, 0b1001);
        assert!(has_channel(m, DamageChannel::Kinetic));
        assert!(has_channel(m, DamageChannel::Chemical));
        assert!(!has_channel(m, DamageChannel::Thermal));
    }

    #[test]
    fn test_all_bits_distinct() {
        let all = channel_mask(&DamageChannel::ALL);
        assert_eq!(all, 0xFF);
    }
}
