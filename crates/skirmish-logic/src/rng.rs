//! Deterministic pseudo-random generator.
//!
//! A splitmix32 expander turns one 32-bit seed into four words that seed
//! an sfc32 generator. Only attribute generation and per-event rolls use
//! it, and each use builds its own generator from an explicit seed.

use crate::units::Q;

/// Seed expander. Each call to [`SplitMix32::next_u32`] advances the state.
#[derive(Debug, Clone)]
pub struct SplitMix32 {
    x: u32,
}

pub fn splitmix32(seed: u32) -> SplitMix32 {
    SplitMix32 { x: seed }
}

impl SplitMix32 {
    pub fn next_u32(&mut self) -> u32 {
        self.x = self.x.wrapping_add(0x9E37_79B9);
        let mut z = self.x;
        z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
        z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
        z ^ (z >> 16)
    }
}

/// Small fast counting generator with four 32-bit registers.
#[derive(Debug, Clone)]
pub struct Sfc32 {
    a: u32,
    b: u32,
    c: u32,
    d: u32,
}

impl Sfc32 {
    pub fn new(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self { a, b, c, d }
    }

    pub fn next_u32(&mut self) -> u32 {
        let t = self.a.wrapping_add(self.b);
        self.a = self.b ^ (self.b >> 9);
        self.b = self.c.wrapping_add(self.c << 3);
        self.c = self.c.rotate_left(21);
        self.d = self.d.wrapping_add(1);
        let out = t.wrapping_add(self.d);
        self.c = self.c.wrapping_add(out);
        out
    }
}

/// Anything that can hand out uniform `[0, 1)` samples in `Q`.
pub trait RngLike {
    fn q01(&mut self) -> Q;
}

/// Seeded generator producing raw words and `Q`-scaled uniform samples.
#[derive(Debug, Clone)]
pub struct Rng {
    inner: Sfc32,
    scale_q: i32,
}

impl Rng {
    pub fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }
}

impl RngLike for Rng {
    /// Maps a raw word into `[0, scale_q)` by truncating multiplication.
    fn q01(&mut self) -> Q {
        let x = self.inner.next_u32() as u64;
        let v = ((x * self.scale_q as u64) >> 32) as i32;
        v.min(self.scale_q - 1)
    }
}

pub fn make_rng(seed: u32, scale_q: i32) -> Rng {
    let mut sm = splitmix32(seed);
    let a = sm.next_u32();
    let b = sm.next_u32();
    let c = sm.next_u32();
    let d = sm.next_u32();
    Rng {
        inner: Sfc32::new(a, b, c, d),
        scale_q,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::scale;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = make_rng(42, scale::Q);
        let mut b = make_rng(42, scale::Q);
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = make_rng(1, scale::Q);
        let mut b = make_rng(2, scale::Q);
        let same = (0..16).filter(|_| a.next_u32() == b.next_u32()).count();
        assert!(same < 16);
    }

    #[test]
    fn test_q01_in_range() {
        let mut r = make_rng(7, scale::Q);
        for _ in 0..10_000 {
            let v = r.q01();
            assert!((0..scale::Q).contains(&v));
        }
    }

    #[test]
    fn test_q01_roughly_uniform() {
        let mut r = make_rng(99, scale::Q);
        let n = 20_000;
        let below_half = (0..n).filter(|_| r.q01() < scale::Q / 2).count();
        assert!(below_half > 9_000 && below_half < 11_000, "{}", below_half);
    }
}
