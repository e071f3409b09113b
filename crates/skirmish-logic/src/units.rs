//! Fixed-point scalar core.
//!
//! Every ratio and physical quantity in the simulation is a plain integer
//! scaled by a per-unit factor. Ratios use `Q` where `10_000 == 1.0`.
//! All products and quotients truncate toward zero; nothing rounds in the
//! middle of a computation, so identical inputs give identical outputs on
//! every platform.
//!
//! | Unit | Scale | Resolution |
//! |------|-------|------------|
//! | `Q` | 10 000 | 0.0001 |
//! | metres | 10 000 | 0.1 mm |
//! | seconds | 10 000 | 0.1 ms |
//! | kilograms | 1 000 | 1 g |
//! | newtons | 100 | 0.01 N |
//! | watts / joules | 1 | 1 W / 1 J |
//! | m/s, m/s² | 10 000 | 0.1 mm/s, 0.1 mm/s² |

/// Dimensionless ratio, `scale::Q == 1.0`.
pub type Q = i32;
/// Integer quantity in one of the physical scales below.
pub type I32 = i32;

/// Scale factors for each unit family.
pub mod scale {
    pub const Q: i32 = 10_000;
    pub const M: i32 = 10_000;
    pub const S: i32 = 10_000;
    pub const KG: i32 = 1_000;
    pub const N: i32 = 100;
    pub const W: i32 = 1;
    pub const J: i32 = 1;
    pub const MPS: i32 = 10_000;
    pub const MPS2: i32 = 10_000;
}

/// Standard gravity, 9.80665 m/s² in `scale::MPS2`.
pub const G_MPS2: I32 = 98_067;

/// Convert a literal ratio into `Q`. Only used for tuning constants.
pub fn q(x: f64) -> Q {
    (x * scale::Q as f64).round() as Q
}

/// Clamp without panicking when `lo > hi` (the lower bound wins).
pub fn clamp_q(x: Q, lo: Q, hi: Q) -> Q {
    lo.max(hi.min(x))
}

/// Clamp into `[0, 1.0]`.
pub fn clamp01(x: Q) -> Q {
    clamp_q(x, 0, scale::Q)
}

pub fn clamp_i32(x: i32, lo: i32, hi: i32) -> i32 {
    lo.max(hi.min(x))
}

/// `a * b / Q`, truncating.
pub fn q_mul(a: Q, b: Q) -> Q {
    (a as i64 * b as i64 / scale::Q as i64) as Q
}

/// `a * Q / b`, truncating. A zero divisor is floored to 1.
pub fn q_div(a: Q, b: Q) -> Q {
    let b = if b == 0 { 1 } else { b as i64 };
    (a as i64 * scale::Q as i64 / b) as Q
}

/// `a * b / div` with a 64-bit intermediate, truncating toward zero.
pub fn mul_div(a: i32, b: i32, div: i32) -> i32 {
    (a as i64 * b as i64 / div as i64) as i32
}

/// `a * b / div` with a 128-bit intermediate for operands that are already wide.
pub fn mul_div_wide(a: i64, b: i64, div: i64) -> i64 {
    (a as i128 * b as i128 / div as i128) as i64
}

/// Literal converters into the fixed scales.
pub mod to {
    use super::{scale, I32};

    fn conv(x: f64, s: i32) -> I32 {
        (x * s as f64).round() as I32
    }

    pub fn m(x: f64) -> I32 {
        conv(x, scale::M)
    }
    pub fn s(x: f64) -> I32 {
        conv(x, scale::S)
    }
    pub fn kg(x: f64) -> I32 {
        conv(x, scale::KG)
    }
    pub fn n(x: f64) -> I32 {
        conv(x, scale::N)
    }
    pub fn w(x: f64) -> I32 {
        conv(x, scale::W)
    }
    pub fn j(x: f64) -> I32 {
        conv(x, scale::J)
    }
    pub fn mps(x: f64) -> I32 {
        conv(x, scale::MPS)
    }
    pub fn mps2(x: f64) -> I32 {
        conv(x, scale::MPS2)
    }
}

/// Square root of a `Q` value, returned in `Q`.
///
/// Integer Newton iteration, at most 10 steps, stopping early only on an
/// exact fixed point. Inputs below 1 are treated as 1.
pub fn sqrt_q(x: Q) -> Q {
    let x = x.max(1) as i64;
    let big_x = x * scale::Q as i64;
    let mut r = scale::Q as i64;
    for _ in 0..10 {
        let next = (r + big_x / r) / 2;
        if next == r {
            break;
        }
        r = next;
    }
    r as Q
}

/// Cube root of a `Q` value, returned in `Q`. Twelve Newton steps.
pub fn cbrt_q(x: Q) -> Q {
    let x = x.max(1) as i128;
    let q = scale::Q as i128;
    let big_x = x * q * q;
    let mut r = q;
    for _ in 0..12 {
        r = (2 * r + big_x / (r * r)) / 3;
        if r <= 0 {
            r = 1;
            break;
        }
    }
    r as Q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_q_literals() {
        assert_eq!(q(1.0), 10_000);
        assert_eq!(q(0.05), 500);
        assert_eq!(q(0.0015), 15);
        assert_eq!(to::m(1.75), 17_500);
        assert_eq!(to::kg(75.0), 75_000);
        assert_eq!(to::n(1840.0), 184_000);
        assert_eq!(to::s(0.05), 500);
    }

    #[test]
    fn test_q_mul_truncates_toward_zero() {
        assert_eq!(q_mul(q(0.5), q(0.5)), q(0.25));
        assert_eq!(q_mul(3, 3333), 0);
        assert_eq!(q_mul(-3, 3333), 0);
        assert_eq!(q_mul(-q(0.5), q(0.5)), -q(0.25));
    }

    #[test]
    fn test_q_div_guards_zero() {
        assert_eq!(q_div(q(0.5), q(2.0)), q(0.25));
        assert_eq!(q_div(q(0.5), 0), q(0.5) * scale::Q);
    }

    #[test]
    fn test_mul_div_wide_operands() {
        assert_eq!(mul_div(2_000_000, 3_000, 1_000), 6_000_000);
        assert_eq!(mul_div_wide(4_000_000_000, 4_000_000_000, 16_000_000_000), 1_000_000_000);
    }

    #[test]
    fn test_clamp_lower_bound_wins_on_inverted_range() {
        assert_eq!(clamp_q(5, 10, 0), 10);
        assert_eq!(clamp01(-5), 0);
        assert_eq!(clamp01(q(1.5)), q(1.0));
    }

    #[test]
    fn test_sqrt_q() {
        assert_eq!(sqrt_q(q(1.0)), q(1.0));
        assert_eq!(sqrt_q(q(4.0)), q(2.0));
        assert_eq!(sqrt_q(q(0.25)), q(0.5));
        // inputs at or below zero are floored to 1
        assert_eq!(sqrt_q(0), sqrt_q(1));
        assert_eq!(sqrt_q(-50), sqrt_q(1));
    }

    #[test]
    fn test_cbrt_q() {
        assert_eq!(cbrt_q(q(1.0)), q(1.0));
        assert_eq!(cbrt_q(q(8.0)), q(2.0));
        let c = cbrt_q(q(27.0));
        assert!((c - q(3.0)).abs() <= 1, "cbrt(27) = {}", c);
    }
}
