//! Sampling helpers layered over [`RngLike`].

use crate::rng::RngLike;
use crate::units::{clamp_q, mul_div, q_mul, scale, Q};

/// Triangular sample on `[0, 1)`, peaked at 0.5.
pub fn tri01(rng: &mut impl RngLike) -> Q {
    let u = rng.q01();
    let v = rng.q01();
    (u + v) >> 1
}

/// Symmetric triangular sample on `[-0.5, 0.5)`.
pub fn tri_sym(rng: &mut impl RngLike) -> Q {
    tri01(rng) - (scale::Q >> 1)
}

/// `1 + variation * amplitude`, clamped to `[0, 3]`.
pub fn mul_from_variation(variation_sym: Q, amplitude: Q) -> Q {
    let delta = mul_div(variation_sym, amplitude, scale::Q);
    clamp_q(scale::Q + delta, 0, 3 * scale::Q)
}

/// Raise a multiplier to `steps + 1` and keep half of the deviation from 1.
///
/// The halving uses an arithmetic shift so multipliers below 1 stay below 1.
pub fn skew_up(mult: Q, steps: u32) -> Q {
    let mut out = mult;
    for _ in 0..steps {
        out = q_mul(out, mult);
    }
    scale::Q + ((out - scale::Q) >> 1)
}
