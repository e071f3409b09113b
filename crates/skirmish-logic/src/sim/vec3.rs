//! Fixed-point 3-vectors. Positions are in `scale::M`, velocities in
//! `scale::MPS`, unit directions in `Q`.

use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::units::{mul_div, scale, I32, Q};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: I32,
    pub y: I32,
    pub z: I32,
}

pub const fn v3(x: I32, y: I32, z: I32) -> Vec3 {
    Vec3 { x, y, z }
}

impl Vec3 {
    pub const ZERO: Vec3 = v3(0, 0, 0);

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Component-wise `self * q / Q`.
    pub fn scale_q(self, q: Q) -> Vec3 {
        v3(
            mul_div(self.x, q, scale::Q),
            mul_div(self.y, q, scale::Q),
            mul_div(self.z, q, scale::Q),
        )
    }

    /// Largest absolute component.
    pub fn max_abs(self) -> I32 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, o: Vec3) -> Vec3 {
        v3(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, o: Vec3) -> Vec3 {
        v3(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        v3(-self.x, -self.y, -self.z)
    }
}

/// Advance a position by `vel * dt`.
pub fn integrate_pos(pos_m: Vec3, vel_mps: Vec3, dt_s: I32) -> Vec3 {
    v3(
        pos_m.x + mul_div(vel_mps.x, dt_s, scale::S),
        pos_m.y + mul_div(vel_mps.y, dt_s, scale::S),
        pos_m.z + mul_div(vel_mps.z, dt_s, scale::S),
    )
}

/// Scale so the largest component is exactly `Q`. Not a true unit vector,
/// but cheap and exact in integers. The zero vector stays zero.
pub fn normalise_dir_cheap_q(d: Vec3) -> Vec3 {
    let m = d.max_abs().max(1);
    v3(
        mul_div(d.x, scale::Q, m),
        mul_div(d.y, scale::Q, m),
        mul_div(d.z, scale::Q, m),
    )
}

/// Dot product of two `Q` directions, clamped into `[-1, 1]`.
pub fn dot_dir_q(a: Vec3, b: Vec3) -> Q {
    let d = mul_div(a.x, b.x, scale::Q) + mul_div(a.y, b.y, scale::Q) + mul_div(a.z, b.z, scale::Q);
    d.clamp(-scale::Q, scale::Q)
}

pub fn scale_dir_to_speed(dir_q: Vec3, speed_mps: I32) -> Vec3 {
    v3(
        mul_div(speed_mps, dir_q.x, scale::Q),
        mul_div(speed_mps, dir_q.y, scale::Q),
        mul_div(speed_mps, dir_q.z, scale::Q),
    )
}

/// Squared 3D distance, exact for any pair of `i32` positions.
pub fn dist2(a: Vec3, b: Vec3) -> i128 {
    let dx = (b.x as i64 - a.x as i64) as i128;
    let dy = (b.y as i64 - a.y as i64) as i128;
    let dz = (b.z as i64 - a.z as i64) as i128;
    dx * dx + dy * dy + dz * dz
}

/// Squared planar distance.
pub fn dist2_xy(a: Vec3, b: Vec3) -> i128 {
    let dx = (b.x as i64 - a.x as i64) as i128;
    let dy = (b.y as i64 - a.y as i64) as i128;
    dx * dx + dy * dy
}

/// Octagonal distance estimate `max + min/2`. Overestimates by at most ~12%.
pub fn approx_dist(dx: I32, dy: I32) -> I32 {
    let adx = (dx as i64).abs();
    let ady = (dy as i64).abs();
    let d = if adx > ady { adx + (ady >> 1) } else { ady + (adx >> 1) };
    d.min(I32::MAX as i64) as I32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::to;

    #[test]
    fn test_normalise_cheap_keeps_sign_and_max_component() {
        let d = normalise_dir_cheap_q(v3(-30, 15, 0));
        assert_eq!(d, v3(-scale::Q, 5_000, 0));
        assert_eq!(normalise_dir_cheap_q(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_dot_is_clamped() {
        let diag = v3(scale::Q, scale::Q, 0);
        assert_eq!(dot_dir_q(diag, diag), scale::Q);
        assert_eq!(dot_dir_q(v3(scale::Q, 0, 0), v3(-scale::Q, 0, 0)), -scale::Q);
    }

    #[test]
    fn test_integrate_pos_one_tick() {
        let p = integrate_pos(Vec3::ZERO, v3(to::mps(2.0), -to::mps(1.0), 0), to::s(0.05));
        assert_eq!(p, v3(to::m(0.1), -to::m(0.05), 0));
    }

    #[test]
    fn test_dist2_does_not_overflow() {
        let a = v3(i32::MIN, i32::MIN, 0);
        let b = v3(i32::MAX, i32::MAX, 0);
        assert!(dist2(a, b) > 0);
        assert_eq!(dist2(a, b), dist2_xy(a, b));
    }

    #[test]
    fn test_approx_dist_octagonal() {
        assert_eq!(approx_dist(100, 0), 100);
        assert_eq!(approx_dist(-100, 50), 125);
        assert_eq!(approx_dist(30, 40), 55);
    }
}
