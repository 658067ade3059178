//! Orientation math for predicate checks.
//!
//! Simulator geom states report quaternions scalar-first `(w, x, y, z)`; that
//! is the layout stored here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const EPSILON: f64 = 1e-12;

/// Unit-quaternion orientation stored as `(w, x, y, z)`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Quat {
    data: [f64; 4],
}

impl Quat {
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { data: [w, x, y, z] }
    }

    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    pub fn to_array(self) -> [f64; 4] {
        self.data
    }

    /// Rotation of `angle` radians about `axis`; identity for a degenerate axis.
    pub fn from_axis_angle(axis: [f64; 3], angle: f64) -> Self {
        let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
        if len <= EPSILON {
            return Self::identity();
        }
        let (sin_half, cos_half) = (angle * 0.5).sin_cos();
        let s = sin_half / len;
        Self::new(cos_half, axis[0] * s, axis[1] * s, axis[2] * s)
    }

    /// Normalises the quaternion; returns identity when the norm is ~0.
    pub fn normalize(&self) -> Self {
        let [w, x, y, z] = self.data;
        let len = (w * w + x * x + y * y + z * z).sqrt();
        if len <= EPSILON {
            return Self::identity();
        }
        let inv = 1.0 / len;
        Self::new(w * inv, x * inv, y * inv, z * inv)
    }

    /// Row-major 3×3 rotation matrix. Column `i` is the body's `i`-th axis in world frame.
    pub fn to_mat3(&self) -> [[f64; 3]; 3] {
        let [w, x, y, z] = self.normalize().data;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);
        [
            [1.0 - 2.0 * (yy + zz), 2.0 * (xy - wz), 2.0 * (xz + wy)],
            [2.0 * (xy + wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - wx)],
            [2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (xx + yy)],
        ]
    }

    /// The body-frame `axis` expressed in world coordinates.
    pub fn axis(&self, axis: Axis) -> [f64; 3] {
        let m = self.to_mat3();
        let i = axis.index();
        [m[0][i], m[1][i], m[2][i]]
    }

    /// Rotates a body-frame vector into the world frame.
    pub fn rotate(&self, v: [f64; 3]) -> [f64; 3] {
        let m = self.to_mat3();
        [
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
        ]
    }

    /// Rotates a world-frame vector into the body frame.
    pub fn inverse_rotate(&self, v: [f64; 3]) -> [f64; 3] {
        let m = self.to_mat3();
        [
            m[0][0] * v[0] + m[1][0] * v[1] + m[2][0] * v[2],
            m[0][1] * v[0] + m[1][1] * v[1] + m[2][1] * v[2],
            m[0][2] * v[0] + m[1][2] * v[1] + m[2][2] * v[2],
        ]
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f64; 4]> for Quat {
    fn from(value: [f64; 4]) -> Self {
        Self { data: value }
    }
}

impl From<Quat> for [f64; 4] {
    fn from(value: Quat) -> Self {
        value.data
    }
}

/// Cartesian axis selector used by axis-parameterised predicates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(format!("Axis must be one of 'x', 'y', or 'z', got '{}'", other)),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_identity_keeps_axes() {
        let q = Quat::identity();
        assert!(close(q.axis(Axis::Z), [0.0, 0.0, 1.0]));
        assert!(close(q.axis(Axis::X), [1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_half_turn_about_x_flips_z() {
        let q = Quat::from_axis_angle([1.0, 0.0, 0.0], PI);
        assert!(close(q.axis(Axis::Z), [0.0, 0.0, -1.0]));
    }

    #[test]
    fn test_quarter_turn_about_z_maps_x_to_y() {
        let q = Quat::from_axis_angle([0.0, 0.0, 1.0], FRAC_PI_2);
        assert!(close(q.rotate([1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]));
        assert!(close(q.inverse_rotate([0.0, 1.0, 0.0]), [1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_degenerate_quaternion_normalises_to_identity() {
        assert_eq!(Quat::new(0.0, 0.0, 0.0, 0.0).normalize(), Quat::identity());
    }

    #[test]
    fn test_axis_parses_lowercase_only() {
        assert_eq!("y".parse::<Axis>(), Ok(Axis::Y));
        assert!("Y".parse::<Axis>().is_err());
    }
}
