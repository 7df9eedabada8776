/// Quaternion algebra for axis-angle rotations
use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::vector::Vec3;

/// A quaternion `w + xi + yj + zk`, stored as a scalar and a vector part.
///
/// No normalization is enforced. A rotation quaternion is only length
/// preserving when it was built from a unit axis, which is what
/// [`Quaternion::from_axis_angle`] expects.
///
/// Only quaternion-by-quaternion multiplication is provided, so multiplying
/// by any other operand is a compile error rather than a runtime one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub v: Vec3,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        w: 1.0,
        v: Vec3::ZERO,
    };

    pub const fn new(w: f64, v: Vec3) -> Self {
        Self { w, v }
    }

    /// Embed a point as a pure quaternion `(0, v)`.
    pub const fn pure(v: Vec3) -> Self {
        Self { w: 0.0, v }
    }

    /// Build `(cos(θ/2), axis * sin(θ/2))` from a unit axis and an angle in radians.
    pub fn from_axis_angle(unit_axis: Vec3, radians: f64) -> Self {
        let (sin_half, cos_half) = (radians / 2.0).sin_cos();
        Self::new(cos_half, unit_axis.scale(sin_half))
    }

    pub fn conjugate(&self) -> Quaternion {
        Quaternion::new(self.w, -self.v)
    }

    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.v.dot(&self.v)).sqrt()
    }

    /// Scale to unit length. Zero quaternions come back unchanged.
    pub fn normalize(&self) -> Quaternion {
        let norm = self.norm();
        if norm == 0.0 {
            return *self;
        }
        Quaternion::new(self.w / norm, self.v.scale(1.0 / norm))
    }

    /// Rotate `v` with the sandwich product `q * (0, v) * q̄`.
    ///
    /// This is a rigid rotation only when `self` is a unit quaternion.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        (*self * Quaternion::pure(v) * self.conjugate()).v
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Add for Quaternion {
    type Output = Quaternion;

    fn add(self, rhs: Quaternion) -> Quaternion {
        Quaternion::new(self.w + rhs.w, self.v + rhs.v)
    }
}

impl Sub for Quaternion {
    type Output = Quaternion;

    fn sub(self, rhs: Quaternion) -> Quaternion {
        Quaternion::new(self.w - rhs.w, self.v - rhs.v)
    }
}

/// Hamilton product. Not commutative.
impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        let (w1, x1, y1, z1) = (self.w, self.v.x, self.v.y, self.v.z);
        let (w2, x2, y2, z2) = (rhs.w, rhs.v.x, rhs.v.y, rhs.v.z);

        let w = w1 * w2 - x1 * x2 - y1 * y2 - z1 * z2;
        let x = w1 * x2 + x1 * w2 + y1 * z2 - z1 * y2;
        let y = w1 * y2 - x1 * z2 + y1 * w2 + z1 * x2;
        let z = w1 * z2 + x1 * y2 - y1 * x2 + z1 * w2;

        Quaternion::new(w, Vec3::new(x, y, z))
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.w)?;
        for (component, unit) in [(self.v.x, 'i'), (self.v.y, 'j'), (self.v.z, 'k')] {
            if component != 0.0 {
                write!(f, "{:+}{}", component, unit)?;
            }
        }
        Ok(())
    }
}
