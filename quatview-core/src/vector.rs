/// Three-component vector algebra used by the rotation engine and overlays
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Magnitudes below this are treated as floating noise by [`Vec3::snap_default`].
pub const SNAP_EPSILON: f64 = 1e-12;

/// A 3D vector of `f64` components.
///
/// Every operation returns a new value; nothing mutates in place.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// A zero-length input yields the zero vector rather than an error. Callers
    /// that need a usable direction (a rotation axis, say) must reject
    /// near-zero inputs themselves before normalizing.
    pub fn normalize(&self) -> Vec3 {
        let length = self.length();
        if length == 0.0 {
            return Vec3::ZERO;
        }
        Vec3::new(self.x / length, self.y / length, self.z / length)
    }

    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn scale(&self, k: f64) -> Vec3 {
        Vec3::new(self.x * k, self.y * k, self.z * k)
    }

    /// Zero out every component whose magnitude is below `epsilon`.
    pub fn snap(&self, epsilon: f64) -> Vec3 {
        let clean = |c: f64| if c.abs() < epsilon { 0.0 } else { c };
        Vec3::new(clean(self.x), clean(self.y), clean(self.z))
    }

    pub fn snap_default(&self) -> Vec3 {
        self.snap(SNAP_EPSILON)
    }

    /// Component-wise minimum
    pub fn min(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum
    pub fn max(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    pub fn max_component(&self) -> f64 {
        self.x.max(self.y).max(self.z)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl From<(f64, f64, f64)> for Vec3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Vec3::new(x, y, z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, k: f64) -> Vec3 {
        self.scale(k)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "({:.p$}, {:.p$}, {:.p$})", self.x, self.y, self.z, p = p),
            None => write!(f, "({}, {}, {})", self.x, self.y, self.z),
        }
    }
}
