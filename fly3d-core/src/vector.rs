/// Three-component vectors and angle helpers
use std::f32::consts::PI;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Convert degrees to radians.
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * PI / 180.0
}

/// Convert radians to degrees.
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * 180.0 / PI
}

/// A 3D vector of `f32` components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared Euclidean norm, for comparisons that don't need the root.
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Scale to unit length.
    ///
    /// The caller guarantees `self.length() > 0`. A zero vector yields
    /// non-finite components; use [`Vec3::try_normalise`] to reject it instead.
    pub fn normalise(self) -> Self {
        self * (1.0 / self.length())
    }

    /// Scale to unit length, failing on a zero or non-finite length.
    pub fn try_normalise(self) -> Result<Self> {
        let length = self.length();
        if length > 0.0 && length.is_finite() {
            Ok(self * (1.0 / length))
        } else {
            Err(Error::ZeroLengthVector)
        }
    }

    /// Right-handed cross product.
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Component-wise scale. Same as `self * factor`.
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Compare component-wise within `epsilon`.
    pub fn approx_eq(self, other: Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<nalgebra::Vector3<f32>> for Vec3 {
    fn from(v: nalgebra::Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for nalgebra::Vector3<f32> {
    fn from(v: Vec3) -> Self {
        nalgebra::Vector3::new(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_to_radians() {
        assert!((degrees_to_radians(180.0) - PI).abs() < 1e-6);
        assert!((degrees_to_radians(85.0) - 1.483_529_9).abs() < 1e-6);
        assert!((radians_to_degrees(degrees_to_radians(42.0)) - 42.0).abs() < 1e-4);
    }

    #[test]
    fn test_length() {
        let v = Vec3::new(3.0, 4.0, 12.0);
        assert_eq!(v.length_squared(), 169.0);
        assert!((v.length() - 13.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalise_has_unit_length() {
        let samples = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(3.0, -4.0, 12.0),
            Vec3::new(1e-3, 2e-3, -5e-4),
            Vec3::new(250.0, 1000.0, -750.0),
        ];
        for v in samples {
            assert!((v.normalise().length() - 1.0).abs() < 1e-5, "{:?}", v);
        }
    }

    #[test]
    fn test_normalise_zero_is_not_finite() {
        assert!(!Vec3::ZERO.normalise().is_finite());
        assert_eq!(Vec3::ZERO.try_normalise(), Err(Error::ZeroLengthVector));
    }

    #[test]
    fn test_cross_basis() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
        assert_eq!(Vec3::Z.cross(Vec3::X), Vec3::Y);
        // forward x up is right for a camera looking down -Z
        assert_eq!(Vec3::new(0.0, 0.0, -1.0).cross(Vec3::Y), Vec3::X);
    }

    #[test]
    fn test_cross_anti_commutative() {
        let a = Vec3::new(1.5, -2.0, 0.25);
        let b = Vec3::new(-3.0, 0.5, 4.0);
        assert!(a.cross(b).approx_eq(-b.cross(a), 1e-6));
    }

    #[test]
    fn test_component_ops() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(0.5, -1.0, 2.0);
        assert_eq!(a + b, Vec3::new(1.5, 1.0, 5.0));
        assert_eq!(a - b, Vec3::new(0.5, 3.0, 1.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.scale(-1.0), -a);

        let mut c = a;
        c += b;
        c -= a;
        assert_eq!(c, b);
    }

    #[test]
    fn test_nalgebra_round_trip() {
        let v = Vec3::new(1.0, -2.0, 3.0);
        let n: nalgebra::Vector3<f32> = v.into();
        assert_eq!(Vec3::from(n), v);
    }
}
