/// Column-major 4x4 matrices
///
/// Storage convention: element (row `r`, column `c`) lives at index `c * 4 + r`,
/// so the translation of an affine matrix sits at indices 12, 13 and 14.
/// Matrices act on column vectors on the right: `a * b` applies `b` first,
/// then `a`. This is the layout `uniformMatrix4fv` expects with
/// `transpose = false`, and the layout `nalgebra` uses internally.
use std::ops::{Index, Mul};

use serde::{Deserialize, Serialize};

use crate::vector::Vec3;

/// Homogeneous coordinates produced by [`Mat4::transform_point`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Divide through by `w`, taking clip space to normalised device coordinates.
    pub fn perspective_divide(self) -> Vec3 {
        let inv_w = 1.0 / self.w;
        Vec3::new(self.x * inv_w, self.y * inv_w, self.z * inv_w)
    }
}

/// A 4x4 `f32` matrix stored as 16 contiguous column-major scalars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Build from 16 column-major scalars.
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// The 16 column-major scalars, ready for a shader uniform upload.
    pub fn as_array(&self) -> &[f32; 16] {
        &self.m
    }

    pub fn element(&self, row: usize, col: usize) -> f32 {
        self.m[col * 4 + row]
    }

    /// Right-handed rotation about the X axis.
    pub fn rotate_x(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_cols_array([
            1.0, 0.0, 0.0, 0.0, //
            0.0, c, s, 0.0, //
            0.0, -s, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Right-handed rotation about the Y axis.
    pub fn rotate_y(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_cols_array([
            c, 0.0, -s, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            s, 0.0, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn translation(v: Vec3) -> Self {
        Self::from_cols_array([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            v.x, v.y, v.z, 1.0,
        ])
    }

    /// Right-handed perspective projection looking down -Z, mapping
    /// `z = -near` to NDC depth -1 and `z = -far` to +1.
    ///
    /// Requires `far > near > 0` and `0 < fov_y < pi`; nothing is checked
    /// here. [`crate::Projection::new`] validates the same parameters.
    pub fn perspective(fov_y_radians: f32, aspect_ratio: f32, near_z: f32, far_z: f32) -> Self {
        let inverse_range = 1.0 / (0.5 * fov_y_radians).tan();
        let x_scale = inverse_range / aspect_ratio;
        let y_scale = inverse_range;
        let z_range_inverse = 1.0 / (far_z - near_z);
        let z_scale = -(far_z + near_z) * z_range_inverse;
        let z_translation = -2.0 * far_z * near_z * z_range_inverse;
        Self::from_cols_array([
            x_scale, 0.0, 0.0, 0.0, //
            0.0, y_scale, 0.0, 0.0, //
            0.0, 0.0, z_scale, -1.0, //
            0.0, 0.0, z_translation, 0.0,
        ])
    }

    /// Matrix product `a * b`: the result applies `b` first, then `a`.
    pub fn multiply(a: &Self, b: &Self) -> Self {
        let mut m = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for i in 0..4 {
                    sum += a.m[i * 4 + row] * b.m[col * 4 + i];
                }
                m[col * 4 + row] = sum;
            }
        }
        Self { m }
    }

    /// Transform a point (`w = 1`), returning homogeneous coordinates.
    pub fn transform_point(&self, p: Vec3) -> Vec4 {
        let m = &self.m;
        Vec4::new(
            m[0] * p.x + m[4] * p.y + m[8] * p.z + m[12],
            m[1] * p.x + m[5] * p.y + m[9] * p.z + m[13],
            m[2] * p.x + m[6] * p.y + m[10] * p.z + m[14],
            m[3] * p.x + m[7] * p.y + m[11] * p.z + m[15],
        )
    }

    /// Transform a direction (`w = 0`); translation has no effect.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0] * v.x + m[4] * v.y + m[8] * v.z,
            m[1] * v.x + m[5] * v.y + m[9] * v.z,
            m[2] * v.x + m[6] * v.y + m[10] * v.z,
        )
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().all(|v| v.is_finite())
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        Mat4::multiply(&self, &rhs)
    }
}

impl Index<usize> for Mat4 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.m[index]
    }
}

impl From<nalgebra::Matrix4<f32>> for Mat4 {
    fn from(n: nalgebra::Matrix4<f32>) -> Self {
        let mut m = [0.0; 16];
        m.copy_from_slice(n.as_slice());
        Self { m }
    }
}

impl From<Mat4> for nalgebra::Matrix4<f32> {
    fn from(m: Mat4) -> Self {
        nalgebra::Matrix4::from_column_slice(&m.m)
    }
}
