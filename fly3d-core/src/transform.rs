/// Model transforms and MVP composition
use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::matrix::Mat4;
use crate::vector::Vec3;

/// Spin rates for an object tumbling about its X then Y axis, in radians per
/// second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinRate {
    pub x: f32,
    pub y: f32,
}

impl SpinRate {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Default for SpinRate {
    fn default() -> Self {
        Self {
            x: -0.15 * PI,
            y: 0.25 * PI,
        }
    }
}

/// Transform builder for model and MVP matrices
pub struct Transform;

impl Transform {
    /// Rotation after `time` seconds of spinning: `Ry(y*t) * Rx(x*t)`.
    pub fn spin_matrix(spin: &SpinRate, time: f32) -> Mat4 {
        Mat4::rotate_y(spin.y * time) * Mat4::rotate_x(spin.x * time)
    }

    /// Place a rotated object at `position`.
    pub fn model_matrix(position: Vec3, rotation: &Mat4) -> Mat4 {
        Mat4::translation(position) * *rotation
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(model: &Mat4, view: &Mat4, projection: &Mat4) -> Mat4 {
        *projection * (*view * *model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_at_time_zero_is_identity() {
        let m = Transform::spin_matrix(&SpinRate::default(), 0.0);
        assert!(m.approx_eq(&Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_spin_applies_x_first() {
        let spin = SpinRate::new(0.5 * PI, 0.5 * PI);
        // +Y tips to +Z about X, then +Z swings to +X about Y
        let v = Transform::spin_matrix(&spin, 1.0).transform_vector(Vec3::Y);
        assert!(v.approx_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_model_matrix_rotates_then_translates() {
        let rotation = Mat4::rotate_y(PI);
        let model = Transform::model_matrix(Vec3::new(0.0, 1.0, 0.0), &rotation);
        let p = model.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.xyz().approx_eq(Vec3::new(-1.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn test_mvp_order() {
        let model = Mat4::translation(Vec3::new(1.0, 0.0, 0.0));
        let view = Mat4::rotate_y(0.3);
        let projection = Mat4::perspective(1.0, 1.0, 0.1, 10.0);
        let expected = projection * (view * model);
        assert_eq!(Transform::mvp_matrix(&model, &view, &projection), expected);
        assert!(!expected.approx_eq(&(model * view * projection), 1e-3));
    }
}
