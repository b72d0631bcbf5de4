//! First-person camera driven by per-frame intents.
//!
//! The view matrix is built as `Rx(-pitch) * Ry(-yaw) * T(-position)`, the
//! inverse of the camera's world transform `T * Ry * Rx`. With no roll the
//! inverse of each factor is the same factor with its argument negated, so
//! no general matrix inverse is needed.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::input::CameraIntents;
use crate::matrix::Mat4;
use crate::vector::{degrees_to_radians, Vec3};

/// Position and orientation of the camera, owned by the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraState {
    pub position: Vec3,
    /// Radians, kept inside `(-2pi, 2pi)`
    pub yaw: f32,
    /// Radians, clamped to `[-max_pitch, max_pitch]`
    pub pitch: f32,
    /// Derived from the last view matrix; only its XZ direction is used
    pub forward: Vec3,
}

impl CameraState {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Reject poses that would poison every later view matrix.
    pub fn validate(&self) -> Result<()> {
        if !self.position.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "camera position must be finite, got {:?}",
                self.position
            )));
        }
        if !(self.yaw.is_finite() && self.pitch.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "camera yaw and pitch must be finite, got yaw {} pitch {}",
                self.yaw, self.pitch
            )));
        }
        if !self.forward.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "camera forward must be finite, got {:?}",
                self.forward
            )));
        }
        Ok(())
    }

    /// World-to-eye transform for the current pose.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::rotate_x(-self.pitch) * (Mat4::rotate_y(-self.yaw) * Mat4::translation(-self.position))
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 2.0),
            yaw: 0.0,
            pitch: 0.0,
            forward: Vec3::new(0.0, 0.0, -1.0),
        }
    }
}

/// Movement tuning for [`Camera::update`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// World units per second
    pub move_speed: f32,
    /// Radians per second, shared by yaw and pitch
    pub turn_speed: f32,
    /// Radians
    pub max_pitch: f32,
    /// Longest frame time applied in one update, in seconds
    pub max_dt: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            turn_speed: PI,
            max_pitch: degrees_to_radians(85.0),
            max_dt: 0.25,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.move_speed.is_finite() && self.move_speed > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "move_speed must be positive, got {}",
                self.move_speed
            )));
        }
        if !(self.turn_speed.is_finite() && self.turn_speed > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "turn_speed must be positive, got {}",
                self.turn_speed
            )));
        }
        if self.turn_speed * self.max_dt > TAU {
            return Err(Error::InvalidConfig(format!(
                "turn_speed * max_dt must not exceed a full turn, got {}",
                self.turn_speed * self.max_dt
            )));
        }
        if !(self.max_pitch > 0.0 && self.max_pitch < 0.5 * PI) {
            return Err(Error::InvalidConfig(format!(
                "max_pitch must lie in (0, pi/2), got {}",
                self.max_pitch
            )));
        }
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_dt must be positive, got {}",
                self.max_dt
            )));
        }
        Ok(())
    }
}

/// Camera state plus the tuning used to advance it.
#[derive(Debug, Clone, Default)]
pub struct Camera {
    pub state: CameraState,
    config: CameraConfig,
}

impl Camera {
    pub fn new(state: CameraState, config: CameraConfig) -> Result<Self> {
        config.validate()?;
        state.validate()?;
        Ok(Self { state, config })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Advance the camera by `dt` seconds of `intents` and return the new
    /// view matrix.
    ///
    /// `dt` longer than `max_dt` is clamped so a stalled frame can't jump the
    /// camera. Negative or non-finite `dt` is rejected and leaves the state
    /// untouched.
    pub fn update(&mut self, intents: CameraIntents, dt: f32) -> Result<Mat4> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(Error::InvalidTimeStep(dt));
        }
        let dt = if dt > self.config.max_dt {
            debug!(dt, max_dt = self.config.max_dt, "clamping frame time");
            self.config.max_dt
        } else {
            dt
        };
        trace!(?intents, dt, "camera update");

        let state = &mut self.state;

        let forward_xz = Vec3::new(state.forward.x, 0.0, state.forward.z)
            .try_normalise()
            .unwrap_or_else(|_| Vec3::new(-state.yaw.sin(), 0.0, -state.yaw.cos()));
        let right_xz = forward_xz.cross(Vec3::Y);

        let move_amount = self.config.move_speed * dt;
        let forward_move = forward_xz * move_amount;
        let right_move = right_xz * move_amount;
        if intents.contains(CameraIntents::FORWARD) {
            state.position += forward_move;
        }
        if intents.contains(CameraIntents::BACK) {
            state.position -= forward_move;
        }
        if intents.contains(CameraIntents::LEFT) {
            state.position -= right_move;
        }
        if intents.contains(CameraIntents::RIGHT) {
            state.position += right_move;
        }
        if intents.contains(CameraIntents::RAISE) {
            state.position.y += move_amount;
        }
        if intents.contains(CameraIntents::LOWER) {
            state.position.y -= move_amount;
        }

        let turn_amount = self.config.turn_speed * dt;
        if intents.contains(CameraIntents::TURN_LEFT) {
            state.yaw += turn_amount;
        }
        if intents.contains(CameraIntents::TURN_RIGHT) {
            state.yaw -= turn_amount;
        }
        if intents.contains(CameraIntents::TILT_UP) {
            state.pitch += turn_amount;
        }
        if intents.contains(CameraIntents::TILT_DOWN) {
            state.pitch -= turn_amount;
        }

        state.yaw = wrap_yaw(state.yaw);
        state.pitch = state.pitch.clamp(-self.config.max_pitch, self.config.max_pitch);

        let view = state.view_matrix();
        state.forward = Vec3::new(view[8], view[9], -view[10]);
        Ok(view)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.state.view_matrix()
    }

    /// `projection * (view * model)` for the current pose.
    pub fn model_view_projection(&self, model: &Mat4, projection: &Mat4) -> Mat4 {
        *projection * (self.view_matrix() * *model)
    }
}

/// Bring `yaw` back inside `(-2pi, 2pi)` by whole turns.
///
/// Far from the range, subtracting `TAU` stops changing an `f32`, so large
/// magnitudes are reduced with `%` first. Non-finite yaw resets to zero.
fn wrap_yaw(mut yaw: f32) -> f32 {
    if !yaw.is_finite() {
        return 0.0;
    }
    if yaw.abs() >= 2.0 * TAU {
        yaw %= TAU;
    }
    while yaw >= TAU {
        yaw -= TAU;
    }
    while yaw <= -TAU {
        yaw += TAU;
    }
    yaw
}
