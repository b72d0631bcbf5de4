/// fly3d Web - camera bridge for a WebGL page
///
/// The page owns the canvas, shaders, buffers and `requestAnimationFrame`.
/// This module turns its key events and frame timestamps into the
/// model-view-projection matrix it uploads each frame.

use fly3d_core::{
    Camera, CameraConfig, CameraState, KeyState, Mat4, Projection, SpinRate, Transform, Vec3,
};
use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext, WebGlUniformLocation};

/// Camera, projection and cube animation driven by browser timestamps.
pub struct FlightController {
    camera: Camera,
    projection: Projection,
    keys: KeyState,
    spin: SpinRate,
    cube_position: Vec3,
    last_time: Option<f64>,
    mvp: Mat4,
}

impl FlightController {
    pub fn new(aspect: f32) -> fly3d_core::Result<Self> {
        let mut projection = Projection::default();
        projection.set_aspect(aspect)?;
        Ok(Self {
            camera: Camera::new(CameraState::default(), CameraConfig::default())?,
            projection,
            keys: KeyState::new(),
            spin: SpinRate::default(),
            cube_position: Vec3::ZERO,
            last_time: None,
            mvp: Mat4::IDENTITY,
        })
    }

    pub fn resize(&mut self, aspect: f32) -> fly3d_core::Result<()> {
        self.projection.set_aspect(aspect)
    }

    pub fn key_event(&mut self, code: &str, down: bool) -> bool {
        self.keys.set(code, down)
    }

    /// Drop held keys, e.g. when the page loses focus and key-up never arrives.
    pub fn release_all(&mut self) {
        self.keys.clear();
    }

    /// Advance to `time_ms` (a `requestAnimationFrame` timestamp) and return
    /// the cube's MVP matrix.
    pub fn frame(&mut self, time_ms: f64) -> fly3d_core::Result<Mat4> {
        let time = time_ms * 0.001;
        // The first frame and any clock step backwards count as no time
        let dt = self.last_time.map_or(0.0, |last| (time - last).max(0.0)) as f32;
        self.last_time = Some(time);

        let view = self.camera.update(self.keys.intents(), dt)?;
        let rotation = Transform::spin_matrix(&self.spin, time as f32);
        let model = Transform::model_matrix(self.cube_position, &rotation);
        self.mvp = Transform::mvp_matrix(&model, &view, &self.projection.matrix());
        Ok(self.mvp)
    }

    pub fn mvp(&self) -> &Mat4 {
        &self.mvp
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}

fn to_js(err: fly3d_core::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebCamera {
    inner: FlightController,
}

#[wasm_bindgen]
impl WebCamera {
    #[wasm_bindgen(constructor)]
    pub fn new(aspect: f32) -> Result<WebCamera, JsValue> {
        Ok(WebCamera {
            inner: FlightController::new(aspect).map_err(to_js)?,
        })
    }

    /// Update the aspect ratio after the canvas is resized
    pub fn resize(&mut self, aspect: f32) -> Result<(), JsValue> {
        self.inner.resize(aspect).map_err(to_js)
    }

    /// Feed a `KeyboardEvent.code`; returns whether the key is bound
    pub fn key_event(&mut self, code: &str, down: bool) -> bool {
        self.inner.key_event(code, down)
    }

    pub fn release_all(&mut self) {
        self.inner.release_all();
    }

    /// Advance the camera and return the column-major MVP matrix
    pub fn frame(&mut self, time_ms: f64) -> Result<Vec<f32>, JsValue> {
        let mvp = self.inner.frame(time_ms).map_err(to_js)?;
        Ok(mvp.as_array().to_vec())
    }

    /// Upload the last frame's MVP to a `mat4` uniform
    pub fn upload(&self, gl: &WebGl2RenderingContext, location: &WebGlUniformLocation) {
        gl.uniform_matrix4fv_with_f32_array(Some(location), false, self.inner.mvp().as_array());
    }

    /// Camera position as `[x, y, z]`
    pub fn position(&self) -> Vec<f32> {
        self.inner.camera().state.position.to_array().to_vec()
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    web_sys::console::log_1(&"fly3d camera bridge loaded".into());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_has_no_motion() {
        let mut flight = FlightController::new(1.0).unwrap();
        flight.key_event("KeyW", true);
        flight.frame(5000.0).unwrap();
        assert_eq!(flight.camera().state.position, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_held_key_moves_between_frames() {
        let mut flight = FlightController::new(1.0).unwrap();
        flight.frame(1000.0).unwrap();
        assert!(flight.key_event("KeyW", true));
        flight.frame(1100.0).unwrap();
        let z = flight.camera().state.position.z;
        assert!((z - 1.9).abs() < 1e-5, "z = {}", z);

        flight.key_event("KeyW", false);
        flight.frame(1200.0).unwrap();
        assert!((flight.camera().state.position.z - z).abs() < 1e-6);
    }

    #[test]
    fn test_clock_step_back_is_ignored() {
        let mut flight = FlightController::new(1.0).unwrap();
        flight.frame(2000.0).unwrap();
        flight.key_event("KeyD", true);
        flight.frame(1000.0).unwrap();
        assert_eq!(flight.camera().state.position, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_release_all() {
        let mut flight = FlightController::new(1.0).unwrap();
        flight.frame(0.0).unwrap();
        flight.key_event("ArrowLeft", true);
        flight.release_all();
        flight.frame(100.0).unwrap();
        assert_eq!(flight.camera().state.yaw, 0.0);
    }

    #[test]
    fn test_mvp_is_perspective_projection() {
        let mut flight = FlightController::new(16.0 / 9.0).unwrap();
        let mvp = flight.frame(0.0).unwrap();
        assert_eq!(mvp[11], -1.0);
        assert_eq!(mvp[15], 2.0);
        assert!(flight.resize(0.0).is_err());
    }
}
