/// Terminal host configuration loaded from JSON
use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use fly3d_core::{CameraConfig, CameraState, Projection, SpinRate, Vec3};
use serde::{Deserialize, Serialize};

/// The object the camera flies around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    pub position: Vec3,
    pub size: f32,
    pub spin: SpinRate,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            size: 1.0,
            spin: SpinRate::default(),
        }
    }
}

/// Everything the terminal app needs to start.
///
/// Every section is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub start: CameraState,
    /// The aspect ratio is replaced by the terminal's own at start-up
    pub projection: Projection,
    pub cube: CubeConfig,
    pub fps: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            start: CameraState::default(),
            projection: Projection::default(),
            cube: CubeConfig::default(),
            fps: 30,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.camera.validate()?;
        ensure!(self.fps > 0 && self.fps <= 240, "fps must lie in 1..=240, got {}", self.fps);
        ensure!(
            self.cube.size.is_finite() && self.cube.size > 0.0,
            "cube size must be positive, got {}",
            self.cube.size
        );
        self.start.validate().context("invalid start pose")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "camera": { "move_speed": 2.5 },
                "projection": { "fov_y_degrees": 70.0 },
                "cube": { "position": { "x": 0.0, "y": 1.0, "z": 0.0 } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.camera.move_speed, 2.5);
        assert_eq!(config.cube.position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(config.cube.size, 1.0);
        assert_eq!(config.fps, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());
        config.fps = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.camera.turn_speed = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_start_pose_rejected() {
        let mut config = AppConfig::default();
        config.start.yaw = f32::NAN;
        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("start pose"));

        let mut config = AppConfig::default();
        config.start.pitch = f32::NEG_INFINITY;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.start.position.x = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let path = std::env::temp_dir().join("fly3d-terminal-bad-config.json");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{{ \"fps\": \"fast\" }}").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("fly3d-terminal-bad-config.json"));
        fs::remove_file(&path).ok();
    }
}
