/// Perspective projection parameters and screen mapping
use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::Mat4;
use crate::vector::{degrees_to_radians, radians_to_degrees, Vec3};

/// Validated perspective parameters: `0 < fov_y < pi`, `far > near > 0`,
/// positive aspect ratio.
///
/// Serialized with the field of view in degrees, which is what people write
/// in config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProjectionConfig", into = "ProjectionConfig")]
pub struct Projection {
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Projection {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        validate(fov_y, aspect, near, far)?;
        Ok(Self {
            fov_y,
            aspect,
            near,
            far,
        })
    }

    pub fn from_degrees(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        Self::new(degrees_to_radians(fov_y_degrees), aspect, near, far)
    }

    /// Aspect ratio of a `width` x `height` viewport.
    ///
    /// Terminal cells are roughly twice as tall as they are wide, so hosts
    /// drawing into a character grid pass a `cell_aspect` of about 0.5.
    pub fn aspect_for(width: u32, height: u32, cell_aspect: f32) -> f32 {
        (width.max(1) as f32 * cell_aspect) / height.max(1) as f32
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Update the aspect ratio after a resize.
    pub fn set_aspect(&mut self, aspect: f32) -> Result<()> {
        validate(self.fov_y, aspect, self.near, self.far)?;
        self.aspect = aspect;
        Ok(())
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov_y, self.aspect, self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: degrees_to_radians(84.0),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

fn validate(fov_y: f32, aspect: f32, near: f32, far: f32) -> Result<()> {
    let reason = if !(fov_y > 0.0 && fov_y < PI) {
        format!("fov_y must lie in (0, pi), got {}", fov_y)
    } else if !(aspect.is_finite() && aspect > 0.0) {
        format!("aspect must be positive, got {}", aspect)
    } else if !(near.is_finite() && near > 0.0) {
        format!("near must be positive, got {}", near)
    } else if !(far.is_finite() && far > near) {
        format!("far ({}) must be greater than near ({})", far, near)
    } else {
        return Ok(());
    };
    Err(Error::InvalidProjection { reason })
}

/// On-disk shape of a [`Projection`], unvalidated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Projection::default().into()
    }
}

impl TryFrom<ProjectionConfig> for Projection {
    type Error = Error;

    fn try_from(c: ProjectionConfig) -> Result<Self> {
        Projection::from_degrees(c.fov_y_degrees, c.aspect, c.near, c.far)
    }
}

impl From<Projection> for ProjectionConfig {
    fn from(p: Projection) -> Self {
        Self {
            fov_y_degrees: radians_to_degrees(p.fov_y),
            aspect: p.aspect,
            near: p.near,
            far: p.far,
        }
    }
}

/// A projected vertex in pixel coordinates with its NDC depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// -1 at the near plane, +1 at the far plane
    pub depth: f32,
}

/// Project a model-space point through `mvp` into a `width` x `height`
/// viewport with the origin at the top-left.
///
/// Returns `None` for points behind the eye or outside the depth range.
/// Points left or right of the viewport are still returned so the rasterizer
/// can clip triangles that straddle the edge.
pub fn project_to_screen(mvp: &Mat4, point: Vec3, width: u32, height: u32) -> Option<ScreenPoint> {
    let clip = mvp.transform_point(point);

    // Prevent division by near-zero w
    if clip.w <= 1e-6 {
        return None;
    }

    let ndc = clip.perspective_divide();
    if ndc.z < -1.0 || ndc.z > 1.0 {
        return None;
    }

    Some(ScreenPoint {
        x: (ndc.x + 1.0) * 0.5 * width as f32,
        y: (1.0 - ndc.y) * 0.5 * height as f32,
        depth: ndc.z,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_projection() {
        let p = Projection::default();
        assert!((p.fov_y() - degrees_to_radians(84.0)).abs() < 1e-6);
        assert_eq!(p.aspect(), 1.0);
        assert_eq!(p.near(), 0.1);
        assert_eq!(p.far(), 1000.0);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(matches!(
            Projection::new(0.0, 1.0, 0.1, 10.0),
            Err(Error::InvalidProjection { .. })
        ));
        assert!(Projection::new(PI, 1.0, 0.1, 10.0).is_err());
        assert!(Projection::new(1.0, 0.0, 0.1, 10.0).is_err());
        assert!(Projection::new(1.0, 1.0, 0.0, 10.0).is_err());
        assert!(Projection::new(1.0, 1.0, 5.0, 5.0).is_err());
        assert!(Projection::new(1.0, 1.0, 0.1, f32::INFINITY).is_err());
        assert!(Projection::new(1.0, 1.0, 0.1, 10.0).is_ok());
    }

    #[test]
    fn test_set_aspect() {
        let mut p = Projection::default();
        p.set_aspect(16.0 / 9.0).unwrap();
        assert!((p.aspect() - 16.0 / 9.0).abs() < 1e-6);
        assert!(p.set_aspect(-1.0).is_err());
        assert!((p.aspect() - 16.0 / 9.0).abs() < 1e-6);
        assert!((Projection::aspect_for(160, 40, 0.5) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_json() {
        let p: Projection =
            serde_json::from_str(r#"{ "fov_y_degrees": 60.0, "near": 0.5 }"#).unwrap();
        assert!((p.fov_y() - degrees_to_radians(60.0)).abs() < 1e-6);
        assert_eq!(p.near(), 0.5);
        assert_eq!(p.far(), 1000.0);

        let bad = serde_json::from_str::<Projection>(r#"{ "near": 5.0, "far": 1.0 }"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_project_center() {
        let mvp = Projection::default().matrix() * Mat4::translation(Vec3::new(0.0, 0.0, -5.0));
        let p = project_to_screen(&mvp, Vec3::ZERO, 800, 600).unwrap();
        assert!((p.x - 400.0).abs() < 1e-3);
        assert!((p.y - 300.0).abs() < 1e-3);
        assert!(p.depth > -1.0 && p.depth < 1.0);
    }

    #[test]
    fn test_project_behind_camera() {
        let mvp = Projection::default().matrix();
        assert!(project_to_screen(&mvp, Vec3::new(0.0, 0.0, 1.0), 800, 600).is_none());
        assert!(project_to_screen(&mvp, Vec3::new(0.0, 0.0, -2000.0), 800, 600).is_none());
    }

    #[test]
    fn test_project_up_is_screen_top() {
        let mvp = Projection::default().matrix();
        let p = project_to_screen(&mvp, Vec3::new(0.0, 0.5, -2.0), 100, 100).unwrap();
        assert!(p.y < 50.0);
    }
}
