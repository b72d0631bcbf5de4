/// fly3d Core Library - Transform math and first-person camera
///
/// This library provides the stateless math behind a free-look camera:
/// vectors, column-major matrices, perspective projection, and the per-frame
/// camera update that turns input intents into a view matrix.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod input;
pub mod matrix;
pub mod projection;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use camera::{Camera, CameraConfig, CameraState};
pub use error::{Error, Result};
pub use geometry::{Mesh, Triangle};
pub use input::{CameraIntents, KeyState};
pub use matrix::{Mat4, Vec4};
pub use projection::{project_to_screen, Projection, ProjectionConfig, ScreenPoint};
pub use transform::{SpinRate, Transform};
pub use vector::{degrees_to_radians, radians_to_degrees, Vec3};
