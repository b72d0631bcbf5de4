/// Example: fly the camera along a fixed script without a terminal UI
///
/// Usage: cargo run --example scripted_flight

use anyhow::Result;
use fly3d_core::{
    project_to_screen, radians_to_degrees, Camera, CameraConfig, CameraIntents, CameraState, Mesh,
    Projection, SpinRate, Transform, Vec3,
};

const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("debug").init();

    let script = [
        ("approach", CameraIntents::FORWARD, 45),
        ("circle left", CameraIntents::RIGHT | CameraIntents::TURN_LEFT, 60),
        ("rise and look down", CameraIntents::RAISE | CameraIntents::TILT_DOWN, 30),
        ("back off", CameraIntents::BACK, 60),
    ];

    let mut camera = Camera::new(CameraState::new(Vec3::new(0.0, 0.0, 2.0)), CameraConfig::default())?;
    let projection = Projection::from_degrees(84.0, 1.0, 0.1, 1000.0)?.matrix();
    let cube = Mesh::cube(1.0);
    let spin = SpinRate::default();
    let mut frame = 0u32;

    for (label, intents, frames) in script {
        for _ in 0..frames {
            camera.update(intents, FRAME_DT)?;
            frame += 1;
        }

        let state = camera.state;
        let time = frame as f32 * FRAME_DT;
        let model = Transform::spin_matrix(&spin, time);
        let mvp = camera.model_view_projection(&model, &projection);
        let visible = cube
            .positions
            .iter()
            .filter_map(|p| project_to_screen(&mvp, *p, 80, 40))
            .filter(|p| p.x >= 0.0 && p.x < 80.0 && p.y >= 0.0 && p.y < 40.0)
            .count();

        println!(
            "{:<20} frame {:>4}  pos ({:>6.2}, {:>6.2}, {:>6.2})  yaw {:>7.1}  pitch {:>6.1}  corners on screen {}",
            label,
            frame,
            state.position.x,
            state.position.y,
            state.position.z,
            radians_to_degrees(state.yaw),
            radians_to_degrees(state.pitch),
            visible,
        );
    }

    Ok(())
}
