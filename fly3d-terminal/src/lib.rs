/// Terminal host for the fly3d camera
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use fly3d_core::{radians_to_degrees, Camera, Mesh, Projection, Transform};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub mod config;
pub mod input;
pub mod renderer;

pub use config::{AppConfig, CubeConfig};
pub use input::{KeyAction, KeyTracker};
pub use renderer::AsciiRenderer;

/// Terminal cells are about twice as tall as they are wide
const CELL_ASPECT: f32 = 0.5;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: Mesh,
    camera: Camera,
    projection: Projection,
    cube: CubeConfig,
    renderer: AsciiRenderer,
    keys: KeyTracker,
    frame_interval: Duration,
    running: bool,
    started: Instant,
    last_update: Instant,
    fps_window_start: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let (width, height) = terminal::size().context("failed to query terminal size")?;

        let mut projection = config.projection;
        projection.set_aspect(Projection::aspect_for(width as u32, height as u32, CELL_ASPECT))?;
        let camera = Camera::new(config.start, config.camera)?;
        let now = Instant::now();

        Ok(Self {
            mesh: Mesh::cube(config.cube.size),
            camera,
            projection,
            cube: config.cube,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            keys: KeyTracker::new(false),
            frame_interval: Duration::from_secs_f64(1.0 / config.fps as f64),
            running: true,
            started: now,
            last_update: now,
            fps_window_start: now,
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut screen = ScreenGuard::enter(stdout())?;

        let enhanced = match terminal::supports_keyboard_enhancement() {
            Ok(supported) => supported,
            Err(err) => {
                warn!(%err, "could not query keyboard enhancement support");
                false
            }
        };
        if enhanced {
            if let Err(err) = screen.report_key_releases() {
                warn!(%err, "could not enable key release events");
            }
        }
        self.keys = KeyTracker::new(screen.key_releases);
        info!(
            width = self.renderer.width(),
            height = self.renderer.height(),
            release_events = screen.key_releases,
            "starting terminal renderer"
        );

        let result = self.main_loop();
        drop(screen);

        info!(position = ?self.camera.state.position, "terminal renderer stopped");
        result
    }

    fn main_loop(&mut self) -> Result<()> {
        self.last_update = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            // Update
            self.update()?;

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_interval {
                std::thread::sleep(self.frame_interval - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.fps_window_start).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.fps_window_start).as_secs_f32();
                self.frame_count = 0;
                self.fps_window_start = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => {
                if self.keys.handle(&key, Instant::now()) == KeyAction::Quit {
                    self.running = false;
                }
            }
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                self.renderer.resize(width as usize, height as usize);
                self.projection
                    .set_aspect(Projection::aspect_for(width as u32, height as u32, CELL_ASPECT))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;

        let intents = self.keys.intents(now);
        self.camera.update(intents, dt)?;
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let time = self.started.elapsed().as_secs_f32();
        let rotation = Transform::spin_matrix(&self.cube.spin, time);
        let model = Transform::model_matrix(self.cube.position, &rotation);
        let mvp = self.camera.model_view_projection(&model, &self.projection.matrix());

        // Clear renderer
        self.renderer.clear();

        // Render mesh
        self.renderer.render_mesh(&self.mesh, &model, &mvp);

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let state = &self.camera.state;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "fly3d | FPS: {:.1} | pos ({:.2}, {:.2}, {:.2}) yaw {:.0} pitch {:.0} | WASD=Move Arrows=Look E/Q=Up/Down Esc=Quit",
                self.fps,
                state.position.x,
                state.position.y,
                state.position.z,
                radians_to_degrees(state.yaw),
                radians_to_degrees(state.pitch),
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Raw mode and alternate screen, restored on drop.
///
/// Restoring happens even when the render loop bails out with `?` or
/// panics. Each step is attempted regardless of earlier failures.
struct ScreenGuard<W: Write> {
    out: W,
    raw_mode: bool,
    key_releases: bool,
}

impl<W: Write> ScreenGuard<W> {
    fn enter(out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self {
            out,
            raw_mode: true,
            key_releases: false,
        };
        execute!(guard.out, terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }

    fn report_key_releases(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
        self.key_releases = true;
        Ok(())
    }
}

impl<W: Write> Drop for ScreenGuard<W> {
    fn drop(&mut self) {
        if self.key_releases {
            if let Err(err) = execute!(self.out, PopKeyboardEnhancementFlags) {
                warn!(%err, "could not pop keyboard enhancement flags");
            }
        }
        if self.raw_mode {
            if let Err(err) = terminal::disable_raw_mode() {
                warn!(%err, "could not leave raw mode");
            }
        }
        if let Err(err) = execute!(self.out, terminal::LeaveAlternateScreen) {
            warn!(%err, "could not leave alternate screen");
        }
        if let Err(err) = execute!(self.out, cursor::Show) {
            warn!(%err, "could not show cursor");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer that fails every call and counts the attempts.
    struct BrokenPipe {
        attempts: usize,
    }

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn detached<W: Write>(out: W, key_releases: bool) -> ScreenGuard<W> {
        ScreenGuard {
            out,
            raw_mode: false,
            key_releases,
        }
    }

    #[test]
    fn test_drop_restores_screen() {
        let mut written = Vec::new();
        drop(detached(&mut written, true));

        let mut expected = Vec::new();
        queue!(
            expected,
            PopKeyboardEnhancementFlags,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )
        .unwrap();
        assert_eq!(written, expected);
    }

    #[test]
    fn test_drop_skips_flags_never_pushed() {
        let mut written = Vec::new();
        drop(detached(&mut written, false));

        let mut expected = Vec::new();
        queue!(expected, terminal::LeaveAlternateScreen, cursor::Show).unwrap();
        assert_eq!(written, expected);
    }

    #[test]
    fn test_drop_keeps_restoring_after_write_errors() {
        let mut out = BrokenPipe { attempts: 0 };
        drop(detached(&mut out, true));
        // pop flags, leave alternate screen and show cursor are each tried
        assert!(out.attempts >= 3, "attempts = {}", out.attempts);
    }

    #[test]
    fn test_drop_runs_when_loop_fails() {
        fn failing_loop(written: &mut Vec<u8>) -> Result<()> {
            let _screen = detached(written, false);
            anyhow::bail!("render failed")
        }

        let mut written = Vec::new();
        assert!(failing_loop(&mut written).is_err());
        let mut expected = Vec::new();
        queue!(expected, terminal::LeaveAlternateScreen, cursor::Show).unwrap();
        assert_eq!(written, expected);
    }
}
