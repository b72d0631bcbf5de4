/// Keyboard polling state for the terminal host
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use fly3d_core::{CameraIntents, KeyState};

/// How long a press stays active when the terminal reports no key releases.
/// Long enough to bridge the gap before auto-repeat kicks in.
const HOLD_WINDOW: Duration = Duration::from_millis(150);

/// What a key event asked the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Camera,
    Ignored,
}

fn intent_for(code: KeyCode) -> Option<CameraIntents> {
    match code {
        KeyCode::Char(c) => CameraIntents::from_char(c),
        KeyCode::Up => Some(CameraIntents::TILT_UP),
        KeyCode::Down => Some(CameraIntents::TILT_DOWN),
        KeyCode::Left => Some(CameraIntents::TURN_LEFT),
        KeyCode::Right => Some(CameraIntents::TURN_RIGHT),
        _ => None,
    }
}

/// Turns crossterm key events into held intents.
///
/// With release events (keyboard enhancement) a key is held from press to
/// release. Without them each press or auto-repeat keeps its intent alive for
/// [`HOLD_WINDOW`].
#[derive(Debug)]
pub struct KeyTracker {
    release_events: bool,
    held: KeyState,
    recent: Vec<(CameraIntents, Instant)>,
}

impl KeyTracker {
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            held: KeyState::new(),
            recent: Vec::new(),
        }
    }

    pub fn handle(&mut self, event: &KeyEvent, now: Instant) -> KeyAction {
        let ctrl_c = event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL);
        if event.code == KeyCode::Esc || ctrl_c {
            return KeyAction::Quit;
        }

        let Some(intent) = intent_for(event.code) else {
            return KeyAction::Ignored;
        };

        match event.kind {
            KeyEventKind::Release => self.held.set_intent(intent, false),
            KeyEventKind::Press | KeyEventKind::Repeat if self.release_events => {
                self.held.set_intent(intent, true)
            }
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.recent.retain(|(i, _)| *i != intent);
                self.recent.push((intent, now));
            }
        }
        KeyAction::Camera
    }

    /// Intents active at `now`.
    pub fn intents(&mut self, now: Instant) -> CameraIntents {
        if self.release_events {
            return self.held.intents();
        }
        self.recent
            .retain(|(_, pressed)| now.saturating_duration_since(*pressed) < HOLD_WINDOW);
        self.recent
            .iter()
            .fold(CameraIntents::empty(), |acc, (intent, _)| acc | *intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_quit_keys() {
        let mut keys = KeyTracker::new(false);
        let now = Instant::now();
        assert_eq!(keys.handle(&press(KeyCode::Esc), now), KeyAction::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(keys.handle(&ctrl_c, now), KeyAction::Quit);
        // plain q lowers the camera
        assert_eq!(keys.handle(&press(KeyCode::Char('q')), now), KeyAction::Camera);
        assert_eq!(keys.handle(&press(KeyCode::Enter), now), KeyAction::Ignored);
    }

    #[test]
    fn test_press_release_tracking() {
        let mut keys = KeyTracker::new(true);
        let now = Instant::now();
        keys.handle(&press(KeyCode::Char('w')), now);
        keys.handle(&press(KeyCode::Left), now);
        let later = now + Duration::from_secs(5);
        assert_eq!(keys.intents(later), CameraIntents::FORWARD | CameraIntents::TURN_LEFT);

        keys.handle(&release(KeyCode::Char('w')), later);
        assert_eq!(keys.intents(later), CameraIntents::TURN_LEFT);
    }

    #[test]
    fn test_hold_window_expires() {
        let mut keys = KeyTracker::new(false);
        let now = Instant::now();
        keys.handle(&press(KeyCode::Char('D')), now);
        keys.handle(&press(KeyCode::Up), now + Duration::from_millis(100));

        let soon = now + Duration::from_millis(120);
        assert_eq!(keys.intents(soon), CameraIntents::RIGHT | CameraIntents::TILT_UP);

        let later = now + Duration::from_millis(200);
        assert_eq!(keys.intents(later), CameraIntents::TILT_UP);
        assert!(keys.intents(now + Duration::from_secs(1)).is_empty());
    }
}
