/// Per-frame camera intents and the default key binding
use bitflags::bitflags;

bitflags! {
    /// The set of movement and turn intents active during one frame.
    ///
    /// Built fresh each frame by the host from whatever input it polls.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CameraIntents: u16 {
        const FORWARD = 1 << 0;
        const BACK = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const TURN_LEFT = 1 << 4;
        const TURN_RIGHT = 1 << 5;
        const TILT_UP = 1 << 6;
        const TILT_DOWN = 1 << 7;
        const RAISE = 1 << 8;
        const LOWER = 1 << 9;
    }
}

impl CameraIntents {
    /// Map a DOM `KeyboardEvent.code` to the intent it drives.
    ///
    /// WASD moves, arrows turn and tilt, E raises and Q lowers.
    pub fn from_key_code(code: &str) -> Option<Self> {
        let intent = match code {
            "KeyW" => Self::FORWARD,
            "KeyA" => Self::LEFT,
            "KeyS" => Self::BACK,
            "KeyD" => Self::RIGHT,
            "ArrowUp" => Self::TILT_UP,
            "ArrowDown" => Self::TILT_DOWN,
            "ArrowLeft" => Self::TURN_LEFT,
            "ArrowRight" => Self::TURN_RIGHT,
            "KeyE" => Self::RAISE,
            "KeyQ" => Self::LOWER,
            _ => return None,
        };
        Some(intent)
    }

    /// Map a printable key to the intent it drives, ignoring case.
    pub fn from_char(c: char) -> Option<Self> {
        let intent = match c.to_ascii_lowercase() {
            'w' => Self::FORWARD,
            'a' => Self::LEFT,
            's' => Self::BACK,
            'd' => Self::RIGHT,
            'e' => Self::RAISE,
            'q' => Self::LOWER,
            _ => return None,
        };
        Some(intent)
    }
}

/// Tracks which intents are held between key-down and key-up events.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    held: CameraIntents,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition. Returns `false` for unbound keys.
    pub fn set(&mut self, code: &str, down: bool) -> bool {
        match CameraIntents::from_key_code(code) {
            Some(intent) => {
                self.set_intent(intent, down);
                true
            }
            None => false,
        }
    }

    pub fn set_intent(&mut self, intent: CameraIntents, down: bool) {
        self.held.set(intent, down);
    }

    pub fn intents(&self) -> CameraIntents {
        self.held
    }

    pub fn clear(&mut self) {
        self.held = CameraIntents::empty();
    }
}
