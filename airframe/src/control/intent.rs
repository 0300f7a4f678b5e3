use serde::{Deserialize, Serialize};

/// Fixed key set the control loop polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    YawLeft,
    YawRight,
}

impl Key {
    pub const ALL: [Key; 8] = [
        Key::Forward,
        Key::Back,
        Key::Left,
        Key::Right,
        Key::Up,
        Key::Down,
        Key::YawLeft,
        Key::YawRight,
    ];
}

/// Input collaborator: current held/released state of each key.
pub trait KeyboardState {
    fn is_pressed(&self, key: Key) -> bool;
}

/// Nothing held.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeys;

impl KeyboardState for NoKeys {
    fn is_pressed(&self, _key: Key) -> bool {
        false
    }
}

/// Three-state operator intent on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisIntent {
    Negative,
    #[default]
    Hold,
    Positive,
}

impl AxisIntent {
    /// Opposing keys held together cancel out.
    pub fn from_pair(negative: bool, positive: bool) -> Self {
        match (negative, positive) {
            (true, false) => AxisIntent::Negative,
            (false, true) => AxisIntent::Positive,
            _ => AxisIntent::Hold,
        }
    }

    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            AxisIntent::Negative => -1.0,
            AxisIntent::Hold => 0.0,
            AxisIntent::Positive => 1.0,
        }
    }
}

/// Per-axis intent, signed in body-axis terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Intent {
    /// +: climb.
    pub vertical: AxisIntent,
    /// Rotation about body X. +: nose up.
    pub pitch: AxisIntent,
    /// Rotation about body Y. +: nose left.
    pub yaw: AxisIntent,
    /// Rotation about body Z. +: right side up (bank left).
    pub roll: AxisIntent,
}

impl Intent {
    pub fn poll(keys: &impl KeyboardState) -> Self {
        Self {
            vertical: AxisIntent::from_pair(keys.is_pressed(Key::Down), keys.is_pressed(Key::Up)),
            // Forward tips the nose down.
            pitch: AxisIntent::from_pair(keys.is_pressed(Key::Forward), keys.is_pressed(Key::Back)),
            yaw: AxisIntent::from_pair(keys.is_pressed(Key::YawRight), keys.is_pressed(Key::YawLeft)),
            roll: AxisIntent::from_pair(keys.is_pressed(Key::Right), keys.is_pressed(Key::Left)),
        }
    }
}
