use serde::{Deserialize, Serialize};

use crate::flight::{RotorModel, ROTOR_SPIN};
use crate::math::Vec3f;

/// Which PD corrections reach the rotors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixerMode {
    /// Altitude, pitch, yaw and roll all drive rotor speeds.
    #[default]
    Full,
    /// Only altitude drives rotor speeds; attitude corrections are computed
    /// and reported but never applied (open-loop attitude).
    AltitudeOnly,
}

/// Per-axis corrections (rad/s of rotor speed) before mixing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisCorrections {
    pub altitude: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

/// Distributes axis corrections across the four rotors.
///
/// Each rotor's sign per axis follows the torque that rotor produces: the
/// pitch (body X) moment of lift is `-arm.z · F`, the roll (body Z) moment is
/// `arm.x · F`, and yaw follows the spin's reaction sign. A positive
/// correction therefore always produces positive torque on its axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Mixer {
    mode: MixerMode,
    /// Per rotor: (pitch, yaw, roll) signs.
    signs: [Vec3f; 4],
}

impl Mixer {
    pub fn new(mode: MixerMode, rotors: &RotorModel) -> Self {
        let arms = rotors.arms();
        let signs = std::array::from_fn(|i| {
            Vec3f::new(
                -arms[i].z.signum(),
                ROTOR_SPIN[i].reaction_sign(),
                arms[i].x.signum(),
            )
        });
        Self { mode, signs }
    }

    /// Rotor speeds around `baseline` for the given corrections.
    pub fn mix(&self, baseline: f32, c: &AxisCorrections) -> [f32; 4] {
        let attitude = match self.mode {
            MixerMode::Full => Vec3f::new(c.pitch, c.yaw, c.roll),
            MixerMode::AltitudeOnly => Vec3f::ZERO,
        };
        self.signs.map(|s| baseline + c.altitude + s.dot(attitude))
    }
}
