use serde::{Deserialize, Serialize};

use crate::math::Vec3f;

/// Rigid-body state of the airframe. Mutated only by `Integrator::step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyState {
    /// World-frame position of the body origin (m).
    pub position: Vec3f,
    /// World-frame velocity (m/s).
    pub linear_velocity: Vec3f,
    /// Intrinsic pitch/yaw/roll angles about body X/Y/Z (rad).
    /// See `math::world_from_body` for the composition order. Singular at
    /// yaw = ±π/2, where pitch and roll share an axis.
    pub orientation: Vec3f,
    /// Body-frame angular velocity (rad/s).
    pub angular_velocity: Vec3f,
}

impl RigidBodyState {
    /// Hover initial condition: at rest, level, at `home`.
    pub const fn hover(home: Vec3f) -> Self {
        Self {
            position: home,
            linear_velocity: Vec3f::ZERO,
            orientation: Vec3f::ZERO,
            angular_velocity: Vec3f::ZERO,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.linear_velocity.is_finite()
            && self.orientation.is_finite()
            && self.angular_velocity.is_finite()
    }
}

/// Four rotor angular speeds (rad/s), rotor order 1..4.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuatorCommand {
    pub omega: [f32; 4],
}

impl ActuatorCommand {
    pub const fn new(omega: [f32; 4]) -> Self {
        Self { omega }
    }

    pub const fn uniform(omega: f32) -> Self {
        Self { omega: [omega; 4] }
    }

    pub fn is_finite(&self) -> bool {
        self.omega.iter().all(|w| w.is_finite())
    }

    pub fn clamped(self, min: f32, max: f32) -> Self {
        Self {
            omega: self.omega.map(|w| w.clamp(min, max)),
        }
    }
}

/// Why the divergence guard fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetCause {
    /// Position left the envelope.
    Envelope,
    /// The candidate state contained NaN or infinity.
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepOutcome {
    #[default]
    Advanced,
    Reset(ResetCause),
}

impl StepOutcome {
    pub fn is_reset(self) -> bool {
        matches!(self, StepOutcome::Reset(_))
    }
}

/// Per-tick dynamics telemetry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepDebug {
    pub dt: f32,
    pub command: [f32; 4],
    // Per-rotor terms
    pub rotor_thrust: [f32; 4],
    pub rotor_reaction: [f32; 4],
    // Forces
    pub force_body: Vec3f,
    pub force_world: Vec3f,
    /// World-frame linear acceleration including gravity (m/s²).
    pub lin_acc: Vec3f,
    // Torques (body frame)
    pub torque_body: Vec3f,
    /// ω × (I·ω)
    pub gyro: Vec3f,
    /// Body-frame angular acceleration (rad/s²).
    pub ang_acc: Vec3f,
    pub outcome: StepOutcome,
}
