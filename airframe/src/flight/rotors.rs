use serde::{Deserialize, Serialize};

use super::types::ActuatorCommand;
use crate::airframe_spec::{positive, AirframeSpec, SpecError};
use crate::math::Vec3f;

/// Rotor spin sense, viewed from above (looking down body -Y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spin {
    CounterClockwise,
    Clockwise,
}

impl Spin {
    /// Sign of the reaction torque on the body about body +Y.
    /// A CCW rotor carries +Y angular momentum, so the body is pushed -Y.
    #[inline]
    pub fn reaction_sign(self) -> f32 {
        match self {
            Spin::CounterClockwise => -1.0,
            Spin::Clockwise => 1.0,
        }
    }
}

/// Rotors 1 and 3 spin one way, 2 and 4 the other, so reactions cancel at
/// equal speeds.
pub const ROTOR_SPIN: [Spin; 4] = [
    Spin::CounterClockwise,
    Spin::Clockwise,
    Spin::CounterClockwise,
    Spin::Clockwise,
];

/// Net force and torque on the body, both in body coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyWrench {
    pub force: Vec3f,
    pub torque: Vec3f,
    pub thrust: [f32; 4],
    pub reaction: [f32; 4],
}

/// Maps rotor speeds to lift and torque. No internal state.
#[derive(Debug, Clone, PartialEq)]
pub struct RotorModel {
    k_f: f32,
    k_m: f32,
    arms: [Vec3f; 4],
}

impl RotorModel {
    pub fn new(spec: &AirframeSpec) -> Result<Self, SpecError> {
        let k_f = positive("k_f", spec.k_f)?;
        let k_m = positive("k_m", spec.k_m)?;
        let l = positive("arm_length", spec.arm_length)? / std::f32::consts::SQRT_2;
        Ok(Self {
            k_f,
            k_m,
            // X-configuration, 45° off the body axes.
            arms: [
                Vec3f::new(-l, 0.0, l),
                Vec3f::new(l, 0.0, l),
                Vec3f::new(l, 0.0, -l),
                Vec3f::new(-l, 0.0, -l),
            ],
        })
    }

    pub fn arms(&self) -> &[Vec3f; 4] {
        &self.arms
    }

    /// `k_f · ω²`, never negative.
    #[inline]
    pub fn thrust(&self, omega: f32) -> f32 {
        self.k_f * omega * omega
    }

    /// Magnitude of the drag-induced reaction torque, `k_m · ω²`.
    #[inline]
    pub fn reaction_torque(&self, omega: f32) -> f32 {
        self.k_m * omega * omega
    }

    /// Sum each rotor's lift and the moment of that lift about the body
    /// origin, plus its reaction torque about the thrust axis.
    pub fn body_wrench(&self, cmd: &ActuatorCommand) -> BodyWrench {
        let mut out = BodyWrench::default();
        for (i, (&omega, arm)) in cmd.omega.iter().zip(self.arms.iter()).enumerate() {
            let f = self.thrust(omega);
            let m = self.reaction_torque(omega);
            let lift = Vec3f::new(0.0, f, 0.0);
            let reaction = Vec3f::new(0.0, ROTOR_SPIN[i].reaction_sign() * m, 0.0);
            out.force += lift;
            out.torque += arm.cross(lift);
            out.torque += reaction;
            out.thrust[i] = f;
            out.reaction[i] = m;
        }
        out
    }
}
