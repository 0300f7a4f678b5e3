use serde::{Deserialize, Serialize};

use super::intent::{Intent, KeyboardState};
use super::mixer::{AxisCorrections, Mixer, MixerMode};
use super::pd::PdGains;
use crate::airframe_spec::{non_negative, AirframeSpec, SpecError};
use crate::flight::{ActuatorCommand, RigidBodyState, RotorModel, StepDebug};
use crate::math::{body_from_world, Vec3f};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisGains {
    pub altitude: PdGains,
    pub pitch: PdGains,
    pub yaw: PdGains,
    pub roll: PdGains,
}

impl Default for AxisGains {
    fn default() -> Self {
        Self {
            altitude: PdGains::new(4.0, 0.5),
            // Kd multiplies measured acceleration, which responds to the
            // command within one control period. Kd times the rotor-to-axis
            // acceleration gain (~6.3 for pitch/roll) must stay below 1.
            pitch: PdGains::new(0.7, 0.05),
            yaw: PdGains::new(0.1, 0.01),
            roll: PdGains::new(0.7, 0.05),
        }
    }
}

/// Setpoint magnitudes applied while a key is held. Not scaled by hold time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetpointRates {
    /// m/s
    pub climb: f32,
    /// rad/s
    pub pitch: f32,
    /// rad/s
    pub yaw: f32,
    /// rad/s
    pub roll: f32,
}

impl Default for SetpointRates {
    fn default() -> Self {
        Self {
            climb: 0.2,
            pitch: 0.1,
            yaw: 0.2,
            roll: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSpec {
    pub mixer: MixerMode,
    pub gains: AxisGains,
    pub rates: SetpointRates,
}

impl ControlSpec {
    pub fn validate(&self) -> Result<(), SpecError> {
        self.gains.altitude.validate("gains.altitude")?;
        self.gains.pitch.validate("gains.pitch")?;
        self.gains.yaw.validate("gains.yaw")?;
        self.gains.roll.validate("gains.roll")?;
        non_negative("rates.climb", self.rates.climb)?;
        non_negative("rates.pitch", self.rates.pitch)?;
        non_negative("rates.yaw", self.rates.yaw)?;
        non_negative("rates.roll", self.rates.roll)?;
        Ok(())
    }
}

/// Desired body-frame motion for one control tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlSetpoint {
    /// Desired body angular velocity (pitch, yaw, roll about X, Y, Z).
    pub angular_velocity: Vec3f,
    /// Desired body linear velocity; only `.y` is commanded.
    pub linear_velocity: Vec3f,
}

/// What one control tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlOutcome {
    /// The command was replaced.
    Applied,
    /// The mixed command was non-finite and was discarded; the previous
    /// command stays in force.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlReport {
    pub intent: Intent,
    pub setpoint: ControlSetpoint,
    pub corrections: AxisCorrections,
    pub outcome: ControlOutcome,
}

/// Periodic PD controller that turns operator intent into rotor speeds.
#[derive(Debug, Clone)]
pub struct ControlLoop {
    spec: ControlSpec,
    mixer: Mixer,
    hover_omega: f32,
    omega_min: f32,
    omega_max: f32,
}

impl ControlLoop {
    pub fn new(spec: ControlSpec, airframe: &AirframeSpec) -> Result<Self, SpecError> {
        spec.validate()?;
        airframe.validate()?;
        let rotors = RotorModel::new(airframe)?;
        Ok(Self {
            mixer: Mixer::new(spec.mixer, &rotors),
            spec,
            hover_omega: airframe.hover_omega(),
            omega_min: airframe.omega_min,
            omega_max: airframe.omega_max,
        })
    }

    /// Baseline at which net lift equals weight.
    pub fn hover_omega(&self) -> f32 {
        self.hover_omega
    }

    pub fn hover_command(&self) -> ActuatorCommand {
        ActuatorCommand::uniform(self.hover_omega)
    }

    pub fn setpoint(&self, intent: Intent) -> ControlSetpoint {
        let r = &self.spec.rates;
        ControlSetpoint {
            angular_velocity: Vec3f::new(
                intent.pitch.sign() * r.pitch,
                intent.yaw.sign() * r.yaw,
                intent.roll.sign() * r.roll,
            ),
            linear_velocity: Vec3f::new(0.0, intent.vertical.sign() * r.climb, 0.0),
        }
    }

    /// PD corrections for the given setpoint. Desired accelerations are zero;
    /// measured accelerations come from the last dynamics tick.
    pub fn corrections(
        &self,
        setpoint: &ControlSetpoint,
        state: &RigidBodyState,
        last_step: &StepDebug,
    ) -> AxisCorrections {
        let g = &self.spec.gains;
        let to_body = body_from_world(state.orientation);
        let v_body = to_body * state.linear_velocity;
        let a_body = to_body * last_step.lin_acc;
        let w = state.angular_velocity;
        let alpha = last_step.ang_acc;
        let w_des = setpoint.angular_velocity;
        AxisCorrections {
            altitude: g.altitude.correction(setpoint.linear_velocity.y, v_body.y, 0.0, a_body.y),
            pitch: g.pitch.correction(w_des.x, w.x, 0.0, alpha.x),
            yaw: g.yaw.correction(w_des.y, w.y, 0.0, alpha.y),
            roll: g.roll.correction(w_des.z, w.z, 0.0, alpha.z),
        }
    }

    /// One control tick: poll input, compute corrections, write `cmd`.
    ///
    /// A non-finite result leaves `cmd` untouched. A finite result is clamped
    /// into the rotor speed bounds.
    pub fn tick(
        &self,
        keys: &impl KeyboardState,
        state: &RigidBodyState,
        last_step: &StepDebug,
        cmd: &mut ActuatorCommand,
    ) -> ControlReport {
        let intent = Intent::poll(keys);
        let setpoint = self.setpoint(intent);
        let corrections = self.corrections(&setpoint, state, last_step);
        let mixed = ActuatorCommand::new(self.mixer.mix(self.hover_omega, &corrections));
        let outcome = if mixed.is_finite() {
            *cmd = mixed.clamped(self.omega_min, self.omega_max);
            ControlOutcome::Applied
        } else {
            ControlOutcome::Rejected
        };
        ControlReport {
            intent,
            setpoint,
            corrections,
            outcome,
        }
    }
}
