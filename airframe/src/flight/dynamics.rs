use super::rotors::RotorModel;
use super::types::{ActuatorCommand, ResetCause, RigidBodyState, StepDebug, StepOutcome};
use crate::airframe_spec::{positive, AirframeSpec, Envelope, SpecError};
use crate::math::{diag, try_inverse, world_from_body, Mat3f, Vec3f};

/// Fixed-step Newton-Euler integrator for a single quadrotor body.
///
/// Construction validates every constant it will divide by, so a built
/// integrator never produces non-finite values from configuration alone.
#[derive(Debug, Clone)]
pub struct Integrator {
    rotors: RotorModel,
    mass: f32,
    gravity: f32,
    inertia: Mat3f,
    inertia_inv: Mat3f,
    envelope: Envelope,
    dt: f32,
}

impl Integrator {
    pub fn new(spec: &AirframeSpec, envelope: Envelope, dt: f32) -> Result<Self, SpecError> {
        spec.validate()?;
        envelope.validate()?;
        let dt = positive("dt", dt)?;
        let inertia = diag(spec.inertia);
        let inertia_inv = try_inverse(inertia).ok_or(SpecError::SingularInertia(spec.inertia))?;
        Ok(Self {
            rotors: RotorModel::new(spec)?,
            mass: spec.mass,
            gravity: spec.gravity,
            inertia,
            inertia_inv,
            envelope,
            dt,
        })
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// The state every reset returns to.
    pub fn hover_state(&self) -> RigidBodyState {
        RigidBodyState::hover(self.envelope.home)
    }

    /// Advance `state` by one `dt` under `cmd`.
    /// See `step_dbg` for the per-tick breakdown.
    pub fn step(&self, cmd: &ActuatorCommand, state: &mut RigidBodyState) -> StepOutcome {
        self.step_dbg(cmd, state, None)
    }

    /// Variant of `step` that fills out an optional telemetry struct.
    ///
    /// Semi-implicit Euler: velocities are updated first and the new
    /// velocities move position and orientation. The command is read once
    /// and held for the whole tick.
    pub fn step_dbg(
        &self,
        cmd: &ActuatorCommand,
        state: &mut RigidBodyState,
        mut dbg: Option<&mut StepDebug>,
    ) -> StepOutcome {
        let dt = self.dt;
        let r = world_from_body(state.orientation);
        let wrench = self.rotors.body_wrench(cmd);

        // Linear: lift rotated into world, minus gravity, unit-normalized by mass.
        let force_world = r * wrench.force;
        let lin_acc = force_world / self.mass - Vec3f::new(0.0, self.gravity, 0.0);
        let linear_velocity = state.linear_velocity + lin_acc * dt;
        let position = state.position + linear_velocity * dt;

        // Angular, body frame: I·α = τ - ω × (I·ω)
        let omega = state.angular_velocity;
        let gyro = omega.cross(self.inertia * omega);
        let ang_acc = self.inertia_inv * (wrench.torque - gyro);
        let angular_velocity = omega + ang_acc * dt;
        let orientation = state.orientation + angular_velocity * dt;

        let candidate = RigidBodyState {
            position,
            linear_velocity,
            orientation,
            angular_velocity,
        };

        let outcome = if !candidate.is_finite() {
            StepOutcome::Reset(ResetCause::NonFinite)
        } else if !self.envelope.contains(candidate.position) {
            StepOutcome::Reset(ResetCause::Envelope)
        } else {
            StepOutcome::Advanced
        };

        *state = match outcome {
            StepOutcome::Advanced => candidate,
            StepOutcome::Reset(_) => self.hover_state(),
        };

        if let Some(d) = dbg.as_mut() {
            d.dt = dt;
            d.command = cmd.omega;
            d.rotor_thrust = wrench.thrust;
            d.rotor_reaction = wrench.reaction;
            d.force_body = wrench.force;
            d.force_world = force_world;
            d.lin_acc = lin_acc;
            d.torque_body = wrench.torque;
            d.gyro = gyro;
            d.ang_acc = ang_acc;
            d.outcome = outcome;
            // Reset ticks report no acceleration.
            if outcome.is_reset() {
                d.lin_acc = Vec3f::ZERO;
                d.ang_acc = Vec3f::ZERO;
            }
        }

        outcome
    }
}
