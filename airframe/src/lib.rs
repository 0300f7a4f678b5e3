//! Quadrotor flight core shared by the headless runner and any renderer.
//!
//! This crate does no I/O and no logging. It exposes the validated airframe
//! constants, the rotor model, the fixed-step integrator with its reset
//! guard, the PD control loop and the pose projection handed to renderers.

pub mod math;
pub use math::{Mat3f, Mat4f, Vec3f};

mod airframe_spec;
pub use airframe_spec::{airframes, AirframeSpec, Envelope, SpecError};

pub mod flight;
pub use flight::{
    ActuatorCommand, Integrator, ResetCause, RigidBodyState, RotorModel, StepDebug, StepOutcome,
};

pub mod control;
pub use control::{ControlLoop, ControlSpec, Key, KeyboardState};

mod pose;
pub use pose::{Pose, PoseExport};
