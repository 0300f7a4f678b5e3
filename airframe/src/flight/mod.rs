mod types;
mod rotors;
mod dynamics;

pub use types::{ActuatorCommand, ResetCause, RigidBodyState, StepDebug, StepOutcome};
pub use rotors::{BodyWrench, RotorModel, Spin, ROTOR_SPIN};
pub use dynamics::Integrator;
