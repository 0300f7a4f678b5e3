mod intent;
mod pd;
mod mixer;
mod controller;

pub use intent::{AxisIntent, Intent, Key, KeyboardState, NoKeys};
pub use pd::PdGains;
pub use mixer::{AxisCorrections, Mixer, MixerMode};
pub use controller::{
    AxisGains, ControlLoop, ControlOutcome, ControlReport, ControlSetpoint, ControlSpec,
    SetpointRates,
};
