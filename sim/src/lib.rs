//! Headless runner for the `airframe` flight core: fixed-rate scheduling of
//! the control and dynamics ticks, TOML configuration, scripted input and a
//! cross-thread pose feed.

pub mod args;
pub use args::Args;

mod clock;
pub use clock::FixedClock;

pub mod config;
pub use config::{load_config, parse_config, Config};

mod input;
pub use input::{InputScript, KeyState};

mod pose_feed;
pub use pose_feed::{PoseFeed, PoseReporter, PoseSnapshot};

mod runtime;
pub use runtime::{FrameReport, SimStats, Simulation};

mod app;
pub use app::{build_sim_app, RunLimit, SimPlugin};
