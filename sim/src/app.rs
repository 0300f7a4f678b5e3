use std::time::Duration;

use anyhow::{Context, Result};
use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use tracing::info;

use crate::config::Config;
use crate::input::{InputScript, KeyState};
use crate::pose_feed::PoseFeed;
use crate::runtime::Simulation;

/// Simulated time after which the app exits.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct RunLimit(pub Option<Duration>);

/// Drives a [`Simulation`] from the app's frame clock.
pub struct SimPlugin {
    sim: Simulation,
    script: InputScript,
    feed: PoseFeed,
    limit: Option<Duration>,
}

impl SimPlugin {
    pub fn new(cfg: &Config, feed: PoseFeed) -> Result<Self> {
        Ok(Self {
            sim: Simulation::new(cfg)?,
            script: InputScript::new(cfg.script.clone()),
            feed,
            limit: cfg.run.duration(),
        })
    }
}

impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.sim.clone())
            .insert_resource(self.script.clone())
            .insert_resource(self.feed.clone())
            .insert_resource(RunLimit(self.limit))
            .init_resource::<KeyState>()
            .add_systems(
                Update,
                (
                    apply_input_script,
                    advance_simulation,
                    publish_pose,
                    stop_at_run_limit,
                )
                    .chain(),
            );
    }
}

pub fn build_sim_app(cfg: &Config, feed: PoseFeed) -> Result<App> {
    let plugin = SimPlugin::new(cfg, feed)?;
    let frame = cfg
        .run
        .frame_period()
        .context("run.frame_hz gives no usable frame period")?;
    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(frame)));
    app.add_plugins(plugin);
    Ok(app)
}

// An empty script leaves KeyState to whatever input collaborator owns it.
fn apply_input_script(
    sim: Res<Simulation>,
    script: Res<InputScript>,
    mut keys: ResMut<KeyState>,
) {
    if script.is_empty() {
        return;
    }
    let held = script.keys_at(sim.sim_time());
    if *keys != held {
        *keys = held;
    }
}

fn advance_simulation(time: Res<Time>, keys: Res<KeyState>, mut sim: ResMut<Simulation>) {
    let dt = time.delta();
    if dt.is_zero() {
        return;
    }
    sim.advance(dt, &*keys);
}

fn publish_pose(sim: Res<Simulation>, feed: Res<PoseFeed>) {
    feed.publish(sim.snapshot());
}

fn stop_at_run_limit(
    sim: Res<Simulation>,
    limit: Res<RunLimit>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(limit) = limit.0 else { return };
    if sim.sim_time() >= limit {
        let stats = sim.stats();
        info!(
            sim_time = ?sim.sim_time(),
            dynamics_ticks = stats.dynamics_ticks,
            control_ticks = stats.control_ticks,
            resets = stats.resets(),
            rejected = stats.rejected_commands,
            "run limit reached"
        );
        exit.write(AppExit::Success);
    }
}
