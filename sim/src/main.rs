use std::time::Duration;

use anyhow::{bail, Context, Result};
use bevy::app::AppExit;
use clap::Parser;
use tracing::info;

use sim::{
    build_sim_app, load_config, Args, Config, InputScript, PoseFeed, PoseReporter, Simulation,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    args.apply(&mut cfg);
    cfg.validate()?;

    if args.print_config {
        print!("{}", toml::to_string_pretty(&cfg).context("serializing config")?);
        return Ok(());
    }
    info!(?cfg, "Sim config loaded");

    if args.batch {
        return run_batch(&cfg);
    }

    let feed = PoseFeed::default();
    let reporter = PoseReporter::spawn(
        feed.clone(),
        Duration::from_millis(cfg.run.report_interval_ms),
    )
    .context("spawning pose reporter")?;

    let mut app = build_sim_app(&cfg, feed)?;
    app.insert_resource(args);
    let exit = app.run();
    reporter.stop();
    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => bail!("app exited with code {code}"),
    }
}

fn run_batch(cfg: &Config) -> Result<()> {
    let Some(duration) = cfg.run.duration() else {
        bail!("--batch needs a run duration (--duration-s or run.duration_s)");
    };
    let frame = cfg
        .run
        .frame_period()
        .context("run.frame_hz gives no usable frame period")?;
    let mut sim = Simulation::new(cfg)?;
    let script = InputScript::new(cfg.script.clone());
    let stats = sim.run_scripted(&script, duration, frame);
    let pose = sim.pose();
    info!(
        ?stats,
        position = ?pose.position,
        orientation = ?pose.orientation,
        "batch run finished"
    );
    Ok(())
}
