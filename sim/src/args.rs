use std::path::PathBuf;

use bevy::prelude::Resource;
use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug, Resource, Clone)]
#[command(name = "quadsim")]
#[command(about = "Headless quadrotor flight simulator", long_about = None)]
pub struct Args {
    /// TOML config file; reference quadrotor defaults when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Stop after this many simulated seconds (overrides run.duration_s)
    #[arg(long)]
    pub duration_s: Option<f64>,
    /// App loop frame rate (overrides run.frame_hz)
    #[arg(long)]
    pub frame_hz: Option<f64>,
    /// Replay the script as fast as possible instead of in real time
    #[arg(long, default_value_t = false)]
    pub batch: bool,
    /// Print the effective config as TOML and exit
    #[arg(long, default_value_t = false)]
    pub print_config: bool,
}

impl Args {
    /// Fold command-line overrides into a loaded config.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(d) = self.duration_s {
            cfg.run.duration_s = Some(d);
        }
        if let Some(hz) = self.frame_hz {
            cfg.run.frame_hz = hz;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let args = Args::parse_from(["quadsim", "--duration-s", "3.5", "--frame-hz", "120"]);
        let mut cfg = Config::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.run.duration_s, Some(3.5));
        assert!((cfg.run.frame_hz - 120.0).abs() < f64::EPSILON);
        assert!(!args.batch);
    }

    #[test]
    fn absent_flags_keep_config() {
        let args = Args::parse_from(["quadsim"]);
        let mut cfg = Config::default();
        cfg.run.duration_s = Some(9.0);
        args.apply(&mut cfg);
        assert_eq!(cfg.run.duration_s, Some(9.0));
    }
}
