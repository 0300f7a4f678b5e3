use std::path::Path;
use std::time::Duration;

use airframe::{AirframeSpec, ControlSpec, Envelope, Key};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Runner configuration. Every section is optional in the TOML file and
/// falls back to the reference quadrotor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub airframe: AirframeSpec,
    pub envelope: Envelope,
    pub timing: TimingConfig,
    pub control: ControlSpec,
    pub pose: PoseConfig,
    pub run: RunConfig,
    pub script: Vec<ScriptEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub dynamics_period_us: u64,
    pub control_period_us: u64,
    /// Delay of the first control deadline relative to the dynamics clock.
    pub control_phase_us: u64,
    /// Frame deltas above this are clamped before ticks are scheduled.
    pub max_frame_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            dynamics_period_us: 1_000,
            control_period_us: 10_000,
            control_phase_us: 0,
            max_frame_ms: 250,
        }
    }
}

impl TimingConfig {
    pub fn dynamics_period(&self) -> Duration {
        Duration::from_micros(self.dynamics_period_us)
    }

    pub fn control_period(&self) -> Duration {
        Duration::from_micros(self.control_period_us)
    }

    pub fn control_phase(&self) -> Duration {
        Duration::from_micros(self.control_phase_us)
    }

    pub fn max_frame(&self) -> Duration {
        Duration::from_millis(self.max_frame_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    pub visual_scale: f32,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self { visual_scale: 0.01 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Stop after this much simulated time. Runs forever when unset.
    pub duration_s: Option<f64>,
    /// Frame rate of the app loop driving the scheduler.
    pub frame_hz: f64,
    /// Period of the pose reporter thread.
    pub report_interval_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            duration_s: None,
            frame_hz: 60.0,
            report_interval_ms: 500,
        }
    }
}

impl RunConfig {
    /// `None` when unset or not representable as a `Duration`.
    pub fn duration(&self) -> Option<Duration> {
        self.duration_s.and_then(|s| Duration::try_from_secs_f64(s).ok())
    }

    /// `None` when `frame_hz` does not give a positive, representable period.
    pub fn frame_period(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(1.0 / self.frame_hz)
            .ok()
            .filter(|p| !p.is_zero())
    }
}

/// Keys held from `start_s` (inclusive) until `end_s` (exclusive), in
/// simulated seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub start_s: f64,
    pub end_s: f64,
    pub keys: Vec<Key>,
}

impl Config {
    /// Checks the runner-level settings. Physical and control parameters are
    /// validated by the `airframe` constructors.
    pub fn validate(&self) -> Result<()> {
        let t = &self.timing;
        if t.dynamics_period_us == 0 {
            bail!("timing.dynamics_period_us must be positive");
        }
        if t.control_period_us < t.dynamics_period_us {
            bail!(
                "timing.control_period_us ({}) must not be shorter than timing.dynamics_period_us ({})",
                t.control_period_us,
                t.dynamics_period_us
            );
        }
        if t.max_frame_ms == 0 {
            bail!("timing.max_frame_ms must be positive");
        }
        if !(self.run.frame_hz.is_finite() && self.run.frame_hz > 0.0) {
            bail!("run.frame_hz must be positive, got {}", self.run.frame_hz);
        }
        if self.run.frame_period().is_none() {
            bail!("run.frame_hz {} gives no usable frame period", self.run.frame_hz);
        }
        if let Some(d) = self.run.duration_s {
            if let Err(e) = Duration::try_from_secs_f64(d) {
                bail!("run.duration_s {d} is not a valid duration: {e}");
            }
        }
        for (i, entry) in self.script.iter().enumerate() {
            let ok = entry.start_s.is_finite()
                && entry.end_s.is_finite()
                && entry.start_s >= 0.0
                && entry.end_s > entry.start_s;
            if !ok {
                bail!(
                    "script[{i}]: need 0 <= start_s < end_s, got {}..{}",
                    entry.start_s,
                    entry.end_s
                );
            }
        }
        Ok(())
    }
}

pub fn parse_config(text: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(text).context("parsing config TOML")?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("loading config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use airframe::control::MixerMode;

    #[test]
    fn empty_file_gives_reference_defaults() {
        let cfg = parse_config("").expect("empty config is valid");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.timing.dynamics_period(), Duration::from_millis(1));
        assert_eq!(cfg.timing.control_period(), Duration::from_millis(10));
        assert!((cfg.airframe.omega_max - 66.0).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg = parse_config(
            r#"
            [airframe]
            mass = 1.2

            [control]
            mixer = "altitude_only"

            [control.gains.pitch]
            kp = 0.9
            kd = 0.1

            [[script]]
            start_s = 0.5
            end_s = 1.5
            keys = ["up", "yaw_left"]
            "#,
        )
        .expect("valid config");
        assert!((cfg.airframe.mass - 1.2).abs() < f32::EPSILON);
        assert!((cfg.airframe.gravity - 9.81).abs() < f32::EPSILON);
        assert_eq!(cfg.control.mixer, MixerMode::AltitudeOnly);
        assert!((cfg.control.gains.pitch.kp - 0.9).abs() < f32::EPSILON);
        assert!((cfg.control.gains.pitch.kd - 0.1).abs() < f32::EPSILON);
        assert!((cfg.control.gains.roll.kd - 0.05).abs() < f32::EPSILON);
        assert_eq!(cfg.script.len(), 1);
        assert_eq!(cfg.script[0].keys, vec![Key::Up, Key::YawLeft]);
    }

    #[test]
    fn rejects_control_faster_than_dynamics() {
        let err = parse_config(
            r#"
            [timing]
            dynamics_period_us = 2000
            control_period_us = 1000
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("control_period_us"), "{err:#}");
    }

    #[test]
    fn rejects_unrepresentable_duration() {
        for text in ["[run]\nduration_s = 1e20", "[run]\nduration_s = -1.0"] {
            let err = parse_config(text).unwrap_err();
            assert!(format!("{err:#}").contains("run.duration_s"), "{err:#}");
        }
        let cfg = parse_config("[run]\nduration_s = 2.5").expect("valid duration");
        assert_eq!(cfg.run.duration(), Some(Duration::from_millis(2500)));
    }

    #[test]
    fn rejects_frame_rate_with_zero_period() {
        let err = parse_config("[run]\nframe_hz = 1e10").unwrap_err();
        assert!(format!("{err:#}").contains("run.frame_hz"), "{err:#}");
        let err = parse_config("[run]\nframe_hz = 1e-30").unwrap_err();
        assert!(format!("{err:#}").contains("run.frame_hz"), "{err:#}");
        assert_eq!(
            Config::default().run.frame_period(),
            Some(Duration::from_secs_f64(1.0 / 60.0))
        );
    }

    #[test]
    fn rejects_backwards_script_entry() {
        let err = parse_config(
            r#"
            [[script]]
            start_s = 2.0
            end_s = 1.0
            keys = ["down"]
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("script[0]"), "{err:#}");
    }

    #[test]
    fn unknown_key_name_is_a_parse_error() {
        let res = parse_config(
            r#"
            [[script]]
            start_s = 0.0
            end_s = 1.0
            keys = ["sideways"]
            "#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn missing_file_mentions_path() {
        let err = load_config(Path::new("/nonexistent/quad.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/quad.toml"), "{err:#}");
    }
}
