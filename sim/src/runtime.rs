use std::time::Duration;

use airframe::control::{ControlOutcome, ControlReport};
use airframe::{
    ActuatorCommand, ControlLoop, Integrator, KeyboardState, Pose, PoseExport, ResetCause,
    RigidBodyState, StepDebug, StepOutcome,
};
use anyhow::{Context, Result};
use bevy::prelude::Resource;
use tracing::{debug, info, warn};

use crate::clock::FixedClock;
use crate::config::Config;
use crate::input::InputScript;
use crate::pose_feed::PoseSnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    pub dynamics_ticks: u64,
    pub control_ticks: u64,
    pub envelope_resets: u64,
    pub non_finite_resets: u64,
    pub rejected_commands: u64,
    pub clamped_frames: u64,
}

impl SimStats {
    pub fn resets(&self) -> u64 {
        self.envelope_resets + self.non_finite_resets
    }
}

/// Ticks run while consuming one frame delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub dynamics_ticks: u32,
    pub control_ticks: u32,
    pub resets: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tick {
    Control,
    Dynamics,
}

/// Owns the flight state and interleaves the control and dynamics ticks on
/// two fixed-period clocks.
///
/// Due ticks run in deadline order; when both fall on the same instant the
/// control tick runs first so the dynamics tick sees the fresh command.
#[derive(Resource, Debug, Clone)]
pub struct Simulation {
    integrator: Integrator,
    control: ControlLoop,
    pose: PoseExport,
    dynamics_clock: FixedClock,
    control_clock: FixedClock,
    max_frame: Duration,
    now: Duration,
    state: RigidBodyState,
    command: ActuatorCommand,
    last_step: StepDebug,
    last_control: Option<ControlReport>,
    stats: SimStats,
}

impl Simulation {
    pub fn new(cfg: &Config) -> Result<Self> {
        cfg.validate()?;
        let timing = &cfg.timing;
        let integrator = Integrator::new(
            &cfg.airframe,
            cfg.envelope,
            timing.dynamics_period().as_secs_f32(),
        )
        .context("invalid airframe or envelope")?;
        let control =
            ControlLoop::new(cfg.control, &cfg.airframe).context("invalid control settings")?;
        let pose = PoseExport::new(cfg.pose.visual_scale).context("invalid pose settings")?;
        info!(
            hover_omega = control.hover_omega(),
            dt = integrator.dt(),
            control_period = ?timing.control_period(),
            mixer = ?cfg.control.mixer,
            "simulation ready"
        );
        Ok(Self {
            state: integrator.hover_state(),
            command: control.hover_command(),
            dynamics_clock: FixedClock::new(timing.dynamics_period(), Duration::ZERO),
            control_clock: FixedClock::new(timing.control_period(), timing.control_phase()),
            max_frame: timing.max_frame(),
            now: Duration::ZERO,
            last_step: StepDebug::default(),
            last_control: None,
            stats: SimStats::default(),
            integrator,
            control,
            pose,
        })
    }

    /// Simulated time consumed so far.
    pub fn sim_time(&self) -> Duration {
        self.now
    }

    pub fn state(&self) -> &RigidBodyState {
        &self.state
    }

    pub fn command(&self) -> &ActuatorCommand {
        &self.command
    }

    pub fn last_step(&self) -> &StepDebug {
        &self.last_step
    }

    pub fn last_control(&self) -> Option<&ControlReport> {
        self.last_control.as_ref()
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn control_loop(&self) -> &ControlLoop {
        &self.control
    }

    pub fn pose(&self) -> Pose {
        self.pose.export(&self.state)
    }

    pub fn snapshot(&self) -> PoseSnapshot {
        PoseSnapshot {
            pose: self.pose(),
            sim_time: self.now,
            dynamics_tick: self.stats.dynamics_ticks,
        }
    }

    /// Consume `elapsed` frame time, running every tick that falls due.
    /// `keys` is polled by each control tick in this frame.
    pub fn advance(&mut self, elapsed: Duration, keys: &impl KeyboardState) -> FrameReport {
        let elapsed = if elapsed > self.max_frame {
            warn!(?elapsed, max = ?self.max_frame, "frame delta clamped");
            self.stats.clamped_frames += 1;
            self.max_frame
        } else {
            elapsed
        };
        self.now += elapsed;

        let mut report = FrameReport::default();
        while let Some(tick) = self.next_due() {
            match tick {
                Tick::Control => {
                    self.control_tick(keys);
                    report.control_ticks += 1;
                }
                Tick::Dynamics => {
                    if self.dynamics_tick().is_reset() {
                        report.resets += 1;
                    }
                    report.dynamics_ticks += 1;
                }
            }
        }
        report
    }

    /// Replay `script` for `duration` of simulated time in `frame` steps.
    /// A zero `frame` steps one dynamics period at a time.
    pub fn run_scripted(
        &mut self,
        script: &InputScript,
        duration: Duration,
        frame: Duration,
    ) -> SimStats {
        let frame = if frame.is_zero() {
            self.dynamics_clock.period()
        } else {
            frame
        };
        let end = self.now + duration;
        while self.now < end {
            let keys = script.keys_at(self.now);
            let step = frame.min(end - self.now);
            self.advance(step, &keys);
        }
        self.stats
    }

    fn next_due(&self) -> Option<Tick> {
        let control = self.control_clock.is_due(self.now);
        let dynamics = self.dynamics_clock.is_due(self.now);
        match (control, dynamics) {
            (false, false) => None,
            (true, false) => Some(Tick::Control),
            (false, true) => Some(Tick::Dynamics),
            (true, true) => {
                if self.control_clock.next_due() <= self.dynamics_clock.next_due() {
                    Some(Tick::Control)
                } else {
                    Some(Tick::Dynamics)
                }
            }
        }
    }

    fn control_tick(&mut self, keys: &impl KeyboardState) {
        self.control_clock.fire();
        self.stats.control_ticks += 1;
        let report = self
            .control
            .tick(keys, &self.state, &self.last_step, &mut self.command);
        if report.outcome == ControlOutcome::Rejected {
            self.stats.rejected_commands += 1;
            warn!(
                tick = self.stats.control_ticks,
                corrections = ?report.corrections,
                "non-finite rotor command rejected, previous command kept"
            );
        }
        self.last_control = Some(report);
    }

    fn dynamics_tick(&mut self) -> StepOutcome {
        self.dynamics_clock.fire();
        self.stats.dynamics_ticks += 1;
        let outcome =
            self.integrator
                .step_dbg(&self.command, &mut self.state, Some(&mut self.last_step));
        if let StepOutcome::Reset(cause) = outcome {
            match cause {
                ResetCause::Envelope => self.stats.envelope_resets += 1,
                ResetCause::NonFinite => self.stats.non_finite_resets += 1,
            }
            debug!(tick = self.stats.dynamics_ticks, ?cause, "state reset to hover");
        }
        outcome
    }
}
