use airframe::control::{ControlSpec, MixerMode, NoKeys};
use airframe::{
    airframes::reference_quad_spec, ControlLoop, Envelope, Integrator, RigidBodyState, StepDebug,
    Vec3f,
};

const DT: f32 = 0.001;
const CONTROL_EVERY: usize = 10;

/// Run `ticks` dynamics ticks with a control tick before every tenth one.
/// Returns the final state and whether any reset fired.
fn fly(mode: MixerMode, start: RigidBodyState, ticks: usize) -> (RigidBodyState, bool) {
    let spec = reference_quad_spec();
    let integ = Integrator::new(&spec, Envelope::default(), DT).expect("valid spec");
    let control = ControlLoop::new(
        ControlSpec {
            mixer: mode,
            ..ControlSpec::default()
        },
        &spec,
    )
    .expect("valid control spec");

    let mut state = start;
    let mut cmd = control.hover_command();
    let mut last = StepDebug::default();
    let mut reset = false;
    for tick in 0..ticks {
        if tick % CONTROL_EVERY == 0 {
            control.tick(&NoKeys, &state, &last, &mut cmd);
        }
        reset |= integ.step_dbg(&cmd, &mut state, Some(&mut last)).is_reset();
    }
    (state, reset)
}

fn spinning_start() -> RigidBodyState {
    RigidBodyState {
        angular_velocity: Vec3f::new(0.3, 0.0, 0.0),
        ..RigidBodyState::hover(Vec3f::new(0.0, 0.2, 0.0))
    }
}

#[test]
fn full_mixer_arrests_a_pitch_rate() {
    let (state, reset) = fly(MixerMode::Full, spinning_start(), 1000);
    assert!(!reset, "closed-loop flight should stay inside the envelope");
    assert!(
        state.angular_velocity.x.abs() < 0.05,
        "pitch rate not arrested: {:?}",
        state.angular_velocity
    );
}

#[test]
fn altitude_only_mixer_leaves_pitch_rate_untouched() {
    let (state, reset) = fly(MixerMode::AltitudeOnly, spinning_start(), 100);
    assert!(!reset);
    assert!(
        (state.angular_velocity.x - 0.3).abs() < 1e-6,
        "open-loop pitch rate changed: {:?}",
        state.angular_velocity
    );
    assert!(state.orientation.x > 0.029, "orientation={:?}", state.orientation);
}

#[test]
fn idle_controller_holds_hover() {
    let start = RigidBodyState::hover(Vec3f::new(0.0, 0.2, 0.0));
    let (state, reset) = fly(MixerMode::Full, start, 3000);
    assert!(!reset);
    assert!((state.position - start.position).length() < 1e-3, "{:?}", state.position);
    assert_eq!(state.orientation, Vec3f::ZERO);
}
