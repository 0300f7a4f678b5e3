use std::time::Duration;

use airframe::{Key, KeyboardState};
use bevy::prelude::*;
use sim::config::ScriptEntry;
use sim::{Config, KeyState, PoseFeed, SimPlugin, Simulation};

fn advance_app(app: &mut App, dt: Duration) {
    if let Some(mut time) = app.world_mut().get_resource_mut::<Time>() {
        time.advance_by(dt);
    }
    app.update();
}

fn test_app(cfg: &Config, feed: PoseFeed) -> App {
    let mut app = App::new();
    app.insert_resource(Time::<()>::default());
    app.add_plugins(SimPlugin::new(cfg, feed).expect("valid config"));
    app
}

#[test]
fn app_publishes_pose_and_exits_at_run_limit() {
    let mut cfg = Config::default();
    cfg.run.duration_s = Some(0.5);
    let feed = PoseFeed::default();
    let mut app = test_app(&cfg, feed.clone());

    let frame = Duration::from_micros(16_667);
    let mut frames = 0;
    while app.should_exit().is_none() {
        assert!(frames < 40, "app did not stop at its run limit");
        advance_app(&mut app, frame);
        frames += 1;
    }
    assert_eq!(app.should_exit(), Some(AppExit::Success));

    let snap = feed.latest().expect("pose published");
    let sim = app.world().resource::<Simulation>();
    assert_eq!(snap.dynamics_tick, sim.stats().dynamics_ticks);
    assert!(snap.sim_time >= Duration::from_millis(500));
    assert!((snap.pose.position.y - 0.2).abs() < 1e-3, "{:?}", snap.pose.position);
}

#[test]
fn script_drives_key_state() {
    let mut cfg = Config::default();
    cfg.script = vec![ScriptEntry {
        start_s: 0.1,
        end_s: 0.3,
        keys: vec![Key::Up],
    }];
    let mut app = test_app(&cfg, PoseFeed::default());

    let frame = Duration::from_millis(50);
    advance_app(&mut app, frame);
    assert!(app.world().resource::<KeyState>().is_empty());
    advance_app(&mut app, frame);
    advance_app(&mut app, frame);
    assert!(app.world().resource::<KeyState>().is_pressed(Key::Up));
    for _ in 0..4 {
        advance_app(&mut app, frame);
    }
    assert!(app.world().resource::<KeyState>().is_empty());
}
