use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use airframe::Pose;
use bevy::prelude::Resource;
use parking_lot::RwLock;
use tracing::{info, warn};

/// Latest pose together with the simulated time it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSnapshot {
    pub pose: Pose,
    pub sim_time: Duration,
    pub dynamics_tick: u64,
}

/// Single-slot pose mailbox shared with render collaborators on other
/// threads. Readers always see a whole snapshot.
#[derive(Resource, Debug, Clone, Default)]
pub struct PoseFeed(Arc<RwLock<Option<PoseSnapshot>>>);

impl PoseFeed {
    pub fn publish(&self, snapshot: PoseSnapshot) {
        *self.0.write() = Some(snapshot);
    }

    pub fn latest(&self) -> Option<PoseSnapshot> {
        *self.0.read()
    }
}

/// Background thread that logs the latest published pose at a fixed
/// interval until stopped.
pub struct PoseReporter {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PoseReporter {
    pub fn spawn(feed: PoseFeed, interval: Duration) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = std::thread::Builder::new()
            .name("pose-reporter".into())
            .spawn(move || {
                let mut last_tick = None;
                while !stop_flag.load(Ordering::Relaxed) {
                    std::thread::sleep(interval);
                    let Some(snap) = feed.latest() else { continue };
                    if last_tick == Some(snap.dynamics_tick) {
                        continue;
                    }
                    last_tick = Some(snap.dynamics_tick);
                    report(&snap);
                }
            })?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            join_reporter(handle);
        }
    }
}

/// Returns false, after logging, when the thread panicked.
fn join_reporter(handle: JoinHandle<()>) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(_) => {
            warn!("pose reporter thread panicked");
            false
        }
    }
}

impl Drop for PoseReporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn report(snap: &PoseSnapshot) {
    let p = snap.pose.position;
    let o = snap.pose.orientation;
    info!(
        t = snap.sim_time.as_secs_f64(),
        tick = snap.dynamics_tick,
        x = p.x,
        y = p.y,
        z = p.z,
        pitch = o.x,
        yaw = o.y,
        roll = o.z,
        "pose"
    );
}
