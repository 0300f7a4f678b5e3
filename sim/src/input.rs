use std::collections::HashSet;
use std::time::Duration;

use airframe::{Key, KeyboardState};
use bevy::prelude::Resource;

use crate::config::ScriptEntry;

/// Keys currently held, as seen by the next control tick.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    held: HashSet<Key>,
}

impl KeyState {
    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

impl FromIterator<Key> for KeyState {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}

impl KeyboardState for KeyState {
    fn is_pressed(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

/// Timed key holds replayed against simulated time.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputScript {
    entries: Vec<ScriptEntry>,
}

impl InputScript {
    pub fn new(entries: Vec<ScriptEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union of keys from every entry active at `t`.
    pub fn keys_at(&self, t: Duration) -> KeyState {
        let s = t.as_secs_f64();
        self.entries
            .iter()
            .filter(|e| e.start_s <= s && s < e.end_s)
            .flat_map(|e| e.keys.iter().copied())
            .collect()
    }
}
