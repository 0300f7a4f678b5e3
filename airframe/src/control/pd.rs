use serde::{Deserialize, Serialize};

use crate::airframe_spec::{non_negative, SpecError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdGains {
    pub kp: f32,
    pub kd: f32,
}

impl PdGains {
    pub const fn new(kp: f32, kd: f32) -> Self {
        Self { kp, kd }
    }

    pub(crate) fn validate(&self, axis: &'static str) -> Result<(), SpecError> {
        non_negative(axis, self.kp)?;
        non_negative(axis, self.kd)?;
        Ok(())
    }

    /// `kp·(v_des − v) + kd·(a_des − a)`
    #[inline]
    pub fn correction(&self, desired_vel: f32, vel: f32, desired_acc: f32, acc: f32) -> f32 {
        self.kp * (desired_vel - vel) + self.kd * (desired_acc - acc)
    }
}
