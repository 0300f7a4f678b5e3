use serde::{Deserialize, Serialize};

use crate::airframe_spec::{positive, SpecError};
use crate::flight::RigidBodyState;
use crate::math::{model_matrix, Mat4f, Vec3f};

/// Snapshot handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3f,
    pub orientation: Vec3f,
    /// World-from-body model matrix including the visual scale.
    pub model: Mat4f,
}

/// Read-only projection of the rigid-body state for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseExport {
    visual_scale: f32,
}

impl PoseExport {
    pub fn new(visual_scale: f32) -> Result<Self, SpecError> {
        Ok(Self {
            visual_scale: positive("visual_scale", visual_scale)?,
        })
    }

    pub fn export(&self, state: &RigidBodyState) -> Pose {
        Pose {
            position: state.position,
            orientation: state.orientation,
            model: model_matrix(state.position, state.orientation, self.visual_scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_pose_is_translation_times_scale() {
        let export = PoseExport::new(0.01).expect("positive scale");
        let state = RigidBodyState::hover(Vec3f::new(0.0, 0.2, 0.0));
        let pose = export.export(&state);
        let expected = Mat4f::from_translation(Vec3f::new(0.0, 0.2, 0.0))
            * Mat4f::from_scale(Vec3f::splat(0.01));
        assert!(pose.model.abs_diff_eq(expected, 1e-7), "{:?}", pose.model);
        assert_eq!(pose.position, state.position);
    }

    #[test]
    fn export_does_not_touch_state() {
        let export = PoseExport::new(0.05).expect("positive scale");
        let state = RigidBodyState {
            position: Vec3f::new(0.3, 0.1, -0.2),
            linear_velocity: Vec3f::new(1.0, 0.0, 0.0),
            orientation: Vec3f::new(0.2, -0.4, 0.1),
            angular_velocity: Vec3f::new(0.0, 0.3, 0.0),
        };
        let before = state;
        let a = export.export(&state);
        let b = export.export(&state);
        assert_eq!(a, b);
        assert_eq!(state, before);
    }

    #[test]
    fn rejects_non_positive_scale() {
        assert!(PoseExport::new(0.0).is_err());
        assert!(PoseExport::new(f32::NAN).is_err());
    }
}
