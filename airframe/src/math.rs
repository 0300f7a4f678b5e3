//! Frame math shared by the integrator and the pose export.
//!
//! Storage types are Bevy's glam re-exports. The helpers here pin down the
//! axis and composition conventions so every caller builds the same rotation.
//!
//! Frame conventions:
//! - Body axes: +Y up (thrust axis), -Z forward, +X right.
//! - World axes: +Y up, gravity along -Y.
//! - `orientation` holds intrinsic angles about body X (pitch), Y (yaw) and
//!   Z (roll), applied in that order.

pub use bevy_math::{Mat3 as Mat3f, Mat4 as Mat4f, Vec3 as Vec3f};

#[inline]
pub fn rot_x(angle: f32) -> Mat3f {
    Mat3f::from_rotation_x(angle)
}

#[inline]
pub fn rot_y(angle: f32) -> Mat3f {
    Mat3f::from_rotation_y(angle)
}

#[inline]
pub fn rot_z(angle: f32) -> Mat3f {
    Mat3f::from_rotation_z(angle)
}

/// Rotation taking body-frame vectors into the world frame.
///
/// Composition is `Rx(pitch) · Ry(yaw) · Rz(roll)`. Matrix products do not
/// commute, so this is the only place the order is spelled out.
#[inline]
pub fn world_from_body(orientation: Vec3f) -> Mat3f {
    rot_x(orientation.x) * rot_y(orientation.y) * rot_z(orientation.z)
}

/// Inverse of [`world_from_body`]. Rotations are orthonormal, so this is the
/// transpose.
#[inline]
pub fn body_from_world(orientation: Vec3f) -> Mat3f {
    world_from_body(orientation).transpose()
}

#[inline]
pub fn diag(v: Vec3f) -> Mat3f {
    Mat3f::from_diagonal(v)
}

/// Closed-form 3×3 inverse. Returns `None` for singular or non-finite input
/// instead of producing infinities.
pub fn try_inverse(m: Mat3f) -> Option<Mat3f> {
    if !m.is_finite() {
        return None;
    }
    let det = m.determinant();
    if !det.is_finite() || det.abs() <= f32::EPSILON * max_abs_element(m).powi(3) {
        return None;
    }
    let inv = m.inverse();
    inv.is_finite().then_some(inv)
}

fn max_abs_element(m: Mat3f) -> f32 {
    m.x_axis
        .abs()
        .max_element()
        .max(m.y_axis.abs().max_element())
        .max(m.z_axis.abs().max_element())
}

/// Translate, rotate (same composition as the integrator), then scale.
pub fn model_matrix(position: Vec3f, orientation: Vec3f, scale: f32) -> Mat4f {
    Mat4f::from_translation(position)
        * Mat4f::from_mat3(world_from_body(orientation))
        * Mat4f::from_scale(Vec3f::splat(scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIENTATIONS: [Vec3f; 5] = [
        Vec3f::new(0.0, 0.0, 0.0),
        Vec3f::new(0.3, -1.2, 0.7),
        Vec3f::new(-2.5, 0.4, 3.0),
        Vec3f::new(1.5707964, 0.0, -0.2),
        Vec3f::new(10.0, -7.5, 4.25),
    ];

    #[test]
    fn rotation_times_transpose_is_identity() {
        for o in ORIENTATIONS {
            let r = world_from_body(o);
            let prod = r * body_from_world(o);
            assert!(
                prod.abs_diff_eq(Mat3f::IDENTITY, 1e-5),
                "R·Rᵀ not identity for {o:?}: {prod:?}"
            );
            let inv = try_inverse(r).expect("rotation is invertible");
            assert!(inv.abs_diff_eq(r.transpose(), 1e-5));
        }
    }

    #[test]
    fn pitch_then_yaw_differs_from_yaw_then_pitch() {
        let a = rot_x(0.5) * rot_y(0.5);
        let b = rot_y(0.5) * rot_x(0.5);
        assert!(!a.abs_diff_eq(b, 1e-3));
        assert!(world_from_body(Vec3f::new(0.5, 0.5, 0.0)).abs_diff_eq(a, 1e-6));
    }

    #[test]
    fn positive_yaw_turns_nose_left() {
        let nose = world_from_body(Vec3f::new(0.0, 0.2, 0.0)) * Vec3f::NEG_Z;
        assert!(nose.x < 0.0, "nose={nose:?}");
    }

    #[test]
    fn diagonal_inverse_is_reciprocal() {
        let i = diag(Vec3f::new(0.0121, 0.0223, 0.0119));
        let inv = try_inverse(i).expect("diagonal inertia is invertible");
        let expected = diag(Vec3f::new(1.0 / 0.0121, 1.0 / 0.0223, 1.0 / 0.0119));
        assert!(inv.abs_diff_eq(expected, 1e-2));
        assert!((i * inv).abs_diff_eq(Mat3f::IDENTITY, 1e-5));
    }

    #[test]
    fn singular_and_non_finite_inverse_fail() {
        assert!(try_inverse(diag(Vec3f::new(1.0, 0.0, 1.0))).is_none());
        assert!(try_inverse(Mat3f::ZERO).is_none());
        assert!(try_inverse(diag(Vec3f::new(1.0, f32::NAN, 1.0))).is_none());
    }

    #[test]
    fn model_matrix_places_origin_at_position() {
        let p = Vec3f::new(0.1, 0.2, -0.3);
        let m = model_matrix(p, Vec3f::new(0.4, 0.1, -0.2), 0.01);
        let origin = m.transform_point3(Vec3f::ZERO);
        assert!((origin - p).length() < 1e-6);
        let up = m.transform_vector3(Vec3f::Y);
        assert!((up.length() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn rotation_is_bit_reproducible() {
        let o = Vec3f::new(0.31, -0.77, 1.9);
        assert_eq!(world_from_body(o), world_from_body(o));
    }
}
