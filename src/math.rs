//!
//! Pose and reference frame math.
//!

use glam::{Mat3, Quat, Vec3, Vec3A};

/// A world-space position and orientation pair.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: Vec3A,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3A::ZERO,
        rotation: Quat::IDENTITY,
    };

    #[inline]
    pub fn new(position: Vec3A, rotation: Quat) -> Pose {
        return Pose { position, rotation };
    }

    #[inline]
    pub fn from_position(position: Vec3A) -> Pose {
        return Pose {
            position,
            rotation: Quat::IDENTITY,
        };
    }

    #[inline]
    pub fn right(&self) -> Vec3A {
        return self.rotation * Vec3A::X;
    }

    #[inline]
    pub fn up(&self) -> Vec3A {
        return self.rotation * Vec3A::Y;
    }

    #[inline]
    pub fn forward(&self) -> Vec3A {
        return self.rotation * Vec3A::Z;
    }
}

/// Orthonormal basis of a joint frame. Forward is the axis constraint cones
/// open around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub right: Vec3A,
    pub up: Vec3A,
    pub forward: Vec3A,
}

impl Frame {
    #[inline]
    pub fn from_rotation(rotation: Quat) -> Frame {
        return Frame {
            right: rotation * Vec3A::X,
            up: rotation * Vec3A::Y,
            forward: rotation * Vec3A::Z,
        };
    }

    /// Rotates a direction expressed in this frame into world space.
    #[inline]
    pub fn transform_direction(&self, v: Vec3A) -> Vec3A {
        return self.right * v.x + self.up * v.y + self.forward * v.z;
    }
}

/// Removes from `v` its component along the plane normal `n`. `n` must be
/// unit length.
#[inline]
pub fn project_on_plane(v: Vec3A, n: Vec3A) -> Vec3A {
    return v - n * v.dot(n);
}

/// Builds the rotation pointing local +Z along `forward` with local +Y as
/// close to `up` as orthonormality allows.
///
/// Falls back to a world axis when `up` and `forward` are colinear, and to
/// identity when `forward` has no length.
pub fn look_rotation(forward: Vec3A, up: Vec3A) -> Quat {
    let f = forward.normalize_or_zero();
    if f == Vec3A::ZERO {
        return Quat::IDENTITY;
    }
    let mut right = up.cross(f);
    if right.length_squared() < 1e-12 {
        right = Vec3A::Y.cross(f);
    }
    if right.length_squared() < 1e-12 {
        right = Vec3A::X.cross(f);
    }
    let right = right.normalize();
    let u = f.cross(right);
    return Quat::from_mat3(&Mat3::from_cols(Vec3::from(right), Vec3::from(u), Vec3::from(f)));
}

#[cfg(test)]
mod math_tests {
    use super::*;

    #[test]
    fn test_pose_axes() {
        let pose = Pose::IDENTITY;
        assert!(pose.right().abs_diff_eq(Vec3A::X, 1e-6));
        assert!(pose.up().abs_diff_eq(Vec3A::Y, 1e-6));
        assert!(pose.forward().abs_diff_eq(Vec3A::Z, 1e-6));

        let pose = Pose::new(Vec3A::ZERO, Quat::from_rotation_y(core::f32::consts::FRAC_PI_2));
        assert!(pose.forward().abs_diff_eq(Vec3A::X, 1e-6));
    }

    #[test]
    fn test_frame_transform_direction() {
        let frame = Frame::from_rotation(Quat::from_rotation_y(core::f32::consts::FRAC_PI_2));
        let world = frame.transform_direction(Vec3A::new(0.0, 0.0, 1.0));
        assert!(world.abs_diff_eq(Vec3A::X, 1e-6));

        let frame = Frame::from_rotation(Quat::IDENTITY);
        let v = Vec3A::new(0.3, -0.7, 1.2);
        assert!(frame.transform_direction(v).abs_diff_eq(v, 1e-6));
    }

    #[test]
    fn test_project_on_plane() {
        let v = Vec3A::new(1.0, 2.0, 3.0);
        let projected = project_on_plane(v, Vec3A::Z);
        assert!(projected.abs_diff_eq(Vec3A::new(1.0, 2.0, 0.0), 1e-6));
        assert!(projected.dot(Vec3A::Z).abs() < 1e-6);
    }

    #[test]
    fn test_look_rotation_axes() {
        let rotation = look_rotation(Vec3A::X, Vec3A::Y);
        assert!((rotation * Vec3A::Z).abs_diff_eq(Vec3A::X, 1e-6));
        assert!((rotation * Vec3A::Y).abs_diff_eq(Vec3A::Y, 1e-6));

        let rotation = look_rotation(Vec3A::new(0.0, 0.0, 2.5), Vec3A::Y);
        assert!((rotation * Vec3A::Z).abs_diff_eq(Vec3A::Z, 1e-6));
    }

    #[test]
    fn test_look_rotation_skew_up() {
        // up gets orthonormalized against forward
        let rotation = look_rotation(Vec3A::X, Vec3A::new(1.0, 1.0, 0.0).normalize());
        let f = rotation * Vec3A::Z;
        let u = rotation * Vec3A::Y;
        assert!(f.abs_diff_eq(Vec3A::X, 1e-6));
        assert!(u.dot(f).abs() < 1e-6);
        assert!(u.abs_diff_eq(Vec3A::Y, 1e-5));
    }

    #[test]
    fn test_look_rotation_degenerate() {
        assert_eq!(look_rotation(Vec3A::ZERO, Vec3A::Y), Quat::IDENTITY);

        // up colinear with forward falls back to a world axis
        let rotation = look_rotation(Vec3A::Y, Vec3A::Y);
        assert!((rotation * Vec3A::Z).abs_diff_eq(Vec3A::Y, 1e-6));
        assert!(rotation.is_normalized());
    }
}
