use glam::Vec3A;

use crate::base::{
    DEFAULT_CONE_HALF_ANGLE, DEFAULT_SPRING_STRENGTH, MAX_CONE_HALF_ANGLE, MAX_SPRING_STRENGTH, MIN_CONE_SEMI_AXIS,
};
use crate::ellipse::nearest_point_on_ellipse;
use crate::math::{project_on_plane, Frame};

/// Conic angular limits around the upstream forward axis.
///
/// Each half-angle is the allowed deviation, in degrees, toward one cardinal
/// direction of the upstream frame. Asymmetric values stitch four
/// quarter-ellipses into one continuous boundary, so a joint can for example
/// swing wider sideways than it lifts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConeConstraint {
    up: f32,
    down: f32,
    left: f32,
    right: f32,
}

impl Default for ConeConstraint {
    fn default() -> ConeConstraint {
        return ConeConstraint::symmetric(DEFAULT_CONE_HALF_ANGLE);
    }
}

impl ConeConstraint {
    /// Half-angles in degrees. Signs are folded away and values cap just
    /// below 90 degrees.
    pub fn new(up: f32, down: f32, left: f32, right: f32) -> ConeConstraint {
        return ConeConstraint {
            up: up.abs().min(MAX_CONE_HALF_ANGLE),
            down: down.abs().min(MAX_CONE_HALF_ANGLE),
            left: left.abs().min(MAX_CONE_HALF_ANGLE),
            right: right.abs().min(MAX_CONE_HALF_ANGLE),
        };
    }

    /// The same half-angle on all four cardinal directions.
    pub fn symmetric(half_angle: f32) -> ConeConstraint {
        return ConeConstraint::new(half_angle, half_angle, half_angle, half_angle);
    }

    #[inline]
    pub fn up(&self) -> f32 {
        return self.up;
    }

    #[inline]
    pub fn down(&self) -> f32 {
        return self.down;
    }

    #[inline]
    pub fn left(&self) -> f32 {
        return self.left;
    }

    #[inline]
    pub fn right(&self) -> f32 {
        return self.right;
    }
}

/// Cached semi-axes of the cone's elliptical cross section at the downstream
/// link distance. Scale-dependent, must be rebuilt whenever the link distance
/// or the half-angles change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ConeSection {
    pub top: f32,
    pub bottom: f32,
    pub right: f32,
    pub left: f32,
    /// Widest opposing-axis span, normalizes the preference spring.
    pub largest_delta: f32,
}

impl Default for ConeSection {
    fn default() -> ConeSection {
        return ConeSection::new(&ConeConstraint::default(), 1.0);
    }
}

impl ConeSection {
    pub fn new(cone: &ConeConstraint, downstream_distance: f32) -> ConeSection {
        let top = cone_semi_axis(downstream_distance, cone.up);
        let bottom = cone_semi_axis(downstream_distance, cone.down);
        let right = cone_semi_axis(downstream_distance, cone.right);
        let left = cone_semi_axis(downstream_distance, cone.left);
        return ConeSection {
            top,
            bottom,
            right,
            left,
            largest_delta: f32::max(top + bottom, left + right),
        };
    }
}

fn cone_semi_axis(distance: f32, half_angle_deg: f32) -> f32 {
    return (distance * half_angle_deg.to_radians().tan()).max(MIN_CONE_SEMI_AXIS);
}

/// Soft spring bias toward a preferred local forward direction.
///
/// Non-committing: the spring only nudges an offered candidate, it never
/// replaces it. Hard cone limits are a separate concern.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionalPreference {
    local_forward: Vec3A,
    strength: f32,
}

impl Default for DirectionalPreference {
    fn default() -> DirectionalPreference {
        return DirectionalPreference {
            local_forward: Vec3A::Z,
            strength: DEFAULT_SPRING_STRENGTH,
        };
    }
}

impl DirectionalPreference {
    /// `local_forward` is normalized, zero length falls back to +Z. Strength
    /// is clamped to `[0, MAX_SPRING_STRENGTH]`.
    pub fn new(local_forward: Vec3A, strength: f32) -> DirectionalPreference {
        let mut local_forward = local_forward.normalize_or_zero();
        if local_forward == Vec3A::ZERO {
            local_forward = Vec3A::Z;
        }
        return DirectionalPreference {
            local_forward,
            strength: strength.clamp(0.0, MAX_SPRING_STRENGTH),
        };
    }

    #[inline]
    pub fn local_forward(&self) -> Vec3A {
        return self.local_forward;
    }

    #[inline]
    pub fn strength(&self) -> f32 {
        return self.strength;
    }
}

/// Clamps `candidate` into the constraint cone anchored at `joint_position`
/// and opened around `upstream.forward`.
///
/// Candidates behind the frame are treated as maximally out of bounds and
/// land on the nearest forward-hemisphere boundary point.
pub(crate) fn constrain_to_cone(
    candidate: Vec3A,
    joint_position: Vec3A,
    upstream: &Frame,
    downstream_distance: f32,
    section: &ConeSection,
) -> Vec3A {
    let direction = candidate - joint_position;

    // signed axial reach along the cone axis
    let mut h = direction.dot(upstream.forward);
    let planar = project_on_plane(direction, upstream.forward);

    let mut inside_front = true;
    if h < 0.0 {
        h = -h;
        inside_front = false;
    }

    let x_part = planar.dot(upstream.right);
    let y_part = planar.dot(upstream.up);

    // cross-section scale at the candidate's axial distance
    let scale = (h / downstream_distance).max(f32::EPSILON);

    // the quadrant selects which quarter-ellipse bounds the candidate
    let x_bound = scale * if x_part > 0.0 { section.right } else { section.left };
    let y_bound = scale * if y_part > 0.0 { section.top } else { section.bottom };

    let ellipse = (x_part * x_part) / (x_bound * x_bound) + (y_part * y_part) / (y_bound * y_bound);
    if ellipse <= 1.0 && inside_front {
        return candidate;
    }

    let nearest = nearest_point_on_ellipse(x_bound, y_bound, x_part.abs(), y_part.abs());
    let dx = nearest.x.copysign(x_part);
    let dy = nearest.y.copysign(y_part);

    // rebuild at the same axial reach, then extend to the link length
    let adjusted = Vec3A::new(dx, dy, h).normalize_or_zero() * downstream_distance;
    return upstream.transform_direction(adjusted) + joint_position;
}

/// Nudges `candidate` toward the joint's preferred forward direction.
///
/// Only candidates in front of the frame are affected. The pull scales with
/// the joint-to-candidate distance normalized by `largest_delta`, the widest
/// angular excursion the cone allows, so behavior is comparable across
/// differently sized cones.
pub(crate) fn apply_preference(
    candidate: Vec3A,
    joint_position: Vec3A,
    upstream: &Frame,
    preference: &DirectionalPreference,
    downstream_distance: f32,
    largest_delta: f32,
) -> Vec3A {
    let direction = candidate - joint_position;

    let h = direction.dot(upstream.forward);
    if h <= 0.0 {
        return candidate;
    }

    let planar = project_on_plane(direction, upstream.forward);
    let scale = h / downstream_distance;

    // preferred direction at the candidate's axial reach
    let preferred = upstream.transform_direction(preference.local_forward * downstream_distance) * scale;
    let preferred_planar = project_on_plane(preferred, upstream.forward);

    let spring = (preferred_planar - planar) * preference.strength;
    let traveled = (joint_position - candidate).length() / largest_delta;

    return candidate + spring * traveled;
}
