use glam::{Quat, Vec3A};

use crate::constraint::{apply_preference, constrain_to_cone, ConeConstraint, ConeSection, DirectionalPreference};
use crate::math::{look_rotation, Frame};

/// How a joint picks its up vector when orienting toward its downstream
/// neighbor.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpFacing {
    /// Reuse the upstream frame's up vector.
    #[default]
    MatchUpstream,
    /// Blend between the downstream and the upstream up vector.
    Interpolate { toward_upstream: f32 },
    /// A fixed world-space up vector.
    Override(Vec3A),
}

/// One link of a FABRIK chain, sitting at the distal end of its upstream
/// link.
///
/// A joint carries only data: its committed world pose, the fixed distances
/// to its neighbors, and its constraint configuration. All behavior switches
/// (cone on/off, preference on/off, up-facing policy) are plain fields, every
/// joint shares this one concrete type.
#[derive(Debug, Clone)]
pub struct FabrikJoint {
    position: Vec3A,
    rotation: Quat,
    weight: f32,
    constrain_rotation: bool,
    cone: ConeConstraint,
    preference: Option<DirectionalPreference>,
    up_facing: UpFacing,
    upstream_distance: f32,
    downstream_distance: f32,
    section: ConeSection,
}

impl Default for FabrikJoint {
    fn default() -> FabrikJoint {
        return FabrikJoint {
            position: Vec3A::ZERO,
            rotation: Quat::IDENTITY,
            weight: 1.0,
            constrain_rotation: false,
            cone: ConeConstraint::default(),
            preference: None,
            up_facing: UpFacing::default(),
            // non-zero placeholders until the chain runs setup
            upstream_distance: 1.0,
            downstream_distance: 1.0,
            section: ConeSection::default(),
        };
    }
}

impl FabrikJoint {
    /// A joint at its rest position with default configuration.
    pub fn new(position: Vec3A) -> FabrikJoint {
        return FabrikJoint {
            position,
            ..FabrikJoint::default()
        };
    }

    #[inline]
    pub fn position(&self) -> Vec3A {
        return self.position;
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        return self.rotation;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    #[inline]
    pub fn weight(&self) -> f32 {
        return self.weight;
    }

    /// Damping factor in `[0, 1]`. 1 is fully responsive, values toward 0
    /// make the joint sluggish.
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight.clamp(0.0, 1.0);
    }

    #[inline]
    pub fn constrain_rotation(&self) -> bool {
        return self.constrain_rotation;
    }

    pub fn set_constrain_rotation(&mut self, enabled: bool) {
        self.constrain_rotation = enabled;
    }

    #[inline]
    pub fn cone(&self) -> &ConeConstraint {
        return &self.cone;
    }

    /// Replaces the cone half-angles and rebuilds the cached cross section.
    pub fn set_cone(&mut self, cone: ConeConstraint) {
        self.cone = cone;
        self.section = ConeSection::new(&self.cone, self.downstream_distance);
    }

    #[inline]
    pub fn preference(&self) -> Option<&DirectionalPreference> {
        return self.preference.as_ref();
    }

    pub fn set_preference(&mut self, preference: Option<DirectionalPreference>) {
        self.preference = preference;
    }

    #[inline]
    pub fn up_facing(&self) -> UpFacing {
        return self.up_facing;
    }

    pub fn set_up_facing(&mut self, up_facing: UpFacing) {
        self.up_facing = up_facing;
    }

    #[inline]
    pub fn upstream_distance(&self) -> f32 {
        return self.upstream_distance;
    }

    #[inline]
    pub fn downstream_distance(&self) -> f32 {
        return self.downstream_distance;
    }

    /// Caches the distance to the upstream neighbor from the joints' rest
    /// placement. Called by the chain at assembly.
    pub fn setup_upstream(&mut self, upstream_position: Vec3A) {
        self.upstream_distance = (upstream_position - self.position).length();
    }

    /// Caches the downstream link length and rebuilds the cone cross
    /// section, which scales with it. Must be called again whenever the
    /// link geometry changes.
    pub fn setup_downstream(&mut self, downstream_distance: f32) {
        self.downstream_distance = downstream_distance;
        self.section = ConeSection::new(&self.cone, self.downstream_distance);
    }

    /// Applies this joint's constraints to a candidate position for its
    /// downstream neighbor.
    ///
    /// The soft directional preference runs first, the hard cone limit
    /// second, so the cone has the final say. `joint_position` is the
    /// joint's position in the running pass, `upstream` the frame the cone
    /// and preference are defined against.
    pub fn constrain_downstream_point(&self, candidate: Vec3A, joint_position: Vec3A, upstream: &Frame) -> Vec3A {
        let mut constrained = candidate;

        if let Some(preference) = &self.preference {
            constrained = apply_preference(
                constrained,
                joint_position,
                upstream,
                preference,
                self.downstream_distance,
                self.section.largest_delta,
            );
        }

        if self.constrain_rotation {
            constrained = constrain_to_cone(
                constrained,
                joint_position,
                upstream,
                self.downstream_distance,
                &self.section,
            );
        }

        return constrained;
    }

    /// Writes a solved world position.
    pub fn assign_position(&mut self, position: Vec3A) {
        self.position = position;
    }

    /// Orients the joint toward `point`, picking the up vector per the
    /// joint's up-facing policy.
    pub fn look_at(&mut self, point: Vec3A, upstream_up: Vec3A, downstream_up: Vec3A) {
        let up = match self.up_facing {
            UpFacing::MatchUpstream => upstream_up,
            UpFacing::Interpolate { toward_upstream } => downstream_up.lerp(upstream_up, toward_upstream),
            UpFacing::Override(up) => up,
        };
        self.rotation = look_rotation(point - self.position, up);
    }
}
