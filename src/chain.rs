use glam::Vec3A;

use crate::base::{
    FabrikError, DEFAULT_LOCATION_TOLERANCE, DEFAULT_MAX_ITERATIONS, DEFAULT_ORIENTATION_TOLERANCE, MIN_LINK_LENGTH,
};
use crate::joint::FabrikJoint;
use crate::math::{Frame, Pose};

/// An articulated chain of joints solved toward a target pose with the
/// FABRIK algorithm.
///
/// The first joint is the base link and stays pinned to the root pose. Link
/// lengths are measured from the joints' placement at construction and are
/// preserved exactly by the backward and forward passes; constraints and
/// per-joint damping only ever redirect links, never stretch them.
///
/// Solving runs to completion within one call, bounded by the iteration
/// cap. A chain that cannot reach its target simply stops short, which is
/// expected behavior rather than an error.
#[derive(Debug, Clone)]
pub struct FabrikChain {
    root: Pose,
    target: Pose,
    joints: Vec<FabrikJoint>,
    positions: Vec<Vec3A>,
    location_tolerance: f32,
    orientation_tolerance: f32,
    match_target_orientation: bool,
    max_iterations: u32,

    iterations: u32,
    reached: bool,
}

impl FabrikChain {
    /// Assembles a chain from a root pose and at least two joints placed at
    /// their rest positions.
    ///
    /// Link lengths are captured here: each joint caches the distance to its
    /// upstream neighbor, and each joint but the last caches its downstream
    /// link length together with the constraint cone cross section derived
    /// from it.
    pub fn new(root: Pose, mut joints: Vec<FabrikJoint>) -> Result<FabrikChain, FabrikError> {
        if joints.len() < 2 {
            return Err(FabrikError::ChainTooShort);
        }

        joints[0].setup_upstream(root.position);
        for i in 1..joints.len() {
            let upstream_position = joints[i - 1].position();
            joints[i].setup_upstream(upstream_position);
            if joints[i].upstream_distance() < MIN_LINK_LENGTH {
                return Err(FabrikError::DegenerateLink);
            }
        }
        for i in 0..joints.len() - 1 {
            let downstream_distance = joints[i + 1].upstream_distance();
            joints[i].setup_downstream(downstream_distance);
        }

        let end = &joints[joints.len() - 1];
        let target = Pose::new(end.position(), end.rotation());
        let positions = Vec::with_capacity(joints.len());

        return Ok(FabrikChain {
            root,
            target,
            joints,
            positions,
            location_tolerance: DEFAULT_LOCATION_TOLERANCE,
            orientation_tolerance: DEFAULT_ORIENTATION_TOLERANCE,
            match_target_orientation: false,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            iterations: 0,
            reached: false,
        });
    }

    #[inline]
    pub fn root(&self) -> Pose {
        return self.root;
    }

    /// Moves the base anchor. Takes effect at the next pass.
    pub fn set_root(&mut self, root: Pose) {
        self.root = root;
    }

    #[inline]
    pub fn target(&self) -> Pose {
        return self.target;
    }

    /// Re-targets the chain, typically once per simulation tick.
    pub fn set_target(&mut self, target: Pose) {
        self.target = target;
    }

    #[inline]
    pub fn joints(&self) -> &[FabrikJoint] {
        return &self.joints;
    }

    #[inline]
    pub fn joints_mut(&mut self) -> &mut [FabrikJoint] {
        return &mut self.joints;
    }

    /// The solved position sequence of the last pass, base first.
    #[inline]
    pub fn positions(&self) -> &[Vec3A] {
        return &self.positions;
    }

    #[inline]
    pub fn location_tolerance(&self) -> f32 {
        return self.location_tolerance;
    }

    pub fn set_location_tolerance(&mut self, tolerance: f32) {
        self.location_tolerance = tolerance.max(0.0);
    }

    #[inline]
    pub fn max_iterations(&self) -> u32 {
        return self.max_iterations;
    }

    pub fn set_max_iterations(&mut self, max_iterations: u32) {
        self.max_iterations = max_iterations;
    }

    #[inline]
    pub fn orientation_tolerance(&self) -> f32 {
        return self.orientation_tolerance;
    }

    pub fn set_orientation_tolerance(&mut self, tolerance: f32) {
        self.orientation_tolerance = tolerance.max(0.0);
    }

    #[inline]
    pub fn match_target_orientation(&self) -> bool {
        return self.match_target_orientation;
    }

    /// When enabled the convergence test also requires the end effector's
    /// orientation to line up with the target pose.
    pub fn set_match_target_orientation(&mut self, enabled: bool) {
        self.match_target_orientation = enabled;
    }

    /// Iterations spent by the last solve.
    #[inline]
    pub fn iterations(&self) -> u32 {
        return self.iterations;
    }

    /// Whether the last solve ended within tolerance.
    #[inline]
    pub fn reached(&self) -> bool {
        return self.reached;
    }

    /// Committed world position of the end effector.
    #[inline]
    pub fn end_effector(&self) -> Vec3A {
        return self.joints[self.joints.len() - 1].position();
    }

    /// Total reach from the base link to the end effector.
    pub fn chain_length(&self) -> f32 {
        let links = &self.joints[..self.joints.len() - 1];
        return links.iter().map(|joint| joint.downstream_distance()).sum();
    }

    /// True when the committed end effector sits within tolerance of the
    /// target, including the orientation test when enabled.
    pub fn is_within_tolerance(&self) -> bool {
        let end = &self.joints[self.joints.len() - 1];
        let on_location = end.position().distance_squared(self.target.position)
            <= self.location_tolerance * self.location_tolerance;
        if !on_location {
            return false;
        }
        if !self.match_target_orientation {
            return true;
        }
        let alignment = end.rotation().dot(self.target.rotation).abs().clamp(-1.0, 1.0);
        return 2.0 * alignment.acos() <= self.orientation_tolerance;
    }

    /// Runs backward/forward cycles until the end effector is within
    /// tolerance or the iteration cap is spent.
    ///
    /// Non-convergence is not an error: the chain is left in its
    /// best-effort configuration and `reached` reports false. Callers that
    /// need the residual can compare `end_effector` with the target.
    pub fn solve(&mut self) {
        self.iterations = 0;
        self.reached = self.is_within_tolerance();

        while !self.reached && self.iterations < self.max_iterations {
            self.backward();
            self.forward();
            self.commit();

            self.iterations += 1;
            self.reached = self.is_within_tolerance();
        }
    }

    /// Backward pass: anchors the end effector at the target and rebuilds
    /// positions toward the base with exact link lengths, ignoring all
    /// constraints. Starts a cycle by refreshing the scratch buffer from the
    /// committed joint positions.
    pub fn backward(&mut self) {
        self.reset_positions();

        let last = self.positions.len() - 1;
        self.positions[last] = self.target.position;
        for i in (1..=last).rev() {
            let displace = self.positions[i - 1] - self.positions[i];
            let direction = displace.normalize_or_zero();
            self.positions[i - 1] = self.positions[i] + direction * self.joints[i].upstream_distance();
        }
    }

    /// Forward pass: re-anchors the base link at the root and walks toward
    /// the end effector, applying each joint's constraints and weight. The
    /// fixed link length is re-imposed after constraint and damping, so
    /// neither can stretch a link.
    pub fn forward(&mut self) {
        self.positions[0] = self.root.position;
        for i in 0..self.positions.len() - 1 {
            let upstream = self.upstream_frame(i);
            let joint_position = self.positions[i];

            let candidate = self.positions[i + 1];
            let constrained = self.joints[i].constrain_downstream_point(candidate, joint_position, &upstream);

            // damping: blend the constrained step against staying put
            let weighted = joint_position.lerp(constrained, self.joints[i].weight());

            let direction = (weighted - joint_position).normalize_or_zero();
            self.positions[i + 1] = joint_position + direction * self.joints[i].downstream_distance();
        }
    }

    /// Writes the pass result into the joints and orients each one toward
    /// its downstream neighbor. The end effector looks through the target
    /// pose instead, with the target's up vector.
    pub fn commit(&mut self) {
        let last = self.positions.len() - 1;
        for i in 0..last {
            let upstream_up = if i == 0 {
                self.root.up()
            } else {
                self.joints[i - 1].rotation() * Vec3A::Y
            };
            let downstream_up = self.joints[i + 1].rotation() * Vec3A::Y;

            self.joints[i].assign_position(self.positions[i]);
            let look_target = self.positions[i + 1];
            self.joints[i].look_at(look_target, upstream_up, downstream_up);
        }

        self.joints[last].assign_position(self.positions[last]);
        let up = self.target.up();
        let through = self.target.position + self.target.forward();
        self.joints[last].look_at(through, up, up);
    }

    fn reset_positions(&mut self) {
        self.positions.clear();
        for joint in &self.joints {
            self.positions.push(joint.position());
        }
    }

    fn upstream_frame(&self, index: usize) -> Frame {
        if index == 0 {
            return Frame::from_rotation(self.root.rotation);
        }
        return Frame::from_rotation(self.joints[index - 1].rotation());
    }
}
