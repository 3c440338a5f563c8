//!
//! Base types and shared constants.
//!

use thiserror::Error;

/// Fabrik error type.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FabrikError {
    /// A chain needs a base link and at least one downstream joint.
    #[error("Chain too short")]
    ChainTooShort,
    /// Two adjacent joints coincide, the link between them has no direction.
    #[error("Degenerate link")]
    DegenerateLink,
}

impl FabrikError {
    pub fn is_chain_too_short(&self) -> bool {
        matches!(self, FabrikError::ChainTooShort)
    }

    pub fn is_degenerate_link(&self) -> bool {
        matches!(self, FabrikError::DegenerateLink)
    }
}

/// Default distance threshold under which the end effector counts as on target.
pub const DEFAULT_LOCATION_TOLERANCE: f32 = 0.05;

/// Default hard cap on backward/forward cycles per solve.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// Default angular slack (radians) for the optional end effector orientation test.
pub const DEFAULT_ORIENTATION_TOLERANCE: f32 = 0.1;

/// Default conic half-angle (degrees) on each cardinal direction.
pub const DEFAULT_CONE_HALF_ANGLE: f32 = 60.0;

/// Default pull of the preferred direction spring.
pub const DEFAULT_SPRING_STRENGTH: f32 = 0.3;

/// Largest accepted spring strength.
pub const MAX_SPRING_STRENGTH: f32 = 0.9;

/// Half-angles have no tangent at 90 degrees, configured limits cap just below.
pub(crate) const MAX_CONE_HALF_ANGLE: f32 = 89.9;

/// Smallest cached cone semi-axis, keeps the ellipse test clear of division by zero.
pub(crate) const MIN_CONE_SEMI_AXIS: f32 = 1e-4;

/// Links shorter than this cannot be normalized reliably.
pub(crate) const MIN_LINK_LENGTH: f32 = 1e-6;
