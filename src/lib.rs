mod base;
mod chain;
mod constraint;
mod ellipse;
mod joint;
mod math;

pub use base::{
    FabrikError, DEFAULT_CONE_HALF_ANGLE, DEFAULT_LOCATION_TOLERANCE, DEFAULT_MAX_ITERATIONS,
    DEFAULT_ORIENTATION_TOLERANCE, DEFAULT_SPRING_STRENGTH, MAX_SPRING_STRENGTH,
};
pub use chain::FabrikChain;
pub use constraint::{ConeConstraint, DirectionalPreference};
pub use ellipse::nearest_point_on_ellipse;
pub use joint::{FabrikJoint, UpFacing};
pub use math::{look_rotation, project_on_plane, Frame, Pose};
