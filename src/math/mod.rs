pub mod dual;
pub mod integrate;
pub mod pose;
pub mod rotation;
pub mod vector;

pub use dual::{ArcLength, DualNum, Internal};
pub use integrate::{IntegralScan, IntegrationParams};
pub use pose::{Pose2, Pose2Dual, PoseVelocity2};
pub use rotation::{Rotation2, Rotation2Dual};
pub use vector::Vector2Dual;

/// 2D vector type, also used for positions in the plane.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Default tolerance for continuity and coverage comparisons.
pub const EPSILON: f64 = 1e-6;
