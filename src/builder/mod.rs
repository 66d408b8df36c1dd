mod pose;
mod position;
mod safe;

pub use pose::PosePathBuilder;
pub use position::PositionPathBuilder;
pub use safe::{RestrictedPosePathBuilder, SafePosePathBuilder};

use crate::math::{IntegrationParams, EPSILON};

/// Parameters shared by the path builders.
#[derive(Debug, Clone, Copy)]
pub struct BuilderParams {
    /// Tolerance for continuity and coverage checks.
    pub eps: f64,
    /// Quality of the arc-length integration behind spline segments.
    pub integration: IntegrationParams,
}

impl Default for BuilderParams {
    fn default() -> Self {
        Self {
            eps: EPSILON,
            integration: IntegrationParams::default(),
        }
    }
}
