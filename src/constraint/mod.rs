//! Velocity and acceleration bounds along a path.
//!
//! Evaluators are pure functions of the arc length `s`, the pose at `s`, the
//! pose derivative with respect to arc length, and the robot velocity that
//! would result from moving along the path at unit speed.

use crate::error::{ConstraintError, Result};
use crate::math::{Pose2, PoseVelocity2};

/// Upper bound on path speed.
pub trait VelocityConstraint {
    fn evaluate(&self, s: f64, pose: &Pose2, deriv: &PoseVelocity2, base_vel: &PoseVelocity2) -> f64;
}

/// Upper bound on path acceleration.
pub trait AccelerationConstraint {
    fn evaluate(&self, s: f64, pose: &Pose2, deriv: &PoseVelocity2, base_vel: &PoseVelocity2) -> f64;
}

/// Same bound everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslationalVelocityConstraint {
    pub max_vel: f64,
}

impl TranslationalVelocityConstraint {
    #[must_use]
    pub fn new(max_vel: f64) -> Self {
        Self { max_vel }
    }
}

impl VelocityConstraint for TranslationalVelocityConstraint {
    fn evaluate(&self, _s: f64, _pose: &Pose2, _deriv: &PoseVelocity2, _base_vel: &PoseVelocity2) -> f64 {
        self.max_vel
    }
}

/// Limits path speed so that the heading turns no faster than `max_ang_vel`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularVelocityConstraint {
    pub max_ang_vel: f64,
}

impl AngularVelocityConstraint {
    #[must_use]
    pub fn new(max_ang_vel: f64) -> Self {
        Self { max_ang_vel }
    }
}

impl VelocityConstraint for AngularVelocityConstraint {
    fn evaluate(&self, _s: f64, _pose: &Pose2, deriv: &PoseVelocity2, _base_vel: &PoseVelocity2) -> f64 {
        let rate = deriv.angular.abs();
        if rate < f64::EPSILON {
            f64::INFINITY
        } else {
            self.max_ang_vel / rate
        }
    }
}

/// Tightest bound among its children.
pub struct MinVelocityConstraint {
    constraints: Vec<Box<dyn VelocityConstraint>>,
}

impl MinVelocityConstraint {
    /// # Errors
    ///
    /// Returns [`ConstraintError::EmptySet`] if `constraints` is empty.
    pub fn new(constraints: Vec<Box<dyn VelocityConstraint>>) -> Result<Self> {
        if constraints.is_empty() {
            return Err(ConstraintError::EmptySet.into());
        }
        Ok(Self { constraints })
    }

    #[must_use]
    pub fn constraints(&self) -> &[Box<dyn VelocityConstraint>] {
        &self.constraints
    }
}

impl VelocityConstraint for MinVelocityConstraint {
    fn evaluate(&self, s: f64, pose: &Pose2, deriv: &PoseVelocity2, base_vel: &PoseVelocity2) -> f64 {
        self.constraints
            .iter()
            .map(|c| c.evaluate(s, pose, deriv, base_vel))
            .fold(f64::INFINITY, f64::min)
    }
}

impl std::fmt::Debug for MinVelocityConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinVelocityConstraint")
            .field("constraints", &self.constraints.len())
            .finish()
    }
}

/// Same acceleration bound everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileAccelerationConstraint {
    pub max_accel: f64,
}

impl ProfileAccelerationConstraint {
    #[must_use]
    pub fn new(max_accel: f64) -> Self {
        Self { max_accel }
    }
}

impl AccelerationConstraint for ProfileAccelerationConstraint {
    fn evaluate(&self, _s: f64, _pose: &Pose2, _deriv: &PoseVelocity2, _base_vel: &PoseVelocity2) -> f64 {
        self.max_accel
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::builder::{PosePathBuilder, PositionPathBuilder};
    use crate::error::RoadkitError;
    use crate::math::{Rotation2, Vector2};
    use crate::path::PosePath;

    fn still() -> (Pose2, PoseVelocity2) {
        let pose = Pose2::new(Vector2::zeros(), Rotation2::IDENTITY);
        let vel = PoseVelocity2::new(Vector2::new(1.0, 0.0), 0.5);
        (pose, vel)
    }

    #[test]
    fn fixed_bounds_ignore_inputs() {
        let (pose, vel) = still();
        assert_relative_eq!(TranslationalVelocityConstraint::new(30.0).evaluate(2.0, &pose, &vel, &vel), 30.0);
        assert_relative_eq!(ProfileAccelerationConstraint::new(12.0).evaluate(7.0, &pose, &vel, &vel), 12.0);
    }

    #[test]
    fn angular_bound_scales_with_heading_rate() {
        let (pose, vel) = still();
        let constraint = AngularVelocityConstraint::new(2.0);
        assert_relative_eq!(constraint.evaluate(0.0, &pose, &vel, &vel), 4.0);

        let straight = PoseVelocity2::new(Vector2::new(1.0, 0.0), 0.0);
        assert!(constraint.evaluate(0.0, &pose, &straight, &straight).is_infinite());
    }

    #[test]
    fn min_picks_tightest_child() {
        let (pose, vel) = still();
        let min = MinVelocityConstraint::new(vec![
            Box::new(TranslationalVelocityConstraint::new(30.0)),
            Box::new(AngularVelocityConstraint::new(2.0)),
        ])
        .unwrap();
        assert_relative_eq!(min.evaluate(0.0, &pose, &vel, &vel), 4.0);
    }

    #[test]
    fn empty_min_is_rejected() {
        assert!(matches!(
            MinVelocityConstraint::new(Vec::new()),
            Err(RoadkitError::Constraint(ConstraintError::EmptySet))
        ));
    }

    #[test]
    fn evaluates_along_a_pose_path() {
        let path = PositionPathBuilder::new(Vector2::zeros(), Rotation2::IDENTITY)
            .forward(4.0)
            .unwrap()
            .build()
            .unwrap();
        let pose = PosePathBuilder::new(Arc::new(path), Rotation2::IDENTITY)
            .linear_until_end(Rotation2::exp(1.0))
            .unwrap();

        let sample = pose.get(2.0, 2);
        let deriv = sample.velocity();
        let constraint = AngularVelocityConstraint::new(0.5);
        // heading turns 1 rad over 4 units of path
        assert_relative_eq!(
            constraint.evaluate(2.0, &sample.value(), &deriv, &deriv),
            2.0,
            epsilon = 1e-9
        );
    }
}
