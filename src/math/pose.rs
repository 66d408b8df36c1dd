use super::dual::DualNum;
use super::rotation::{Rotation2, Rotation2Dual};
use super::vector::Vector2Dual;
use super::Vector2;

/// A robot pose: position in the plane and heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2 {
    pub position: Vector2,
    pub heading: Rotation2,
}

impl Pose2 {
    #[must_use]
    pub fn new(position: Vector2, heading: Rotation2) -> Self {
        Self { position, heading }
    }
}

/// First derivative of a pose, either in time or along a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseVelocity2 {
    pub linear: Vector2,
    pub angular: f64,
}

impl PoseVelocity2 {
    #[must_use]
    pub fn new(linear: Vector2, angular: f64) -> Self {
        Self { linear, angular }
    }
}

/// A pose whose position and heading carry derivatives with respect to `P`.
pub struct Pose2Dual<P> {
    pub position: Vector2Dual<P>,
    pub heading: Rotation2Dual<P>,
}

impl<P> Pose2Dual<P> {
    #[must_use]
    pub fn new(position: Vector2Dual<P>, heading: Rotation2Dual<P>) -> Self {
        Self { position, heading }
    }

    #[must_use]
    pub fn value(&self) -> Pose2 {
        Pose2::new(self.position.value(), self.heading.value())
    }

    /// First derivative of the pose. Requires at least two terms.
    #[must_use]
    pub fn velocity(&self) -> PoseVelocity2 {
        PoseVelocity2::new(
            self.position.drop(1).value(),
            self.heading.velocity().value(),
        )
    }

    #[must_use]
    pub fn reparam<Q>(&self, old: &DualNum<Q>) -> Pose2Dual<Q> {
        Pose2Dual {
            position: self.position.reparam(old),
            heading: self.heading.reparam(old),
        }
    }
}

impl<P> Clone for Pose2Dual<P> {
    fn clone(&self) -> Self {
        Self {
            position: self.position.clone(),
            heading: self.heading.clone(),
        }
    }
}

impl<P> std::fmt::Debug for Pose2Dual<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pose2Dual")
            .field("position", &self.position)
            .field("heading", &self.heading)
            .finish()
    }
}
