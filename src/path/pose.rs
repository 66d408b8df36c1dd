use crate::math::{ArcLength, Pose2Dual};

use super::{HeadingPath, PositionPath, PositionPathView};

/// A path that yields poses: position and heading jointly, by arc length.
pub trait PosePath {
    fn length(&self) -> f64;

    fn get(&self, s: f64, n: usize) -> Pose2Dual<ArcLength>;

    fn begin(&self, n: usize) -> Pose2Dual<ArcLength> {
        self.get(0.0, n)
    }

    fn end(&self, n: usize) -> Pose2Dual<ArcLength> {
        self.get(self.length(), n)
    }
}

/// A window of a position path decorated with a heading profile over the
/// same displacement interval.
#[derive(Debug, Clone)]
pub struct HeadingPosePath<H> {
    position: PositionPathView,
    heading: H,
}

impl<H: HeadingPath> HeadingPosePath<H> {
    #[must_use]
    pub fn new(position: PositionPathView, heading: H) -> Self {
        Self { position, heading }
    }

    #[must_use]
    pub fn heading_path(&self) -> &H {
        &self.heading
    }
}

impl<H: HeadingPath> PosePath for HeadingPosePath<H> {
    fn length(&self) -> f64 {
        self.position.length()
    }

    fn get(&self, s: f64, n: usize) -> Pose2Dual<ArcLength> {
        Pose2Dual::new(self.position.get(s, n), self.heading.get(s, n))
    }
}
