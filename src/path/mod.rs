mod arc_curve;
mod composite;
mod heading;
mod line;
mod pose;
mod spline;

pub use arc_curve::ArcCurve;
pub use composite::{CompositePosePath, CompositePositionPath};
pub use heading::{
    ConstantHeadingPath, HeadingPath, LinearHeadingPath, SplineHeadingPath, TangentPath,
};
pub use line::Line;
pub use pose::{HeadingPosePath, PosePath};
pub use spline::{QuinticSpline1, QuinticSpline2};

use std::sync::Arc;

use crate::math::{ArcLength, Vector2Dual};

/// A planar curve queried by parameter `P` for position and derivatives.
pub trait PositionPath<P> {
    /// Extent of the parameter domain; arc length for `PositionPath<ArcLength>`.
    fn length(&self) -> f64;

    /// Position at `param` carrying `n` terms (value plus `n - 1` derivatives).
    fn get(&self, param: f64, n: usize) -> Vector2Dual<P>;

    fn begin(&self, n: usize) -> Vector2Dual<P> {
        self.get(0.0, n)
    }

    fn end(&self, n: usize) -> Vector2Dual<P> {
        self.get(self.length(), n)
    }
}

/// Arc-length path shared between builders, views and composites.
pub type SharedPositionPath = Arc<dyn PositionPath<ArcLength>>;

/// A window `[offset, offset + length]` onto a shared arc-length path,
/// re-based so that the window starts at zero.
#[derive(Clone)]
pub struct PositionPathView {
    path: SharedPositionPath,
    offset: f64,
    length: f64,
}

impl PositionPathView {
    #[must_use]
    pub fn new(path: SharedPositionPath, offset: f64, length: f64) -> Self {
        Self {
            path,
            offset,
            length,
        }
    }

    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }
}

impl PositionPath<ArcLength> for PositionPathView {
    fn length(&self) -> f64 {
        self.length
    }

    fn get(&self, s: f64, n: usize) -> Vector2Dual<ArcLength> {
        self.path.get(self.offset + s, n)
    }
}

impl std::fmt::Debug for PositionPathView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionPathView")
            .field("offset", &self.offset)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}
