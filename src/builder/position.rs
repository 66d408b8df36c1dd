use std::sync::Arc;

use tracing::debug;

use crate::error::{GeometryError, PathError, Result};
use crate::math::{Rotation2, Vector2};
use crate::path::{
    ArcCurve, CompositePositionPath, Line, PositionPath, QuinticSpline2, SharedPositionPath,
};

use super::BuilderParams;

/// Assembles a tangent-continuous composite position path one directive at a time.
///
/// Every directive starts its segment at the current end point and end
/// tangent, and returns a new builder; the receiver is left untouched, so a
/// builder can be branched freely.
#[derive(Clone)]
pub struct PositionPathBuilder {
    segments: Vec<SharedPositionPath>,
    next_pos: Vector2,
    next_tangent: Rotation2,
    params: BuilderParams,
}

impl PositionPathBuilder {
    #[must_use]
    pub fn new(begin_pos: Vector2, begin_tangent: Rotation2) -> Self {
        Self::with_params(begin_pos, begin_tangent, BuilderParams::default())
    }

    #[must_use]
    pub fn with_params(begin_pos: Vector2, begin_tangent: Rotation2, params: BuilderParams) -> Self {
        Self {
            segments: Vec::new(),
            next_pos: begin_pos,
            next_tangent: begin_tangent,
            params,
        }
    }

    /// Where the next segment will begin.
    #[must_use]
    pub fn end_position(&self) -> Vector2 {
        self.next_pos
    }

    /// Direction the next segment will begin in.
    #[must_use]
    pub fn end_tangent(&self) -> Rotation2 {
        self.next_tangent
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn add_segment(&self, segment: SharedPositionPath, kind: &'static str) -> Result<Self> {
        let index = self.segments.len();
        let begin = segment.begin(2);
        let gap = (begin.value() - self.next_pos).norm();
        if gap > self.params.eps {
            return Err(PathError::PositionDiscontinuity { index, gap }.into());
        }
        let turn = Rotation2::from_vector(&begin.drop(1).value())? - self.next_tangent;
        if turn.abs() > self.params.eps {
            return Err(PathError::TangentDiscontinuity { index, gap: turn }.into());
        }

        let end = segment.end(2);
        let next_tangent = Rotation2::from_vector(&end.drop(1).value())?;
        debug!(kind, index, length = segment.length(), "appended position segment");

        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(Self {
            segments,
            next_pos: end.value(),
            next_tangent,
            params: self.params,
        })
    }

    /// Drives straight ahead along the current tangent for `ds`.
    ///
    /// # Errors
    ///
    /// Returns an error if `ds` is not positive.
    pub fn forward(&self, ds: f64) -> Result<Self> {
        if ds.is_nan() || ds < self.params.eps {
            return Err(GeometryError::NonPositiveDisplacement(ds).into());
        }
        let end = self.next_pos + self.next_tangent.vec() * ds;
        self.add_segment(Arc::new(Line::new(self.next_pos, end)?), "line")
    }

    /// Drives straight ahead until reaching `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if the current tangent never reaches `x` going forward.
    pub fn line_to_x(&self, x: f64) -> Result<Self> {
        let rate = self.next_tangent.real;
        if rate.abs() < self.params.eps {
            return Err(GeometryError::Degenerate(format!(
                "tangent {} rad never reaches x = {x}",
                self.next_tangent.log()
            ))
            .into());
        }
        self.forward((x - self.next_pos.x) / rate)
    }

    /// Drives straight ahead until reaching `y`.
    ///
    /// # Errors
    ///
    /// Returns an error if the current tangent never reaches `y` going forward.
    pub fn line_to_y(&self, y: f64) -> Result<Self> {
        let rate = self.next_tangent.imag;
        if rate.abs() < self.params.eps {
            return Err(GeometryError::Degenerate(format!(
                "tangent {} rad never reaches y = {y}",
                self.next_tangent.log()
            ))
            .into());
        }
        self.forward((y - self.next_pos.y) / rate)
    }

    /// Bends smoothly to `pos`, arriving along `tangent`.
    ///
    /// The Hermite end derivatives are the unit tangents scaled by the chord
    /// length between the two points.
    ///
    /// # Errors
    ///
    /// Returns an error if `pos` coincides with the current end point.
    pub fn spline_to(&self, pos: Vector2, tangent: Rotation2) -> Result<Self> {
        let dist = (pos - self.next_pos).norm();
        if dist < self.params.eps {
            return Err(GeometryError::Degenerate(format!(
                "spline end ({}, {}) coincides with its begin",
                pos.x, pos.y
            ))
            .into());
        }
        let spline = QuinticSpline2::new(
            self.next_pos,
            self.next_tangent.vec() * dist,
            Vector2::zeros(),
            pos,
            tangent.vec() * dist,
            Vector2::zeros(),
        );
        let curve = ArcCurve::new(spline, self.params.integration);
        self.add_segment(Arc::new(curve), "spline")
    }

    /// Packages the segments appended so far.
    ///
    /// # Errors
    ///
    /// Returns an error if no segment was appended.
    pub fn build(&self) -> Result<CompositePositionPath> {
        CompositePositionPath::from_segments(self.segments.clone())
    }
}

impl std::fmt::Debug for PositionPathBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionPathBuilder")
            .field("segments", &self.segments.len())
            .field("next_pos", &self.next_pos)
            .field("next_tangent", &self.next_tangent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    use approx::assert_relative_eq;

    use super::*;
    use crate::error::RoadkitError;

    fn origin() -> PositionPathBuilder {
        PositionPathBuilder::new(Vector2::zeros(), Rotation2::IDENTITY)
    }

    fn assert_continuous(path: &CompositePositionPath) {
        for pair in path.segments().windows(2) {
            let end = pair[0].end(2);
            let begin = pair[1].begin(2);
            assert_relative_eq!(end.value().x, begin.value().x, epsilon = 1e-9);
            assert_relative_eq!(end.value().y, begin.value().y, epsilon = 1e-9);
            assert_relative_eq!(end.drop(1).value().x, begin.drop(1).value().x, epsilon = 1e-9);
            assert_relative_eq!(end.drop(1).value().y, begin.drop(1).value().y, epsilon = 1e-9);
        }
    }

    #[test]
    fn forward_then_line_to_x() {
        let path = origin().forward(2.0).unwrap().line_to_x(5.0).unwrap().build().unwrap();
        assert_eq!(path.segments().len(), 2);
        assert_relative_eq!(path.length(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(path.end(1).value().x, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn line_to_y_follows_diagonal_tangent() {
        let path = PositionPathBuilder::new(Vector2::zeros(), Rotation2::exp(FRAC_PI_4))
            .line_to_y(3.0)
            .unwrap()
            .build()
            .unwrap();
        let end = path.end(1).value();
        assert_relative_eq!(end.x, 3.0, epsilon = 1e-9);
        assert_relative_eq!(end.y, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn mixed_segments_are_tangent_continuous() {
        crate::test_support::init_tracing();
        let path = origin()
            .forward(3.0)
            .unwrap()
            .spline_to(Vector2::new(10.0, 6.0), Rotation2::exp(FRAC_PI_2))
            .unwrap()
            .line_to_y(12.0)
            .unwrap()
            .spline_to(Vector2::new(4.0, 20.0), Rotation2::exp(3.0))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(path.segments().len(), 4);
        assert_continuous(&path);

        let total: f64 = path.segments().iter().map(|s| s.length()).sum();
        assert_relative_eq!(path.length(), total);
    }

    #[test]
    fn spline_ends_at_requested_pose() {
        let builder = origin()
            .spline_to(Vector2::new(8.0, 4.0), Rotation2::exp(FRAC_PI_2))
            .unwrap();
        assert_relative_eq!(builder.end_position().x, 8.0, epsilon = 1e-9);
        assert_relative_eq!(builder.end_position().y, 4.0, epsilon = 1e-9);
        assert_relative_eq!(builder.end_tangent().log(), FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn branches_do_not_interfere() {
        let base = origin().forward(1.0).unwrap();
        let left = base.spline_to(Vector2::new(3.0, 2.0), Rotation2::exp(FRAC_PI_2)).unwrap();
        let right = base.line_to_x(4.0).unwrap();

        assert_eq!(base.segment_count(), 1);
        assert_relative_eq!(base.end_position().x, 1.0);
        assert_eq!(left.segment_count(), 2);
        assert_eq!(right.segment_count(), 2);
        assert_relative_eq!(right.end_position().x, 4.0, epsilon = 1e-12);
        assert_relative_eq!(right.end_position().y, 0.0);
        assert_relative_eq!(left.end_position().y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn backwards_targets_are_rejected() {
        let base = origin().forward(5.0).unwrap();
        assert!(matches!(
            base.line_to_x(2.0),
            Err(RoadkitError::Geometry(GeometryError::NonPositiveDisplacement(_)))
        ));
        assert!(base.forward(0.0).is_err());
        assert!(base.forward(-1.0).is_err());
    }

    #[test]
    fn unreachable_axis_target_is_rejected() {
        assert!(matches!(
            origin().line_to_y(3.0),
            Err(RoadkitError::Geometry(GeometryError::Degenerate(_)))
        ));
    }

    #[test]
    fn coincident_spline_end_is_rejected() {
        let base = origin().forward(1.0).unwrap();
        assert!(base.spline_to(Vector2::new(1.0, 0.0), Rotation2::IDENTITY).is_err());
    }

    #[test]
    fn empty_builder_has_nothing_to_build() {
        assert!(matches!(
            origin().build(),
            Err(RoadkitError::Path(PathError::Empty))
        ));
    }
}
