use std::sync::Arc;

use tracing::debug;

use crate::error::{PathError, Result};
use crate::math::{ArcLength, Rotation2, Rotation2Dual, EPSILON};
use crate::path::{
    CompositePosePath, ConstantHeadingPath, HeadingPosePath, LinearHeadingPath, PosePath,
    PositionPath, PositionPathView, SharedPositionPath, SplineHeadingPath, TangentPath,
};

type Segments = Vec<Arc<dyn PosePath>>;

/// Finishes a pending spline segment once the heading (with rates) it must
/// end on is known.
type Resolve = Arc<dyn Fn(&Rotation2Dual<ArcLength>) -> Result<Segments>>;

#[derive(Clone)]
enum HeadingState {
    /// Every segment is resolved; the end heading carries its rates.
    Eager {
        segments: Segments,
        end_heading: Rotation2Dual<ArcLength>,
    },
    /// The last segment is a spline waiting for its end rate.
    Lazy {
        resolve: Resolve,
        end_heading: Rotation2,
    },
}

impl HeadingState {
    fn end_heading(&self) -> Rotation2 {
        match self {
            Self::Eager { end_heading, .. } => end_heading.value(),
            Self::Lazy { end_heading, .. } => *end_heading,
        }
    }
}

/// Decorates a position path with heading profiles, one displacement
/// interval at a time, keeping the heading continuous across intervals.
///
/// Like [`super::PositionPathBuilder`], every directive returns a new builder.
#[derive(Clone)]
pub struct PosePathBuilder {
    path: SharedPositionPath,
    begin_disp: f64,
    state: HeadingState,
    eps: f64,
}

impl PosePathBuilder {
    #[must_use]
    pub fn new(path: SharedPositionPath, begin_heading: Rotation2) -> Self {
        Self::with_eps(path, begin_heading, EPSILON)
    }

    #[must_use]
    pub fn with_eps(path: SharedPositionPath, begin_heading: Rotation2, eps: f64) -> Self {
        Self {
            path,
            begin_disp: 0.0,
            state: HeadingState::Lazy {
                resolve: Arc::new(|_: &Rotation2Dual<ArcLength>| -> Result<Segments> {
                    Ok(Vec::new())
                }),
                end_heading: begin_heading,
            },
            eps,
        }
    }

    /// Displacement covered so far.
    #[must_use]
    pub fn displacement(&self) -> f64 {
        self.begin_disp
    }

    fn check_disp(&self, disp: f64) -> Result<()> {
        if disp.is_nan() || disp <= self.begin_disp {
            return Err(PathError::NonIncreasingDisplacement {
                disp,
                begin: self.begin_disp,
            }
            .into());
        }
        let length = self.path.length();
        if disp > length + self.eps {
            return Err(PathError::DisplacementOutOfRange { disp, length }.into());
        }
        Ok(())
    }

    fn view(&self, disp: f64) -> PositionPathView {
        PositionPathView::new(self.path.clone(), self.begin_disp, disp - self.begin_disp)
    }

    fn add_eager(&self, disp: f64, segment: Arc<dyn PosePath>, kind: &'static str) -> Result<Self> {
        let begin = segment.begin(3).heading;
        let mut segments = match &self.state {
            HeadingState::Eager {
                segments,
                end_heading,
            } => {
                self.check_continuity(end_heading, &begin)?;
                segments.clone()
            }
            HeadingState::Lazy { resolve, .. } => resolve(&begin)?,
        };
        let end_heading = segment.end(3).heading;
        debug!(kind, begin = self.begin_disp, end = disp, "appended pose segment");
        segments.push(segment);

        Ok(Self {
            path: self.path.clone(),
            begin_disp: disp,
            state: HeadingState::Eager {
                segments,
                end_heading,
            },
            eps: self.eps,
        })
    }

    fn check_continuity(
        &self,
        expected: &Rotation2Dual<ArcLength>,
        actual: &Rotation2Dual<ArcLength>,
    ) -> Result<()> {
        if (actual.value() - expected.value()).abs() > self.eps {
            return Err(PathError::HeadingDiscontinuity {
                disp: self.begin_disp,
                expected: expected.value().log(),
                actual: actual.value().log(),
            }
            .into());
        }
        let (expected, actual) = (expected.velocity().value(), actual.velocity().value());
        if (actual - expected).abs() > self.eps {
            return Err(PathError::HeadingRateDiscontinuity {
                disp: self.begin_disp,
                expected,
                actual,
            }
            .into());
        }
        Ok(())
    }

    /// Faces along the path tangent (plus the current offset from it) until `disp`.
    ///
    /// # Errors
    ///
    /// Returns an error if `disp` does not advance, overruns the path, or the
    /// heading would jump.
    pub fn tangent_until(&self, disp: f64) -> Result<Self> {
        self.check_disp(disp)?;
        let view = self.view(disp);
        let tangent = view.begin(2).drop(1).angle_cast().value();
        let offset = self.state.end_heading() * tangent.inverse();
        let segment = HeadingPosePath::new(view.clone(), TangentPath::new(view, offset));
        self.add_eager(disp, Arc::new(segment), "tangent")
    }

    /// Holds the current heading until `disp`.
    ///
    /// # Errors
    ///
    /// See [`PosePathBuilder::tangent_until`].
    pub fn constant_until(&self, disp: f64) -> Result<Self> {
        self.check_disp(disp)?;
        let view = self.view(disp);
        let heading = ConstantHeadingPath::new(self.state.end_heading(), view.length());
        self.add_eager(disp, Arc::new(HeadingPosePath::new(view, heading)), "constant")
    }

    /// Turns at a constant rate to reach `heading` at `disp`.
    ///
    /// # Errors
    ///
    /// See [`PosePathBuilder::tangent_until`].
    pub fn linear_until(&self, disp: f64, heading: Rotation2) -> Result<Self> {
        self.check_disp(disp)?;
        let view = self.view(disp);
        let begin = self.state.end_heading();
        let heading = LinearHeadingPath::new(begin, heading - begin, view.length());
        self.add_eager(disp, Arc::new(HeadingPosePath::new(view, heading)), "linear")
    }

    /// Turns smoothly to reach `heading` at `disp`.
    ///
    /// The segment stays pending until the heading rate it has to end with is
    /// known: from the next directive, or from the path tangent at `build`.
    ///
    /// # Errors
    ///
    /// Returns an error if `disp` does not advance or overruns the path.
    pub fn spline_until(&self, disp: f64, heading: Rotation2) -> Result<Self> {
        self.check_disp(disp)?;
        let prev = self.state.clone();
        let path = self.path.clone();
        let begin_disp = self.begin_disp;
        let view = self.view(disp);

        let resolve = move |end: &Rotation2Dual<ArcLength>| -> Result<Segments> {
            let (begin, mut segments) = match &prev {
                HeadingState::Eager {
                    segments,
                    end_heading,
                } => (end_heading.clone(), segments.clone()),
                HeadingState::Lazy {
                    resolve,
                    end_heading,
                } => {
                    let begin = tangent_rate_heading(&path, begin_disp, *end_heading);
                    let segments = resolve(&begin)?;
                    (begin, segments)
                }
            };
            debug!(kind = "spline", begin = begin_disp, "resolved pose segment");
            let heading = SplineHeadingPath::new(&begin, end, view.length());
            segments.push(Arc::new(HeadingPosePath::new(view.clone(), heading)));
            Ok(segments)
        };

        Ok(Self {
            path: self.path.clone(),
            begin_disp: disp,
            state: HeadingState::Lazy {
                resolve: Arc::new(resolve),
                end_heading: heading,
            },
            eps: self.eps,
        })
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::tangent_until`] and [`PosePathBuilder::build`].
    pub fn tangent_until_end(&self) -> Result<CompositePosePath> {
        self.tangent_until(self.path.length())?.build()
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::constant_until`] and [`PosePathBuilder::build`].
    pub fn constant_until_end(&self) -> Result<CompositePosePath> {
        self.constant_until(self.path.length())?.build()
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::linear_until`] and [`PosePathBuilder::build`].
    pub fn linear_until_end(&self, heading: Rotation2) -> Result<CompositePosePath> {
        self.linear_until(self.path.length(), heading)?.build()
    }

    /// # Errors
    ///
    /// See [`PosePathBuilder::spline_until`] and [`PosePathBuilder::build`].
    pub fn spline_until_end(&self, heading: Rotation2) -> Result<CompositePosePath> {
        self.spline_until(self.path.length(), heading)?.build()
    }

    /// Packages the heading segments into a pose path over the whole position path.
    ///
    /// A trailing spline segment ends with the path tangent's heading rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the segments do not reach the end of the path.
    pub fn build(&self) -> Result<CompositePosePath> {
        let length = self.path.length();
        if (self.begin_disp - length).abs() > self.eps {
            return Err(PathError::IncompleteCoverage {
                covered: self.begin_disp,
                length,
            }
            .into());
        }
        let segments = match &self.state {
            HeadingState::Eager { segments, .. } => segments.clone(),
            HeadingState::Lazy {
                resolve,
                end_heading,
            } => resolve(&tangent_rate_heading(&self.path, self.begin_disp, *end_heading))?,
        };
        CompositePosePath::from_segments(segments)
    }
}

/// `heading`, turning at the rate (and rate derivative) of the path tangent at `disp`.
fn tangent_rate_heading(
    path: &SharedPositionPath,
    disp: f64,
    heading: Rotation2,
) -> Rotation2Dual<ArcLength> {
    let tangent = path.get(disp, 4).drop(1).angle_cast();
    Rotation2Dual::exp(&tangent.velocity().add_front(heading.log()))
}

impl std::fmt::Debug for PosePathBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            HeadingState::Eager { .. } => "eager",
            HeadingState::Lazy { .. } => "lazy",
        };
        f.debug_struct("PosePathBuilder")
            .field("begin_disp", &self.begin_disp)
            .field("state", &state)
            .field("end_heading", &self.state.end_heading())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;
    use crate::builder::PositionPathBuilder;
    use crate::error::RoadkitError;
    use crate::math::Vector2;

    fn straight(length: f64) -> SharedPositionPath {
        Arc::new(
            PositionPathBuilder::new(Vector2::zeros(), Rotation2::IDENTITY)
                .forward(length)
                .unwrap()
                .build()
                .unwrap(),
        )
    }

    fn curvy() -> SharedPositionPath {
        Arc::new(
            PositionPathBuilder::new(Vector2::zeros(), Rotation2::IDENTITY)
                .forward(2.0)
                .unwrap()
                .spline_to(Vector2::new(8.0, 6.0), Rotation2::exp(FRAC_PI_2))
                .unwrap()
                .forward(3.0)
                .unwrap()
                .build()
                .unwrap(),
        )
    }

    fn assert_heading_continuous(path: &CompositePosePath) {
        for pair in path.segments().windows(2) {
            let end = pair[0].end(1).heading.value();
            let begin = pair[1].begin(1).heading.value();
            assert_relative_eq!(begin - end, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn constant_heading_over_whole_path() {
        let pose = PosePathBuilder::new(straight(10.0), Rotation2::exp(0.3))
            .constant_until_end()
            .unwrap();
        assert_relative_eq!(pose.length(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(pose.get(7.0, 1).heading.value().log(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn tangent_heading_keeps_initial_offset() {
        let pose = PosePathBuilder::new(curvy(), Rotation2::exp(FRAC_PI_2))
            .tangent_until_end()
            .unwrap();
        let end = pose.end(1).value();
        // path ends heading along +y, offset by a quarter turn
        let half_turn = Rotation2::exp(std::f64::consts::PI);
        assert_relative_eq!(end.heading - half_turn, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn mixed_headings_are_continuous() {
        crate::test_support::init_tracing();
        let path = curvy();
        let length = path.length();
        let pose = PosePathBuilder::new(path, Rotation2::IDENTITY)
            .tangent_until(1.0)
            .unwrap()
            .spline_until(4.0, Rotation2::exp(1.0))
            .unwrap()
            .linear_until(6.0, Rotation2::exp(1.2))
            .unwrap()
            .spline_until(length - 1.0, Rotation2::exp(-0.5))
            .unwrap()
            .spline_until_end(Rotation2::exp(0.5))
            .unwrap();

        assert_eq!(pose.segments().len(), 5);
        assert_relative_eq!(pose.length(), length, epsilon = 1e-9);
        assert_heading_continuous(&pose);
        assert_relative_eq!(pose.end(1).heading.value().log(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn spline_picks_up_rate_of_following_segment() {
        let pose = PosePathBuilder::new(straight(10.0), Rotation2::IDENTITY)
            .spline_until(4.0, Rotation2::exp(1.0))
            .unwrap()
            .linear_until(10.0, Rotation2::exp(2.2))
            .unwrap()
            .build()
            .unwrap();
        let spline_end = pose.segments()[0].end(2).heading.velocity().value();
        let linear_begin = pose.segments()[1].begin(2).heading.velocity().value();
        assert_relative_eq!(spline_end, 0.2, epsilon = 1e-9);
        assert_relative_eq!(linear_begin, 0.2, epsilon = 1e-9);
    }

    #[test]
    fn leading_spline_starts_with_tangent_rate() {
        let pose = PosePathBuilder::new(curvy(), Rotation2::IDENTITY)
            .spline_until(3.0, Rotation2::exp(0.4))
            .unwrap()
            .constant_until_end()
            .unwrap();
        let begin = pose.begin(2).heading.velocity().value();
        assert_relative_eq!(begin, 0.0, epsilon = 1e-9);
        let end = pose.segments()[0].end(2).heading;
        assert_relative_eq!(end.value().log(), 0.4, epsilon = 1e-9);
        assert_relative_eq!(end.velocity().value(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn non_increasing_displacement_is_rejected() {
        let builder = PosePathBuilder::new(straight(10.0), Rotation2::IDENTITY)
            .constant_until(4.0)
            .unwrap();
        assert!(matches!(
            builder.linear_until(4.0, Rotation2::exp(1.0)),
            Err(RoadkitError::Path(PathError::NonIncreasingDisplacement { .. }))
        ));
        assert!(matches!(
            builder.spline_until(2.0, Rotation2::exp(1.0)),
            Err(RoadkitError::Path(PathError::NonIncreasingDisplacement { .. }))
        ));
    }

    #[test]
    fn overrunning_the_path_is_rejected() {
        let builder = PosePathBuilder::new(straight(10.0), Rotation2::IDENTITY);
        assert!(matches!(
            builder.constant_until(12.0),
            Err(RoadkitError::Path(PathError::DisplacementOutOfRange { .. }))
        ));
    }

    #[test]
    fn incomplete_coverage_is_rejected() {
        let builder = PosePathBuilder::new(straight(10.0), Rotation2::IDENTITY)
            .constant_until(6.0)
            .unwrap();
        assert!(matches!(
            builder.build(),
            Err(RoadkitError::Path(PathError::IncompleteCoverage { .. }))
        ));
    }

    #[test]
    fn eager_rate_jump_is_rejected() {
        let builder = PosePathBuilder::new(straight(10.0), Rotation2::IDENTITY)
            .linear_until(5.0, Rotation2::exp(1.0))
            .unwrap();
        assert!(matches!(
            builder.constant_until(10.0),
            Err(RoadkitError::Path(PathError::HeadingRateDiscontinuity { .. }))
        ));
    }

    #[test]
    fn branches_do_not_interfere() {
        let base = PosePathBuilder::new(straight(10.0), Rotation2::IDENTITY)
            .spline_until(5.0, Rotation2::exp(1.0))
            .unwrap();
        let a = base.constant_until_end().unwrap();
        let b = base.spline_until_end(Rotation2::exp(-1.0)).unwrap();
        let c = base.constant_until_end().unwrap();

        assert_relative_eq!(base.displacement(), 5.0);
        assert_relative_eq!(a.end(1).heading.value().log(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(b.end(1).heading.value().log(), -1.0, epsilon = 1e-9);
        assert_relative_eq!(
            a.get(2.5, 1).heading.value().log(),
            c.get(2.5, 1).heading.value().log(),
            epsilon = 1e-12
        );
    }
}
