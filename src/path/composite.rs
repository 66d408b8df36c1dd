use std::sync::Arc;

use crate::error::{PathError, Result};
use crate::math::{ArcLength, Pose2Dual, Rotation2, Vector2Dual};

use super::{PosePath, PositionPath, SharedPositionPath};

/// Cumulative begin displacement of each segment.
#[derive(Debug, Clone)]
struct Breakpoints {
    offsets: Vec<f64>,
    length: f64,
}

impl Breakpoints {
    fn new(lengths: impl IntoIterator<Item = f64>) -> Self {
        let mut offsets = Vec::new();
        let mut length = 0.0;
        for l in lengths {
            offsets.push(length);
            length += l;
        }
        Self { offsets, length }
    }

    /// Segment index and local displacement for global displacement `s`.
    ///
    /// Segments are half-open `[begin, end)` except the last, which also
    /// owns its end; out-of-range queries extrapolate the first/last segment.
    fn locate(&self, s: f64) -> (usize, f64) {
        let last = self.offsets.len().saturating_sub(1);
        let index = self
            .offsets
            .partition_point(|&begin| begin <= s)
            .saturating_sub(1)
            .min(last);
        (index, s - self.offsets.get(index).copied().unwrap_or(0.0))
    }
}

/// An ordered concatenation of arc-length position paths.
#[derive(Clone)]
pub struct CompositePositionPath {
    segments: Vec<SharedPositionPath>,
    breakpoints: Breakpoints,
}

impl CompositePositionPath {
    /// Concatenates `segments`, checking that each one begins where the
    /// previous one ends, in position and in tangent, within `eps`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no segments or two neighbours do not meet.
    pub fn new(segments: Vec<SharedPositionPath>, eps: f64) -> Result<Self> {
        for (index, pair) in segments.windows(2).enumerate() {
            let end = pair[0].end(2);
            let begin = pair[1].begin(2);
            let gap = (begin.value() - end.value()).norm();
            if gap > eps {
                return Err(PathError::PositionDiscontinuity {
                    index: index + 1,
                    gap,
                }
                .into());
            }
            let turn = tangent_angle(&begin) - tangent_angle(&end);
            if turn.abs() > eps {
                return Err(PathError::TangentDiscontinuity {
                    index: index + 1,
                    gap: turn,
                }
                .into());
            }
        }
        Self::from_segments(segments)
    }

    /// Concatenates segments already known to be continuous.
    pub(crate) fn from_segments(segments: Vec<SharedPositionPath>) -> Result<Self> {
        if segments.is_empty() {
            return Err(PathError::Empty.into());
        }
        let breakpoints = Breakpoints::new(segments.iter().map(|p| p.length()));
        Ok(Self {
            segments,
            breakpoints,
        })
    }

    #[must_use]
    pub fn segments(&self) -> &[SharedPositionPath] {
        &self.segments
    }

    /// Segment index and local arc length for global arc length `s`.
    #[must_use]
    pub fn locate(&self, s: f64) -> (usize, f64) {
        self.breakpoints.locate(s)
    }

    /// Global arc length at which each segment begins.
    #[must_use]
    pub fn offsets(&self) -> &[f64] {
        &self.breakpoints.offsets
    }
}

fn tangent_angle(p: &Vector2Dual<ArcLength>) -> Rotation2 {
    let d = p.drop(1).value();
    Rotation2::exp(d.y.atan2(d.x))
}

impl PositionPath<ArcLength> for CompositePositionPath {
    fn length(&self) -> f64 {
        self.breakpoints.length
    }

    fn get(&self, s: f64, n: usize) -> Vector2Dual<ArcLength> {
        let (index, local) = self.locate(s);
        self.segments[index].get(local, n)
    }
}

impl std::fmt::Debug for CompositePositionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositePositionPath")
            .field("offsets", &self.breakpoints.offsets)
            .field("length", &self.breakpoints.length)
            .finish_non_exhaustive()
    }
}

/// An ordered concatenation of pose paths.
#[derive(Clone)]
pub struct CompositePosePath {
    segments: Vec<Arc<dyn PosePath>>,
    breakpoints: Breakpoints,
}

impl CompositePosePath {
    /// Concatenates `segments`, checking that each heading picks up where the
    /// previous one left off, within `eps`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no segments or two neighbours disagree.
    pub fn new(segments: Vec<Arc<dyn PosePath>>, eps: f64) -> Result<Self> {
        let mut disp = 0.0;
        for pair in segments.windows(2) {
            disp += pair[0].length();
            let expected = pair[0].end(1).heading.value();
            let actual = pair[1].begin(1).heading.value();
            if (actual - expected).abs() > eps {
                return Err(PathError::HeadingDiscontinuity {
                    disp,
                    expected: expected.log(),
                    actual: actual.log(),
                }
                .into());
            }
        }
        Self::from_segments(segments)
    }

    pub(crate) fn from_segments(segments: Vec<Arc<dyn PosePath>>) -> Result<Self> {
        if segments.is_empty() {
            return Err(PathError::Empty.into());
        }
        let breakpoints = Breakpoints::new(segments.iter().map(|p| p.length()));
        Ok(Self {
            segments,
            breakpoints,
        })
    }

    #[must_use]
    pub fn segments(&self) -> &[Arc<dyn PosePath>] {
        &self.segments
    }

    #[must_use]
    pub fn locate(&self, s: f64) -> (usize, f64) {
        self.breakpoints.locate(s)
    }

    #[must_use]
    pub fn offsets(&self) -> &[f64] {
        &self.breakpoints.offsets
    }
}

impl PosePath for CompositePosePath {
    fn length(&self) -> f64 {
        self.breakpoints.length
    }

    fn get(&self, s: f64, n: usize) -> Pose2Dual<ArcLength> {
        let (index, local) = self.locate(s);
        self.segments[index].get(local, n)
    }
}

impl std::fmt::Debug for CompositePosePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositePosePath")
            .field("offsets", &self.breakpoints.offsets)
            .field("length", &self.breakpoints.length)
            .finish_non_exhaustive()
    }
}
