use crate::math::{ArcLength, DualNum, Rotation2, Rotation2Dual};

use super::{PositionPath, PositionPathView, QuinticSpline1};

/// A heading profile over a local displacement interval `[0, length]`.
pub trait HeadingPath {
    fn length(&self) -> f64;

    /// Heading at local displacement `s` carrying `n` terms.
    fn get(&self, s: f64, n: usize) -> Rotation2Dual<ArcLength>;
}

/// Holds one heading for the whole interval.
#[derive(Debug, Clone)]
pub struct ConstantHeadingPath {
    heading: Rotation2,
    length: f64,
}

impl ConstantHeadingPath {
    #[must_use]
    pub fn new(heading: Rotation2, length: f64) -> Self {
        Self { heading, length }
    }
}

impl HeadingPath for ConstantHeadingPath {
    fn length(&self) -> f64 {
        self.length
    }

    fn get(&self, _s: f64, n: usize) -> Rotation2Dual<ArcLength> {
        Rotation2Dual::constant(self.heading, n)
    }
}

/// Turns at a constant rate, sweeping `angle` radians over the interval.
#[derive(Debug, Clone)]
pub struct LinearHeadingPath {
    begin: Rotation2,
    angle: f64,
    length: f64,
}

impl LinearHeadingPath {
    #[must_use]
    pub fn new(begin: Rotation2, angle: f64, length: f64) -> Self {
        Self {
            begin,
            angle,
            length,
        }
    }
}

impl HeadingPath for LinearHeadingPath {
    fn length(&self) -> f64 {
        self.length
    }

    fn get(&self, s: f64, n: usize) -> Rotation2Dual<ArcLength> {
        let theta = &DualNum::<ArcLength>::variable(s, n) * (self.angle / self.length);
        self.begin * &Rotation2Dual::exp(&theta)
    }
}

/// Faces along the underlying path's tangent, rotated by a fixed offset.
#[derive(Debug, Clone)]
pub struct TangentPath {
    path: PositionPathView,
    offset: Rotation2,
}

impl TangentPath {
    #[must_use]
    pub fn new(path: PositionPathView, offset: Rotation2) -> Self {
        Self { path, offset }
    }
}

impl HeadingPath for TangentPath {
    fn length(&self) -> f64 {
        self.path.length()
    }

    fn get(&self, s: f64, n: usize) -> Rotation2Dual<ArcLength> {
        self.offset * &self.path.get(s, n + 1).drop(1).angle_cast()
    }
}

/// Quintic interpolation of the heading angle between a begin heading with
/// its rates and an end heading with its rates.
#[derive(Debug, Clone)]
pub struct SplineHeadingPath {
    begin: Rotation2,
    spline: QuinticSpline1,
    length: f64,
}

impl SplineHeadingPath {
    /// `begin` and `end` should carry at least three terms (heading, rate,
    /// rate derivative); missing terms are taken as zero.
    #[must_use]
    pub fn new(begin: &Rotation2Dual<ArcLength>, end: &Rotation2Dual<ArcLength>, length: f64) -> Self {
        let b = begin.log();
        let e = end.log();
        let sweep = end.value() - begin.value();
        // Angles are relative to the begin heading; derivatives are rescaled
        // from arc length to the spline's unit parameter.
        let spline = QuinticSpline1::new(
            0.0,
            term(&b, 1) * length,
            term(&b, 2) * length * length,
            sweep,
            term(&e, 1) * length,
            term(&e, 2) * length * length,
        );
        Self {
            begin: begin.value(),
            spline,
            length,
        }
    }
}

fn term(d: &DualNum<ArcLength>, i: usize) -> f64 {
    d.values().get(i).copied().unwrap_or(0.0)
}

impl HeadingPath for SplineHeadingPath {
    fn length(&self) -> f64 {
        self.length
    }

    fn get(&self, s: f64, n: usize) -> Rotation2Dual<ArcLength> {
        let u = &DualNum::<ArcLength>::variable(s, n) / self.length;
        let angle = self.spline.get(u.value(), n).reparam(&u);
        self.begin * &Rotation2Dual::exp(&angle)
    }
}
