use crate::error::{GeometryError, Result};
use crate::math::{ArcLength, DualNum, Vector2, Vector2Dual, EPSILON};

use super::PositionPath;

/// A straight segment from `begin` to `end`, parameterized by arc length.
///
/// The parametric form is: `P(s) = begin + s * direction`.
#[derive(Debug, Clone)]
pub struct Line {
    begin: Vector2,
    end: Vector2,
    direction: Vector2,
    length: f64,
}

impl Line {
    /// Creates a new line between two points.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn new(begin: Vector2, end: Vector2) -> Result<Self> {
        let diff = end - begin;
        let length = diff.norm();
        if length < EPSILON {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            begin,
            end,
            direction: diff / length,
            length,
        })
    }

    #[must_use]
    pub fn begin_point(&self) -> &Vector2 {
        &self.begin
    }

    #[must_use]
    pub fn end_point(&self) -> &Vector2 {
        &self.end
    }

    /// Returns the unit direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }
}

impl PositionPath<ArcLength> for Line {
    fn length(&self) -> f64 {
        self.length
    }

    fn get(&self, s: f64, n: usize) -> Vector2Dual<ArcLength> {
        let s = DualNum::variable(s, n);
        Vector2Dual::new(
            &(&s * self.direction.x) + self.begin.x,
            &(&s * self.direction.y) + self.begin.y,
        )
    }
}
