use crate::math::{DualNum, Internal, Vector2, Vector2Dual};

use super::PositionPath;

/// A quintic polynomial on `t ∈ [0, 1]` matching value, first and second
/// derivative at both ends.
#[derive(Debug, Clone)]
pub struct QuinticSpline1 {
    /// Coefficients in ascending powers of `t`.
    coeffs: [f64; 6],
}

impl QuinticSpline1 {
    #[must_use]
    pub fn new(
        begin: f64,
        begin_deriv: f64,
        begin_second_deriv: f64,
        end: f64,
        end_deriv: f64,
        end_second_deriv: f64,
    ) -> Self {
        let (p0, v0, a0) = (begin, begin_deriv, begin_second_deriv);
        let (p1, v1, a1) = (end, end_deriv, end_second_deriv);
        Self {
            coeffs: [
                p0,
                v0,
                0.5 * a0,
                -10.0 * p0 - 6.0 * v0 - 1.5 * a0 + 0.5 * a1 - 4.0 * v1 + 10.0 * p1,
                15.0 * p0 + 8.0 * v0 + 1.5 * a0 - a1 + 7.0 * v1 - 15.0 * p1,
                -6.0 * p0 - 3.0 * v0 - 0.5 * a0 + 0.5 * a1 - 3.0 * v1 + 6.0 * p1,
            ],
        }
    }

    /// Value at `t` followed by `n - 1` derivatives.
    #[must_use]
    pub fn get(&self, t: f64, n: usize) -> DualNum<Internal> {
        let n = n.min(6);
        let mut terms = [0.0; 6];
        for (k, term) in terms.iter_mut().enumerate().take(n) {
            // Horner over the coefficients of the k-th derivative.
            *term = (k..6)
                .rev()
                .fold(0.0, |acc, i| acc * t + self.coeffs[i] * falling_factorial(i, k));
        }
        DualNum::new(&terms[..n])
    }
}

/// `i! / (i - k)!`
#[allow(clippy::cast_precision_loss)]
fn falling_factorial(i: usize, k: usize) -> f64 {
    ((i - k + 1)..=i).map(|j| j as f64).product()
}

/// A planar quintic spline with independent per-axis polynomials.
///
/// Not arc-length parameterized; wrap it in an [`super::ArcCurve`] for that.
#[derive(Debug, Clone)]
pub struct QuinticSpline2 {
    x: QuinticSpline1,
    y: QuinticSpline1,
}

impl QuinticSpline2 {
    #[must_use]
    pub fn new(
        begin: Vector2,
        begin_deriv: Vector2,
        begin_second_deriv: Vector2,
        end: Vector2,
        end_deriv: Vector2,
        end_second_deriv: Vector2,
    ) -> Self {
        Self {
            x: QuinticSpline1::new(
                begin.x,
                begin_deriv.x,
                begin_second_deriv.x,
                end.x,
                end_deriv.x,
                end_second_deriv.x,
            ),
            y: QuinticSpline1::new(
                begin.y,
                begin_deriv.y,
                begin_second_deriv.y,
                end.y,
                end_deriv.y,
                end_second_deriv.y,
            ),
        }
    }
}

impl PositionPath<Internal> for QuinticSpline2 {
    fn length(&self) -> f64 {
        1.0
    }

    fn get(&self, t: f64, n: usize) -> Vector2Dual<Internal> {
        Vector2Dual::new(self.x.get(t, n), self.y.get(t, n))
    }
}
