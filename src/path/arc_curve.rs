use crate::math::{ArcLength, DualNum, IntegralScan, IntegrationParams, Internal, Vector2Dual};

use super::PositionPath;

/// Arc-length reparameterization of an arbitrary-speed curve.
///
/// The speed `|c'(t)|` is integrated once at construction; queries invert the
/// resulting scan to find `t(s)` and then push the derivatives of `t(s)`
/// through the chain rule, so callers see `|dP/ds| = 1` everywhere.
#[derive(Debug, Clone)]
pub struct ArcCurve<C> {
    curve: C,
    scan: IntegralScan,
}

impl<C: PositionPath<Internal>> ArcCurve<C> {
    #[must_use]
    pub fn new(curve: C, params: IntegrationParams) -> Self {
        let scan = IntegralScan::new(0.0, curve.length(), params, |t| speed(&curve, t));
        Self { curve, scan }
    }

    #[must_use]
    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// The curve parameter `t(s)` and `n - 1` of its arc-length derivatives.
    fn param(&self, s: f64, n: usize) -> DualNum<ArcLength> {
        let t = self.scan.invert(s, |t| speed(&self.curve, t));
        // dt/ds = 1 / |c'(t)|, as a function of t
        let rate = self.curve.get(t, n + 1).drop(1).norm().recip();

        // d^k t / ds^k = d^(k-1)/ds^(k-1) rate(t(s)), built up one order at a time
        let mut t_s = DualNum::<ArcLength>::new(&[t]);
        for _ in 1..n {
            t_s = rate.reparam(&t_s).add_front(t);
        }
        t_s
    }
}

fn speed<C: PositionPath<Internal>>(curve: &C, t: f64) -> f64 {
    curve.get(t, 2).drop(1).value().norm()
}

impl<C: PositionPath<Internal>> PositionPath<ArcLength> for ArcCurve<C> {
    fn length(&self) -> f64 {
        self.scan.total()
    }

    fn get(&self, s: f64, n: usize) -> Vector2Dual<ArcLength> {
        let t = self.param(s, n);
        self.curve.get(t.value(), n).reparam(&t)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Vector2;
    use crate::path::QuinticSpline2;

    fn straight_spline() -> QuinticSpline2 {
        // Straight line with non-uniform speed along x.
        QuinticSpline2::new(
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::zeros(),
            Vector2::new(4.0, 0.0),
            Vector2::new(8.0, 0.0),
            Vector2::zeros(),
        )
    }

    fn curved_spline() -> QuinticSpline2 {
        QuinticSpline2::new(
            Vector2::new(0.0, 0.0),
            Vector2::new(20.0, 0.0),
            Vector2::zeros(),
            Vector2::new(10.0, 10.0),
            Vector2::new(0.0, 20.0),
            Vector2::zeros(),
        )
    }

    #[test]
    fn straight_curve_has_chord_length() {
        let curve = ArcCurve::new(straight_spline(), IntegrationParams::default());
        assert_relative_eq!(curve.length(), 4.0, epsilon = 1e-6);
        let mid = curve.get(1.5, 2);
        assert_relative_eq!(mid.value().x, 1.5, epsilon = 1e-4);
        assert_relative_eq!(mid.drop(1).value().x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn tangent_is_unit_length() {
        let curve = ArcCurve::new(curved_spline(), IntegrationParams::default());
        for i in 0..=10 {
            let s = curve.length() * f64::from(i) / 10.0;
            let tangent = curve.get(s, 2).drop(1).value();
            assert_relative_eq!(tangent.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn curvature_is_orthogonal_to_tangent() {
        let curve = ArcCurve::new(curved_spline(), IntegrationParams::default());
        let p = curve.get(0.4 * curve.length(), 3);
        let tangent = p.drop(1).value();
        let second = p.drop(2).value();
        assert_relative_eq!(tangent.dot(&second), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn endpoints_match_underlying_curve() {
        let spline = curved_spline();
        let curve = ArcCurve::new(spline.clone(), IntegrationParams::default());
        let begin = curve.begin(1).value();
        let end = curve.end(1).value();
        assert_relative_eq!(begin.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(end.x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(end.y, 10.0, epsilon = 1e-12);
    }
}
