use std::f64::consts::PI;
use std::ops::{Mul, Sub};

use crate::error::{GeometryError, Result};

use super::dual::DualNum;
use super::vector::Vector2Dual;
use super::{Vector2, EPSILON};

/// A planar rotation stored as a unit complex number `real + i * imag`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation2 {
    pub real: f64,
    pub imag: f64,
}

impl Rotation2 {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        real: 1.0,
        imag: 0.0,
    };

    /// Rotation by `theta` radians.
    #[must_use]
    pub fn exp(theta: f64) -> Self {
        let (imag, real) = theta.sin_cos();
        Self { real, imag }
    }

    /// Rotation pointing along `v`.
    ///
    /// # Errors
    ///
    /// Returns an error if `v` is (numerically) zero.
    pub fn from_vector(v: &Vector2) -> Result<Self> {
        let norm = v.norm();
        if norm < EPSILON {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            real: v.x / norm,
            imag: v.y / norm,
        })
    }

    /// Angle in `(-π, π]`.
    #[must_use]
    pub fn log(&self) -> f64 {
        let theta = self.imag.atan2(self.real);
        if theta <= -PI {
            theta + 2.0 * PI
        } else {
            theta
        }
    }

    /// Unit vector this rotation points along.
    #[must_use]
    pub fn vec(&self) -> Vector2 {
        Vector2::new(self.real, self.imag)
    }

    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            real: self.real,
            imag: -self.imag,
        }
    }
}

impl Mul for Rotation2 {
    type Output = Rotation2;

    fn mul(self, rhs: Self) -> Rotation2 {
        Rotation2 {
            real: self.real * rhs.real - self.imag * rhs.imag,
            imag: self.real * rhs.imag + self.imag * rhs.real,
        }
    }
}

impl Mul<Vector2> for Rotation2 {
    type Output = Vector2;

    fn mul(self, v: Vector2) -> Vector2 {
        Vector2::new(
            self.real * v.x - self.imag * v.y,
            self.imag * v.x + self.real * v.y,
        )
    }
}

impl Sub for Rotation2 {
    type Output = f64;

    /// Signed angle that takes `rhs` to `self`, in `(-π, π]`.
    fn sub(self, rhs: Self) -> f64 {
        (self * rhs.inverse()).log()
    }
}

/// A rotation whose components carry derivatives with respect to `P`.
///
/// Arithmetic happens on the angle: [`Rotation2Dual::exp`] and
/// [`Rotation2Dual::log`] convert between this and a plain angle dual whose
/// first derivative is the angular rate.
pub struct Rotation2Dual<P> {
    pub real: DualNum<P>,
    pub imag: DualNum<P>,
}

impl<P> Rotation2Dual<P> {
    #[must_use]
    pub fn new(real: DualNum<P>, imag: DualNum<P>) -> Self {
        Self { real, imag }
    }

    /// Rotation by a dual angle.
    #[must_use]
    pub fn exp(theta: &DualNum<P>) -> Self {
        Self {
            real: theta.cos(),
            imag: theta.sin(),
        }
    }

    /// A fixed rotation with `n` terms.
    #[must_use]
    pub fn constant(r: Rotation2, n: usize) -> Self {
        Self {
            real: DualNum::constant(r.real, n),
            imag: DualNum::constant(r.imag, n),
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.real.size().min(self.imag.size())
    }

    #[must_use]
    pub fn value(&self) -> Rotation2 {
        Rotation2 {
            real: self.real.value(),
            imag: self.imag.value(),
        }
    }

    /// Angular rate and its derivatives; one term shorter than `self`.
    #[must_use]
    pub fn velocity(&self) -> DualNum<P> {
        &(&self.real * &self.imag.drop(1)) - &(&self.imag * &self.real.drop(1))
    }

    /// The angle as a dual number: the current heading followed by [`Self::velocity`].
    #[must_use]
    pub fn log(&self) -> DualNum<P> {
        self.velocity().add_front(self.value().log())
    }

    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            real: self.real.clone(),
            imag: -&self.imag,
        }
    }

    #[must_use]
    pub fn reparam<Q>(&self, old: &DualNum<Q>) -> Rotation2Dual<Q> {
        Rotation2Dual {
            real: self.real.reparam(old),
            imag: self.imag.reparam(old),
        }
    }

    /// Rotates `v`, carrying derivatives through.
    #[must_use]
    pub fn rotate(&self, v: &Vector2Dual<P>) -> Vector2Dual<P> {
        Vector2Dual::new(
            &(&self.real * &v.x) - &(&self.imag * &v.y),
            &(&self.imag * &v.x) + &(&self.real * &v.y),
        )
    }
}

impl<P> Clone for Rotation2Dual<P> {
    fn clone(&self) -> Self {
        Self {
            real: self.real.clone(),
            imag: self.imag.clone(),
        }
    }
}

impl<P> std::fmt::Debug for Rotation2Dual<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rotation2Dual")
            .field("real", &self.real)
            .field("imag", &self.imag)
            .finish()
    }
}

impl<P> Mul for &Rotation2Dual<P> {
    type Output = Rotation2Dual<P>;

    fn mul(self, rhs: Self) -> Rotation2Dual<P> {
        Rotation2Dual {
            real: &(&self.real * &rhs.real) - &(&self.imag * &rhs.imag),
            imag: &(&self.real * &rhs.imag) + &(&self.imag * &rhs.real),
        }
    }
}

impl<P> Mul<Rotation2> for &Rotation2Dual<P> {
    type Output = Rotation2Dual<P>;

    fn mul(self, rhs: Rotation2) -> Rotation2Dual<P> {
        Rotation2Dual {
            real: &(&self.real * rhs.real) - &(&self.imag * rhs.imag),
            imag: &(&self.real * rhs.imag) + &(&self.imag * rhs.real),
        }
    }
}

impl<P> Mul<&Rotation2Dual<P>> for Rotation2 {
    type Output = Rotation2Dual<P>;

    fn mul(self, rhs: &Rotation2Dual<P>) -> Rotation2Dual<P> {
        rhs * self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;
    use crate::math::ArcLength;

    #[test]
    fn exp_log_round_trip() {
        for theta in [-3.0, -1.0, 0.0, 0.5, 3.1] {
            assert_relative_eq!(Rotation2::exp(theta).log(), theta, epsilon = 1e-12);
        }
    }

    #[test]
    fn log_of_half_turn_is_positive_pi() {
        let r = Rotation2 {
            real: -1.0,
            imag: -0.0,
        };
        assert_relative_eq!(r.log(), PI);
    }

    #[test]
    fn composition_adds_angles() {
        let r = Rotation2::exp(0.4) * Rotation2::exp(0.7);
        assert_relative_eq!(r.log(), 1.1, epsilon = 1e-12);
    }

    #[test]
    fn minus_wraps_to_shortest_angle() {
        let a = Rotation2::exp(3.0);
        let b = Rotation2::exp(-3.0);
        assert_relative_eq!(a - b, 6.0 - 2.0 * PI, epsilon = 1e-12);
        assert_relative_eq!(b - a, 2.0 * PI - 6.0, epsilon = 1e-12);
    }

    #[test]
    fn rotates_vectors() {
        let v = Rotation2::exp(FRAC_PI_2) * Vector2::new(1.0, 0.0);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn from_zero_vector_fails() {
        assert!(Rotation2::from_vector(&Vector2::zeros()).is_err());
    }

    #[test]
    fn dual_exp_log_preserves_rate() {
        let theta = DualNum::<ArcLength>::new(&[0.3, 1.5, -0.2, 0.7]);
        let log = Rotation2Dual::exp(&theta).log();
        assert_eq!(log.size(), 4);
        for (a, e) in log.values().iter().zip(theta.values()) {
            assert_relative_eq!(*a, *e, epsilon = 1e-9);
        }
    }

    #[test]
    fn dual_product_adds_rates() {
        let a = Rotation2Dual::exp(&DualNum::<ArcLength>::new(&[0.1, 1.0, 0.0]));
        let b = Rotation2Dual::exp(&DualNum::<ArcLength>::new(&[0.2, 2.0, 0.5]));
        let log = (&a * &b).log();
        assert_relative_eq!(log[0], 0.3, epsilon = 1e-12);
        assert_relative_eq!(log[1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(log[2], 0.5, epsilon = 1e-12);
    }
}
