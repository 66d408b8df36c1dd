use std::ops::{Add, Mul, Sub};

use super::dual::DualNum;
use super::rotation::Rotation2Dual;
use super::Vector2;

/// A planar vector whose components carry derivatives with respect to `P`.
pub struct Vector2Dual<P> {
    pub x: DualNum<P>,
    pub y: DualNum<P>,
}

impl<P> Vector2Dual<P> {
    #[must_use]
    pub fn new(x: DualNum<P>, y: DualNum<P>) -> Self {
        Self { x, y }
    }

    /// A fixed vector with `n` terms.
    #[must_use]
    pub fn constant(v: Vector2, n: usize) -> Self {
        Self {
            x: DualNum::constant(v.x, n),
            y: DualNum::constant(v.y, n),
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.x.size().min(self.y.size())
    }

    #[must_use]
    pub fn value(&self) -> Vector2 {
        Vector2::new(self.x.value(), self.y.value())
    }

    #[must_use]
    pub fn drop(&self, n: usize) -> Self {
        Self {
            x: self.x.drop(n),
            y: self.y.drop(n),
        }
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> DualNum<P> {
        &(&self.x * &other.x) + &(&self.y * &other.y)
    }

    #[must_use]
    pub fn sqr_norm(&self) -> DualNum<P> {
        self.dot(self)
    }

    #[must_use]
    pub fn norm(&self) -> DualNum<P> {
        self.sqr_norm().sqrt()
    }

    #[must_use]
    pub fn reparam<Q>(&self, old: &DualNum<Q>) -> Vector2Dual<Q> {
        Vector2Dual {
            x: self.x.reparam(old),
            y: self.y.reparam(old),
        }
    }

    /// Reads a unit vector as the rotation pointing along it.
    #[must_use]
    pub fn angle_cast(&self) -> Rotation2Dual<P> {
        Rotation2Dual::new(self.x.clone(), self.y.clone())
    }
}

impl<P> Clone for Vector2Dual<P> {
    fn clone(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
        }
    }
}

impl<P> std::fmt::Debug for Vector2Dual<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vector2Dual")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<P> Add for &Vector2Dual<P> {
    type Output = Vector2Dual<P>;

    fn add(self, rhs: Self) -> Vector2Dual<P> {
        Vector2Dual::new(&self.x + &rhs.x, &self.y + &rhs.y)
    }
}

impl<P> Add<Vector2> for &Vector2Dual<P> {
    type Output = Vector2Dual<P>;

    fn add(self, rhs: Vector2) -> Vector2Dual<P> {
        Vector2Dual::new(&self.x + rhs.x, &self.y + rhs.y)
    }
}

impl<P> Sub for &Vector2Dual<P> {
    type Output = Vector2Dual<P>;

    fn sub(self, rhs: Self) -> Vector2Dual<P> {
        Vector2Dual::new(&self.x - &rhs.x, &self.y - &rhs.y)
    }
}

impl<P> Mul<&DualNum<P>> for &Vector2Dual<P> {
    type Output = Vector2Dual<P>;

    fn mul(self, rhs: &DualNum<P>) -> Vector2Dual<P> {
        Vector2Dual::new(&self.x * rhs, &self.y * rhs)
    }
}

impl<P> Mul<f64> for &Vector2Dual<P> {
    type Output = Vector2Dual<P>;

    fn mul(self, rhs: f64) -> Vector2Dual<P> {
        Vector2Dual::new(&self.x * rhs, &self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Internal;

    #[test]
    fn norm_of_moving_point() {
        // (3t, 4t) at t = 1: |v| = 5t -> [5, 5, 0]
        let t = DualNum::<Internal>::variable(1.0, 3);
        let v = Vector2Dual::new(&t * 3.0, &t * 4.0);
        let n = v.norm();
        assert_relative_eq!(n[0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(n[1], 5.0, epsilon = 1e-12);
        assert_relative_eq!(n[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn angle_cast_of_unit_circle_has_unit_rate() {
        let t = DualNum::<Internal>::variable(0.4, 3);
        let v = Vector2Dual::new(t.cos(), t.sin());
        let log = v.angle_cast().log();
        assert_relative_eq!(log[0], 0.4, epsilon = 1e-12);
        assert_relative_eq!(log[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(log[2], 0.0, epsilon = 1e-12);
    }
}
