//! Forward-mode automatic differentiation over a single parameter.
//!
//! A [`DualNum`] holds a value followed by its derivatives with respect to
//! one parameter, `[x, dx/dp, d²x/dp², ...]`. Arithmetic between numbers of
//! different arity keeps only the terms both operands know about.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Index, Mul, Neg, Sub};

use smallvec::SmallVec;

/// Parameter marker: arc length along a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcLength {}

/// Parameter marker: the natural parameter of a curve before reparameterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Internal {}

/// Highest derivative order supported by the elementary functions.
pub const MAX_ORDER: usize = 4;

type Terms = SmallVec<[f64; MAX_ORDER + 1]>;

/// A value and its derivatives with respect to the parameter `P`.
pub struct DualNum<P> {
    values: Terms,
    _param: PhantomData<fn() -> P>,
}

impl<P> DualNum<P> {
    /// Creates a dual number from its value followed by its derivatives.
    #[must_use]
    pub fn new(values: &[f64]) -> Self {
        Self::from_terms(Terms::from_slice(values))
    }

    fn from_terms(values: Terms) -> Self {
        Self {
            values,
            _param: PhantomData,
        }
    }

    /// Creates a constant with `n` terms; every derivative is zero.
    #[must_use]
    pub fn constant(c: f64, n: usize) -> Self {
        let mut values = Terms::from_elem(0.0, n);
        if let Some(first) = values.first_mut() {
            *first = c;
        }
        Self::from_terms(values)
    }

    /// Creates the parameter itself evaluated at `x`, with `n` terms.
    #[must_use]
    pub fn variable(x: f64, n: usize) -> Self {
        let mut out = Self::constant(x, n);
        if let Some(d) = out.values.get_mut(1) {
            *d = 1.0;
        }
        out
    }

    /// Number of terms, including the value.
    #[must_use]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// The undifferentiated value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.values.first().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Drops the first `n` terms, e.g. `drop(1)` is the derivative as a dual number.
    #[must_use]
    pub fn drop(&self, n: usize) -> Self {
        Self::from_terms(self.values.iter().skip(n).copied().collect())
    }

    /// Prepends `x` as the new value, shifting every term up one order.
    #[must_use]
    pub fn add_front(&self, x: f64) -> Self {
        let mut values = Terms::with_capacity(self.size() + 1);
        values.push(x);
        values.extend_from_slice(&self.values);
        Self::from_terms(values)
    }

    /// Keeps at most `n` terms.
    #[must_use]
    pub fn truncate(&self, n: usize) -> Self {
        Self::from_terms(self.values.iter().take(n).copied().collect())
    }

    /// Evaluates `f(self)` given `f` and its derivatives at `self.value()`.
    ///
    /// `f_derivs = [f(x), f'(x), f''(x), ...]`. This is Faà di Bruno's
    /// formula, expanded up to [`MAX_ORDER`].
    #[must_use]
    pub fn compose(&self, f_derivs: &[f64]) -> Self {
        let n = self.size().min(f_derivs.len()).min(MAX_ORDER + 1);
        let x = &self.values;
        let f = f_derivs;
        let mut out = Terms::with_capacity(n);
        if n > 0 {
            out.push(f[0]);
        }
        if n > 1 {
            out.push(f[1] * x[1]);
        }
        if n > 2 {
            out.push(f[2] * x[1] * x[1] + f[1] * x[2]);
        }
        if n > 3 {
            out.push(f[3] * x[1].powi(3) + 3.0 * f[2] * x[1] * x[2] + f[1] * x[3]);
        }
        if n > 4 {
            out.push(
                f[4] * x[1].powi(4)
                    + 6.0 * f[3] * x[1] * x[1] * x[2]
                    + f[2] * (3.0 * x[2] * x[2] + 4.0 * x[1] * x[3])
                    + f[1] * x[4],
            );
        }
        Self::from_terms(out)
    }

    /// Re-expresses this number in terms of a new parameter `Q`, where
    /// `old` gives the current parameter as a function of `Q`.
    #[must_use]
    pub fn reparam<Q>(&self, old: &DualNum<Q>) -> DualNum<Q> {
        old.compose(&self.values)
    }

    #[must_use]
    pub fn recip(&self) -> Self {
        let x = self.value();
        let r = 1.0 / x;
        self.compose(&[r, -r * r, 2.0 * r.powi(3), -6.0 * r.powi(4), 24.0 * r.powi(5)])
    }

    #[must_use]
    pub fn sqrt(&self) -> Self {
        let x = self.value();
        let s = x.sqrt();
        self.compose(&[
            s,
            0.5 / s,
            -0.25 / (x * s),
            0.375 / (x * x * s),
            -0.9375 / (x * x * x * s),
        ])
    }

    #[must_use]
    pub fn sin(&self) -> Self {
        let (s, c) = self.value().sin_cos();
        self.compose(&[s, c, -s, -c, s])
    }

    #[must_use]
    pub fn cos(&self) -> Self {
        let (s, c) = self.value().sin_cos();
        self.compose(&[c, -s, -c, s, c])
    }

    fn zip_with(&self, other: &Self, op: impl Fn(f64, f64) -> f64) -> Self {
        Self::from_terms(
            self.values
                .iter()
                .zip(other.values.iter())
                .map(|(&a, &b)| op(a, b))
                .collect(),
        )
    }

    fn map(&self, op: impl Fn(f64) -> f64) -> Self {
        Self::from_terms(self.values.iter().map(|&a| op(a)).collect())
    }
}

#[allow(clippy::cast_precision_loss)]
fn binomial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |c, i| c * (n - i) as f64 / (i + 1) as f64)
}

impl<P> Clone for DualNum<P> {
    fn clone(&self) -> Self {
        Self::from_terms(self.values.clone())
    }
}

impl<P> PartialEq for DualNum<P> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<P> fmt::Debug for DualNum<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DualNum").field(&self.values.as_slice()).finish()
    }
}

impl<P> Index<usize> for DualNum<P> {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.values[i]
    }
}

impl<P> Add for &DualNum<P> {
    type Output = DualNum<P>;

    fn add(self, rhs: Self) -> DualNum<P> {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<P> Sub for &DualNum<P> {
    type Output = DualNum<P>;

    fn sub(self, rhs: Self) -> DualNum<P> {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<P> Mul for &DualNum<P> {
    type Output = DualNum<P>;

    /// General Leibniz rule.
    fn mul(self, rhs: Self) -> DualNum<P> {
        let n = self.size().min(rhs.size());
        DualNum::from_terms(
            (0..n)
                .map(|i| {
                    (0..=i)
                        .map(|k| binomial(i, k) * self.values[k] * rhs.values[i - k])
                        .sum()
                })
                .collect(),
        )
    }
}

impl<P> Div for &DualNum<P> {
    type Output = DualNum<P>;

    fn div(self, rhs: Self) -> DualNum<P> {
        self * &rhs.recip()
    }
}

impl<P> Neg for &DualNum<P> {
    type Output = DualNum<P>;

    fn neg(self) -> DualNum<P> {
        self.map(|a| -a)
    }
}

impl<P> Add<f64> for &DualNum<P> {
    type Output = DualNum<P>;

    fn add(self, rhs: f64) -> DualNum<P> {
        let mut out = self.clone();
        if let Some(first) = out.values.first_mut() {
            *first += rhs;
        }
        out
    }
}

impl<P> Sub<f64> for &DualNum<P> {
    type Output = DualNum<P>;

    fn sub(self, rhs: f64) -> DualNum<P> {
        self + (-rhs)
    }
}

impl<P> Mul<f64> for &DualNum<P> {
    type Output = DualNum<P>;

    fn mul(self, rhs: f64) -> DualNum<P> {
        self.map(|a| a * rhs)
    }
}

impl<P> Div<f64> for &DualNum<P> {
    type Output = DualNum<P>;

    fn div(self, rhs: f64) -> DualNum<P> {
        self.map(|a| a / rhs)
    }
}

macro_rules! forward_owned {
    ($($trait:ident :: $method:ident),*) => {$(
        impl<P> $trait for DualNum<P> {
            type Output = DualNum<P>;

            fn $method(self, rhs: Self) -> DualNum<P> {
                (&self).$method(&rhs)
            }
        }

        impl<P> $trait<f64> for DualNum<P> {
            type Output = DualNum<P>;

            fn $method(self, rhs: f64) -> DualNum<P> {
                (&self).$method(rhs)
            }
        }
    )*};
}

forward_owned!(Add::add, Sub::sub, Mul::mul, Div::div);

impl<P> Neg for DualNum<P> {
    type Output = DualNum<P>;

    fn neg(self) -> DualNum<P> {
        -&self
    }
}
