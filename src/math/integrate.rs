//! Numeric integration used to arc-length parameterize curves.

/// Parameters controlling adaptive integration quality.
#[derive(Debug, Clone, Copy)]
pub struct IntegrationParams {
    /// Absolute error target for the whole integral.
    pub tolerance: f64,
    /// Maximum recursion depth of the adaptive subdivision.
    pub max_depth: u32,
}

impl Default for IntegrationParams {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_depth: 24,
        }
    }
}

/// Running integral of a non-negative function, sampled at the points chosen
/// by adaptive Simpson quadrature.
///
/// `sums[i]` is the integral from `params[0]` to `params[i]`; both sequences
/// are non-decreasing, which makes the scan invertible by [`IntegralScan::param_at`].
#[derive(Debug, Clone)]
pub struct IntegralScan {
    params: Vec<f64>,
    sums: Vec<f64>,
}

impl IntegralScan {
    /// Integrates `f` over `[a, b]`.
    #[must_use]
    pub fn new(a: f64, b: f64, params: IntegrationParams, f: impl Fn(f64) -> f64) -> Self {
        let mut scan = Self {
            params: vec![a],
            sums: vec![0.0],
        };
        let fa = f(a);
        let fm = f(0.5 * (a + b));
        let fb = f(b);
        let whole = simpson(a, b, fa, fm, fb);
        scan.refine(
            &f,
            Interval { a, b, fa, fm, fb },
            whole,
            params.tolerance,
            params.max_depth,
        );
        scan
    }

    fn refine(
        &mut self,
        f: &impl Fn(f64) -> f64,
        iv: Interval,
        whole: f64,
        eps: f64,
        depth: u32,
    ) {
        let m = 0.5 * (iv.a + iv.b);
        let flm = f(0.5 * (iv.a + m));
        let frm = f(0.5 * (m + iv.b));
        let left = simpson(iv.a, m, iv.fa, flm, iv.fm);
        let right = simpson(m, iv.b, iv.fm, frm, iv.fb);
        let delta = left + right - whole;

        if depth == 0 || delta.abs() <= 15.0 * eps {
            let correction = delta / 15.0;
            self.push(m, left + 0.5 * correction);
            self.push(iv.b, right + 0.5 * correction);
            return;
        }

        self.refine(
            f,
            Interval {
                a: iv.a,
                b: m,
                fa: iv.fa,
                fm: flm,
                fb: iv.fm,
            },
            left,
            0.5 * eps,
            depth - 1,
        );
        self.refine(
            f,
            Interval {
                a: m,
                b: iv.b,
                fa: iv.fm,
                fm: frm,
                fb: iv.fb,
            },
            right,
            0.5 * eps,
            depth - 1,
        );
    }

    fn push(&mut self, param: f64, piece: f64) {
        let last = self.sums.last().copied().unwrap_or(0.0);
        self.params.push(param);
        self.sums.push(last + piece.max(0.0));
    }

    /// The integral over the whole interval.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.sums.last().copied().unwrap_or(0.0)
    }

    /// Inverts the scan: the parameter at which the running integral reaches
    /// `value`, linearly interpolated between samples and clamped to the
    /// integration interval.
    #[must_use]
    pub fn param_at(&self, value: f64) -> f64 {
        match self.bracket(value) {
            Ok((lo, hi)) => self.lerp(lo, hi, value),
            Err(end) => end,
        }
    }

    /// Like [`IntegralScan::param_at`], then polished with Newton steps
    /// against the integrand `f` that produced the scan.
    #[must_use]
    pub fn invert(&self, value: f64, f: impl Fn(f64) -> f64) -> f64 {
        let (lo, hi) = match self.bracket(value) {
            Ok(bracket) => bracket,
            Err(end) => return end,
        };
        let (a, b) = (self.params[lo], self.params[hi]);
        let fa = f(a);
        let mut t = self.lerp(lo, hi, value);
        for _ in 0..MAX_NEWTON_STEPS {
            let rate = f(t);
            if rate <= 0.0 {
                break;
            }
            let partial = simpson(a, t, fa, f(0.5 * (a + t)), rate);
            let residual = value - self.sums[lo] - partial;
            if residual.abs() <= NEWTON_TOLERANCE {
                break;
            }
            t = (t + residual / rate).clamp(a, b);
        }
        t
    }

    /// Sample indices around `value`, or the clamped endpoint parameter.
    fn bracket(&self, value: f64) -> std::result::Result<(usize, usize), f64> {
        let first = self.params.first().copied().unwrap_or(0.0);
        let last = self.params.last().copied().unwrap_or(first);
        if value <= 0.0 {
            return Err(first);
        }
        if value >= self.total() {
            return Err(last);
        }
        let hi = self.sums.partition_point(|&s| s < value);
        Ok((hi - 1, hi))
    }

    fn lerp(&self, lo: usize, hi: usize, value: f64) -> f64 {
        let span = self.sums[hi] - self.sums[lo];
        if span <= 0.0 {
            return self.params[lo];
        }
        let alpha = (value - self.sums[lo]) / span;
        self.params[lo] + alpha * (self.params[hi] - self.params[lo])
    }

    /// Number of sample points, including both ends.
    #[must_use]
    pub fn samples(&self) -> usize {
        self.params.len()
    }
}

const MAX_NEWTON_STEPS: usize = 8;
const NEWTON_TOLERANCE: f64 = 1e-12;

#[derive(Clone, Copy)]
struct Interval {
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
}

fn simpson(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}
