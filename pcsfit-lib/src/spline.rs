use crate::error::{FitError, Result};
use crate::grid::EvaluationGrid;
use crate::knots::KnotSet;

/// How the tridiagonal system is closed at the trailing knot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndCondition {
    /// Zero second derivative at both boundary knots.
    #[default]
    Natural,
    /// Zero second derivative at the first knot; the last row is
    /// `c[n-1] - c[n-2] = 0`, which leaves the final segment quadratic.
    /// This is how the control system's solver is closed.
    QuadraticTail,
}

/// Which segment answers queries at or beyond the last knot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailSegment {
    /// The boundary segment `[x_{n-2}, x_{n-1}]`.
    #[default]
    Last,
    /// One segment further in, `[x_{n-3}, x_{n-2}]`, as the control system's
    /// search does after its final decrement. Falls back to the only segment
    /// when there are two knots.
    Penultimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplineOptions {
    pub end: EndCondition,
    pub tail: TailSegment,
}

impl SplineOptions {
    /// Construction and lookup exactly as the real-time evaluator performs them.
    pub const fn control_system() -> Self {
        SplineOptions {
            end: EndCondition::QuadraticTail,
            tail: TailSegment::Penultimate,
        }
    }
}

/// One cubic piece, `a + b t + c t^2 + d t^3` with `t = x - x_i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Segment {
    // Term order matches the control system's evaluator.
    #[inline]
    pub fn value(&self, t: f64) -> f64 {
        self.a + self.b * t + self.c * t * t + self.d * t * t * t
    }

    #[inline]
    pub fn derivative(&self, t: f64) -> f64 {
        self.b + 2.0 * self.c * t + 3.0 * self.d * t * t
    }

    #[inline]
    pub fn second_derivative(&self, t: f64) -> f64 {
        2.0 * self.c + 6.0 * self.d * t
    }
}

/// Piecewise cubic interpolant through a [`KnotSet`].
///
/// Built once per evaluation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalSpline {
    x: Vec<f64>,
    segments: Vec<Segment>,
    tail: TailSegment,
}

impl NaturalSpline {
    /// Natural cubic spline with boundary-segment extrapolation.
    pub fn new(knots: &KnotSet) -> Result<Self> {
        Self::fit(knots, SplineOptions::default())
    }

    pub fn fit(knots: &KnotSet, options: SplineOptions) -> Result<Self> {
        let n = knots.len();
        if n < 2 {
            return Err(FitError::InsufficientKnots { count: n });
        }
        let x = knots.x();
        let y = knots.y();
        let c = solve_curvatures(x, y, options.end);

        let segments = (0..n - 1)
            .map(|i| {
                let h = x[i + 1] - x[i];
                Segment {
                    a: y[i],
                    b: ((y[i + 1] - y[i]) / h) - ((h * (c[i + 1] + (2.0 * c[i]))) / 3.0),
                    c: c[i],
                    d: (c[i + 1] - c[i]) / (3.0 * h),
                }
            })
            .collect();

        Ok(NaturalSpline {
            x: x.to_vec(),
            segments,
            tail: options.tail,
        })
    }

    pub fn knots_x(&self) -> &[f64] {
        &self.x
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Index of the segment whose polynomial answers a query at `x`.
    ///
    /// A query exactly on interior knot `x_k` uses segment `k`. Queries
    /// outside the knot range use a boundary segment, chosen at the tail
    /// according to [`TailSegment`].
    pub fn segment_index(&self, x: f64) -> usize {
        let last = self.segments.len() - 1;
        if x >= self.x[self.x.len() - 1] {
            return match self.tail {
                TailSegment::Last => last,
                TailSegment::Penultimate => last.saturating_sub(1),
            };
        }
        self.x.partition_point(|&k| k <= x).saturating_sub(1).min(last)
    }

    pub fn value(&self, x: f64) -> f64 {
        let i = self.segment_index(x);
        self.segments[i].value(x - self.x[i])
    }

    pub fn derivative(&self, x: f64) -> f64 {
        let i = self.segment_index(x);
        self.segments[i].derivative(x - self.x[i])
    }

    pub fn second_derivative(&self, x: f64) -> f64 {
        let i = self.segment_index(x);
        self.segments[i].second_derivative(x - self.x[i])
    }

    /// Values at every grid point, in grid order.
    pub fn evaluate(&self, grid: &EvaluationGrid) -> Vec<f64> {
        self.evaluate_at(grid.points())
    }

    pub fn evaluate_at(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.value(x)).collect()
    }
}

/// Builds a natural cubic spline through `knots` and samples it on `grid`.
///
/// Grid points outside the knot range follow the nearest boundary
/// segment's cubic.
pub fn evaluate(knots: &KnotSet, grid: &EvaluationGrid) -> Result<Vec<f64>> {
    evaluate_with(knots, grid, SplineOptions::default())
}

pub fn evaluate_with(
    knots: &KnotSet,
    grid: &EvaluationGrid,
    options: SplineOptions,
) -> Result<Vec<f64>> {
    Ok(NaturalSpline::fit(knots, options)?.evaluate(grid))
}

/// Solves for `c_i`, half the second derivative at each knot.
///
/// Rows 0 and n-1 carry the boundary conditions; interior rows are
/// `h_{i-1} c_{i-1} + 2 (x_{i+1} - x_{i-1}) c_i + h_i c_{i+1} = 3 (s_i - s_{i-1})`
/// with `s_i` the secant slope of segment `i`.
fn solve_curvatures(x: &[f64], y: &[f64], end: EndCondition) -> Vec<f64> {
    let n = x.len();
    let mut sub = vec![0.0; n - 1];
    let mut diag = vec![1.0; n];
    let mut sup = vec![0.0; n - 1];
    let mut rhs = vec![0.0; n];

    sub[n - 2] = match end {
        EndCondition::Natural => 0.0,
        EndCondition::QuadraticTail => -1.0,
    };

    for i in 1..n - 1 {
        diag[i] = 2.0 * (x[i + 1] - x[i - 1]);
        sup[i] = x[i + 1] - x[i];
        sub[i - 1] = x[i] - x[i - 1];
        rhs[i] = 3.0 * (((y[i + 1] - y[i]) / (x[i + 1] - x[i])) - ((y[i] - y[i - 1]) / (x[i] - x[i - 1])));
    }

    solve_tridiagonal(&sub, &mut diag, &sup, &mut rhs);
    rhs
}

/// Thomas algorithm. Solves in place into `rhs`, overwriting `diag`.
///
/// `sub[i]` sits at row `i + 1`, `sup[i]` at row `i`. Stable for the
/// diagonally dominant systems built above.
fn solve_tridiagonal(sub: &[f64], diag: &mut [f64], sup: &[f64], rhs: &mut [f64]) {
    let n = diag.len();
    for i in 1..n {
        let m = sub[i - 1] / diag[i - 1];
        diag[i] -= m * sup[i - 1];
        rhs[i] -= m * rhs[i - 1];
    }

    rhs[n - 1] /= diag[n - 1];
    for i in (1..n).rev() {
        rhs[i - 1] = (rhs[i - 1] - sup[i - 1] * rhs[i]) / diag[i - 1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knots(x: &[f64], y: &[f64]) -> KnotSet {
        KnotSet::new(x.to_vec(), y.to_vec()).unwrap()
    }

    #[test]
    fn test_passes_through_knots() {
        let k = knots(&[0.0, 0.2, 0.45, 0.7, 1.0], &[1.0, 3.0, -2.0, 0.5, 4.0]);
        let spl = NaturalSpline::new(&k).unwrap();
        for (xi, yi) in k.points() {
            let v = spl.value(xi);
            assert!((v - yi).abs() <= 1e-9 * yi.abs().max(1.0), "at {xi}: {v} vs {yi}");
        }
    }

    #[test]
    fn test_two_knots_is_a_line() {
        let spl = NaturalSpline::new(&knots(&[1.0, 3.0], &[2.0, 6.0])).unwrap();
        assert_eq!(spl.segments().len(), 1);
        assert!((spl.value(2.0) - 4.0).abs() < 1e-12);
        assert!((spl.value(5.0) - 10.0).abs() < 1e-12);
        assert!((spl.value(-1.0) - -2.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_data_has_no_curvature() {
        let spl = NaturalSpline::new(&knots(&[0.0, 0.1, 0.5, 0.9], &[1.0, 1.2, 2.0, 2.8])).unwrap();
        for seg in spl.segments() {
            assert!(seg.c.abs() < 1e-12);
            assert!(seg.d.abs() < 1e-12);
        }
    }

    #[test]
    fn test_natural_ends() {
        let spl = NaturalSpline::new(&knots(&[0.0, 0.3, 0.5, 0.9], &[0.0, 2.0, 1.0, 3.0])).unwrap();
        assert!(spl.second_derivative(0.0).abs() < 1e-12);
        assert!(spl.second_derivative(0.9).abs() < 1e-9);
    }

    #[test]
    fn test_interior_continuity() {
        let spl = NaturalSpline::new(&knots(&[0.0, 0.3, 0.5, 0.9, 1.1], &[0.0, 2.0, 1.0, 3.0, 2.5]))
            .unwrap();
        let segs = spl.segments();
        let x = spl.knots_x();
        for i in 1..segs.len() {
            let h = x[i] - x[i - 1];
            let left = segs[i - 1];
            let right = segs[i];
            assert!((left.value(h) - right.value(0.0)).abs() < 1e-10);
            assert!((left.derivative(h) - right.derivative(0.0)).abs() < 1e-9);
            assert!((left.second_derivative(h) - right.second_derivative(0.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_interior_knot_uses_following_segment() {
        let spl = NaturalSpline::new(&knots(&[0.0, 0.5, 1.0], &[0.0, 1.0, 0.0])).unwrap();
        assert_eq!(spl.segment_index(-0.5), 0);
        assert_eq!(spl.segment_index(0.0), 0);
        assert_eq!(spl.segment_index(0.5), 1);
        assert_eq!(spl.segment_index(1.0), 1);
        assert_eq!(spl.segment_index(2.0), 1);
    }

    #[test]
    fn test_quadratic_tail_end() {
        let k = knots(&[0.0, 0.3, 0.5, 0.9], &[0.0, 2.0, 1.0, 3.0]);
        let options = SplineOptions {
            end: EndCondition::QuadraticTail,
            tail: TailSegment::Last,
        };
        let spl = NaturalSpline::fit(&k, options).unwrap();
        let last = spl.segments()[2];
        assert!(last.d.abs() < 1e-12);
        assert!(spl.second_derivative(0.0).abs() < 1e-12);
        assert!((spl.value(0.9) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_penultimate_tail_lookup() {
        let k = knots(&[0.0, 0.6, 0.8], &[0.0, 1.0, 2.0]);
        let spl = NaturalSpline::fit(
            &k,
            SplineOptions {
                end: EndCondition::Natural,
                tail: TailSegment::Penultimate,
            },
        )
        .unwrap();
        assert_eq!(spl.segment_index(0.7), 1);
        assert_eq!(spl.segment_index(0.8), 0);
        assert_eq!(spl.segment_index(1.2), 0);
        let seg = spl.segments()[0];
        assert_eq!(spl.value(1.0), seg.value(1.0));
    }

    #[test]
    fn test_penultimate_with_two_knots() {
        let spl = NaturalSpline::fit(
            &knots(&[0.0, 1.0], &[0.0, 1.0]),
            SplineOptions::control_system(),
        )
        .unwrap();
        assert_eq!(spl.segment_index(3.0), 0);
        assert!((spl.value(3.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_knot_rejected() {
        let err = NaturalSpline::new(&knots(&[0.5], &[1.0])).unwrap_err();
        assert_eq!(err, FitError::InsufficientKnots { count: 1 });
    }
}
