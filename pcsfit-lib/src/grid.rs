use crate::constants::{PROFILE_EDGE, PROFILE_POINTS, PROFILE_STEP};
use crate::error::{InputError, Result};

/// How the query abscissas of an [`EvaluationGrid`] are generated.
///
/// Two definitions are in circulation. The offline comparison tooling spans
/// the domain linearly, while the real-time control system steps from zero
/// by a fixed increment computed in single precision (`i * 0.01f`). Over
/// [0, 1.2] with 121 points both nominally give `0.00, 0.01, ..., 1.20`, but
/// they round differently, so a bit-level comparison has to pick the one
/// that matches the system under test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridPolicy {
    /// `start + i * (stop - start) / (count - 1)`, last point pinned to `stop`.
    LinearSpan { start: f64, stop: f64 },
    /// `start + step * i` in double precision.
    ArithmeticStep { start: f64, step: f64 },
    /// `i * step` rounded to `f32`, then widened.
    SingleStep { step: f32 },
}

impl GridPolicy {
    pub const fn profile() -> Self {
        GridPolicy::LinearSpan {
            start: 0.0,
            stop: PROFILE_EDGE,
        }
    }

    pub const fn control_system() -> Self {
        GridPolicy::SingleStep {
            step: PROFILE_STEP as f32,
        }
    }

    fn generate(self, count: usize) -> Vec<f64> {
        match self {
            GridPolicy::LinearSpan { start, stop } => linear_span(start, stop, count),
            GridPolicy::ArithmeticStep { start, step } => {
                (0..count).map(|i| start + step * i as f64).collect()
            }
            GridPolicy::SingleStep { step } => {
                (0..count).map(|i| (i as f32 * step) as f64).collect()
            }
        }
    }
}

impl Default for GridPolicy {
    fn default() -> Self {
        Self::profile()
    }
}

/// Fixed, strictly increasing set of query abscissas.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationGrid {
    policy: GridPolicy,
    points: Vec<f64>,
}

impl EvaluationGrid {
    pub fn new(policy: GridPolicy, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(InputError::EmptyGrid.into());
        }
        let points = policy.generate(count);
        if let Some(index) = (1..points.len()).find(|&i| !(points[i] > points[i - 1])) {
            return Err(InputError::NotStrictlyIncreasing { index }.into());
        }
        Ok(EvaluationGrid { policy, points })
    }

    /// The 121-point linear-span grid over [0, 1.2] used for offline fits.
    pub fn profile() -> Self {
        Self::builtin(GridPolicy::profile())
    }

    /// The 121-point fixed-step grid the control system evaluates on.
    pub fn control_system() -> Self {
        Self::builtin(GridPolicy::control_system())
    }

    /// A 121-point grid under the given policy.
    pub fn with_policy(policy: GridPolicy) -> Result<Self> {
        Self::new(policy, PROFILE_POINTS)
    }

    // Built-in policies are increasing over [0, 1.2].
    fn builtin(policy: GridPolicy) -> Self {
        let points = policy.generate(PROFILE_POINTS);
        debug_assert!(points.windows(2).all(|w| w[0] < w[1]));
        EvaluationGrid { policy, points }
    }

    pub fn policy(&self) -> GridPolicy {
        self.policy
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the grid point closest to `x`.
    pub fn nearest_index(&self, x: f64) -> usize {
        let hi = self.points.partition_point(|&g| g < x);
        if hi == 0 {
            return 0;
        }
        if hi >= self.points.len() {
            return self.points.len() - 1;
        }
        if (self.points[hi] - x) < (x - self.points[hi - 1]) {
            hi
        } else {
            hi - 1
        }
    }
}

impl Default for EvaluationGrid {
    fn default() -> Self {
        Self::profile()
    }
}

// Same arithmetic as numpy.linspace so offline profiles line up bit for bit.
fn linear_span(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![start];
    }
    let step = (stop - start) / (count - 1) as f64;
    let mut points: Vec<f64> = (0..count).map(|i| i as f64 * step + start).collect();
    points[count - 1] = stop;
    points
}
