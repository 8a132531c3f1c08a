use crate::error::{InputError, Result};

/// An ordered set of points a spline must pass through exactly.
///
/// Construction guarantees equal-length, finite, non-empty coordinates with
/// strictly increasing abscissas.
#[derive(Debug, Clone, PartialEq)]
pub struct KnotSet {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl KnotSet {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(InputError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            }
            .into());
        }
        if x.is_empty() {
            return Err(InputError::Empty.into());
        }
        check_finite(&x, &y)?;
        if let Some(index) = (1..x.len()).find(|&i| x[i] <= x[i - 1]) {
            return Err(InputError::NotStrictlyIncreasing { index }.into());
        }
        Ok(KnotSet { x, y })
    }

    /// Builds a knot set without re-validating. Callers uphold the invariants.
    pub(crate) fn from_sorted(x: Vec<f64>, y: Vec<f64>) -> Self {
        debug_assert_eq!(x.len(), y.len());
        debug_assert!(x.windows(2).all(|w| w[0] < w[1]));
        KnotSet { x, y }
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Keeps only the first `n` knots (all of them if `n >= len`, at least one).
    pub fn truncated(mut self, n: usize) -> Self {
        let keep = n.max(1).min(self.x.len());
        self.x.truncate(keep);
        self.y.truncate(keep);
        self
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.x, self.y)
    }
}

pub(crate) fn check_finite(x: &[f64], y: &[f64]) -> Result<()> {
    match x
        .iter()
        .zip(y)
        .position(|(a, b)| !a.is_finite() || !b.is_finite())
    {
        Some(index) => Err(InputError::NonFinite { index }.into()),
        None => Ok(()),
    }
}
