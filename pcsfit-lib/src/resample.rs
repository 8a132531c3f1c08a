//! Reduction of a dense measured curve to a handful of representative knots.
//!
//! Samples are swept left to right into bins. Each sample carries a weight
//!
//! ```text
//! w_j = ((h_j / h_mean) / (1 + r_j / r_mean)) ^ power
//! ```
//!
//! where `h_j` is the local sample spacing and `r_j` the local roughness,
//! the distance of `y_j` from the chord through its two neighbours. A bin
//! is emitted as the mean of its samples once its weight reaches one half
//! and its mean abscissa clears the previous knot by `min_spacing`. Densely
//! sampled or noisy stretches therefore collapse into fewer knots while
//! sparse, smooth stretches keep their samples. As `power` goes to zero
//! every weight tends to one, so with `min_spacing == 0` each sample
//! becomes its own knot.

use crate::error::{InputError, Result};
use crate::knots::{KnotSet, check_finite};

/// Accumulated weight at which a bin may close; a sample weighing more
/// than this closes a bin on its own.
const CLOSE_WEIGHT: f64 = 0.5;

/// Weighting exponent and hard spacing floor for [`reduce`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReduceParams {
    pub power: f64,
    pub min_spacing: f64,
}

impl ReduceParams {
    /// Parameters under which [`reduce`] returns its input unchanged.
    pub const IDENTITY: ReduceParams = ReduceParams {
        power: 0.0,
        min_spacing: 0.0,
    };

    pub fn validate(&self) -> Result<()> {
        if !(self.power >= 0.0) || !self.power.is_finite() {
            return Err(InputError::NegativePower(self.power).into());
        }
        if !(self.min_spacing >= 0.0) || !self.min_spacing.is_finite() {
            return Err(InputError::NegativeSpacing(self.min_spacing).into());
        }
        Ok(())
    }

    pub fn reduce(&self, raw_x: &[f64], raw_y: &[f64]) -> Result<KnotSet> {
        reduce(raw_x, raw_y, self.power, self.min_spacing)
    }
}

impl Default for ReduceParams {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// What to do with the final knot of a reduced set.
///
/// The archived fit points end in a point left over by the data-collection
/// logic, which callers usually discard before fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingKnot {
    #[default]
    Keep,
    Drop,
}

impl TrailingKnot {
    /// Applies the policy. A single-knot set is returned as is.
    pub fn apply(self, knots: KnotSet) -> KnotSet {
        match self {
            TrailingKnot::Keep => knots,
            TrailingKnot::Drop => {
                let n = knots.len();
                knots.truncated(n.saturating_sub(1))
            }
        }
    }
}

/// Reduces `(raw_x, raw_y)` to a knot set with strictly increasing x whose
/// consecutive abscissas differ by at least `min_spacing`.
///
/// `raw_x` must be ascending (ties allowed). The output never has more
/// points than the input, and its last point is kept even though callers
/// often drop it (see [`TrailingKnot`]).
pub fn reduce(raw_x: &[f64], raw_y: &[f64], power: f64, min_spacing: f64) -> Result<KnotSet> {
    if raw_x.len() != raw_y.len() {
        return Err(InputError::LengthMismatch {
            x: raw_x.len(),
            y: raw_y.len(),
        }
        .into());
    }
    ReduceParams { power, min_spacing }.validate()?;
    if raw_x.is_empty() {
        return Err(InputError::Empty.into());
    }
    check_finite(raw_x, raw_y)?;
    if let Some(index) = (1..raw_x.len()).find(|&i| raw_x[i] < raw_x[i - 1]) {
        return Err(InputError::NotAscending { index }.into());
    }

    let weights = sample_weights(raw_x, raw_y, power);

    let mut knots = Knots::default();
    let mut bin = Bin::default();
    for ((&x, &y), &w) in raw_x.iter().zip(raw_y).zip(&weights) {
        bin.push(x, y, w);
        if bin.weight >= CLOSE_WEIGHT && knots.clears(bin.mean_x(), min_spacing) {
            knots.push(std::mem::take(&mut bin));
        }
    }

    if bin.count > 0 {
        if knots.clears(bin.mean_x(), min_spacing) {
            knots.push(bin);
        } else {
            // Leftover samples all lie right of the last knot's samples, so
            // folding them in only moves that knot further from its neighbour.
            knots.merge_into_last(bin);
        }
    }

    Ok(KnotSet::from_sorted(knots.x, knots.y))
}

fn sample_weights(x: &[f64], y: &[f64], power: f64) -> Vec<f64> {
    let n = x.len();
    if power == 0.0 || n < 3 {
        return vec![1.0; n];
    }

    let spacing: Vec<f64> = (0..n)
        .map(|j| match j {
            0 => x[1] - x[0],
            j if j == n - 1 => x[n - 1] - x[n - 2],
            j => 0.5 * (x[j + 1] - x[j - 1]),
        })
        .collect();
    let roughness: Vec<f64> = (0..n)
        .map(|j| {
            if j == 0 || j == n - 1 {
                return 0.0;
            }
            let span = x[j + 1] - x[j - 1];
            if span <= 0.0 {
                return 0.0;
            }
            let t = (x[j] - x[j - 1]) / span;
            let chord = y[j - 1] + t * (y[j + 1] - y[j - 1]);
            (y[j] - chord).abs()
        })
        .collect();

    let mean_spacing = mean(&spacing);
    let mean_roughness = mean(&roughness);

    spacing
        .iter()
        .zip(&roughness)
        .map(|(&h, &r)| {
            let sparse = if mean_spacing > 0.0 { h / mean_spacing } else { 1.0 };
            let smooth = if mean_roughness > 0.0 {
                1.0 + r / mean_roughness
            } else {
                1.0
            };
            (sparse / smooth).powf(power)
        })
        .collect()
}

fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / v.len() as f64
}

#[derive(Debug, Default)]
struct Bin {
    sum_x: f64,
    sum_y: f64,
    count: usize,
    weight: f64,
}

impl Bin {
    fn push(&mut self, x: f64, y: f64, w: f64) {
        self.sum_x += x;
        self.sum_y += y;
        self.count += 1;
        self.weight += w;
    }

    fn mean_x(&self) -> f64 {
        self.sum_x / self.count as f64
    }

    fn mean_y(&self) -> f64 {
        self.sum_y / self.count as f64
    }
}

#[derive(Debug, Default)]
struct Knots {
    x: Vec<f64>,
    y: Vec<f64>,
    last: Option<Bin>,
}

impl Knots {
    /// Whether a knot at `x` would sit strictly right of, and at least
    /// `min_spacing` beyond, the previous knot.
    fn clears(&self, x: f64, min_spacing: f64) -> bool {
        match self.x.last() {
            Some(&prev) => x > prev && x - prev >= min_spacing,
            None => true,
        }
    }

    fn push(&mut self, bin: Bin) {
        self.x.push(bin.mean_x());
        self.y.push(bin.mean_y());
        self.last = Some(bin);
    }

    fn merge_into_last(&mut self, bin: Bin) {
        match self.last.take() {
            Some(mut last) => {
                last.sum_x += bin.sum_x;
                last.sum_y += bin.sum_y;
                last.count += bin.count;
                last.weight += bin.weight;
                self.x.pop();
                self.y.pop();
                self.push(last);
            }
            None => self.push(bin),
        }
    }
}
