use crate::error::{InputError, Result};
use crate::grid::EvaluationGrid;
use crate::knots::KnotSet;
use crate::resample::{ReduceParams, TrailingKnot};
use crate::spline::{NaturalSpline, SplineOptions};

/// Everything that varies between one reconstruction and the next.
///
/// The default reproduces the offline comparison: no reduction, all knots
/// kept, natural spline on the 121-point linear-span grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitOptions {
    pub reduce: Option<ReduceParams>,
    pub trailing: TrailingKnot,
    pub grid: EvaluationGrid,
    pub spline: SplineOptions,
}

impl FitOptions {
    /// Grid, solver closure and tail lookup of the real-time evaluator.
    pub fn control_system() -> Self {
        FitOptions {
            grid: EvaluationGrid::control_system(),
            spline: SplineOptions::control_system(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub knots: KnotSet,
    pub profile: Vec<f64>,
}

/// Raw curve to evaluated profile: reduce, trim, fit, sample.
pub fn fit_profile(raw_x: &[f64], raw_y: &[f64], options: &FitOptions) -> Result<FitResult> {
    let params = options.reduce.unwrap_or(ReduceParams::IDENTITY);
    let knots = params.reduce(raw_x, raw_y)?;
    fit_knots(knots, options)
}

/// Fits knots that are already reduced, e.g. the control system's own
/// archived fit points. `options.reduce` is ignored.
pub fn fit_knots(knots: KnotSet, options: &FitOptions) -> Result<FitResult> {
    let knots = options.trailing.apply(knots);
    let spline = NaturalSpline::fit(&knots, options.spline)?;
    let profile = spline.evaluate(&options.grid);
    Ok(FitResult { knots, profile })
}

/// Pointwise agreement between an offline profile and the online one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileComparison {
    pub max_abs_diff: f64,
    pub rms_diff: f64,
    pub worst_index: usize,
}

impl ProfileComparison {
    pub fn between(offline: &[f64], online: &[f64]) -> Result<Self> {
        if offline.len() != online.len() {
            return Err(InputError::LengthMismatch {
                x: offline.len(),
                y: online.len(),
            }
            .into());
        }
        if offline.is_empty() {
            return Err(InputError::Empty.into());
        }

        let mut worst_index = 0;
        let mut max_abs_diff = 0.0_f64;
        let mut sum_sq = 0.0;
        for (i, (a, b)) in offline.iter().zip(online).enumerate() {
            let d = (a - b).abs();
            if d > max_abs_diff {
                max_abs_diff = d;
                worst_index = i;
            }
            sum_sq += d * d;
        }

        Ok(ProfileComparison {
            max_abs_diff,
            rms_diff: (sum_sq / offline.len() as f64).sqrt(),
            worst_index,
        })
    }
}
