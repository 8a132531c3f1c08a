//! WASM bindings for pcsfit.
//!
//! Build with:
//! ```sh
//! wasm-pack build -p pcsfit-wasm
//! ```

use js_sys::{Array, Float64Array};
use wasm_bindgen::prelude::*;

use pcsfit::{EvaluationGrid, KnotSet, NaturalSpline, SplineOptions};

fn parse_grid(policy: &str) -> Result<EvaluationGrid, JsError> {
    match policy.to_lowercase().as_str() {
        "linear" | "linspace" => Ok(EvaluationGrid::profile()),
        "step" | "pcs" => Ok(EvaluationGrid::control_system()),
        _ => Err(JsError::new(&format!("unknown grid policy: {policy}"))),
    }
}

fn parse_flavor(flavor: &str) -> Result<SplineOptions, JsError> {
    match flavor.to_lowercase().as_str() {
        "natural" => Ok(SplineOptions::default()),
        "pcs" | "control-system" => Ok(SplineOptions::control_system()),
        _ => Err(JsError::new(&format!("unknown spline flavor: {flavor}"))),
    }
}

fn to_js(e: pcsfit::FitError) -> JsError {
    JsError::new(&e.to_string())
}

// ── Reduction ──

/// Reduces a raw curve. Returns `[x, y]` as two `Float64Array`s.
#[wasm_bindgen]
pub fn reduce(x: &[f64], y: &[f64], power: f64, min_spacing: f64) -> Result<Array, JsError> {
    let knots = pcsfit::reduce(x, y, power, min_spacing).map_err(to_js)?;
    let out = Array::new();
    out.push(&Float64Array::from(knots.x()));
    out.push(&Float64Array::from(knots.y()));
    Ok(out)
}

// ── Spline evaluation ──

/// Evaluates the spline through `(knot_x, knot_y)` on a 121-point grid.
///
/// `policy` is `"linear"` or `"step"`; `flavor` is `"natural"` or `"pcs"`.
#[wasm_bindgen]
pub fn evaluate(
    knot_x: &[f64],
    knot_y: &[f64],
    policy: &str,
    flavor: &str,
) -> Result<Vec<f64>, JsError> {
    let grid = parse_grid(policy)?;
    let options = parse_flavor(flavor)?;
    let knots = KnotSet::new(knot_x.to_vec(), knot_y.to_vec()).map_err(to_js)?;
    let spline = NaturalSpline::fit(&knots, options).map_err(to_js)?;
    Ok(spline.evaluate(&grid))
}

/// Returns the evaluation grid abscissas for `policy`.
#[wasm_bindgen]
pub fn profile_grid(policy: &str) -> Result<Vec<f64>, JsError> {
    Ok(parse_grid(policy)?.points().to_vec())
}
