use approx::{assert_abs_diff_eq, assert_relative_eq};
use pcsfit::{
    EndCondition, EvaluationGrid, FitError, GridPolicy, KnotSet, NaturalSpline, SplineOptions,
    TailSegment, evaluate,
};

fn rotation_knots() -> KnotSet {
    KnotSet::new(vec![0.0, 0.01, 0.6, 0.8], vec![0.0, 0.1, 1.0, 2.0]).unwrap()
}

fn wiggly_knots() -> KnotSet {
    KnotSet::new(
        vec![0.0, 0.07, 0.2, 0.33, 0.5, 0.61, 0.74, 0.9],
        vec![12.0, 11.5, 9.0, 9.8, 6.1, 4.0, 4.4, 1.2],
    )
    .unwrap()
}

#[test]
fn test_rotation_profile_scenario() {
    let grid = EvaluationGrid::profile();
    let profile = evaluate(&rotation_knots(), &grid).unwrap();

    assert_eq!(profile.len(), 121);
    assert_eq!(profile[0], 0.0);
    assert_relative_eq!(profile[grid.nearest_index(0.6)], 1.0, max_relative = 1e-9);
    assert_relative_eq!(profile[80], 2.0, max_relative = 1e-9);
}

#[test]
fn test_exact_at_every_knot() {
    let knots = wiggly_knots();
    let spl = NaturalSpline::new(&knots).unwrap();
    for (x, y) in knots.points() {
        assert_relative_eq!(spl.value(x), y, max_relative = 1e-9);
    }
}

#[test]
fn test_three_point_hat() {
    // Hand-solved natural spline: M1 = -3, S(0.5) = 0.6875.
    let knots = KnotSet::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]).unwrap();
    let spl = NaturalSpline::new(&knots).unwrap();
    assert_relative_eq!(spl.value(0.5), 0.6875, max_relative = 1e-12);
    assert_relative_eq!(spl.value(1.5), 0.6875, max_relative = 1e-12);
    assert_relative_eq!(spl.second_derivative(1.0), -3.0, max_relative = 1e-12);
}

#[test]
fn test_numerical_continuity_at_interior_knots() {
    let knots = wiggly_knots();
    let spl = NaturalSpline::new(&knots).unwrap();
    let h = 1e-4;
    for &xk in &knots.x()[1..knots.len() - 1] {
        let f = |x: f64| spl.value(x);
        let left_slope = (f(xk) - f(xk - h)) / h;
        let right_slope = (f(xk + h) - f(xk)) / h;
        assert_abs_diff_eq!(left_slope, right_slope, epsilon = 1e-1);

        let left_curv = (f(xk) - 2.0 * f(xk - h) + f(xk - 2.0 * h)) / (h * h);
        let right_curv = (f(xk + 2.0 * h) - 2.0 * f(xk + h) + f(xk)) / (h * h);
        let scale = left_curv.abs().max(1.0);
        assert!(
            (left_curv - right_curv).abs() / scale < 1e-2,
            "at {xk}: {left_curv} vs {right_curv}"
        );
    }
}

#[test]
fn test_natural_boundaries_numerically() {
    let knots = wiggly_knots();
    let spl = NaturalSpline::new(&knots).unwrap();
    let h = 1e-4;
    let f = |x: f64| spl.value(x);
    let x0 = knots.x()[0];
    let xn = knots.x()[knots.len() - 1];

    let start = (f(x0 + 2.0 * h) - 2.0 * f(x0 + h) + f(x0)) / (h * h);
    let end = (f(xn) - 2.0 * f(xn - h) + f(xn - 2.0 * h)) / (h * h);
    assert_abs_diff_eq!(start, 0.0, epsilon = 0.5);
    assert_abs_diff_eq!(end, 0.0, epsilon = 0.5);
    assert_abs_diff_eq!(spl.second_derivative(x0), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(spl.second_derivative(xn), 0.0, epsilon = 1e-9);
}

#[test]
fn test_extrapolation_follows_boundary_cubics() {
    let knots = rotation_knots();
    let spl = NaturalSpline::new(&knots).unwrap();
    let grid = EvaluationGrid::profile();
    let profile = spl.evaluate(&grid);

    let last = *spl.segments().last().unwrap();
    let x_last = knots.x()[2];
    for (g, v) in grid.points().iter().zip(&profile).filter(|(g, _)| **g > 0.8) {
        let t = g - x_last;
        let manual = last.a + last.b * t + last.c * t * t + last.d * t * t * t;
        assert_eq!(*v, manual);
    }

    let first = spl.segments()[0];
    let t = -0.25;
    assert_eq!(spl.value(-0.25), first.a + first.b * t + first.c * t * t + first.d * t * t * t);
}

#[test]
fn test_single_knot_is_insufficient() {
    let knots = KnotSet::new(vec![0.3], vec![1.0]).unwrap();
    assert!(matches!(
        evaluate(&knots, &EvaluationGrid::profile()),
        Err(FitError::InsufficientKnots { count: 1 })
    ));
}

#[test]
fn test_custom_grid_length() {
    let grid = EvaluationGrid::new(GridPolicy::LinearSpan { start: 0.0, stop: 1.0 }, 11).unwrap();
    let profile = evaluate(&rotation_knots(), &grid).unwrap();
    assert_eq!(profile.len(), 11);
}

// Values produced by the control system's C evaluator for its built-in
// self-test: knots (0,0) (0.6,1) (0.8,2), grid i * 0.01f.
#[test]
fn test_control_system_self_test_values() {
    let knots = KnotSet::new(vec![0.0, 0.6, 0.8], vec![0.0, 1.0, 2.0]).unwrap();
    let grid = EvaluationGrid::control_system();
    let spl = NaturalSpline::fit(&knots, SplineOptions::control_system()).unwrap();
    let v = spl.evaluate(&grid);

    assert_eq!(v[0], 0.0);
    assert_eq!(v[30], 0.24999997516473252);
    assert_eq!(v[60], 0.9999998609225029);
    assert_eq!(v[80], 1.9999997085995267);
    assert_eq!(v[100], 3.641975308641974);
    assert_eq!(v[120], 5.999999006589309);
}

#[test]
fn test_control_system_tail_differs_from_natural() {
    let knots = KnotSet::new(vec![0.0, 0.6, 0.8], vec![0.0, 1.0, 2.0]).unwrap();
    let grid = EvaluationGrid::profile();
    let natural = NaturalSpline::new(&knots).unwrap().evaluate(&grid);
    let quirky = NaturalSpline::fit(
        &knots,
        SplineOptions {
            end: EndCondition::Natural,
            tail: TailSegment::Penultimate,
        },
    )
    .unwrap()
    .evaluate(&grid);

    assert_eq!(natural[..80], quirky[..80]);
    assert!((natural[120] - quirky[120]).abs() > 1e-3);
}
