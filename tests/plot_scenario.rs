//! End-to-end plotting scenarios over the pure core: compile an equation,
//! sample it across a viewport, segment into strokes. No window required.

use std::sync::Arc;

use approx::assert_relative_eq;
use courbe::analysis::classify;
use courbe::core::{Callable, Curve, CurveKind, CurveSet};
use courbe::expr::compile;
use courbe::path::{PathOptions, segment_strokes};
use courbe::sample::{Sample, SampleOptions, sample_curve};
use courbe::view::Viewport;

/// 300x300 px at scale 50: the visible world x-interval is [-3, 3].
fn viewport() -> Viewport {
    Viewport {
        width: 300.0,
        height: 300.0,
        scale: 50.0,
        offset_x: 0.0,
        offset_y: 0.0,
        pixel_ratio: 1.0,
    }
}

fn plain(equation: &str) -> Curve {
    let f: Callable = Arc::new(compile(equation).unwrap());
    Curve::plain(equation, f, courbe::core::PALETTE[0])
}

fn strokes_of(curve: &Curve, vp: &Viewport) -> Vec<Vec<bevy_math::DVec2>> {
    let samples = sample_curve(curve, vp, &SampleOptions::default());
    segment_strokes(&samples, vp, &PathOptions::default())
}

/// Sign of the world x each stroke covers; panics if a stroke straddles 0.
fn stroke_side(stroke: &[bevy_math::DVec2], vp: &Viewport) -> f64 {
    let xs: Vec<f64> = stroke.iter().map(|p| vp.screen_to_world(*p).x).collect();
    let side = xs[0].signum();
    for x in &xs {
        assert_eq!(
            x.signum(),
            side,
            "stroke crosses the singularity at x = 0"
        );
    }
    side
}

#[test]
fn parabola_plots_as_one_unbroken_path() {
    let vp = viewport();
    let parabola = plain("x^2");

    let samples = sample_curve(&parabola, &vp, &SampleOptions::default());
    assert!(samples.iter().all(Sample::is_valid));
    assert!(samples.len() >= 2000);

    for sample in &samples {
        let Sample::Valid { screen, .. } = sample else {
            unreachable!()
        };
        assert!(screen.x >= -1.0 && screen.x <= vp.width + 1.0);
    }

    let strokes = segment_strokes(&samples, &vp, &PathOptions::default());
    assert_eq!(strokes.len(), 1);
}

#[test]
fn derivative_of_parabola_is_one_straight_line() {
    let vp = viewport();
    let mut set = CurveSet::new();
    let base = set.push(plain("x^2"));
    set.toggle_select(base.id);

    let derivative = set.derive_selected(CurveKind::Derivative).unwrap();
    assert_eq!(derivative.equation, "x^2'");

    let strokes = strokes_of(&derivative, &vp);
    assert_eq!(strokes.len(), 1);

    for x in [-2.5, -1.0, 0.0, 0.5, 1.75] {
        let sample = classify(&derivative, x);
        assert!(sample.valid);
        assert_relative_eq!(sample.value, 2.0 * x, epsilon = 1e-4);
    }
}

#[test]
fn reciprocal_of_parabola_splits_into_two_branches() {
    let vp = viewport();
    let mut set = CurveSet::new();
    let base = set.push(plain("x^2"));
    set.toggle_select(base.id);

    let reciprocal = set.derive_selected(CurveKind::Reciprocal).unwrap();
    assert_eq!(reciprocal.equation, "1/(x^2)");

    let strokes = strokes_of(&reciprocal, &vp);
    assert!(strokes.len() >= 2);

    let mut left = false;
    let mut right = false;
    for stroke in &strokes {
        match stroke_side(stroke, &vp) {
            side if side < 0.0 => left = true,
            _ => right = true,
        }
    }
    assert!(left && right, "expected a branch on each side of x = 0");
}

#[test]
fn hyperbola_never_connects_across_the_pole() {
    let vp = viewport();
    let hyperbola = plain("1/x");

    let strokes = strokes_of(&hyperbola, &vp);
    assert!(strokes.len() >= 2);

    let mut left = false;
    let mut right = false;
    for stroke in &strokes {
        match stroke_side(stroke, &vp) {
            side if side < 0.0 => left = true,
            _ => right = true,
        }
    }
    assert!(left && right);
}

#[test]
fn primitive_of_constant_plots_as_a_line() {
    let vp = viewport();
    let mut set = CurveSet::new();
    let base = set.push(plain("1"));
    set.toggle_select(base.id);

    let primitive = set.derive_selected(CurveKind::Primitive).unwrap();
    assert_eq!(primitive.equation, "∫1dx");

    for x in [-2.0, 1.0, 2.5] {
        let sample = classify(&primitive, x);
        assert!(sample.valid);
        assert!((sample.value - x).abs() <= 0.01 * x.abs());
    }
    assert_eq!(classify(&primitive, 0.0).value, 0.0);

    let strokes = strokes_of(&primitive, &vp);
    assert_eq!(strokes.len(), 1);
}
