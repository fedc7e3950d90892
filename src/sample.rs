//! Adaptive sampling: walk the visible world interval left to right,
//! shrinking the step where the curve bends sharply and flagging points
//! that must not be plotted.

use bevy_math::DVec2;

use crate::analysis::classify;
use crate::core::Curve;
use crate::view::Viewport;

/// One point of a per-frame sample sequence. Never outlives the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sample {
    /// Plot-worthy point: screen position plus the world y it came from.
    Valid { screen: DVec2, world_y: f64 },
    /// Gap marker: nothing to draw here, and no line may cross it.
    Invalid,
}

impl Sample {
    pub fn is_valid(&self) -> bool {
        matches!(self, Sample::Valid { .. })
    }
}

/// Step-refinement tuning. The thresholds are empirical, chosen for
/// visual quality rather than derived from a bound; override them through
/// the builder if a curve family needs different pacing.
#[derive(Clone, Copy, Debug)]
pub struct SampleOptions {
    /// Baseline sample count floor, regardless of viewport width.
    pub min_samples: f64,
    /// Local slope-per-pixel above which the step halves.
    pub curvature_gentle: f64,
    /// Local slope-per-pixel above which the step drops to a tenth.
    pub curvature_sharp: f64,
    /// Step multiplier between the two thresholds.
    pub step_mid: f64,
    /// Step multiplier beyond the sharp threshold.
    pub step_fine: f64,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            min_samples: 2000.0,
            curvature_gentle: 0.1,
            curvature_sharp: 0.5,
            step_mid: 0.5,
            step_fine: 0.1,
        }
    }
}

/// Sample `curve` across the viewport's visible x-interval.
///
/// The walk advances by `minStep = span / max(min_samples, width·dpr·2)`
/// (at least two samples per device pixel), shrinking the step where the
/// look-ahead shows high curvature. A look-ahead whose screen-space
/// vertical distance exceeds the viewport height is treated as an
/// asymptote crossing: a gap marker is emitted instead of the point, so
/// no near-vertical stroke can paint across the canvas. Always
/// terminates: the step is positive and at least `minStep · step_fine`.
pub fn sample_curve(curve: &Curve, vp: &Viewport, opts: &SampleOptions) -> Vec<Sample> {
    let (left, right) = vp.world_x_span();
    let max_steps = opts.min_samples.max(vp.width * vp.pixel_ratio * 2.0);
    let min_step = (right - left).abs() / max_steps;

    let mut points = Vec::with_capacity(max_steps as usize);
    let mut x = left;

    while x <= right {
        let mut step = min_step;
        let here = classify(curve, x);

        if !here.valid {
            points.push(Sample::Invalid);
            x += step;
            continue;
        }

        let next_x = x + min_step;
        let ahead = classify(curve, next_x);

        if ahead.valid {
            let slope = (ahead.value - here.value).abs() / min_step;
            let curvature = slope / vp.scale;

            if curvature > opts.curvature_sharp {
                step = min_step * opts.step_fine;
            } else if curvature > opts.curvature_gentle {
                step = min_step * opts.step_mid;
            }

            let screen_here = vp.world_to_screen(DVec2::new(x, here.value));
            let screen_ahead = vp.world_to_screen(DVec2::new(next_x, ahead.value));
            if (screen_ahead.y - screen_here.y).abs() > vp.height {
                points.push(Sample::Invalid);
                x += step;
                continue;
            }
        }

        points.push(Sample::Valid {
            screen: vp.world_to_screen(DVec2::new(x, here.value)),
            world_y: here.value,
        });
        x += step;
    }

    points
}
