//! Path segmentation: fold a sample sequence into stroke polylines,
//! breaking at gap markers and at world-space jumps too large to belong
//! to one branch. Discontinuities become separate strokes, never
//! connecting lines.

use bevy_math::DVec2;

use crate::sample::Sample;
use crate::view::Viewport;

#[derive(Clone, Copy, Debug)]
pub struct PathOptions {
    /// A vertical world-distance above `jump_factor` viewport heights
    /// (in world units) between consecutive valid points closes the
    /// current stroke. Catches jump discontinuities the sampler did not
    /// flag as invalid.
    pub jump_factor: f64,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self { jump_factor: 2.0 }
    }
}

/// Fold the ordered sample sequence into stroked polylines, in screen
/// coordinates. Strokes with fewer than two points would not paint and
/// are dropped. No state survives the call.
pub fn segment_strokes(samples: &[Sample], vp: &Viewport, opts: &PathOptions) -> Vec<Vec<DVec2>> {
    let jump_px = vp.height * opts.jump_factor;

    let mut strokes = Vec::new();
    let mut current: Vec<DVec2> = Vec::new();
    let mut last_world_y: Option<f64> = None;

    let flush = |current: &mut Vec<DVec2>, strokes: &mut Vec<Vec<DVec2>>| {
        if current.len() >= 2 {
            strokes.push(std::mem::take(current));
        } else {
            current.clear();
        }
    };

    for sample in samples {
        match sample {
            Sample::Valid { screen, world_y } => {
                if let Some(prev_y) = last_world_y {
                    if (world_y - prev_y).abs() * vp.scale > jump_px {
                        flush(&mut current, &mut strokes);
                    }
                }
                current.push(*screen);
                last_world_y = Some(*world_y);
            }
            Sample::Invalid => {
                flush(&mut current, &mut strokes);
                last_world_y = None;
            }
        }
    }

    flush(&mut current, &mut strokes);
    strokes
}
