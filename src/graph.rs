use std::sync::Arc;

use crate::Result;
use crate::core::{Callable, Color, Curve, CurveSet};
use crate::expr;
use crate::path::PathOptions;
use crate::sample::SampleOptions;
use crate::view::Viewport;

/// Everything a grapher session needs: the curve set plus view and
/// rendering configuration. Built once, handed to the runtime.
#[derive(Clone)]
pub struct GraphScene {
    pub curves: CurveSet,
    pub background: Color,
    pub viewport: Viewport,
    pub show_grid: bool,
    pub sample: SampleOptions,
    pub path: PathOptions,
}

pub fn grapher() -> GrapherBuilder {
    GrapherBuilder {
        curves: CurveSet::new(),
        background: Color::WHITE,
        viewport: Viewport::default(),
        show_grid: true,
        sample: SampleOptions::default(),
        path: PathOptions::default(),
    }
}

pub struct GrapherBuilder {
    curves: CurveSet,
    background: Color,
    viewport: Viewport,
    show_grid: bool,
    sample: SampleOptions,
    path: PathOptions,
}

impl GrapherBuilder {
    /// Add a curve from an equation in `x`, e.g. `"x^2"` or
    /// `"sin(x)/x"`. Compilation happens here; a malformed expression is
    /// the only error this crate ever reports.
    pub fn function(mut self, equation: &str) -> Result<Self> {
        let compiled = expr::compile(equation)?;
        let f: Callable = Arc::new(compiled);
        let color = self.curves.next_color();
        self.curves.push(Curve::plain(equation, f, color));
        Ok(self)
    }

    /// Add a curve from a native closure, labeled for the readout.
    pub fn function_fn(
        mut self,
        label: impl Into<String>,
        f: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        let color = self.curves.next_color();
        self.curves.push(Curve::plain(label, Arc::new(f), color));
        self
    }

    pub fn background_color(mut self, c: Color) -> Self {
        self.background = c;
        self
    }

    /// Initial pixels-per-world-unit (default 50).
    pub fn scale(mut self, scale: f64) -> Self {
        self.viewport.scale = scale;
        self
    }

    pub fn grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    pub fn sample_options(mut self, opts: SampleOptions) -> Self {
        self.sample = opts;
        self
    }

    pub fn path_options(mut self, opts: PathOptions) -> Self {
        self.path = opts;
        self
    }

    /// Get the built scene without running it.
    pub fn build(self) -> GraphScene {
        GraphScene {
            curves: self.curves,
            background: self.background,
            viewport: self.viewport,
            show_grid: self.show_grid,
            sample: self.sample,
            path: self.path,
        }
    }

    /// Open a window and run the grapher locally (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run_local(self) {
        crate::runtime::run_grapher(self.build());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CurveKind;

    #[test]
    fn builder_compiles_functions_eagerly() {
        let scene = grapher()
            .function("x^2")
            .unwrap()
            .function("sin(x)")
            .unwrap()
            .build();

        assert_eq!(scene.curves.len(), 2);
        let first = scene.curves.get(0).unwrap();
        assert_eq!(first.kind(), CurveKind::Plain);
        assert_eq!(first.equation, "x^2");
    }

    #[test]
    fn builder_rejects_bad_expressions() {
        assert!(grapher().function("x +").is_err());
    }

    #[test]
    fn curves_get_distinct_palette_colors() {
        let scene = grapher()
            .function("x")
            .unwrap()
            .function("2x")
            .unwrap()
            .build();

        let a = scene.curves.get(0).unwrap().color;
        let b = scene.curves.get(1).unwrap().color;
        assert_ne!(a, b);
    }
}
