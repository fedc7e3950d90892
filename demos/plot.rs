use courbe::prelude::*;

// Keys while running:
//   1-9        select/deselect the nth curve
//   D / I / P  derivative, reciprocal, antiderivative of the selection
//   Delete     remove the selection, C clears all
//   G grid, R reset view, +/- zoom; drag pans, wheel zooms at the cursor
fn main() {
    grapher()
        .function("x^2")
        .unwrap()
        .function("sin(x)/x")
        .unwrap()
        .function("1/x")
        .unwrap()
        .function_fn("erf-ish", |x| x.tanh() * 1.2)
        .scale(50.0)
        .run_local();
}
