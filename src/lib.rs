pub mod analysis;
pub mod core;
pub mod expr;
pub mod graph;
pub mod path;
pub mod render;
pub mod runtime;
pub mod sample;
pub mod view;
#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

use std::fmt;

#[derive(Debug)]
pub struct CourbeError;

impl fmt::Display for CourbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CourbeError")
    }
}

impl std::error::Error for CourbeError {}

pub type Result<T> = std::result::Result<T, error_stack::Report<CourbeError>>;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

pub mod prelude {
    pub use crate::core::*;
    pub use crate::graph::*;
    pub use crate::render::*;
    pub use crate::runtime::*;
    pub use crate::sample::*;
    pub use crate::view::*;
}
