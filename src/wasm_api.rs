//! WASM API exports for JavaScript interop.
//!
//! This module provides `#[wasm_bindgen]` exports for driving a grapher
//! session from JavaScript. It is only compiled when targeting wasm32.

#![cfg(target_arch = "wasm32")]

use parking_lot::Mutex;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

use crate::graph::{GraphScene, grapher};
use crate::runtime::run_grapher;

/// JavaScript-accessible grapher session wrapper
#[wasm_bindgen]
pub struct JsGrapher {
    /// The scene under construction
    scene: Arc<Mutex<GraphScene>>,
    /// Canvas ID for rendering
    canvas_id: String,
    /// Whether the Bevy app has started
    started: bool,
}

#[wasm_bindgen]
impl JsGrapher {
    /// Create an empty grapher bound to an HTML canvas element ID
    /// (without the leading #).
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> JsGrapher {
        JsGrapher {
            scene: Arc::new(Mutex::new(grapher().build())),
            canvas_id: canvas_id.to_string(),
            started: false,
        }
    }

    /// Add a curve from an equation in `x`. Returns an error for a
    /// malformed expression; numeric trouble during plotting never
    /// surfaces here.
    #[wasm_bindgen]
    pub fn add_function(&mut self, equation: &str) -> Result<(), JsValue> {
        let compiled = crate::expr::compile(equation)
            .map_err(|report| JsValue::from_str(&format!("{report:?}")))?;

        let mut scene = self.scene.lock();
        let color = scene.curves.next_color();
        scene.curves.push(crate::core::Curve::plain(
            equation,
            Arc::new(compiled),
            color,
        ));

        if self.started {
            web_sys::console::log_1(
                &"Curve added (requires restart to take effect)".into(),
            );
        }

        Ok(())
    }

    /// Initial pixels-per-world-unit (default 50).
    #[wasm_bindgen]
    pub fn set_scale(&mut self, scale: f64) {
        self.scene.lock().viewport.scale = scale;
    }

    /// Start the Bevy render loop. This should only be called once.
    #[wasm_bindgen]
    pub fn start(&mut self) {
        if self.started {
            web_sys::console::warn_1(&"Grapher already started".into());
            return;
        }

        let scene = self.scene.lock().clone();
        self.started = true;

        run_grapher(scene, &self.canvas_id);
    }

    /// Get the canvas ID
    #[wasm_bindgen(getter)]
    pub fn canvas_id(&self) -> String {
        self.canvas_id.clone()
    }

    /// Check if the grapher has been started
    #[wasm_bindgen(getter)]
    pub fn is_started(&self) -> bool {
        self.started
    }
}
