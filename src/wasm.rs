//! WASM bindings for the orbit-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.

use wasm_bindgen::prelude::*;

use crate::layout::LayoutConfig;
use crate::output::LayoutOutput;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

/// Lay out the sessions and items in `input` (a JSON layout request) and
/// return the placed nodes and edges as JSON. On failure the result carries
/// an `error` object instead.
#[wasm_bindgen]
pub fn compute_layout(input: &str) -> String {
    match crate::layout_json(input) {
        Ok(json) => json,
        Err(e) => {
            console_error(&format!("Error computing layout: {}", e));
            serde_json::to_string(&LayoutOutput::from_error(&e))
                .unwrap_or_else(|_| r#"{"error": {"message": "layout error", "kind": "serialize"}}"#.to_string())
        }
    }
}

/// The default configuration as JSON, so the frontend can show and tweak it.
#[wasm_bindgen]
pub fn default_config() -> String {
    serde_json::to_string(&LayoutConfig::default()).unwrap_or_else(|_| "{}".to_string())
}
