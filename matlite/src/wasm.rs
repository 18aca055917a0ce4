use crate::{Engine, ExecutionResult};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmEngine {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();

        WasmEngine {
            engine: Engine::new(),
        }
    }

    /// Run a script; returns the result record as JSON
    #[wasm_bindgen(js_name = run)]
    pub fn run(&self, code: &str) -> String {
        to_json(&self.engine.run(code))
    }

    /// Translate a script; returns `{"success", "program", "error"}` as JSON
    #[wasm_bindgen(js_name = translate)]
    pub fn translate(&self, code: &str) -> String {
        let response = match self.engine.translate(code) {
            Ok(program) => {
                let error = program.syntax_errors().next().map(|e| e.report());
                serde_json::json!({
                    "success": error.is_none(),
                    "program": program.to_string(),
                    "error": error,
                })
            }
            Err(e) => serde_json::json!({
                "success": false,
                "program": null,
                "error": e.report(),
            }),
        };
        response.to_string()
    }
}

impl Default for WasmEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json(result: &ExecutionResult) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| {
        serde_json::json!({
            "success": false,
            "plots": [],
            "console": "",
            "error": format!("Server error: {}\nserialization failed", e),
        })
        .to_string()
    })
}
