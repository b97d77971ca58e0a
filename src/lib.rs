use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

pub use api::{apply_connection_edit, apply_connection_edit_res, explode_bindings, explode_bindings_res, regroup_bindings, regroup_bindings_res, set_panic_hook};

/// Tween engine handle owned by the JS editor shell. Keeps the memo cache
/// and the strokes of the last successful `compute_tween` call so the
/// renderer can pull them out as typed arrays.
#[wasm_bindgen]
pub struct Tweener {
    pub(crate) engine: inbetween::TweenEngine,
    pub(crate) last: Vec<inbetween::Stroke>,
}

impl Tweener {
    pub fn rs_new(config: inbetween::TweenConfig) -> Tweener {
        Tweener { engine: inbetween::TweenEngine::new(config), last: Vec::new() }
    }

    /// Parse, validate and run one request, keeping the result for the
    /// typed-array getters.
    pub fn rs_compute(&mut self, v: serde_json::Value) -> Result<&[inbetween::Stroke], inbetween::InputError> {
        let req = inbetween::TweenRequest::from_json_value(v)?;
        self.last = self.engine.compute(req.frame_index, &req.prev, &req.next, &req.bindings, req.strategy);
        Ok(&self.last)
    }
}
