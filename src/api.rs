use crate::error;
use crate::interop::{arr_f32, arr_u32, flat_positions, new_obj, set_kv};
use crate::Tweener;
use inbetween::{BindingSet, Connection, CorrespondenceGroup, TweenConfig};
use js_sys::{Float32Array, Uint32Array};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    serde_wasm_bindgen::to_value(v).unwrap_or(JsValue::NULL)
}

fn parse<T: serde::de::DeserializeOwned>(what: &str, v: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(v).map_err(|e| error::invalid_input(what, e))
}

fn parse_json(what: &str, v: JsValue) -> Result<serde_json::Value, JsValue> {
    parse::<serde_json::Value>(what, v)
}

#[wasm_bindgen]
impl Tweener {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Tweener {
        Tweener::rs_new(TweenConfig::default())
    }

    pub fn get_config(&self) -> JsValue {
        to_js(self.engine.config())
    }
    pub fn set_config(&mut self, cfg: JsValue) -> bool {
        match parse::<TweenConfig>("config", cfg) {
            Ok(c) => {
                self.engine.set_config(c);
                true
            }
            Err(_) => {
                warn("set_config: rejected config");
                false
            }
        }
    }
    pub fn set_config_res(&mut self, cfg: JsValue) -> JsValue {
        match parse::<TweenConfig>("config", cfg) {
            Ok(c) => {
                self.engine.set_config(c);
                error::ok(JsValue::TRUE)
            }
            Err(e) => e,
        }
    }

    /// Tween strokes for the request `{frame_index, prev, next, bindings, strategy}`,
    /// or null when the request is rejected.
    pub fn compute_tween(&mut self, request: JsValue) -> JsValue {
        let v = match parse_json("request", request) {
            Ok(v) => v,
            Err(_) => {
                warn("compute_tween: request is not an object");
                return JsValue::NULL;
            }
        };
        match self.rs_compute(v) {
            Ok(strokes) => to_js(strokes),
            Err(e) => {
                warn(&format!("compute_tween: {}", e));
                JsValue::NULL
            }
        }
    }
    pub fn compute_tween_res(&mut self, request: JsValue) -> JsValue {
        let v = match parse_json("request", request) {
            Ok(v) => v,
            Err(e) => return e,
        };
        match self.rs_compute(v) {
            Ok(strokes) => error::ok(to_js(strokes)),
            Err(e) => error::from_input(&e),
        }
    }
    /// Same as `compute_tween` for callers holding a JSON string.
    pub fn compute_tween_json(&mut self, request: &str) -> Option<String> {
        let v: serde_json::Value = serde_json::from_str(request).ok()?;
        let strokes = self.rs_compute(v).ok()?;
        serde_json::to_string(strokes).ok()
    }

    // Typed array getters over the last result
    pub fn stroke_count(&self) -> u32 {
        self.last.len() as u32
    }
    pub fn stroke_ids(&self) -> Uint32Array {
        let ids: Vec<u32> = self.last.iter().map(|s| s.id).collect();
        arr_u32(&ids)
    }
    pub fn stroke_positions(&self, index: u32) -> Option<Float32Array> {
        self.last.get(index as usize).map(|s| arr_f32(&flat_positions(s)))
    }
    pub fn stroke_positions_res(&self, index: u32) -> JsValue {
        match self.last.get(index as usize) {
            Some(s) => error::ok(arr_f32(&flat_positions(s)).into()),
            None => error::invalid_index("stroke", index, self.last.len()),
        }
    }
    pub fn stroke_parents(&self, index: u32) -> Option<Uint32Array> {
        self.last.get(index as usize).map(|s| arr_u32(&s.parents))
    }

    // Memo cache
    pub fn invalidate(&mut self) {
        self.engine.invalidate();
    }
    pub fn cache_stats(&self) -> JsValue {
        let (hits, misses) = self.engine.stats();
        let o = new_obj();
        set_kv(&o, "hits", &JsValue::from_f64(hits as f64));
        set_kv(&o, "misses", &JsValue::from_f64(misses as f64));
        set_kv(&o, "size", &JsValue::from_f64(self.engine.cache_len() as f64));
        o.into()
    }
}

impl Default for Tweener {
    fn default() -> Self {
        Tweener::new()
    }
}

fn groups_from_js(groups: JsValue) -> Result<Vec<CorrespondenceGroup>, JsValue> {
    let v = parse_json("groups", groups)?;
    inbetween::json::groups_from_json_value(v).map_err(|e| error::from_input(&e))
}

fn explode_inner(groups: JsValue) -> Result<JsValue, JsValue> {
    let groups = groups_from_js(groups)?;
    Ok(to_js(&inbetween::explode(&groups)))
}

fn edit_inner(bindings: JsValue, edit: JsValue) -> Result<JsValue, JsValue> {
    let mut set: BindingSet = parse("bindings", bindings)?;
    inbetween::json::validate_groups(&set.groups).map_err(|e| error::from_input(&e))?;
    let edit = inbetween::json::edit_from_json_value(parse_json("edit", edit)?).map_err(|e| error::from_input(&e))?;
    set.apply(&edit);
    Ok(to_js(&set))
}

fn regroup_inner(connections: JsValue) -> Result<JsValue, JsValue> {
    let connections: Vec<Connection> = parse("connections", connections)?;
    Ok(to_js(&inbetween::regroup(&connections)))
}

/// Explode stored groups into single connections. Null on bad input.
#[wasm_bindgen]
pub fn explode_bindings(groups: JsValue) -> JsValue {
    explode_inner(groups).unwrap_or_else(|_| {
        warn("explode_bindings: rejected groups");
        JsValue::NULL
    })
}
#[wasm_bindgen]
pub fn explode_bindings_res(groups: JsValue) -> JsValue {
    match explode_inner(groups) {
        Ok(v) => error::ok(v),
        Err(e) => e,
    }
}

/// Apply one connection edit to a binding set and return the new set.
/// The version is bumped only when the groups changed.
#[wasm_bindgen]
pub fn apply_connection_edit(bindings: JsValue, edit: JsValue) -> JsValue {
    edit_inner(bindings, edit).unwrap_or_else(|_| {
        warn("apply_connection_edit: rejected input");
        JsValue::NULL
    })
}
#[wasm_bindgen]
pub fn apply_connection_edit_res(bindings: JsValue, edit: JsValue) -> JsValue {
    match edit_inner(bindings, edit) {
        Ok(v) => error::ok(v),
        Err(e) => e,
    }
}

#[wasm_bindgen]
pub fn regroup_bindings(connections: JsValue) -> JsValue {
    regroup_inner(connections).unwrap_or_else(|_| {
        warn("regroup_bindings: rejected connections");
        JsValue::NULL
    })
}
#[wasm_bindgen]
pub fn regroup_bindings_res(connections: JsValue) -> JsValue {
    match regroup_inner(connections) {
        Ok(v) => error::ok(v),
        Err(e) => e,
    }
}
