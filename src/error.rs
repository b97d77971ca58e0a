use crate::interop::{new_obj, set_kv};
use inbetween::InputError;
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f32, max: f32, got: f32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min as f64));
    set_kv(&d, "max", &JsValue::from_f64(max as f64));
    set_kv(&d, "got", &JsValue::from_f64(got as f64));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn invalid_input(what: &str, detail: impl std::fmt::Display) -> JsValue {
    let d = new_obj(); set_kv(&d, "what", &JsValue::from_str(what));
    err("invalid_input", format!("{}: {}", what, detail), Some(d.into()))
}

#[inline]
pub fn invalid_index(kind: &str, index: u32, len: usize) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "index", &JsValue::from_f64(index as f64));
    set_kv(&d, "len", &JsValue::from_f64(len as f64));
    err("invalid_index", format!("{} index {} out of bounds", kind, index), Some(d.into()))
}

/// Map an ingestion failure onto the typed result object.
pub fn from_input(e: &InputError) -> JsValue {
    match e {
        InputError::NonFinite(param) => non_finite(param),
        InputError::OutOfRange { param, min, max, got } => out_of_range(param, *min, *max, *got),
        InputError::TooLarge { what, limit } => {
            let d = new_obj();
            set_kv(&d, "what", &JsValue::from_str(what));
            set_kv(&d, "limit", &JsValue::from_f64(*limit as f64));
            err(e.code(), e.to_string(), Some(d.into()))
        }
        InputError::ReservedId(id) => {
            let d = new_obj();
            set_kv(&d, "id", &JsValue::from_f64(*id as f64));
            err(e.code(), e.to_string(), Some(d.into()))
        }
        InputError::Json(_) | InputError::UnsupportedVersion(_) => err(e.code(), e.to_string(), None),
    }
}
