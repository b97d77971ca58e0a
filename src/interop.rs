use inbetween::Stroke;
use js_sys::{Float32Array, Object, Reflect, Uint32Array};
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_u32(slice: &[u32]) -> Uint32Array {
    let arr = Uint32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_f32(slice: &[f32]) -> Float32Array {
    let arr = Float32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}

/// Interleaved `x0, y0, x1, y1, ...` of a stroke's anchor points.
pub fn flat_positions(stroke: &Stroke) -> Vec<f32> {
    let mut out = Vec::with_capacity(stroke.points.len() * 2);
    for p in &stroke.points {
        out.push(p.x);
        out.push(p.y);
    }
    out
}
