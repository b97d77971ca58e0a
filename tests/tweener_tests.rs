#![cfg(target_arch = "wasm32")]

use inbetween::{BindingSet, Stroke, TWEEN_ID_BASE};
use inbetween_wasm::{apply_connection_edit, explode_bindings_res, regroup_bindings, Tweener};
use js_sys::{Reflect, JSON};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js(s: &str) -> JsValue {
    JSON::parse(s).unwrap()
}

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

const REQUEST: &str = r#"{
    "frame_index": 5,
    "prev": { "index": 0, "strokes": [ { "id": 1, "points": [ {"x": 0, "y": 0}, {"x": 100, "y": 0} ] } ] },
    "next": { "index": 10, "strokes": [ { "id": 2, "points": [ {"x": 0, "y": 40}, {"x": 100, "y": 40} ] } ] }
}"#;

#[wasm_bindgen_test]
fn compute_tween_returns_strokes_and_typed_arrays() {
    let mut t = Tweener::new();
    let out = t.compute_tween(js(REQUEST));
    let strokes: Vec<Stroke> = serde_wasm_bindgen::from_value(out).unwrap();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].id, TWEEN_ID_BASE);
    assert_eq!(strokes[0].parents, vec![1, 2]);

    assert_eq!(t.stroke_count(), 1);
    let pos = t.stroke_positions(0).expect("positions");
    assert_eq!(pos.to_vec(), vec![0.0, 20.0, 100.0, 20.0]);
    assert!(t.stroke_positions(3).is_none());
    assert!(is_err(&t.stroke_positions_res(3), "invalid_index"));
}

#[wasm_bindgen_test]
fn repeated_requests_hit_the_cache() {
    let mut t = Tweener::new();
    t.compute_tween(js(REQUEST));
    t.compute_tween(js(REQUEST));
    let stats = t.cache_stats();
    let hits = Reflect::get(&stats, &JsValue::from_str("hits")).unwrap().as_f64();
    assert_eq!(hits, Some(1.0));
    t.invalidate();
    let size = Reflect::get(&t.cache_stats(), &JsValue::from_str("size")).unwrap().as_f64();
    assert_eq!(size, Some(0.0));
}

#[wasm_bindgen_test]
fn rejected_requests_return_typed_errors() {
    let mut t = Tweener::new();
    let bad = js(r#"{ "frame_index": 1, "prev": { "index": 0, "strokes": [ { "id": 1, "points": [ {"x": 1e9, "y": 0} ] } ] }, "next": { "index": 2, "strokes": [] } }"#);
    assert!(is_err(&t.compute_tween_res(bad), "out_of_range"));
    let wrong = js(r#"{ "version": 9, "frame_index": 1, "prev": { "index": 0, "strokes": [] }, "next": { "index": 2, "strokes": [] } }"#);
    assert!(is_err(&t.compute_tween_res(wrong), "unsupported_version"));
    assert!(t.compute_tween(JsValue::from_f64(3.0)).is_null());
    assert!(t.compute_tween_json("{ nope").is_none());
}

#[wasm_bindgen_test]
fn binding_edits_round_trip() {
    let set = js(r#"{ "version": 0, "groups": [] }"#);
    let edit = js(r#"{ "op": "connect", "source_frame": 0, "target_frame": 10, "sources": [1], "target": 5 }"#);
    let set = apply_connection_edit(set, edit);
    let parsed: BindingSet = serde_wasm_bindgen::from_value(set.clone()).unwrap();
    assert_eq!(parsed.version, 1);
    assert_eq!(parsed.groups.len(), 1);

    let groups = Reflect::get(&set, &JsValue::from_str("groups")).unwrap();
    let exploded = explode_bindings_res(groups);
    let connections = Reflect::get(&exploded, &JsValue::from_str("value")).unwrap();
    let regrouped = regroup_bindings(connections);
    let back: Vec<inbetween::CorrespondenceGroup> = serde_wasm_bindgen::from_value(regrouped).unwrap();
    assert_eq!(back, parsed.groups);
}
