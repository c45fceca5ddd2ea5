use wasm_bindgen::prelude::*;
use js_sys::{Object, Reflect};

fn set_kv(obj: &Object, k: &str, v: &JsValue) { let _ = Reflect::set(obj, &JsValue::from_str(k), v); }

fn new_obj() -> Object { Object::new() }

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
pub fn invalid_props(reason: impl std::fmt::Display) -> JsValue {
    err("invalid_props", format!("invalid props: {}", reason), None)
}

#[inline]
pub fn invalid_geometry(reason: impl std::fmt::Display) -> JsValue {
    err("invalid_geometry", format!("invalid geometry: {}", reason), None)
}

#[inline]
pub fn invalid_map(index: Option<usize>, reason: impl std::fmt::Display) -> JsValue {
    let data = index.map(|i| {
        let d = new_obj();
        set_kv(&d, "index", &JsValue::from_f64(i as f64));
        JsValue::from(d)
    });
    err("invalid_map", reason.to_string(), data)
}

#[inline]
pub fn not_mounted() -> JsValue { err("not_mounted", "image mapper was unmounted", None) }

#[inline]
pub fn busy() -> JsValue {
    err("busy", "image mapper is rendering; calls from renderChildren are not allowed", None)
}

/// Thrown form for constructors.
pub fn throw(code: &'static str, message: impl Into<String>) -> JsValue {
    let e = js_sys::Error::new(&message.into());
    e.set_name(code);
    e.into()
}
