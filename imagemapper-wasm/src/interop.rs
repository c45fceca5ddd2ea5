use imagemapper::MapperProps;
use js_sys::{Object, Reflect};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::JsValue;

/// Prop keys carrying data; callbacks are read separately.
const DATA_KEYS: [&str; 11] = [
    "src",
    "active",
    "width",
    "height",
    "imgWidth",
    "imgHeight",
    "fillColor",
    "strokeColor",
    "lineWidth",
    "map",
    "paths",
];

pub fn new_obj() -> Object { Object::new() }

pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}

pub fn get(obj: &JsValue, k: &str) -> JsValue {
    Reflect::get(obj, &JsValue::from_str(k)).unwrap_or(JsValue::UNDEFINED)
}

pub fn has(obj: &JsValue, k: &str) -> bool {
    !get(obj, k).is_undefined()
}

/// Plain-object serialization (no ES `Map`s), so flattened structs come out as objects.
/// Failures are reported on the console and yield `null`.
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    match v.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
        Ok(js) => js,
        Err(e) => {
            web_sys::console::warn_2(&"image mapper: value not convertible to JS".into(), &e.into());
            JsValue::NULL
        }
    }
}

pub fn from_js<T: DeserializeOwned>(v: JsValue) -> Result<T, serde_wasm_bindgen::Error> {
    serde_wasm_bindgen::from_value(v)
}

pub fn props_from_js(props: &JsValue) -> Result<MapperProps, serde_wasm_bindgen::Error> {
    let data = new_obj();
    for k in DATA_KEYS {
        let v = get(props, k);
        if !v.is_undefined() {
            set_kv(&data, k, &v);
        }
    }
    from_js(data.into())
}
