use wasm_bindgen::prelude::*;
mod api;
mod dom;
mod error;
mod events;
mod interop;

pub use api::{compute_center, points_string, scale_coords, set_panic_hook, validate_map};

/// Image mapper mounted into a DOM element.
#[wasm_bindgen]
pub struct ImageMapper { pub(crate) inner: dom::Handle }
