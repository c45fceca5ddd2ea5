use crate::dom::{DomSurface, Shared};
use crate::error;
use crate::events::JsCallbacks;
use crate::interop::{from_js, get, has, props_from_js, to_js};
use crate::ImageMapper;
use imagemapper::{
    Area, ChildrenRenderer, DisplayGeometry, ImageMap, ImageMapper as Controller, MapError,
    Recompute,
};
use js_sys::Function;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Wraps `renderChildren`, keeping the previous wrapper when the JS function is the same object.
fn children_renderer(
    props: &JsValue,
    previous: Option<&(Function, ChildrenRenderer)>,
) -> Option<(Function, ChildrenRenderer)> {
    let f = get(props, "renderChildren").dyn_into::<Function>().ok()?;
    if let Some((prev_f, prev_r)) = previous {
        if JsValue::from(prev_f.clone()) == JsValue::from(f.clone()) {
            return Some((prev_f.clone(), prev_r.clone()));
        }
    }
    let call = f.clone();
    let renderer = ChildrenRenderer::new(move || {
        call.call0(&JsValue::NULL)
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    });
    Some((f, renderer))
}

#[wasm_bindgen]
impl ImageMapper {
    /// Mounts the widget as the last child of `mount`.
    #[wasm_bindgen(constructor)]
    pub fn new(mount: &Element, props: JsValue) -> Result<ImageMapper, JsValue> {
        let mut parsed = props_from_js(&props)
            .map_err(|e| error::throw("invalid_props", format!("invalid props: {}", e)))?;
        let children_fn = children_renderer(&props, None);
        parsed.render_children = children_fn.as_ref().map(|(_, r)| r.clone());
        let callbacks = Rc::new(JsCallbacks::from_props(&props));

        let mut build_err = None;
        let inner = Rc::new_cyclic(|weak| {
            let surface = match DomSurface::build(mount, weak.clone()) {
                Ok(s) => Some(s),
                Err(e) => {
                    build_err = Some(e);
                    None
                }
            };
            RefCell::new(surface.map(|surface| Shared {
                mapper: Controller::new(parsed),
                surface,
                callbacks,
                children_fn,
            }))
        });
        if let Some(e) = build_err {
            return Err(e);
        }
        let mapper = ImageMapper { inner };
        let cbs = mapper.with_mounted(|s| {
            s.surface.set_clickable(s.callbacks.has_click());
            let cbs = s.callbacks.clone();
            s.mapper.mount::<MouseEvent>(&mut s.surface, &*cbs);
            cbs
        })?;
        cbs.flush();
        Ok(mapper)
    }

    /// Replaces all props. Returns `{ ok, value: recomputed }`.
    pub fn set_props(&self, props: JsValue) -> JsValue {
        let mut next = match props_from_js(&props) {
            Ok(p) => p,
            Err(e) => return error::invalid_props(e),
        };
        let r = self.with_mounted(|s| {
            if !has(&props, "map") {
                // keep the generated map name stable across updates
                next.map = s.mapper.props().map.clone();
            }
            s.children_fn = children_renderer(&props, s.children_fn.as_ref());
            next.render_children = s.children_fn.as_ref().map(|(_, r)| r.clone());
            s.callbacks = Rc::new(JsCallbacks::from_props(&props));
            s.surface.set_clickable(s.callbacks.has_click());
            let cbs = s.callbacks.clone();
            let out = s.mapper.update::<MouseEvent>(next, &mut s.surface, &*cbs);
            (out, cbs)
        });
        match r {
            Ok((out, cbs)) => {
                cbs.flush();
                error::ok(JsValue::from_bool(out != Recompute::Skipped))
            }
            Err(e) => e,
        }
    }

    pub fn extended_areas(&self) -> JsValue {
        self.with_mounted(|s| to_js(s.mapper.extended_areas()))
            .unwrap_or(JsValue::NULL)
    }

    pub fn hovered_index(&self) -> Option<u32> {
        self.with_mounted(|s| s.mapper.hover().index().map(|i| i as u32))
            .ok()
            .flatten()
    }

    pub fn surface_size(&self) -> JsValue {
        self.with_mounted(|s| match s.mapper.surface_size() {
            Some(size) => to_js(&size),
            None => JsValue::NULL,
        })
        .unwrap_or(JsValue::NULL)
    }

    pub fn map_name(&self) -> Option<String> {
        self.with_mounted(|s| s.mapper.props().map.name.clone()).ok()
    }

    /// Removes the widget from the page. Later calls report `not_mounted`.
    pub fn unmount(&self) {
        let Ok(mut slot) = self.inner.try_borrow_mut() else {
            web_sys::console::warn_1(&"image mapper: unmount while the widget is busy ignored".into());
            return;
        };
        if let Some(mut s) = slot.take() {
            s.surface.teardown();
        }
    }
}

impl ImageMapper {
    fn with_mounted<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> Result<R, JsValue> {
        let mut slot = self.inner.try_borrow_mut().map_err(|_| error::busy())?;
        match slot.as_mut() {
            Some(s) => Ok(f(s)),
            None => Err(error::not_mounted()),
        }
    }
}

#[wasm_bindgen]
pub fn scale_coords(coords: &[f64], geometry: JsValue) -> JsValue {
    let g: DisplayGeometry = if geometry.is_undefined() || geometry.is_null() {
        DisplayGeometry::default()
    } else {
        match from_js(geometry) {
            Ok(g) => g,
            Err(e) => return error::invalid_geometry(e),
        }
    };
    error::ok(to_js(&imagemapper::scale_coords(coords, &g)))
}

#[wasm_bindgen]
pub fn compute_center(area: JsValue, geometry: JsValue) -> JsValue {
    let g: DisplayGeometry = if geometry.is_undefined() || geometry.is_null() {
        DisplayGeometry::default()
    } else {
        match from_js(geometry) {
            Ok(g) => g,
            Err(e) => return error::invalid_geometry(e),
        }
    };
    let area: Option<Area> = if area.is_undefined() || area.is_null() {
        None
    } else {
        match from_js(area) {
            Ok(a) => Some(a),
            Err(e) => return error::invalid_map(None, e),
        }
    };
    let c = imagemapper::compute_center(area.as_ref(), g.factors());
    error::ok(to_js(&c))
}

#[wasm_bindgen]
pub fn points_string(coords: &[f64]) -> String {
    imagemapper::points_string(coords)
}

#[wasm_bindgen]
pub fn validate_map(map: JsValue) -> JsValue {
    let map: ImageMap = match from_js(map) {
        Ok(m) => m,
        Err(e) => return error::invalid_map(None, e),
    };
    match map.validate() {
        Ok(()) => error::ok(JsValue::TRUE),
        Err(MapError::Area { index, source }) => error::invalid_map(Some(index), source),
        Err(e) => error::invalid_map(None, e),
    }
}
