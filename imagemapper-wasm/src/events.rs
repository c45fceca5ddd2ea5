use crate::interop::{get, to_js};
use imagemapper::{ExtendedArea, MapperEvents};
use js_sys::{Array, Function};
use std::cell::RefCell;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::MouseEvent;

/// A callback invocation waiting for the shared state to be released.
struct Pending {
    name: &'static str,
    f: Function,
    args: Array,
}

/// JS callbacks from the props object. Missing or non-function values are skipped.
///
/// The controller reports events while the widget state is borrowed, so calls are
/// queued and only run by [`JsCallbacks::flush`]. Handlers may then call back into
/// the widget.
pub struct JsCallbacks {
    on_click: Option<Function>,
    on_mouse_enter: Option<Function>,
    on_mouse_leave: Option<Function>,
    on_mouse_move: Option<Function>,
    on_mouse_down: Option<Function>,
    on_mouse_up: Option<Function>,
    on_image_click: Option<Function>,
    on_image_mouse_move: Option<Function>,
    on_image_mouse_down: Option<Function>,
    on_image_mouse_up: Option<Function>,
    on_load: Option<Function>,
    on_extended_areas_created: Option<Function>,
    pending: RefCell<Vec<Pending>>,
}

fn func(props: &JsValue, key: &str) -> Option<Function> {
    get(props, key).dyn_into::<Function>().ok()
}

impl JsCallbacks {
    pub fn from_props(props: &JsValue) -> JsCallbacks {
        JsCallbacks {
            on_click: func(props, "onClick"),
            on_mouse_enter: func(props, "onMouseEnter"),
            on_mouse_leave: func(props, "onMouseLeave"),
            on_mouse_move: func(props, "onMouseMove"),
            on_mouse_down: func(props, "onMouseDown"),
            on_mouse_up: func(props, "onMouseUp"),
            on_image_click: func(props, "onImageClick"),
            on_image_mouse_move: func(props, "onImageMouseMove"),
            on_image_mouse_down: func(props, "onImageMouseDown"),
            on_image_mouse_up: func(props, "onImageMouseUp"),
            on_load: func(props, "onLoad"),
            on_extended_areas_created: func(props, "onExtendedAreasCreated"),
            pending: RefCell::new(Vec::new()),
        }
    }

    fn queue(
        &self,
        name: &'static str,
        f: &Option<Function>,
        args: impl FnOnce() -> Array,
    ) -> bool {
        let Some(f) = f else { return false };
        self.pending.borrow_mut().push(Pending {
            name,
            f: f.clone(),
            args: args(),
        });
        true
    }

    /// Runs queued callbacks in order. Must not be called while the widget state is borrowed.
    pub fn flush(&self) {
        let calls = std::mem::take(&mut *self.pending.borrow_mut());
        for c in calls {
            if let Err(e) = c.f.apply(&JsValue::NULL, &c.args) {
                web_sys::console::warn_2(
                    &format!("image mapper: {} callback threw", c.name).into(),
                    &e,
                );
            }
        }
    }

    pub fn has_click(&self) -> bool {
        self.on_click.is_some()
    }
}

fn area_args(area: &ExtendedArea, index: usize, event: &MouseEvent) -> Array {
    Array::of3(&to_js(area), &JsValue::from_f64(index as f64), event)
}

impl MapperEvents<MouseEvent> for JsCallbacks {
    fn on_click(&self, area: &ExtendedArea, index: usize, event: &MouseEvent) -> bool {
        self.queue("onClick", &self.on_click, || area_args(area, index, event))
    }
    fn on_mouse_enter(&self, area: &ExtendedArea, index: usize, event: &MouseEvent) {
        self.queue("onMouseEnter", &self.on_mouse_enter, || area_args(area, index, event));
    }
    fn on_mouse_leave(&self, area: &ExtendedArea, index: usize, event: &MouseEvent) {
        self.queue("onMouseLeave", &self.on_mouse_leave, || area_args(area, index, event));
    }
    fn on_mouse_move(&self, area: &ExtendedArea, index: usize, event: &MouseEvent) {
        self.queue("onMouseMove", &self.on_mouse_move, || area_args(area, index, event));
    }
    fn on_mouse_down(&self, area: &ExtendedArea, index: usize, event: &MouseEvent) {
        self.queue("onMouseDown", &self.on_mouse_down, || area_args(area, index, event));
    }
    fn on_mouse_up(&self, area: &ExtendedArea, index: usize, event: &MouseEvent) {
        self.queue("onMouseUp", &self.on_mouse_up, || area_args(area, index, event));
    }
    fn on_image_click(&self, event: &MouseEvent) -> bool {
        self.queue("onImageClick", &self.on_image_click, || Array::of1(event))
    }
    fn on_image_mouse_move(&self, event: &MouseEvent) {
        self.queue("onImageMouseMove", &self.on_image_mouse_move, || Array::of1(event));
    }
    fn on_image_mouse_down(&self, event: &MouseEvent) {
        self.queue("onImageMouseDown", &self.on_image_mouse_down, || Array::of1(event));
    }
    fn on_image_mouse_up(&self, event: &MouseEvent) {
        self.queue("onImageMouseUp", &self.on_image_mouse_up, || Array::of1(event));
    }
    fn on_load(&self) {
        self.queue("onLoad", &self.on_load, Array::new);
    }
    fn on_extended_areas_created(&self, areas: &[ExtendedArea]) {
        self.queue(
            "onExtendedAreasCreated",
            &self.on_extended_areas_created,
            || Array::of1(&to_js(areas)),
        );
    }
}
