use crate::events::JsCallbacks;
use imagemapper::{ChildrenRenderer, ImageMapper as Controller, Outcome, Overlay, Surface, SurfaceSize};
use js_sys::Function;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, MouseEvent};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const LAYER_STYLE: &str = "position:absolute;top:0;left:0;pointer-events:none;";

type MouseHandler = Closure<dyn FnMut(MouseEvent)>;

/// `None` once unmounted.
pub type Handle = Rc<RefCell<Option<Shared>>>;
pub type WeakHandle = Weak<RefCell<Option<Shared>>>;

/// Controller plus its DOM, shared with the event closures.
pub struct Shared {
    pub mapper: Controller,
    pub surface: DomSurface,
    pub callbacks: Rc<JsCallbacks>,
    /// Last `renderChildren` function and its wrapper; reused while the function is the same object.
    pub children_fn: Option<(Function, ChildrenRenderer)>,
}

impl Shared {
    pub fn finish(&mut self, out: Outcome, event: &MouseEvent) {
        if out.prevent_default {
            event.prevent_default();
        }
        if out.hover_changed {
            let markup = self.mapper.hover_markup();
            self.surface.draw_hover(&markup);
        }
    }
}

pub struct DomSurface {
    document: Document,
    container: HtmlElement,
    img: HtmlImageElement,
    prefill: Element,
    hover: Element,
    map: HtmlElement,
    children: HtmlElement,
    shared: WeakHandle,
    image_handlers: Vec<MouseHandler>,
    onload: Option<Closure<dyn FnMut()>>,
    area_handlers: Vec<MouseHandler>,
}

fn warn(msg: &str, e: &JsValue) {
    web_sys::console::warn_2(&format!("image mapper: {msg}").into(), e);
}

fn html(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    document.create_element(tag)?.dyn_into::<HtmlElement>().map_err(JsValue::from)
}

fn layer(document: &Document, class: &str, z: u8) -> Result<Element, JsValue> {
    let svg = document.create_element_ns(Some(SVG_NS), "svg")?;
    svg.set_attribute("class", class)?;
    svg.set_attribute("style", &format!("{LAYER_STYLE}z-index:{z};"))?;
    Ok(svg)
}

/// Runs `f` against the shared state unless it is gone or already borrowed, then
/// delivers the callbacks it queued once the borrow is released.
fn with_shared(weak: &WeakHandle, f: impl FnOnce(&mut Shared)) {
    let Some(rc) = weak.upgrade() else { return };
    let callbacks = {
        let Ok(mut guard) = rc.try_borrow_mut() else {
            web_sys::console::warn_1(&"image mapper: event dropped while the widget is busy".into());
            return;
        };
        let Some(s) = guard.as_mut() else { return };
        f(s);
        s.callbacks.clone()
    };
    callbacks.flush();
}

impl DomSurface {
    pub fn build(mount: &Element, shared: WeakHandle) -> Result<DomSurface, JsValue> {
        let document = mount
            .owner_document()
            .ok_or_else(|| JsValue::from_str("mount element has no document"))?;

        let container = html(&document, "div")?;
        container.style().set_property("position", "relative")?;

        let img = HtmlImageElement::new()?;
        img.set_alt("");
        let s = img.style();
        s.set_property("position", "absolute")?;
        s.set_property("top", "0")?;
        s.set_property("left", "0")?;
        s.set_property("z-index", "1")?;
        s.set_property("user-select", "none")?;

        let prefill = layer(&document, "prefill-layer", 2)?;
        let hover = layer(&document, "hover-layer", 3)?;
        let map = html(&document, "map")?;
        let children = html(&document, "div")?;

        container.append_child(&img)?;
        container.append_child(&prefill)?;
        container.append_child(&hover)?;
        container.append_child(&map)?;
        container.append_child(&children)?;
        mount.append_child(&container)?;

        let mut surface = DomSurface {
            document,
            container,
            img,
            prefill,
            hover,
            map,
            children,
            shared,
            image_handlers: Vec::new(),
            onload: None,
            area_handlers: Vec::new(),
        };
        surface.wire_image();
        Ok(surface)
    }

    fn wire_image(&mut self) {
        let weak = self.shared.clone();
        let onload = Closure::<dyn FnMut()>::new(move || {
            with_shared(&weak, |s| {
                let cbs = s.callbacks.clone();
                s.mapper.image_loaded::<MouseEvent>(&mut s.surface, &*cbs);
            });
        });
        self.img.set_onload(Some(onload.as_ref().unchecked_ref()));
        self.onload = Some(onload);

        let weak = self.shared.clone();
        let click = Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
            with_shared(&weak, |s| {
                let cbs = s.callbacks.clone();
                let out = s.mapper.image_click(&e, &*cbs);
                s.finish(out, &e);
            });
        });
        self.img.set_onclick(Some(click.as_ref().unchecked_ref()));

        let weak = self.shared.clone();
        let mv = Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
            with_shared(&weak, |s| s.mapper.image_mouse_move(&e, &*s.callbacks));
        });
        self.img.set_onmousemove(Some(mv.as_ref().unchecked_ref()));

        let weak = self.shared.clone();
        let down = Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
            with_shared(&weak, |s| s.mapper.image_mouse_down(&e, &*s.callbacks));
        });
        self.img.set_onmousedown(Some(down.as_ref().unchecked_ref()));

        let weak = self.shared.clone();
        let up = Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
            with_shared(&weak, |s| s.mapper.image_mouse_up(&e, &*s.callbacks));
        });
        self.img.set_onmouseup(Some(up.as_ref().unchecked_ref()));

        self.image_handlers = vec![click, mv, down, up];
    }

    fn area_element(&mut self, index: usize, attrs: &imagemapper::AreaAttrs) -> Result<HtmlElement, JsValue> {
        let el = html(&self.document, "area")?;
        el.set_attribute("shape", attrs.shape)?;
        el.set_attribute("coords", &attrs.coords)?;
        el.set_attribute("data-key", &attrs.key)?;
        if let Some(href) = &attrs.href {
            el.set_attribute("href", href)?;
        }

        let handler = move |weak: WeakHandle, kind: AreaEvent| {
            Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
                with_shared(&weak, |s| {
                    let cbs = s.callbacks.clone();
                    let out = match kind {
                        AreaEvent::Enter => s.mapper.hover_on(index, &e, &*cbs),
                        AreaEvent::Leave => s.mapper.hover_off(index, &e, &*cbs),
                        AreaEvent::Click => s.mapper.click(index, &e, &*cbs),
                        AreaEvent::Move => {
                            s.mapper.mouse_move(index, &e, &*cbs);
                            Outcome::default()
                        }
                        AreaEvent::Down => {
                            s.mapper.mouse_down(index, &e, &*cbs);
                            Outcome::default()
                        }
                        AreaEvent::Up => {
                            s.mapper.mouse_up(index, &e, &*cbs);
                            Outcome::default()
                        }
                    };
                    s.finish(out, &e);
                });
            })
        };

        for kind in AreaEvent::ALL {
            let h = handler(self.shared.clone(), kind);
            let f = Some(h.as_ref().unchecked_ref());
            match kind {
                AreaEvent::Enter => el.set_onmouseenter(f),
                AreaEvent::Leave => el.set_onmouseleave(f),
                AreaEvent::Click => el.set_onclick(f),
                AreaEvent::Move => el.set_onmousemove(f),
                AreaEvent::Down => el.set_onmousedown(f),
                AreaEvent::Up => el.set_onmouseup(f),
            }
            self.area_handlers.push(h);
        }
        Ok(el)
    }

    fn draw_areas(&mut self, overlay: &Overlay) -> Result<(), JsValue> {
        self.map.set_inner_html("");
        self.area_handlers.clear();
        for (i, attrs) in overlay.areas.iter().enumerate() {
            let el = self.area_element(i, attrs)?;
            self.map.append_child(&el)?;
        }
        Ok(())
    }

    pub fn draw_hover(&mut self, markup: &str) {
        self.hover.set_inner_html(markup);
    }

    pub fn set_clickable(&self, clickable: bool) {
        let r = if clickable {
            self.map.style().set_property("cursor", "pointer")
        } else {
            self.map.style().remove_property("cursor").map(|_| ())
        };
        if let Err(e) = r {
            warn("failed to set map cursor", &e);
        }
    }

    /// Detaches the widget and releases every DOM handler.
    pub fn teardown(&mut self) {
        self.img.set_onload(None);
        self.img.set_onclick(None);
        self.img.set_onmousemove(None);
        self.img.set_onmousedown(None);
        self.img.set_onmouseup(None);
        self.map.set_inner_html("");
        self.container.remove();
        self.image_handlers.clear();
        self.area_handlers.clear();
        self.onload = None;
    }
}

#[derive(Clone, Copy)]
enum AreaEvent {
    Enter,
    Leave,
    Click,
    Move,
    Down,
    Up,
}

impl AreaEvent {
    const ALL: [AreaEvent; 6] = [
        AreaEvent::Enter,
        AreaEvent::Leave,
        AreaEvent::Click,
        AreaEvent::Move,
        AreaEvent::Down,
        AreaEvent::Up,
    ];
}

impl Surface for DomSurface {
    fn force_image_size(&mut self, width: Option<f64>, height: Option<f64>) {
        if let Some(w) = width {
            self.img.set_width(w.round() as u32);
        }
        if let Some(h) = height {
            self.img.set_height(h.round() as u32);
        }
    }

    fn measure_image(&self) -> SurfaceSize {
        SurfaceSize {
            width: self.img.client_width() as f64,
            height: self.img.client_height() as f64,
        }
    }

    fn apply_size(&mut self, size: SurfaceSize) {
        let view_box = format!("0 0 {} {}", size.width, size.height);
        for svg in [&self.prefill, &self.hover] {
            if let Err(e) = svg.set_attribute("viewBox", &view_box) {
                warn("failed to set viewBox", &e);
            }
        }
        let style = self.container.style();
        let r = style
            .set_property("width", &format!("{}px", size.width))
            .and_then(|_| style.set_property("height", &format!("{}px", size.height)));
        if let Err(e) = r {
            warn("failed to size container", &e);
        }
    }

    fn draw(&mut self, overlay: &Overlay) {
        if self.img.get_attribute("src").as_deref() != Some(overlay.src.as_str()) {
            self.img.set_src(&overlay.src);
        }
        let usemap = format!("#{}", overlay.map_name);
        if let Err(e) = self
            .img
            .set_attribute("usemap", &usemap)
            .and_then(|_| self.map.set_attribute("name", &overlay.map_name))
        {
            warn("failed to link image to map", &e);
        }
        self.prefill.set_inner_html(&overlay.prefill);
        self.hover.set_inner_html(&overlay.hover);
        if let Err(e) = self.draw_areas(overlay) {
            warn("failed to build image map areas", &e);
        }
        self.children
            .set_inner_html(overlay.children.as_deref().unwrap_or(""));
    }
}
