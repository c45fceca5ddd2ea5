use crate::geometry::extend::extend_areas;
use crate::model::{ExtendedArea, HoverState, SurfaceSize};
use crate::props::{needs_recompute, same_map, Inputs, MapperProps};
use crate::svg::{self, Overlay};
use tracing::{debug, warn};

/// Sizing and drawing capability of the host. The controller never touches
/// platform objects itself.
pub trait Surface {
    /// Forces the image's rendered box; `None` leaves that axis untouched.
    fn force_image_size(&mut self, width: Option<f64>, height: Option<f64>);
    /// Current rendered box of the image.
    fn measure_image(&self) -> SurfaceSize;
    /// Sets both overlay viewBoxes and the container box.
    fn apply_size(&mut self, size: SurfaceSize);
    fn draw(&mut self, _overlay: &Overlay) {}
}

/// External callbacks. Every method defaults to a no-op; click handlers
/// return `true` when they ran so the host can suppress the default action.
pub trait MapperEvents<E: ?Sized> {
    fn on_click(&self, _area: &ExtendedArea, _index: usize, _event: &E) -> bool {
        false
    }
    fn on_mouse_enter(&self, _area: &ExtendedArea, _index: usize, _event: &E) {}
    fn on_mouse_leave(&self, _area: &ExtendedArea, _index: usize, _event: &E) {}
    fn on_mouse_move(&self, _area: &ExtendedArea, _index: usize, _event: &E) {}
    fn on_mouse_down(&self, _area: &ExtendedArea, _index: usize, _event: &E) {}
    fn on_mouse_up(&self, _area: &ExtendedArea, _index: usize, _event: &E) {}
    fn on_image_click(&self, _event: &E) -> bool {
        false
    }
    fn on_image_mouse_move(&self, _event: &E) {}
    fn on_image_mouse_down(&self, _event: &E) {}
    fn on_image_mouse_up(&self, _event: &E) {}
    fn on_load(&self) {}
    fn on_extended_areas_created(&self, _areas: &[ExtendedArea]) {}
}

impl<E: ?Sized> MapperEvents<E> for () {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recompute {
    Skipped,
    Performed { map_changed: bool },
}

/// What the host should do after a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub prevent_default: bool,
    pub hover_changed: bool,
}

pub struct ImageMapper {
    props: MapperProps,
    cache: Option<Inputs>,
    areas: Vec<ExtendedArea>,
    hover: HoverState,
    size: Option<SurfaceSize>,
}

impl ImageMapper {
    pub fn new(props: MapperProps) -> Self {
        ImageMapper {
            props,
            cache: None,
            areas: Vec::new(),
            hover: HoverState::Idle,
            size: None,
        }
    }

    pub fn props(&self) -> &MapperProps {
        &self.props
    }
    pub fn extended_areas(&self) -> &[ExtendedArea] {
        &self.areas
    }
    pub fn hover(&self) -> HoverState {
        self.hover
    }
    pub fn hovered_area(&self) -> Option<&ExtendedArea> {
        self.hover.index().and_then(|i| self.areas.get(i))
    }
    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.size
    }
    pub fn is_mounted(&self) -> bool {
        self.cache.is_some()
    }

    /// First derivation. A second call behaves like `update` with unchanged props.
    pub fn mount<E: ?Sized>(
        &mut self,
        surface: &mut dyn Surface,
        events: &dyn MapperEvents<E>,
    ) -> Recompute {
        let next = Inputs::of(&self.props);
        self.apply(next, surface, events)
    }

    pub fn update<E: ?Sized>(
        &mut self,
        next: MapperProps,
        surface: &mut dyn Surface,
        events: &dyn MapperEvents<E>,
    ) -> Recompute {
        let inputs = Inputs::of(&next);
        self.props = next;
        self.apply(inputs, surface, events)
    }

    fn apply<E: ?Sized>(
        &mut self,
        next: Inputs,
        surface: &mut dyn Surface,
        events: &dyn MapperEvents<E>,
    ) -> Recompute {
        if !needs_recompute(self.cache.as_ref(), &next) {
            debug!(map = %self.props.map.name, "inputs unchanged, skipping derivation");
            return Recompute::Skipped;
        }
        let map_changed = self.cache.as_ref().is_some_and(|c| !same_map(&c.map, &next.map));
        if map_changed && self.hover != HoverState::Idle {
            debug!("map replaced, clearing hover");
            self.hover = HoverState::Idle;
        }

        for (i, area) in self.props.map.areas.iter().enumerate() {
            if let Err(e) = area.validate() {
                warn!(map = %self.props.map.name, index = i, "malformed area: {e}");
            }
        }
        let factors = self.props.geometry().factors();
        self.areas = extend_areas(&self.props.map.areas, factors);
        if !self.props.active || self.hover.index().is_some_and(|i| i >= self.areas.len()) {
            self.hover = HoverState::Idle;
        }
        self.cache = Some(next);
        debug!(
            map = %self.props.map.name,
            areas = self.areas.len(),
            map_changed,
            "derived extended areas"
        );

        surface.draw(&self.overlay());
        self.sync_surface(surface, events);
        events.on_extended_areas_created(&self.areas);
        Recompute::Performed { map_changed }
    }

    /// Image finished loading: resize the overlay to the image.
    pub fn image_loaded<E: ?Sized>(
        &mut self,
        surface: &mut dyn Surface,
        events: &dyn MapperEvents<E>,
    ) -> SurfaceSize {
        self.sync_surface(surface, events)
    }

    fn sync_surface<E: ?Sized>(
        &mut self,
        surface: &mut dyn Surface,
        events: &dyn MapperEvents<E>,
    ) -> SurfaceSize {
        let width = self.props.width.filter(|w| *w > 0.0);
        let height = self.props.height.filter(|h| *h > 0.0);
        surface.force_image_size(width, height);
        let measured = surface.measure_image();
        let size = SurfaceSize {
            width: width.unwrap_or(measured.width),
            height: height.unwrap_or(measured.height),
        };
        surface.apply_size(size);
        self.size = Some(size);
        events.on_load();
        size
    }

    fn target(&self, index: usize) -> Option<&ExtendedArea> {
        if !self.props.active {
            return None;
        }
        self.areas.get(index)
    }

    pub fn hover_on<E: ?Sized>(
        &mut self,
        index: usize,
        event: &E,
        events: &dyn MapperEvents<E>,
    ) -> Outcome {
        let Some(area) = self.target(index) else {
            return Outcome::default();
        };
        events.on_mouse_enter(area, index, event);
        let next = HoverState::Hovering { index };
        let hover_changed = self.hover != next;
        self.hover = next;
        Outcome {
            prevent_default: false,
            hover_changed,
        }
    }

    pub fn hover_off<E: ?Sized>(
        &mut self,
        index: usize,
        event: &E,
        events: &dyn MapperEvents<E>,
    ) -> Outcome {
        let Some(area) = self.target(index) else {
            return Outcome::default();
        };
        events.on_mouse_leave(area, index, event);
        Outcome {
            prevent_default: false,
            hover_changed: self.clear_hover(),
        }
    }

    pub fn click<E: ?Sized>(
        &mut self,
        index: usize,
        event: &E,
        events: &dyn MapperEvents<E>,
    ) -> Outcome {
        let Some(area) = self.target(index) else {
            return Outcome::default();
        };
        let prevent_default = events.on_click(area, index, event);
        Outcome {
            prevent_default,
            hover_changed: self.clear_hover(),
        }
    }

    pub fn mouse_move<E: ?Sized>(&self, index: usize, event: &E, events: &dyn MapperEvents<E>) {
        if let Some(area) = self.target(index) {
            events.on_mouse_move(area, index, event);
        }
    }

    pub fn mouse_down<E: ?Sized>(&self, index: usize, event: &E, events: &dyn MapperEvents<E>) {
        if let Some(area) = self.target(index) {
            events.on_mouse_down(area, index, event);
        }
    }

    pub fn mouse_up<E: ?Sized>(&self, index: usize, event: &E, events: &dyn MapperEvents<E>) {
        if let Some(area) = self.target(index) {
            events.on_mouse_up(area, index, event);
        }
    }

    pub fn image_click<E: ?Sized>(&mut self, event: &E, events: &dyn MapperEvents<E>) -> Outcome {
        let prevent_default = events.on_image_click(event);
        Outcome {
            prevent_default,
            hover_changed: self.clear_hover(),
        }
    }

    pub fn image_mouse_move<E: ?Sized>(&self, event: &E, events: &dyn MapperEvents<E>) {
        events.on_image_mouse_move(event);
    }

    pub fn image_mouse_down<E: ?Sized>(&self, event: &E, events: &dyn MapperEvents<E>) {
        events.on_image_mouse_down(event);
    }

    pub fn image_mouse_up<E: ?Sized>(&self, event: &E, events: &dyn MapperEvents<E>) {
        events.on_image_mouse_up(event);
    }

    fn clear_hover(&mut self) -> bool {
        let was = self.hover != HoverState::Idle;
        self.hover = HoverState::Idle;
        was
    }

    pub fn hover_markup(&self) -> String {
        svg::hover_layer(self.hovered_area(), &self.props)
    }

    pub fn overlay(&self) -> Overlay {
        let factors = self.props.geometry().factors();
        Overlay {
            src: self.props.src.clone(),
            map_name: self.props.map.name.clone(),
            prefill: svg::prefill_layer(&self.areas, &self.props, factors),
            hover: self.hover_markup(),
            areas: svg::area_attrs(&self.areas),
            children: self.props.render_children.as_ref().map(|r| r.render()),
        }
    }
}
