use imagemapper::{
    needs_recompute, Area, ChildrenRenderer, ExtendedArea, HoverState, ImageMap, ImageMapper,
    Inputs, MapperEvents, MapperProps, Outcome, Overlay, Recompute, Shape, Surface, SurfaceSize,
};
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq)]
struct Ev(u32);

#[derive(Default)]
struct FakeSurface {
    rendered: SurfaceSize,
    forced: Vec<(Option<f64>, Option<f64>)>,
    applied: Vec<SurfaceSize>,
    draws: usize,
}

impl FakeSurface {
    fn rendered(width: f64, height: f64) -> Self {
        FakeSurface {
            rendered: SurfaceSize { width, height },
            ..Default::default()
        }
    }
}

impl Surface for FakeSurface {
    fn force_image_size(&mut self, width: Option<f64>, height: Option<f64>) {
        self.forced.push((width, height));
        if let Some(w) = width {
            self.rendered.width = w;
        }
        if let Some(h) = height {
            self.rendered.height = h;
        }
    }
    fn measure_image(&self) -> SurfaceSize {
        self.rendered
    }
    fn apply_size(&mut self, size: SurfaceSize) {
        self.applied.push(size);
    }
    fn draw(&mut self, _overlay: &Overlay) {
        self.draws += 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Click(usize, Ev),
    Enter(usize),
    Leave(usize),
    Move(usize, Ev),
    ImageClick(Ev),
    Load,
    Created(Vec<ExtendedArea>),
}

#[derive(Default)]
struct Recorder {
    calls: RefCell<Vec<Call>>,
    handles_click: bool,
}

impl Recorder {
    fn with_click() -> Self {
        Recorder {
            handles_click: true,
            ..Default::default()
        }
    }
    fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }
    fn created_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Created(_)))
            .count()
    }
}

impl MapperEvents<Ev> for Recorder {
    fn on_click(&self, _area: &ExtendedArea, index: usize, event: &Ev) -> bool {
        if self.handles_click {
            self.calls.borrow_mut().push(Call::Click(index, event.clone()));
        }
        self.handles_click
    }
    fn on_mouse_enter(&self, _area: &ExtendedArea, index: usize, _event: &Ev) {
        self.calls.borrow_mut().push(Call::Enter(index));
    }
    fn on_mouse_leave(&self, _area: &ExtendedArea, index: usize, _event: &Ev) {
        self.calls.borrow_mut().push(Call::Leave(index));
    }
    fn on_mouse_move(&self, _area: &ExtendedArea, index: usize, event: &Ev) {
        self.calls.borrow_mut().push(Call::Move(index, event.clone()));
    }
    fn on_image_click(&self, event: &Ev) -> bool {
        self.calls.borrow_mut().push(Call::ImageClick(event.clone()));
        true
    }
    fn on_load(&self) {
        self.calls.borrow_mut().push(Call::Load);
    }
    fn on_extended_areas_created(&self, areas: &[ExtendedArea]) {
        self.calls.borrow_mut().push(Call::Created(areas.to_vec()));
    }
}

fn sample_map() -> ImageMap {
    ImageMap {
        name: "floor".into(),
        areas: vec![
            Area::new(Shape::Rect, vec![0.0, 0.0, 10.0, 10.0]),
            Area::new(Shape::Circle, vec![50.0, 50.0, 5.0]),
            Area::new(Shape::Poly, vec![0.0, 0.0, 20.0, 0.0, 20.0, 20.0]),
        ],
    }
}

fn props() -> MapperProps {
    MapperProps::new("floor.png").with_map(sample_map())
}

#[test]
fn mount_derives_then_notifies() {
    let mut m = ImageMapper::new(props().with_size(200.0, 100.0).with_natural_size(100.0, 100.0));
    let mut s = FakeSurface::rendered(100.0, 100.0);
    let ev = Recorder::default();
    assert_eq!(m.mount(&mut s, &ev), Recompute::Performed { map_changed: false });

    let calls = ev.take();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], Call::Load);
    let Call::Created(areas) = &calls[1] else {
        panic!("expected areas notification, got {:?}", calls[1]);
    };
    assert_eq!(areas.len(), 3);
    assert_eq!(areas[0].scaled_coords, vec![0.0, 0.0, 20.0, 10.0]);
    assert_eq!(areas[1].center, [100.0, 50.0]);
    assert_eq!(areas.as_slice(), m.extended_areas());
    assert_eq!(s.draws, 1);
}

#[test]
fn unchanged_inputs_skip_recompute() {
    let mut m = ImageMapper::new(props());
    let mut s = FakeSurface::rendered(640.0, 480.0);
    let ev = Recorder::default();
    m.mount(&mut s, &ev);
    let before = m.extended_areas().to_vec();
    ev.take();

    assert_eq!(m.update(props_with_same_name(), &mut s, &ev), Recompute::Skipped);
    assert_eq!(m.mount(&mut s, &ev), Recompute::Skipped);
    assert_eq!(ev.created_count(), 0);
    assert!(ev.take().is_empty(), "skip must not notify");
    assert_eq!(m.extended_areas(), before.as_slice());
    assert_eq!(s.draws, 1);
}

fn props_with_same_name() -> MapperProps {
    // a fresh but value-equal map
    props()
}

#[test]
fn watched_prop_change_recomputes_without_clearing_hover() {
    let mut m = ImageMapper::new(props());
    let mut s = FakeSurface::rendered(640.0, 480.0);
    let ev = Recorder::default();
    m.mount(&mut s, &ev);
    m.hover_on(1, &Ev(0), &ev);
    ev.take();

    let mut next = props();
    next.stroke_color = "blue".into();
    assert_eq!(m.update(next, &mut s, &ev), Recompute::Performed { map_changed: false });
    assert_eq!(ev.created_count(), 1);
    assert_eq!(m.hover(), HoverState::Hovering { index: 1 });
}

#[test]
fn replacing_map_clears_hover() {
    let mut m = ImageMapper::new(props());
    let mut s = FakeSurface::rendered(640.0, 480.0);
    let ev = Recorder::default();
    m.mount(&mut s, &ev);
    m.hover_on(0, &Ev(1), &ev);
    assert_eq!(m.hover(), HoverState::Hovering { index: 0 });

    let mut map = sample_map();
    map.areas[0].coords[2] = 12.0;
    let r = m.update(props().with_map(map), &mut s, &ev);
    assert_eq!(r, Recompute::Performed { map_changed: true });
    assert_eq!(m.hover(), HoverState::Idle);
    assert_eq!(m.extended_areas()[0].scaled_coords[2], 12.0);
}

#[test]
fn children_renderer_compared_by_identity() {
    let renderer = ChildrenRenderer::new(|| "<span>hi</span>".to_string());
    let mut p = props();
    p.render_children = Some(renderer.clone());
    let mut m = ImageMapper::new(p.clone());
    let mut s = FakeSurface::rendered(10.0, 10.0);
    let ev = Recorder::default();
    m.mount(&mut s, &ev);
    assert_eq!(m.update(p.clone(), &mut s, &ev), Recompute::Skipped);

    let mut q = props();
    q.render_children = Some(ChildrenRenderer::new(|| "<span>hi</span>".to_string()));
    assert!(matches!(m.update(q, &mut s, &ev), Recompute::Performed { .. }));
    assert_eq!(m.overlay().children.as_deref(), Some("<span>hi</span>"));
}

#[test]
fn enter_notifies_before_hovering() {
    let mut m = ImageMapper::new(props());
    let mut s = FakeSurface::rendered(10.0, 10.0);
    let ev = Recorder::default();
    m.mount(&mut s, &ev);
    ev.take();

    let out = m.hover_on(2, &Ev(7), &ev);
    assert!(out.hover_changed);
    assert_eq!(ev.take(), vec![Call::Enter(2)]);
    assert_eq!(m.hovered_area().map(|a| a.area.shape), Some(Shape::Poly));

    let out = m.hover_off(2, &Ev(8), &ev);
    assert!(out.hover_changed);
    assert_eq!(ev.take(), vec![Call::Leave(2)]);
    assert_eq!(m.hover(), HoverState::Idle);
}

#[test]
fn click_without_hover_dispatches_and_prevents_default() {
    let mut m = ImageMapper::new(props());
    let mut s = FakeSurface::rendered(10.0, 10.0);
    let ev = Recorder::with_click();
    m.mount(&mut s, &ev);
    ev.take();

    let out = m.click(1, &Ev(42), &ev);
    assert!(out.prevent_default);
    assert!(!out.hover_changed);
    assert_eq!(ev.take(), vec![Call::Click(1, Ev(42))]);
}

#[test]
fn click_without_handler_keeps_default_and_clears_hover() {
    let mut m = ImageMapper::new(props());
    let mut s = FakeSurface::rendered(10.0, 10.0);
    let ev = Recorder::default();
    m.mount(&mut s, &ev);
    m.hover_on(0, &Ev(0), &ev);

    let out = m.click(0, &Ev(1), &ev);
    assert!(!out.prevent_default);
    assert!(out.hover_changed);
    assert_eq!(m.hover(), HoverState::Idle);
}

#[test]
fn image_click_clears_hover_after_dispatch() {
    let mut m = ImageMapper::new(props());
    let mut s = FakeSurface::rendered(10.0, 10.0);
    let ev = Recorder::default();
    m.mount(&mut s, &ev);
    m.hover_on(0, &Ev(0), &ev);
    ev.take();

    let out = m.image_click(&Ev(5), &ev);
    assert!(out.prevent_default);
    assert_eq!(ev.take(), vec![Call::ImageClick(Ev(5))]);
    assert_eq!(m.hover(), HoverState::Idle);
}

#[test]
fn move_forwards_without_state_change() {
    let mut m = ImageMapper::new(props());
    let mut s = FakeSurface::rendered(10.0, 10.0);
    let ev = Recorder::default();
    m.mount(&mut s, &ev);
    ev.take();

    m.mouse_move(1, &Ev(3), &ev);
    m.mouse_down(1, &Ev(4), &ev);
    m.mouse_up(1, &Ev(4), &ev);
    assert_eq!(ev.take(), vec![Call::Move(1, Ev(3))]);
    assert_eq!(m.hover(), HoverState::Idle);
}

#[test]
fn out_of_range_and_inactive_events_are_ignored() {
    let mut m = ImageMapper::new(props());
    let mut s = FakeSurface::rendered(10.0, 10.0);
    let ev = Recorder::with_click();
    m.mount(&mut s, &ev);
    ev.take();

    assert_eq!(m.hover_on(99, &Ev(0), &ev), Outcome::default());
    assert!(ev.take().is_empty());

    let mut p = props();
    p.active = false;
    m.update(p, &mut s, &ev);
    ev.take();
    assert!(!m.click(0, &Ev(0), &ev).prevent_default);
    m.hover_on(0, &Ev(0), &ev);
    assert!(ev.take().is_empty());
    assert_eq!(m.hover(), HoverState::Idle);
}

#[test]
fn explicit_size_is_forced_on_image() {
    let mut m = ImageMapper::new(props().with_size(300.0, 150.0));
    let mut s = FakeSurface::rendered(640.0, 480.0);
    let ev = Recorder::default();
    m.mount(&mut s, &ev);
    assert_eq!(s.forced, vec![(Some(300.0), Some(150.0))]);
    assert_eq!(s.applied, vec![SurfaceSize { width: 300.0, height: 150.0 }]);
    assert_eq!(m.surface_size(), Some(SurfaceSize { width: 300.0, height: 150.0 }));
}

#[test]
fn image_load_measures_and_fires_on_load_each_time() {
    let mut m = ImageMapper::new(props());
    let mut s = FakeSurface::rendered(0.0, 0.0);
    let ev = Recorder::default();
    m.mount(&mut s, &ev);
    ev.take();

    s.rendered = SurfaceSize { width: 800.0, height: 600.0 };
    let size = m.image_loaded(&mut s, &ev);
    assert_eq!(size, SurfaceSize { width: 800.0, height: 600.0 });
    m.image_loaded(&mut s, &ev);
    assert_eq!(ev.take(), vec![Call::Load, Call::Load]);
    assert_eq!(s.applied.len(), 3);
}

#[test]
fn source_areas_are_not_mutated() {
    let p = props().with_size(200.0, 200.0).with_natural_size(100.0, 100.0);
    let original = p.map.clone();
    let mut m = ImageMapper::new(p);
    let mut s = FakeSurface::rendered(10.0, 10.0);
    let ev = Recorder::default();
    m.mount(&mut s, &ev);
    assert_eq!(m.props().map, original);
    for (ext, src) in m.extended_areas().iter().zip(original.areas.iter()) {
        assert_eq!(&ext.area, src);
        assert_eq!(ext.scaled_coords.len(), src.coords.len());
    }
}

#[test]
fn nan_coordinates_compare_equal_between_updates() {
    let mut map = sample_map();
    map.areas[2].coords[1] = f64::NAN;
    let mut m = ImageMapper::new(props().with_map(map.clone()));
    let mut s = FakeSurface::rendered(640.0, 480.0);
    let ev = Recorder::default();
    m.mount(&mut s, &ev);
    m.hover_on(2, &Ev(0), &ev);
    ev.take();

    assert_eq!(m.update(props().with_map(map.clone()), &mut s, &ev), Recompute::Skipped);
    assert_eq!(ev.created_count(), 0);
    assert_eq!(m.hover(), HoverState::Hovering { index: 2 });

    map.areas[2].coords[1] = 1.0;
    let r = m.update(props().with_map(map), &mut s, &ev);
    assert_eq!(r, Recompute::Performed { map_changed: true });
    assert_eq!(m.hover(), HoverState::Idle);
}

#[test]
fn dirty_predicate_treats_nan_as_equal() {
    let mut a = props();
    a.map.areas[0].coords[0] = f64::NAN;
    a.width = Some(f64::NAN);
    let b = a.clone();
    assert!(needs_recompute(None, &Inputs::of(&a)));
    assert!(!needs_recompute(Some(&Inputs::of(&a)), &Inputs::of(&b)));

    let mut c = b.clone();
    c.width = Some(300.0);
    assert!(needs_recompute(Some(&Inputs::of(&a)), &Inputs::of(&c)));
}
