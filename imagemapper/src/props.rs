use crate::geometry::scale::DisplayGeometry;
use crate::model::{Area, ConnectorPath, ImageMap, MapError};
use serde::Deserialize;
use std::fmt;
use std::rc::Rc;

pub const DEFAULT_FILL_COLOR: &str = "rgba(255, 255, 255, 0.5)";
pub const DEFAULT_STROKE_COLOR: &str = "rgba(0, 0, 0, 0.5)";
pub const DEFAULT_LINE_WIDTH: f64 = 1.0;

/// Supplier of extra overlay markup. Compared by identity, not by output.
#[derive(Clone)]
pub struct ChildrenRenderer(pub Rc<dyn Fn() -> String>);

impl ChildrenRenderer {
    pub fn new(f: impl Fn() -> String + 'static) -> Self {
        ChildrenRenderer(Rc::new(f))
    }

    pub fn render(&self) -> String {
        (self.0)()
    }
}

impl PartialEq for ChildrenRenderer {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl fmt::Debug for ChildrenRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChildrenRenderer({:p})", Rc::as_ptr(&self.0))
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperProps {
    pub src: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub img_width: Option<f64>,
    #[serde(default)]
    pub img_height: Option<f64>,
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default)]
    pub map: ImageMap,
    #[serde(default)]
    pub paths: Vec<ConnectorPath>,
    #[serde(skip)]
    pub render_children: Option<ChildrenRenderer>,
}

fn default_active() -> bool {
    true
}
fn default_fill_color() -> String {
    DEFAULT_FILL_COLOR.to_string()
}
fn default_stroke_color() -> String {
    DEFAULT_STROKE_COLOR.to_string()
}
fn default_line_width() -> f64 {
    DEFAULT_LINE_WIDTH
}

impl MapperProps {
    pub fn new(src: impl Into<String>) -> Self {
        MapperProps {
            src: src.into(),
            active: true,
            width: None,
            height: None,
            img_width: None,
            img_height: None,
            fill_color: default_fill_color(),
            stroke_color: default_stroke_color(),
            line_width: DEFAULT_LINE_WIDTH,
            map: ImageMap::default(),
            paths: Vec::new(),
            render_children: None,
        }
    }

    pub fn from_json(s: &str) -> Result<MapperProps, MapError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn with_map(mut self, map: ImageMap) -> Self {
        self.map = map;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_natural_size(mut self, width: f64, height: f64) -> Self {
        self.img_width = Some(width);
        self.img_height = Some(height);
        self
    }

    pub fn geometry(&self) -> DisplayGeometry {
        DisplayGeometry {
            natural_width: self.img_width,
            natural_height: self.img_height,
            display_width: self.width,
            display_height: self.height,
        }
    }
}

/// Display-affecting props; a change in any of them forces a recomputation.
#[derive(Clone, Debug, PartialEq)]
pub struct Watched {
    pub active: bool,
    pub fill_color: String,
    pub height: Option<f64>,
    pub img_width: Option<f64>,
    pub img_height: Option<f64>,
    pub line_width: f64,
    pub src: String,
    pub stroke_color: String,
    pub width: Option<f64>,
    pub paths: Vec<ConnectorPath>,
    pub render_children: Option<ChildrenRenderer>,
}

/// Everything a derivation depends on.
#[derive(Clone, Debug, PartialEq)]
pub struct Inputs {
    pub map: ImageMap,
    pub watched: Watched,
}

impl Inputs {
    pub fn of(p: &MapperProps) -> Inputs {
        Inputs {
            map: p.map.clone(),
            watched: Watched {
                active: p.active,
                fill_color: p.fill_color.clone(),
                height: p.height,
                img_width: p.img_width,
                img_height: p.img_height,
                line_width: p.line_width,
                src: p.src.clone(),
                stroke_color: p.stroke_color.clone(),
                width: p.width,
                paths: p.paths.clone(),
                render_children: p.render_children.clone(),
            },
        }
    }
}

/// Dirty predicate. `None` means nothing has been derived yet.
pub fn needs_recompute(previous: Option<&Inputs>, next: &Inputs) -> bool {
    match previous {
        None => true,
        Some(prev) => {
            !same_map(&prev.map, &next.map) || !same_watched(&prev.watched, &next.watched)
        }
    }
}

/// `==` except that NaN equals NaN, as in JS deep equality.
fn same_f64(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn same_opt(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_f64(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn same_area(a: &Area, b: &Area) -> bool {
    a.id == b.id
        && a.shape == b.shape
        && a.coords.len() == b.coords.len()
        && a.coords.iter().zip(&b.coords).all(|(x, y)| same_f64(*x, *y))
        && a.href == b.href
        && a.fill_color == b.fill_color
        && a.pre_fill_color == b.pre_fill_color
        && a.stroke_color == b.stroke_color
        && same_opt(a.line_width, b.line_width)
}

/// Deep value comparison of two maps; NaN coordinates compare equal.
pub fn same_map(a: &ImageMap, b: &ImageMap) -> bool {
    a.name == b.name
        && a.areas.len() == b.areas.len()
        && a.areas.iter().zip(&b.areas).all(|(x, y)| same_area(x, y))
}

fn same_path(a: &ConnectorPath, b: &ConnectorPath) -> bool {
    let circles = match (&a.circle, &b.circle) {
        (Some(x), Some(y)) => x.color == y.color && same_opt(x.radius, y.radius),
        (None, None) => true,
        _ => false,
    };
    let lines = match (&a.line, &b.line) {
        (Some(x), Some(y)) => x.color == y.color && same_opt(x.stroke_width, y.stroke_width),
        (None, None) => true,
        _ => false,
    };
    a.steps == b.steps && circles && lines
}

fn same_watched(a: &Watched, b: &Watched) -> bool {
    a.active == b.active
        && a.fill_color == b.fill_color
        && same_opt(a.height, b.height)
        && same_opt(a.img_width, b.img_width)
        && same_opt(a.img_height, b.img_height)
        && same_f64(a.line_width, b.line_width)
        && a.src == b.src
        && a.stroke_color == b.stroke_color
        && same_opt(a.width, b.width)
        && a.paths.len() == b.paths.len()
        && a.paths.iter().zip(&b.paths).all(|(x, y)| same_path(x, y))
        && a.render_children == b.render_children
}
