use crate::geometry::points::{coords_attr, points_string};
use crate::geometry::scale::ScaleFactors;
use crate::model::{ConnectorPath, ExtendedArea, Shape};
use crate::props::MapperProps;
use std::fmt::Write;

const CONNECTOR_COLOR: &str = "red";
const CONNECTOR_RADIUS: f64 = 5.0;
const CONNECTOR_LINE_WIDTH: f64 = 3.0;
const CONNECTOR_DASH: &str = "6,6";

/// Rendered state of the overlay layers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overlay {
    pub src: String,
    pub map_name: String,
    pub prefill: String,
    pub hover: String,
    pub areas: Vec<AreaAttrs>,
    pub children: Option<String>,
}

/// Attributes of one `<area>` in the interactive image map.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaAttrs {
    pub key: String,
    pub shape: &'static str,
    pub coords: String,
    pub href: Option<String>,
}

#[derive(Clone, Copy, Debug)]
pub struct Paint<'a> {
    pub fill: &'a str,
    pub stroke: &'a str,
    pub stroke_width: f64,
}

pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn at(s: &[f64], i: usize) -> f64 {
    s.get(i).copied().unwrap_or(0.0)
}

pub fn shape_element(shape: Shape, scaled: &[f64], paint: Paint<'_>) -> String {
    let style = format!(
        r#"fill="{}" stroke="{}" stroke-width="{}""#,
        escape_attr(paint.fill),
        escape_attr(paint.stroke),
        paint.stroke_width
    );
    match shape {
        Shape::Rect => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" {}/>"#,
            at(scaled, 0),
            at(scaled, 1),
            at(scaled, 2) - at(scaled, 0),
            at(scaled, 3) - at(scaled, 1),
            style
        ),
        Shape::Circle => format!(
            r#"<circle cx="{}" cy="{}" r="{}" {}/>"#,
            at(scaled, 0),
            at(scaled, 1),
            at(scaled, 2),
            style
        ),
        Shape::Poly | Shape::Other => {
            format!(r#"<polygon points="{}" {}/>"#, points_string(scaled), style)
        }
    }
}

fn stroke_of<'a>(ext: &'a ExtendedArea, props: &'a MapperProps) -> (&'a str, f64) {
    (
        ext.area.stroke_color.as_deref().unwrap_or(&props.stroke_color),
        ext.area.line_width.unwrap_or(props.line_width),
    )
}

pub fn prefill_layer(areas: &[ExtendedArea], props: &MapperProps, factors: ScaleFactors) -> String {
    let mut out = String::new();
    for ext in areas {
        let Some(fill) = ext.area.pre_fill_color.as_deref() else {
            continue;
        };
        let (stroke, stroke_width) = stroke_of(ext, props);
        out.push_str(&shape_element(
            ext.area.shape,
            &ext.scaled_coords,
            Paint {
                fill,
                stroke,
                stroke_width,
            },
        ));
    }
    for path in &props.paths {
        out.push_str(&connector_path(path, areas, factors));
    }
    out
}

pub fn hover_layer(hovered: Option<&ExtendedArea>, props: &MapperProps) -> String {
    let Some(ext) = hovered else {
        return String::new();
    };
    let (stroke, stroke_width) = stroke_of(ext, props);
    let fill = ext.area.fill_color.as_deref().unwrap_or(&props.fill_color);
    shape_element(
        ext.area.shape,
        &ext.scaled_coords,
        Paint {
            fill,
            stroke,
            stroke_width,
        },
    )
}

/// Dashed connectors between area centers. Unknown indices anchor at the origin.
pub fn connector_path(path: &ConnectorPath, areas: &[ExtendedArea], factors: ScaleFactors) -> String {
    let circle = path.circle.clone().unwrap_or_default();
    let line = path.line.clone().unwrap_or_default();
    let circle_color = escape_attr(circle.color.as_deref().unwrap_or(CONNECTOR_COLOR));
    let line_color = escape_attr(line.color.as_deref().unwrap_or(CONNECTOR_COLOR));
    let line_width = line.stroke_width.unwrap_or(CONNECTOR_LINE_WIDTH);
    let r = circle.radius.unwrap_or(CONNECTOR_RADIUS) * factors.x;
    let center = |i: usize| areas.get(i).map_or([0.0, 0.0], |a| a.center);
    let dot = |p: [f64; 2]| {
        format!(
            r#"<circle cx="{}" cy="{}" r="{}" stroke="{c}" stroke-width="3" fill="{c}"/>"#,
            p[0],
            p[1],
            r,
            c = circle_color
        )
    };

    let mut out = String::new();
    for (k, [from_i, to_i]) in path.steps.iter().copied().enumerate() {
        let from = center(from_i);
        let to = center(to_i);
        out.push_str(r#"<g class="segment-path">"#);
        if k == 0 {
            out.push_str(&dot(from));
        }
        let _ = write!(
            out,
            r#"<line stroke-dasharray="{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
            CONNECTOR_DASH, from[0], from[1], to[0], to[1], line_color, line_width
        );
        out.push_str(&dot(to));
        out.push_str("</g>");
    }
    out
}

pub fn area_attrs(areas: &[ExtendedArea]) -> Vec<AreaAttrs> {
    areas
        .iter()
        .enumerate()
        .map(|(i, ext)| AreaAttrs {
            key: ext.area.id.clone().unwrap_or_else(|| i.to_string()),
            shape: ext.area.shape.area_attr(),
            coords: coords_attr(&ext.scaled_coords),
            href: ext.area.href.clone(),
        })
        .collect()
}
