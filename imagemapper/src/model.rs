use serde::{Deserialize, Serialize};
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Rect,
    #[serde(alias = "polygon")]
    Poly,
    /// Unrecognized shape name; drawn and centered like a polygon.
    #[serde(other)]
    Other,
}

impl Shape {
    /// Value for the `shape` attribute of an HTML `<area>`.
    pub fn area_attr(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Rect => "rect",
            Shape::Poly | Shape::Other => "poly",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub shape: Shape,
    #[serde(default)]
    pub coords: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AreaError {
    #[error("{shape} area needs {expected} coordinates, got {got}")]
    CoordCount {
        shape: &'static str,
        expected: &'static str,
        got: usize,
    },
    #[error("coordinate {index} is not finite")]
    NonFinite { index: usize },
}

impl Area {
    pub fn new(shape: Shape, coords: Vec<f64>) -> Self {
        Area {
            id: None,
            shape,
            coords,
            href: None,
            fill_color: None,
            pre_fill_color: None,
            stroke_color: None,
            line_width: None,
        }
    }

    /// Checks coordinate count and finiteness for the declared shape.
    pub fn validate(&self) -> Result<(), AreaError> {
        if let Some(index) = self.coords.iter().position(|c| !c.is_finite()) {
            return Err(AreaError::NonFinite { index });
        }
        let n = self.coords.len();
        let (ok, expected) = match self.shape {
            Shape::Circle => (n == 3, "3"),
            Shape::Rect => (n == 4, "4"),
            Shape::Poly | Shape::Other => (n >= 4 && n % 2 == 0, "an even number (>= 4) of"),
        };
        if ok {
            Ok(())
        } else {
            Err(AreaError::CoordCount {
                shape: self.shape.area_attr(),
                expected,
                got: n,
            })
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageMap {
    #[serde(default = "default_map_name")]
    pub name: String,
    #[serde(default)]
    pub areas: Vec<Area>,
}

impl Default for ImageMap {
    fn default() -> Self {
        ImageMap {
            name: default_map_name(),
            areas: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid map json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("area {index}: {source}")]
    Area {
        index: usize,
        #[source]
        source: AreaError,
    },
}

impl ImageMap {
    pub fn from_json(s: &str) -> Result<ImageMap, MapError> {
        Ok(serde_json::from_str(s)?)
    }

    /// First invalid area, if any.
    pub fn validate(&self) -> Result<(), MapError> {
        for (index, area) in self.areas.iter().enumerate() {
            area.validate()
                .map_err(|source| MapError::Area { index, source })?;
        }
        Ok(())
    }
}

static MAP_SEQ: AtomicU64 = AtomicU64::new(0);

/// `image-map-<hex>`; unique per process, randomized where the platform seeds hashers.
pub fn default_map_name() -> String {
    let seq = MAP_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut h = RandomState::new().build_hasher();
    h.write_u64(seq);
    format!("image-map-{:016x}", h.finish() ^ seq)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedArea {
    #[serde(flatten)]
    pub area: Area,
    pub scaled_coords: Vec<f64>,
    pub center: [f64; 2],
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CircleStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

/// Connector overlay between area centers; each step is `[from_index, to_index]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectorPath {
    #[serde(default)]
    pub steps: Vec<[usize; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circle: Option<CircleStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering { index: usize },
}

impl HoverState {
    pub fn index(self) -> Option<usize> {
        match self {
            HoverState::Idle => None,
            HoverState::Hovering { index } => Some(index),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}
