use serde::{Deserialize, Serialize};

/// Natural (authored) and display sizes; absent or non-positive values disable an axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayGeometry {
    #[serde(default)]
    pub natural_width: Option<f64>,
    #[serde(default)]
    pub natural_height: Option<f64>,
    #[serde(default)]
    pub display_width: Option<f64>,
    #[serde(default)]
    pub display_height: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    /// `None` means the horizontal factor applies to every coordinate.
    pub y: Option<f64>,
}

impl ScaleFactors {
    pub const IDENTITY: ScaleFactors = ScaleFactors { x: 1.0, y: None };

    #[inline]
    pub fn for_index(&self, i: usize) -> f64 {
        match self.y {
            Some(y) if i % 2 == 1 => y,
            _ => self.x,
        }
    }
}

#[inline]
fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|v| *v > 0.0)
}

fn ratio(display: Option<f64>, natural: Option<f64>) -> Option<f64> {
    Some(positive(display)? / positive(natural)?)
}

impl DisplayGeometry {
    pub fn factors(&self) -> ScaleFactors {
        ScaleFactors {
            x: ratio(self.display_width, self.natural_width).unwrap_or(1.0),
            y: ratio(self.display_height, self.natural_height),
        }
    }
}

pub fn scale_coords(coords: &[f64], geometry: &DisplayGeometry) -> Vec<f64> {
    scale_with(coords, geometry.factors())
}

pub fn scale_with(coords: &[f64], f: ScaleFactors) -> Vec<f64> {
    coords
        .iter()
        .enumerate()
        .map(|(i, c)| c * f.for_index(i))
        .collect()
}
