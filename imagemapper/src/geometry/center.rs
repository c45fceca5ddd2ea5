use crate::model::{Area, Shape};

/// Anchor point of an area in display space, from already scaled coordinates.
///
/// Circles anchor on their declared center. Everything else averages the x and
/// y values over `len / 2` points, so a rect anchors on the midpoint of its
/// diagonal.
pub fn center_of(shape: Shape, scaled: &[f64]) -> [f64; 2] {
    match shape {
        Shape::Circle => [
            scaled.first().copied().unwrap_or(0.0),
            scaled.get(1).copied().unwrap_or(0.0),
        ],
        Shape::Rect | Shape::Poly | Shape::Other => {
            let n = scaled.len() as f64 / 2.0;
            if n == 0.0 {
                return [0.0, 0.0];
            }
            let (mut x, mut y) = (0.0, 0.0);
            for (i, v) in scaled.iter().enumerate() {
                if i % 2 == 0 {
                    x += v / n;
                } else {
                    y += v / n;
                }
            }
            [x, y]
        }
    }
}

pub fn compute_center(area: Option<&Area>, factors: super::scale::ScaleFactors) -> [f64; 2] {
    match area {
        None => [0.0, 0.0],
        Some(a) => center_of(a.shape, &super::scale::scale_with(&a.coords, factors)),
    }
}
