use std::fmt::Write;

/// SVG `points` value: `"x,y x,y ..."`. A dangling odd coordinate is written on its own.
pub fn points_string(coords: &[f64]) -> String {
    let mut out = String::with_capacity(coords.len() * 6);
    for (i, pair) in coords.chunks(2).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        match pair {
            [x, y] => {
                let _ = write!(out, "{},{}", x, y);
            }
            [x] => {
                let _ = write!(out, "{}", x);
            }
            _ => {}
        }
    }
    out
}

pub fn coords_attr(coords: &[f64]) -> String {
    let mut out = String::new();
    for (i, c) in coords.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", c);
    }
    out
}
