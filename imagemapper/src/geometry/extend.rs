use super::center::center_of;
use super::scale::{scale_with, ScaleFactors};
use crate::model::{Area, ExtendedArea};

pub fn extend_area(area: &Area, factors: ScaleFactors) -> ExtendedArea {
    let scaled_coords = scale_with(&area.coords, factors);
    let center = center_of(area.shape, &scaled_coords);
    ExtendedArea {
        area: area.clone(),
        scaled_coords,
        center,
    }
}

pub fn extend_areas(areas: &[Area], factors: ScaleFactors) -> Vec<ExtendedArea> {
    areas.iter().map(|a| extend_area(a, factors)).collect()
}
