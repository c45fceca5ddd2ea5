use imagemapper::geometry::scale::ScaleFactors;
use imagemapper::{
    center_of, compute_center, extend_area, points_string, scale_coords, Area, DisplayGeometry,
    Shape,
};

fn uniform(natural: f64, display: f64) -> DisplayGeometry {
    DisplayGeometry {
        natural_width: Some(natural),
        display_width: Some(display),
        ..Default::default()
    }
}

#[test]
fn uniform_factor_applies_to_both_axes() {
    let out = scale_coords(&[10.0, 20.0, 30.0, 40.0], &uniform(100.0, 200.0));
    assert_eq!(out, vec![20.0, 40.0, 60.0, 80.0]);
}

#[test]
fn vertical_factor_applies_to_odd_indices() {
    let g = DisplayGeometry {
        natural_width: Some(100.0),
        natural_height: Some(100.0),
        display_width: Some(200.0),
        display_height: Some(50.0),
    };
    let out = scale_coords(&[10.0, 10.0, 20.0, 20.0], &g);
    assert_eq!(out, vec![20.0, 5.0, 40.0, 10.0]);
}

#[test]
fn missing_or_zero_natural_size_is_identity() {
    let c = [3.5, 7.25, 11.0];
    assert_eq!(scale_coords(&c, &DisplayGeometry::default()), c.to_vec());
    assert_eq!(scale_coords(&c, &uniform(0.0, 200.0)), c.to_vec());
    let only_display = DisplayGeometry {
        display_width: Some(400.0),
        display_height: Some(300.0),
        ..Default::default()
    };
    assert_eq!(scale_coords(&c, &only_display), c.to_vec());
}

#[test]
fn vertical_without_horizontal_keeps_x() {
    let g = DisplayGeometry {
        natural_height: Some(10.0),
        display_height: Some(30.0),
        ..Default::default()
    };
    assert_eq!(scale_coords(&[1.0, 1.0], &g), vec![1.0, 3.0]);
}

#[test]
fn fractional_output_is_not_rounded() {
    let out = scale_coords(&[1.0, 3.0], &uniform(4.0, 3.0));
    assert_eq!(out, vec![0.75, 2.25]);
}

#[test]
fn empty_coords_scale_to_empty() {
    assert!(scale_coords(&[], &uniform(100.0, 200.0)).is_empty());
}

#[test]
fn circle_center_is_declared_center() {
    let a = Area::new(Shape::Circle, vec![5.0, 5.0, 3.0]);
    assert_eq!(compute_center(Some(&a), ScaleFactors::IDENTITY), [5.0, 5.0]);
}

#[test]
fn rect_center_is_diagonal_midpoint() {
    let a = Area::new(Shape::Rect, vec![0.0, 0.0, 10.0, 10.0]);
    assert_eq!(compute_center(Some(&a), ScaleFactors::IDENTITY), [5.0, 5.0]);
    // corners given out of order still average the listed values
    assert_eq!(center_of(Shape::Rect, &[10.0, 0.0, 0.0, 20.0]), [5.0, 10.0]);
}

#[test]
fn polygon_center_is_vertex_mean() {
    let c = center_of(Shape::Poly, &[0.0, 0.0, 6.0, 0.0, 0.0, 6.0]);
    assert_eq!(c, [2.0, 2.0]);
    assert_eq!(center_of(Shape::Other, &[2.0, 4.0, 4.0, 8.0]), [3.0, 6.0]);
}

#[test]
fn absent_area_centers_at_origin() {
    assert_eq!(compute_center(None, ScaleFactors::IDENTITY), [0.0, 0.0]);
    assert_eq!(center_of(Shape::Poly, &[]), [0.0, 0.0]);
}

#[test]
fn center_uses_scaled_coords() {
    let a = Area::new(Shape::Circle, vec![5.0, 5.0, 3.0]);
    let ext = extend_area(&a, ScaleFactors { x: 2.0, y: None });
    assert_eq!(ext.scaled_coords, vec![10.0, 10.0, 6.0]);
    assert_eq!(ext.center, [10.0, 10.0]);
    assert_eq!(ext.area, a, "source area is carried unchanged");
}

#[test]
fn points_string_groups_pairs() {
    assert_eq!(points_string(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0]), "0,0 10,0 10,10");
    assert_eq!(points_string(&[1.5, 2.0]), "1.5,2");
    assert_eq!(points_string(&[]), "");
}

#[test]
fn points_string_tolerates_odd_length() {
    assert_eq!(points_string(&[1.0, 2.0, 3.0]), "1,2 3");
}
