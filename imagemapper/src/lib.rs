pub mod model;
pub mod props;
pub mod controller;
pub mod svg;
pub mod geometry {
    pub mod center;
    pub mod extend;
    pub mod points;
    pub mod scale;
}

pub use controller::{ImageMapper, MapperEvents, Outcome, Recompute, Surface};
pub use geometry::center::{center_of, compute_center};
pub use geometry::extend::{extend_area, extend_areas};
pub use geometry::points::points_string;
pub use geometry::scale::{scale_coords, DisplayGeometry, ScaleFactors};
pub use model::{
    Area, AreaError, ConnectorPath, ExtendedArea, HoverState, ImageMap, MapError, Shape,
    SurfaceSize,
};
pub use props::{needs_recompute, same_map, ChildrenRenderer, Inputs, MapperProps};
pub use svg::{AreaAttrs, Overlay};
