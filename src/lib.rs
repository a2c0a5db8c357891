// shadow2d-rust: 2D point-light visibility polygons
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod active;
pub mod error;
pub mod geom;
pub mod outline;
pub mod prepare;
pub mod segment;
pub mod shapes;
pub mod sweep;
pub mod visibility;

pub use error::VisibilityError;
pub use geom::{Point, Real};
pub use outline::Bounds;
pub use visibility::{
    compute_visibility, lit_by_any, SweepStats, Visibility, VisibilityConfig, VisibilityOption,
    VisibilityPolygon, VisibilitySet,
};
