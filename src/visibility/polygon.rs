// Copyright 2025 Lars Brubaker
// Containment queries against a computed visibility polygon.

use serde::{Deserialize, Serialize};

use crate::geom::{distance_to_segment_sq, point_in_polygon, Point, Real};
use crate::outline::Bounds;

/// Points this close to the polygon outline count as inside, so every
/// emitted vertex classifies as visible.
pub const BOUNDARY_EPSILON: Real = 1e-4;

/// Closed vertex loop around a viewpoint (first == last when non-empty).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibilityPolygon {
    center: Point,
    size: Real,
    points: Vec<Point>,
}

impl VisibilityPolygon {
    pub fn new(center: Point, size: Real, points: Vec<Point>) -> Self {
        VisibilityPolygon {
            center,
            size,
            points,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size(&self) -> Real {
        self.size
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The query square the polygon was computed in.
    pub fn bounds(&self) -> Bounds {
        Bounds::around(self.center, self.size)
    }

    /// Vertices as `[x0, y0, x1, y1, ...]`.
    pub fn to_flat(&self) -> Vec<Real> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    pub fn contains(&self, p: Point) -> bool {
        if self.points.is_empty() {
            return false;
        }
        if !self.bounds().contains_with_margin(p, BOUNDARY_EPSILON) {
            return false;
        }
        let tolerance = BOUNDARY_EPSILON * BOUNDARY_EPSILON;
        let on_edge = self
            .points
            .windows(2)
            .any(|w| distance_to_segment_sq(p, w[0], w[1]) <= tolerance);
        on_edge || point_in_polygon(p, &self.points)
    }
}
