// Copyright 2025 Lars Brubaker
// License: MIT
//
// Obstacle builders: turn common collider shapes into occluding segments.

use std::f32::consts::TAU;

use crate::geom::{Point, Real};

/// Default number of edges used to approximate a circle.
pub const DEFAULT_CIRCLE_STEPS: usize = 20;

/// Rotate `offset` by `rotation` radians counter-clockwise.
#[inline]
fn rotate(offset: Point, rotation: Real) -> Point {
    let (sin, cos) = rotation.sin_cos();
    Point::new(
        offset.x * cos - offset.y * sin,
        offset.x * sin + offset.y * cos,
    )
}

/// The four edges of a box, corners rotated about `center`:
/// top, right, bottom, left.
pub fn box_segments(center: Point, half_extents: Point, rotation: Real) -> Vec<(Point, Point)> {
    let (hx, hy) = (half_extents.x, half_extents.y);
    let corner = |x: Real, y: Real| center + rotate(Point::new(x, y), rotation);
    let top_left = corner(-hx, hy);
    let top_right = corner(hx, hy);
    let bottom_right = corner(hx, -hy);
    let bottom_left = corner(-hx, -hy);
    vec![
        (top_left, top_right),
        (top_right, bottom_right),
        (bottom_right, bottom_left),
        (bottom_left, top_left),
    ]
}

/// A regular `steps`-gon inscribed in the circle. Fewer than 3 steps or a
/// non-positive radius give no segments.
pub fn circle_segments(center: Point, radius: Real, steps: usize) -> Vec<(Point, Point)> {
    if steps < 3 || radius <= 0.0 {
        return Vec::new();
    }
    let step = TAU / steps as Real;
    let rim: Vec<Point> = (0..steps)
        .map(|i| center + Point::from_angle(step * i as Real) * radius)
        .collect();
    (0..steps).map(|i| (rim[i], rim[(i + 1) % steps])).collect()
}

/// Closed outline through `points`. Two points give a single segment.
pub fn polygon_segments(points: &[Point]) -> Vec<(Point, Point)> {
    let mut segments = polyline_segments(points);
    if points.len() > 2 {
        segments.push((points[points.len() - 1], points[0]));
    }
    segments
}

/// Open chain through `points`.
pub fn polyline_segments(points: &[Point]) -> Vec<(Point, Point)> {
    points.windows(2).map(|w| (w[0], w[1])).collect()
}
