// Copyright 2025 Lars Brubaker
// Shared test utilities for shadow2d-rust tests.

#![allow(dead_code)]

use shadow2d_rust::{Point, Real, VisibilityPolygon};

pub fn p(x: Real, y: Real) -> Point {
    Point::new(x, y)
}

/// Parse obstacles, one segment per line as `x0 y0 x1 y1` (commas allowed).
/// Blank lines and `#` comments are skipped.
pub fn parse_segments(data: &str) -> Vec<(Point, Point)> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let v: Vec<Real> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse::<Real>().ok())
                .collect();
            (v.len() == 4).then(|| (p(v[0], v[1]), p(v[2], v[3])))
        })
        .collect()
}

/// Shoelace area of a closed loop.
pub fn signed_area(points: &[Point]) -> Real {
    0.5 * points
        .windows(2)
        .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
        .sum::<Real>()
}

/// Proper crossing of segments a-b and c-d (shared endpoints don't count).
pub fn segments_cross(a: Point, b: Point, c: Point, d: Point) -> bool {
    let orient = |p: Point, q: Point, r: Point| (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x);
    let (d1, d2) = (orient(a, b, c), orient(a, b, d));
    let (d3, d4) = (orient(c, d, a), orient(c, d, b));
    let eps = 1e-4;
    ((d1 > eps && d2 < -eps) || (d1 < -eps && d2 > eps))
        && ((d3 > eps && d4 < -eps) || (d3 < -eps && d4 > eps))
}

/// True if no two non-adjacent edges of the closed loop properly cross.
pub fn is_simple(polygon: &VisibilityPolygon) -> bool {
    let pts = polygon.points();
    let n = pts.len().saturating_sub(1);
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_cross(pts[i], pts[i + 1], pts[j], pts[j + 1]) {
                return false;
            }
        }
    }
    true
}

/// Closed and free of consecutive duplicates.
pub fn assert_well_formed(polygon: &VisibilityPolygon) {
    let pts = polygon.points();
    assert!(pts.len() >= 4, "too few vertices: {:?}", pts);
    assert_eq!(pts.first(), pts.last(), "loop not closed");
    for w in pts.windows(2) {
        assert!(
            (w[0] - w[1]).length() > 1e-5,
            "consecutive duplicate {:?}",
            w[0]
        );
    }
}
