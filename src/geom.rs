// Copyright 2025 Lars Brubaker
// License: MIT
//
// Pure geometric functions on 2D points.
//
// Floating-point predicates with fixed epsilons; there is no exact arithmetic
// anywhere in the engine. Side tests follow the y-down screen convention of
// the sweep: a point is "left" of a directed line when the cross product of
// the line direction and the offset to the point is negative.

use std::ops::{Add, Mul, Neg, Sub};

use approx::relative_eq;
use serde::{Deserialize, Serialize};

use crate::error::VisibilityError;

pub type Real = f32;

/// Cross products with magnitude below this are "on" the line.
pub const SIDE_EPSILON: Real = 1e-5;

/// Lines whose direction vectors meet at a sine below this are parallel.
pub const PARALLEL_EPSILON: Real = 1e-6;

/// Crossing parameters within this of either end count as touching.
pub const CROSSING_EPSILON: Real = 1e-4;

/// Absolute tolerance of [`approx_eq`].
pub const APPROX_EPSILON: Real = 1e-5;

/// Relative tolerance of [`approx_eq`].
pub const APPROX_RELATIVE: Real = 1e-5;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn dot(self, other: Point) -> Real {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length_squared(self) -> Real {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> Real {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(self) -> Point {
        let len = self.length();
        if len > 0.0 {
            Point::new(self.x / len, self.y / len)
        } else {
            Point::ZERO
        }
    }

    /// Unit vector at `angle` radians from the +x axis.
    #[inline]
    pub fn from_angle(angle: Real) -> Point {
        Point::new(angle.cos(), angle.sin())
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<Real> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, rhs: Real) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    #[inline]
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(Real, Real)> for Point {
    fn from((x, y): (Real, Real)) -> Self {
        Point::new(x, y)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    On,
}

/// Cross product of `end - start` with `p - start`.
#[inline]
pub fn cross(start: Point, end: Point, p: Point) -> Real {
    (end.x - start.x) * (p.y - start.y) - (end.y - start.y) * (p.x - start.x)
}

/// Three-way side test of `p` against the directed line `start -> end`.
pub fn side_of(start: Point, end: Point, p: Point) -> Side {
    let c = cross(start, end, p);
    if c.abs() < SIDE_EPSILON {
        Side::On
    } else if c < 0.0 {
        Side::Left
    } else {
        Side::Right
    }
}

/// Boolean side test; a point exactly on the line counts as right.
#[inline]
pub fn is_left(start: Point, end: Point, p: Point) -> bool {
    cross(start, end, p) < 0.0
}

/// Linear interpolation `p * (1 - f) + q * f`.
#[inline]
pub fn interpolate(p: Point, q: Point, f: Real) -> Point {
    Point::new(p.x * (1.0 - f) + q.x * f, p.y * (1.0 - f) + q.y * f)
}

/// Intersection of the infinite lines through (p1, p2) and (p3, p4).
///
/// Parallel (or coincident) lines have no single intersection and return
/// `ParallelIntersection`; the caller decides whether that skips work or
/// aborts it.
pub fn line_intersection(
    p1: Point,
    p2: Point,
    p3: Point,
    p4: Point,
) -> Result<Point, VisibilityError> {
    let denom = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denom.abs() <= PARALLEL_EPSILON * (p2 - p1).length() * (p4 - p3).length() {
        return Err(VisibilityError::ParallelIntersection);
    }
    let s = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denom;
    let p = Point::new(p1.x + s * (p2.x - p1.x), p1.y + s * (p2.y - p1.y));
    if p.is_finite() {
        Ok(p)
    } else {
        Err(VisibilityError::ParallelIntersection)
    }
}

/// Point where segments (a1, a2) and (b1, b2) properly cross.
///
/// Both crossing parameters must lie strictly inside the segments, at least
/// `CROSSING_EPSILON` from either end. Touching, parallel and disjoint pairs
/// return `None`.
pub fn segment_crossing(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let r = a2 - a1;
    let q = b2 - b1;
    let denom = r.x * q.y - r.y * q.x;
    if denom.abs() <= PARALLEL_EPSILON * r.length() * q.length() {
        return None;
    }
    let w = b1 - a1;
    let t = (w.x * q.y - w.y * q.x) / denom;
    let u = (w.x * r.y - w.y * r.x) / denom;
    let inside = |v: Real| v > CROSSING_EPSILON && v < 1.0 - CROSSING_EPSILON;
    if !(inside(t) && inside(u)) {
        return None;
    }
    let p = a1 + r * t;
    p.is_finite().then_some(p)
}

/// Winding-number point-in-polygon test.
///
/// `vertices` may be open or explicitly closed; the last edge wraps back to
/// the first vertex either way.
pub fn point_in_polygon(p: Point, vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut wn = 0i32;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        if a.y <= p.y {
            // upward crossing with p strictly on the inner side
            if b.y > p.y && is_left(b, a, p) {
                wn += 1;
            }
        } else if b.y <= p.y && !is_left(b, a, p) {
            wn -= 1;
        }
    }
    wn != 0
}

/// Angle-ordering key in `[0, 4)`, counter-clockwise from the +x axis.
///
/// Monotonic in the true angle but needs no trigonometry, so it could feed a
/// bucket sort of sweep events. The sweep itself sorts by `atan2`.
pub fn pseudo_angle(delta: Point) -> Option<Real> {
    let divisor = delta.x.abs() + delta.y.abs();
    if divisor < 1e-4 {
        return None;
    }
    let r = delta.y / divisor;
    Some(if delta.x < 0.0 {
        2.0 - r
    } else if delta.y < 0.0 {
        4.0 + r
    } else {
        r
    })
}

/// Signed angle difference `to - from` wrapped into `(-PI, PI]`.
pub fn wrap_angle_delta(from: Real, to: Real) -> Real {
    use std::f32::consts::PI;
    let mut d = to - from;
    if d <= -PI {
        d += 2.0 * PI;
    }
    if d > PI {
        d -= 2.0 * PI;
    }
    d
}

#[inline]
pub fn approx_eq(a: Real, b: Real) -> bool {
    relative_eq!(a, b, epsilon = APPROX_EPSILON, max_relative = APPROX_RELATIVE)
}

#[inline]
pub fn points_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// Slopes are unit vectors, so component-wise near-equality is enough.
#[inline]
pub fn slopes_approx_eq(a: Point, b: Point) -> bool {
    points_approx_eq(a, b)
}

/// Squared distance from `p` to the closed segment `a`-`b`.
pub fn distance_to_segment_sq(p: Point, a: Point, b: Point) -> Real {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return (p - a).length_squared();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length_squared()
}
