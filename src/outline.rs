// Copyright 2025 Lars Brubaker
// License: MIT
//
// The square that bounds every visibility query, and the four outline
// segments that close the polygon where no obstacle does.

use serde::{Deserialize, Serialize};

use crate::error::VisibilityError;
use crate::geom::{Point, Real};
use crate::segment::{SegmentArena, SegmentIdx};

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// The square centred on `center` with side length `size`.
    pub fn around(center: Point, size: Real) -> Self {
        let half = size * 0.5;
        Bounds {
            min: Point::new(center.x - half, center.y - half),
            max: Point::new(center.x + half, center.y + half),
        }
    }

    #[inline]
    pub fn width(&self) -> Real {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> Real {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.contains_with_margin(p, 0.0)
    }

    /// Containment with every edge pushed outward by `margin`.
    pub fn contains_with_margin(&self, p: Point, margin: Real) -> bool {
        p.x >= self.min.x - margin
            && p.x <= self.max.x + margin
            && p.y >= self.min.y - margin
            && p.y <= self.max.y + margin
    }

    /// True if `a` and `b` both lie beyond the same edge.
    pub fn excludes_segment(&self, a: Point, b: Point) -> bool {
        (a.x < self.min.x && b.x < self.min.x)
            || (a.x > self.max.x && b.x > self.max.x)
            || (a.y < self.min.y && b.y < self.min.y)
            || (a.y > self.max.y && b.y > self.max.y)
    }

    /// Move `p` towards `origin` until it lies inside. `origin` must be
    /// inside already; points inside come back unchanged.
    pub fn clamp_along_ray(&self, origin: Point, p: Point) -> Point {
        if self.contains(p) {
            return p;
        }
        let mut t: Real = 1.0;
        for (v, o, lo, hi) in [
            (p.x, origin.x, self.min.x, self.max.x),
            (p.y, origin.y, self.min.y, self.max.y),
        ] {
            if v > hi {
                t = t.min((hi - o) / (v - o));
            } else if v < lo {
                t = t.min((lo - o) / (v - o));
            }
        }
        let clamped = origin + (p - origin) * t.max(0.0);
        // Rounding can leave the result a hair outside.
        Point::new(
            clamped.x.clamp(self.min.x, self.max.x),
            clamped.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Corners as (top_right, top_left, bottom_left, bottom_right), y up.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.max.x, self.max.y),
            Point::new(self.min.x, self.max.y),
            Point::new(self.min.x, self.min.y),
            Point::new(self.max.x, self.min.y),
        ]
    }
}

/// The four edges of the outline square, in sweep-insertion order:
/// top, right, bottom, left.
pub fn outline_segments(center: Point, size: Real) -> [(Point, Point); 4] {
    let [top_right, top_left, bottom_left, bottom_right] = Bounds::around(center, size).corners();
    [
        (top_right, top_left),
        (bottom_right, top_right),
        (bottom_left, bottom_right),
        (top_left, bottom_left),
    ]
}

/// Push the outline into the arena, flagged `is_outline`.
pub fn add_outline(
    arena: &mut SegmentArena,
    center: Point,
    size: Real,
) -> Result<[SegmentIdx; 4], VisibilityError> {
    if !size.is_finite() || size <= 0.0 || !center.is_finite() {
        return Err(VisibilityError::DegenerateInput);
    }
    let mut added = [0; 4];
    for (slot, (start, end)) in added.iter_mut().zip(outline_segments(center, size)) {
        *slot = arena.add(start, end, true)?;
    }
    Ok(added)
}
