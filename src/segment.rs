// Copyright 2025 Lars Brubaker
// License: MIT
//
// Obstacle segments and their angular endpoints.
//
// The segment <-> endpoint graph lives in an index arena: segments and
// endpoints are stored in parallel Vecs and refer to each other by u32 index.
//
// Design:
//   - INVALID: u32::MAX  (null index)
//   - Endpoints are allocated in pairs: endpoints[2*s] is the start and
//     endpoints[2*s + 1] the end of segment s, so other_end(e) = e ^ 1.
//   - Nothing is ever removed from the arena. Clipping, merging and splitting
//     mark entries dead; the arena is dropped after one computation.

use crate::error::VisibilityError;
use crate::geom::{interpolate, is_left, points_approx_eq, Point, Real};
use crate::outline::Bounds;

pub const INVALID: u32 = u32::MAX;

/// Index into SegmentArena::segments
pub type SegmentIdx = u32;
/// Index into SegmentArena::endpoints
pub type EndpointIdx = u32;

/// Fraction trimmed from each end of a segment before the depth test, so
/// segments meeting at a shared endpoint are not mistaken for crossing ones.
pub const DEPTH_SHRINK: Real = 0.01;

/// The other endpoint of the same segment.
#[inline(always)]
pub fn other_end(e: EndpointIdx) -> EndpointIdx {
    e ^ 1
}

#[derive(Clone, Debug)]
pub struct Endpoint {
    pub point: Point,
    /// True for the endpoint the sweep reaches first.
    pub begin: bool,
    /// Angle around the sweep centre; NaN until `update_angles` runs.
    pub angle: Real,
    /// Owning segment.
    pub segment: SegmentIdx,
}

#[derive(Clone, Debug)]
pub struct Segment {
    pub start: EndpointIdx,
    pub end: EndpointIdx,
    /// Normalized `end - start`.
    pub slope: Point,
    /// One of the four synthetic bounding-rectangle segments.
    pub is_outline: bool,
    /// Squared distance from the sweep centre to the midpoint.
    pub d: Real,
    pub clipped: bool,
    pub merged: bool,
    pub alive: bool,
}

/// Where segment `a` lies relative to segment `b`, seen from a viewpoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Depth {
    /// `a` is between the viewpoint and `b`.
    InFront,
    /// `b` is between the viewpoint and `a`.
    Behind,
    /// Neither separates the other; the segments cross.
    Intersects,
}

#[derive(Clone, Debug, Default)]
pub struct SegmentArena {
    pub segments: Vec<Segment>,
    pub endpoints: Vec<Endpoint>,
}

impl SegmentArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(segments: usize) -> Self {
        SegmentArena {
            segments: Vec::with_capacity(segments),
            endpoints: Vec::with_capacity(segments * 2),
        }
    }

    /// Add a segment and its two endpoints. Zero-length segments are rejected.
    pub fn add(
        &mut self,
        start: Point,
        end: Point,
        is_outline: bool,
    ) -> Result<SegmentIdx, VisibilityError> {
        if !start.is_finite() || !end.is_finite() || start == end {
            return Err(VisibilityError::DegenerateInput);
        }
        let idx = self.segments.len() as SegmentIdx;
        let e_start = self.endpoints.len() as EndpointIdx;
        debug_assert_eq!(e_start, idx * 2);

        for point in [start, end] {
            self.endpoints.push(Endpoint {
                point,
                begin: false,
                angle: Real::NAN,
                segment: idx,
            });
        }
        self.segments.push(Segment {
            start: e_start,
            end: other_end(e_start),
            slope: (end - start).normalized(),
            is_outline,
            d: 0.0,
            clipped: false,
            merged: false,
            alive: true,
        });
        Ok(idx)
    }

    /// Total number of segments ever added, dead ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn is_live(&self, s: SegmentIdx) -> bool {
        self.segments[s as usize].alive
    }

    /// Indices of live segments in allocation order.
    pub fn live(&self) -> impl Iterator<Item = SegmentIdx> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, seg)| seg.alive)
            .map(|(i, _)| i as SegmentIdx)
    }

    pub fn live_count(&self) -> usize {
        self.segments.iter().filter(|s| s.alive).count()
    }

    #[inline]
    pub fn segment(&self, s: SegmentIdx) -> &Segment {
        &self.segments[s as usize]
    }

    #[inline]
    pub fn endpoint(&self, e: EndpointIdx) -> &Endpoint {
        &self.endpoints[e as usize]
    }

    #[inline]
    pub fn start_point(&self, s: SegmentIdx) -> Point {
        self.endpoints[self.segments[s as usize].start as usize].point
    }

    #[inline]
    pub fn end_point(&self, s: SegmentIdx) -> Point {
        self.endpoints[self.segments[s as usize].end as usize].point
    }

    #[inline]
    pub fn points(&self, s: SegmentIdx) -> (Point, Point) {
        (self.start_point(s), self.end_point(s))
    }

    /// Move the end endpoint in place. The slope is left alone; merging only
    /// extends a segment along its own direction.
    pub fn set_end_point(&mut self, s: SegmentIdx, p: Point) {
        let e = self.segments[s as usize].end;
        self.endpoints[e as usize].point = p;
    }

    pub fn kill(&mut self, s: SegmentIdx) {
        self.segments[s as usize].alive = false;
    }

    /// True if both endpoints lie beyond the same edge of `bounds`.
    pub fn is_outside(&self, s: SegmentIdx, bounds: &Bounds) -> bool {
        let (a, b) = self.points(s);
        bounds.excludes_segment(a, b)
    }

    /// True if any endpoint of `a` approximately coincides with one of `b`.
    pub fn shares_endpoint(&self, a: SegmentIdx, b: SegmentIdx) -> bool {
        let (a1, a2) = self.points(a);
        let (b1, b2) = self.points(b);
        points_approx_eq(b1, a1)
            || points_approx_eq(b2, a2)
            || points_approx_eq(b2, a1)
            || points_approx_eq(b1, a2)
    }

    /// The in-front-of predicate. Not antisymmetric and not transitive; only
    /// meaningful for segments that do not cross.
    pub fn relative_depth(&self, a: SegmentIdx, b: SegmentIdx, viewpoint: Point) -> Depth {
        let (a1, a2) = self.points(a);
        let (b1, b2) = self.points(b);
        depth_of(a1, a2, b1, b2, viewpoint)
    }
}

/// [`SegmentArena::relative_depth`] on raw coordinates.
pub fn depth_of(a1: Point, a2: Point, b1: Point, b2: Point, viewpoint: Point) -> Depth {
    // b's shrunk endpoints and the viewpoint against a's line
    let sa1 = is_left(a1, a2, interpolate(b1, b2, DEPTH_SHRINK));
    let sa2 = is_left(a1, a2, interpolate(b2, b1, DEPTH_SHRINK));
    let sa3 = is_left(a1, a2, viewpoint);
    // a's shrunk endpoints and the viewpoint against b's line
    let sb1 = is_left(b1, b2, interpolate(a1, a2, DEPTH_SHRINK));
    let sb2 = is_left(b1, b2, interpolate(a2, a1, DEPTH_SHRINK));
    let sb3 = is_left(b1, b2, viewpoint);

    if sb1 == sb2 && sb2 != sb3 {
        return Depth::Behind;
    }
    if sa1 == sa2 && sa2 == sa3 {
        return Depth::Behind;
    }
    if sa1 == sa2 && sa2 != sa3 {
        return Depth::InFront;
    }
    if sb1 == sb2 && sb2 == sb3 {
        return Depth::InFront;
    }
    Depth::Intersects
}
