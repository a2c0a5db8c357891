// Copyright 2025 Lars Brubaker
// License: MIT
//
// The radial sweep.
//
// Endpoints of all live segments are visited in angular order around the
// centre while an ActiveList keeps the segments the current ray crosses,
// nearest first. Each time the nearest segment changes, the arc it covered
// since the previous change becomes two polygon vertices.
//
// Segments crossing the -PI/+PI seam are already active when the sweep
// restarts, so the endpoint sequence is walked twice: the first pass only
// primes the active list, the second one emits.

use log::{trace, warn};

use crate::active::ActiveList;
use crate::error::VisibilityError;
use crate::geom::{
    line_intersection, points_approx_eq, slopes_approx_eq, wrap_angle_delta, Point, Real,
};
use crate::outline::Bounds;
use crate::segment::{Depth, EndpointIdx, SegmentArena, SegmentIdx};

/// Radius of the circle whose chord closes an arc with no front segment.
pub const FALLBACK_RADIUS: Real = 500.0;

/// Number of passes over the sorted endpoints.
const PASSES: usize = 2;

/// Counters from one sweep.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepCounters {
    /// Endpoints visited per pass.
    pub endpoints: usize,
    /// Arcs turned into vertices.
    pub arcs: usize,
    /// Arcs dropped because a ray ran parallel to the front segment.
    pub skipped_arcs: usize,
    /// Insertions where the ordering predicate reported a crossing.
    pub inconsistent: usize,
    /// Vertices pulled back onto the query square.
    pub clamped: usize,
}

/// Raw sweep output before the loop is closed.
#[derive(Clone, Debug, Default)]
pub struct SweepOutput {
    pub points: Vec<Point>,
    pub diagnostics: Vec<VisibilityError>,
    pub counters: SweepCounters,
}

/// Compute `d`, endpoint angles and `begin` flags for every live segment.
pub fn update_angles(arena: &mut SegmentArena, center: Point) {
    let live: Vec<SegmentIdx> = arena.live().collect();
    for s in live {
        let (start, end) = arena.points(s);
        let mid = (start + end) * 0.5;
        let seg = &mut arena.segments[s as usize];
        seg.d = (mid - center).length_squared();
        let (e_start, e_end) = (seg.start as usize, seg.end as usize);

        for e in [e_start, e_end] {
            let rel = arena.endpoints[e].point - center;
            // +0.0 folds a -0.0 angle into 0.0 so ties sort begin-first.
            arena.endpoints[e].angle = rel.y.atan2(rel.x) + 0.0;
        }
        let delta = wrap_angle_delta(arena.endpoints[e_start].angle, arena.endpoints[e_end].angle);
        arena.endpoints[e_start].begin = delta > 0.0;
        arena.endpoints[e_end].begin = delta <= 0.0;
    }
}

/// Endpoints of live segments by ascending angle, begin endpoints first on
/// ties. Stable, so remaining ties keep segment order.
pub fn sorted_endpoints(arena: &SegmentArena) -> Vec<EndpointIdx> {
    let mut order: Vec<EndpointIdx> = arena
        .live()
        .flat_map(|s| {
            let seg = arena.segment(s);
            [seg.start, seg.end]
        })
        .collect();
    order.sort_by(|&a, &b| {
        let (ea, eb) = (arena.endpoint(a), arena.endpoint(b));
        ea.angle
            .total_cmp(&eb.angle)
            .then_with(|| eb.begin.cmp(&ea.begin))
    });
    order
}

/// Close the vertex loop: drop consecutive near-duplicates and make the last
/// vertex equal the first.
pub fn finish_loop(points: &mut Vec<Point>) {
    points.dedup_by(|next, kept| points_approx_eq(*kept, *next));
    if points.len() < 2 {
        return;
    }
    let first = points[0];
    if let Some(last) = points.last_mut() {
        if points_approx_eq(*last, first) {
            *last = first;
            return;
        }
    }
    points.push(first);
}

pub struct RadialSweep<'a> {
    arena: &'a SegmentArena,
    center: Point,
    bounds: Option<Bounds>,
    active: ActiveList,
    /// Angle at which the current front segment became the front.
    begin_angle: Real,
    /// Segment of the last emitted arc.
    previous: Option<SegmentIdx>,
    pass: usize,
    out: SweepOutput,
}

impl<'a> RadialSweep<'a> {
    /// `arena` must have been through `update_angles` for `center`.
    pub fn new(arena: &'a SegmentArena, center: Point) -> Self {
        RadialSweep {
            arena,
            center,
            bounds: None,
            active: ActiveList::new(),
            begin_angle: 0.0,
            previous: None,
            pass: 0,
            out: SweepOutput::default(),
        }
    }

    /// Keep emitted vertices inside `bounds`, which must contain the centre.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn run(mut self) -> SweepOutput {
        let order = sorted_endpoints(self.arena);
        self.out.counters.endpoints = order.len();
        for pass in 0..PASSES {
            self.pass = pass;
            self.previous = None;
            for &e in &order {
                self.process_endpoint(e);
            }
        }
        if self.out.counters.inconsistent > 0 {
            warn!(
                "sweep saw {} inconsistent orderings",
                self.out.counters.inconsistent
            );
        }
        self.out
    }

    #[inline]
    fn emitting(&self) -> bool {
        self.pass == PASSES - 1
    }

    fn process_endpoint(&mut self, e: EndpointIdx) {
        let endpoint = self.arena.endpoint(e);
        let segment = endpoint.segment;
        let angle = endpoint.angle;
        let old_front = self.active.front();

        if endpoint.begin {
            self.insert(segment);
        } else {
            self.active.remove(segment);
        }

        if self.active.front() != old_front {
            if self.emitting() {
                self.emit_arc(self.begin_angle, angle, old_front);
            }
            self.begin_angle = angle;
        }
    }

    fn insert(&mut self, segment: SegmentIdx) {
        let arena = self.arena;
        let center = self.center;
        let mut crossed = None;
        self.active
            .insert(segment, |occupant| match arena.relative_depth(segment, occupant, center) {
                Depth::Behind => true,
                Depth::InFront => false,
                Depth::Intersects => {
                    crossed = Some(occupant);
                    false
                }
            });

        if let Some(occupant) = crossed {
            if self.emitting() {
                trace!("segments {} and {} cross during the sweep", segment, occupant);
                self.out.counters.inconsistent += 1;
                self.out
                    .diagnostics
                    .push(VisibilityError::InconsistentOrdering { segment, occupant });
            }
        }
    }

    /// Turn the arc `[begin_angle, end_angle]` covered by `front` into
    /// vertices, extending the previous arc when they continue one line.
    fn emit_arc(&mut self, begin_angle: Real, end_angle: Real, front: Option<SegmentIdx>) {
        let center = self.center;
        let ray_begin = center + Point::from_angle(begin_angle);
        let ray_end = center + Point::from_angle(end_angle);
        let (p3, p4) = match front {
            Some(s) => self.arena.points(s),
            None => (
                center + Point::from_angle(begin_angle) * FALLBACK_RADIUS,
                center + Point::from_angle(end_angle) * FALLBACK_RADIUS,
            ),
        };

        let hits = line_intersection(p3, p4, center, ray_begin)
            .and_then(|b| line_intersection(p3, p4, center, ray_end).map(|e| (b, e)));
        let (begin, end) = match hits {
            Ok((begin, end)) => (self.clamp(begin), self.clamp(end)),
            Err(err) => {
                trace!("skipping arc {} -> {}: {}", begin_angle, end_angle, err);
                self.out.counters.skipped_arcs += 1;
                self.out.diagnostics.push(err);
                self.previous = front;
                return;
            }
        };

        let same_line = match (front, self.previous) {
            (Some(s), Some(prev)) => slopes_approx_eq(
                self.arena.segment(s).slope,
                self.arena.segment(prev).slope,
            ),
            _ => false,
        };
        let points = &mut self.out.points;
        match points.last_mut() {
            Some(last) if same_line && points_approx_eq(*last, begin) => *last = end,
            _ => {
                points.push(begin);
                points.push(end);
            }
        }
        self.out.counters.arcs += 1;
        self.previous = front;
    }

    /// Pull `p` back along its ray from the centre onto the query square.
    /// A front segment that crosses the outline near a corner can otherwise
    /// put a vertex past it.
    fn clamp(&mut self, p: Point) -> Point {
        let Some(bounds) = self.bounds else {
            return p;
        };
        let clamped = bounds.clamp_along_ray(self.center, p);
        if !points_approx_eq(clamped, p) {
            trace!("clamped vertex ({}, {}) to ({}, {})", p.x, p.y, clamped.x, clamped.y);
            self.out.counters.clamped += 1;
        }
        clamped
    }
}

/// Run the sweep over an arena already prepared for `center`. With `bounds`
/// set, no vertex lands outside that square.
pub fn sweep(arena: &mut SegmentArena, center: Point, bounds: Option<Bounds>) -> SweepOutput {
    update_angles(arena, center);
    let mut radial = RadialSweep::new(arena, center);
    if let Some(bounds) = bounds {
        radial = radial.with_bounds(bounds);
    }
    let mut out = radial.run();
    finish_loop(&mut out.points);
    out
}
