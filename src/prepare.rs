// Copyright 2025 Lars Brubaker
// License: MIT
//
// Segment clean-up run once before the sweep: clipping against the query
// square, collinear merging, and splitting of crossing segments so the
// in-front-of predicate only ever sees non-crossing pairs.

use std::collections::{HashMap, VecDeque};

use log::{debug, trace, warn};
use ordered_float::OrderedFloat;

use crate::error::VisibilityError;
use crate::geom::{points_approx_eq, segment_crossing, slopes_approx_eq, Point, Real};
use crate::outline::Bounds;
use crate::segment::{Depth, SegmentArena, SegmentIdx};
use crate::visibility::VisibilityConfig;

/// Upper bound on collinear-merge passes.
pub const MAX_MERGE_PASSES: usize = 4;

/// Counters from one preprocessing run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PrepareStats {
    /// Segments flagged as lying outside the query square.
    pub clipped: usize,
    /// Segments absorbed into a collinear neighbour.
    pub merged: usize,
    /// Crossing pairs split at their intersection.
    pub splits: usize,
    /// Live segments handed to the sweep.
    pub live: usize,
}

type PointKey = (OrderedFloat<Real>, OrderedFloat<Real>);

#[inline]
fn point_key(p: Point) -> PointKey {
    (OrderedFloat(p.x), OrderedFloat(p.y))
}

/// Run clipping, merging and splitting as configured.
pub fn prepare(
    arena: &mut SegmentArena,
    center: Point,
    bounds: &Bounds,
    config: &VisibilityConfig,
) -> Result<PrepareStats, VisibilityError> {
    let mut stats = PrepareStats {
        clipped: clip(arena, bounds, config.clipping),
        ..PrepareStats::default()
    };
    if config.merge_collinear {
        stats.merged = merge_collinear(arena);
    }
    stats.splits = split_overlaps(arena, center, config.max_segments)?;
    stats.live = arena.live_count();
    debug!(
        "prepare: {} clipped, {} merged, {} splits, {} live segments",
        stats.clipped, stats.merged, stats.splits, stats.live
    );
    Ok(stats)
}

/// Flag every non-outline segment lying wholly beyond one edge of `bounds`,
/// killing it when `remove` is set. Returns the number flagged.
pub fn clip(arena: &mut SegmentArena, bounds: &Bounds, remove: bool) -> usize {
    let candidates: Vec<SegmentIdx> = arena.live().collect();
    let mut flagged = 0;
    for s in candidates {
        if arena.segment(s).is_outline || !arena.is_outside(s, bounds) {
            continue;
        }
        arena.segments[s as usize].clipped = true;
        if remove {
            arena.kill(s);
        }
        flagged += 1;
    }
    flagged
}

/// Join chains of same-direction segments that meet end to start.
/// Returns the number of segments absorbed.
pub fn merge_collinear(arena: &mut SegmentArena) -> usize {
    // Start points are never rewritten, so the lookup stays valid.
    let mut by_start: HashMap<PointKey, Vec<SegmentIdx>> = HashMap::new();
    for s in arena.live() {
        by_start
            .entry(point_key(arena.start_point(s)))
            .or_default()
            .push(s);
    }

    let mut total = 0;
    for pass in 0..MAX_MERGE_PASSES {
        let mut merged = 0;
        for s in 0..arena.len() as SegmentIdx {
            if !arena.is_live(s) {
                continue;
            }
            let is_outline = arena.segment(s).is_outline;
            let slope = arena.segment(s).slope;
            loop {
                let Some(candidates) = by_start.get(&point_key(arena.end_point(s))) else {
                    break;
                };
                let next = candidates.iter().copied().find(|&o| {
                    o != s
                        && arena.is_live(o)
                        && arena.segment(o).is_outline == is_outline
                        && slopes_approx_eq(arena.segment(o).slope, slope)
                });
                let Some(o) = next else {
                    break;
                };
                let new_end = arena.end_point(o);
                arena.segments[o as usize].merged = true;
                arena.kill(o);
                arena.set_end_point(s, new_end);
                merged += 1;
            }
        }
        trace!("merge pass {}: {} merged", pass, merged);
        total += merged;
        if merged == 0 {
            break;
        }
    }
    total
}

/// Split crossing segments until no accepted pair crosses except at a shared
/// endpoint. Returns the number of splits.
pub fn split_overlaps(
    arena: &mut SegmentArena,
    viewpoint: Point,
    max_segments: usize,
) -> Result<usize, VisibilityError> {
    let mut queue: VecDeque<SegmentIdx> = arena.live().collect();
    let mut accepted: Vec<SegmentIdx> = Vec::with_capacity(queue.len());
    let mut splits = 0;

    while let Some(s) = queue.pop_front() {
        if accepted.len() > max_segments || splits > max_segments {
            warn!(
                "overlap splitting overflowed: {} accepted, {} splits, limit {}",
                accepted.len(),
                splits,
                max_segments
            );
            return Err(VisibilityError::SplitOverflow {
                limit: max_segments,
            });
        }

        let mut crossing = None;
        for (i, &other) in accepted.iter().enumerate() {
            if arena.shares_endpoint(s, other)
                || arena.relative_depth(s, other, viewpoint) != Depth::Intersects
            {
                continue;
            }
            let (a1, a2) = arena.points(s);
            let (b1, b2) = arena.points(other);
            // The predicate can report near-collinear pieces as crossing;
            // only a point inside both segments splits them.
            if let Some(p) = segment_crossing(a1, a2, b1, b2) {
                crossing = Some((i, other, p));
                break;
            }
        }

        let Some((i, other, p)) = crossing else {
            accepted.push(s);
            continue;
        };

        trace!("split {} x {} at ({}, {})", s, other, p.x, p.y);
        accepted.remove(i);
        arena.kill(s);
        arena.kill(other);
        for t in [s, other] {
            let (start, end) = arena.points(t);
            let is_outline = arena.segment(t).is_outline;
            for (from, to) in [(start, p), (p, end)] {
                if points_approx_eq(from, to) {
                    continue;
                }
                queue.push_back(arena.add(from, to, is_outline)?);
            }
        }
        splits += 1;
    }
    Ok(splits)
}
