// Copyright 2025 Lars Brubaker
// License: MIT
//
// Public entry points: one-shot `compute_visibility`, the stateful
// `VisibilitySet`, and the configuration both share.
//
// A computation owns everything it builds. Obstacles are only borrowed, so
// any number of viewpoints can be computed over one obstacle slice from
// separate threads.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::VisibilityError;
use crate::geom::{Point, Real};
use crate::outline::{add_outline, Bounds};
use crate::prepare::{prepare, PrepareStats};
use crate::segment::SegmentArena;
use crate::shapes::{
    box_segments, circle_segments, polygon_segments, polyline_segments, DEFAULT_CIRCLE_STEPS,
};
use crate::sweep::{sweep, SweepCounters};

mod polygon;

pub use polygon::{VisibilityPolygon, BOUNDARY_EPSILON};

// ─────────────────────────────── Configuration ─────────────────────────────────

/// Default cap on segments produced by overlap splitting.
pub const DEFAULT_MAX_SEGMENTS: usize = 300;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VisibilityOption {
    /// Drop obstacles lying wholly outside the query square.
    Clipping,
    /// Join same-direction obstacles that meet end to start.
    MergeCollinear,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    pub clipping: bool,
    pub merge_collinear: bool,
    /// Overlap splitting fails with `SplitOverflow` past this many segments.
    pub max_segments: usize,
    /// Edges per circle added through `VisibilitySet::add_circle`.
    pub circle_steps: usize,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        VisibilityConfig {
            clipping: true,
            merge_collinear: true,
            max_segments: DEFAULT_MAX_SEGMENTS,
            circle_steps: DEFAULT_CIRCLE_STEPS,
        }
    }
}

impl VisibilityConfig {
    pub fn set_option(&mut self, option: VisibilityOption, value: bool) {
        match option {
            VisibilityOption::Clipping => self.clipping = value,
            VisibilityOption::MergeCollinear => self.merge_collinear = value,
        }
    }
}

// ─────────────────────────────── Results ───────────────────────────────────────

/// Counters gathered while computing one polygon.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub prepare: PrepareStats,
    pub sweep: SweepCounters,
}

#[derive(Clone, Debug)]
pub struct Visibility {
    pub polygon: VisibilityPolygon,
    /// Rejected obstacles and soft inconsistencies met along the way.
    pub diagnostics: Vec<VisibilityError>,
    /// Live segments swept, outline included.
    pub segment_count: usize,
    pub stats: SweepStats,
}

/// Compute the region visible from `center` within the square of side `size`.
///
/// Zero-length obstacles are skipped and reported in `diagnostics`. Fails with
/// `DegenerateInput` for an unusable `size` and with `SplitOverflow` when
/// splitting crossing obstacles exceeds `config.max_segments`.
pub fn compute_visibility(
    obstacles: &[(Point, Point)],
    center: Point,
    size: Real,
    config: &VisibilityConfig,
) -> Result<Visibility, VisibilityError> {
    let mut arena = SegmentArena::with_capacity(obstacles.len() + 4);
    add_outline(&mut arena, center, size)?;

    let mut diagnostics = Vec::new();
    for &(start, end) in obstacles {
        if let Err(err) = arena.add(start, end, false) {
            trace!("rejected obstacle ({:?}, {:?}): {}", start, end, err);
            diagnostics.push(err);
        }
    }

    let bounds = Bounds::around(center, size);
    let prepared = prepare(&mut arena, center, &bounds, config)?;
    let swept = sweep(&mut arena, center, Some(bounds));
    diagnostics.extend(swept.diagnostics);

    debug!(
        "visibility at ({}, {}): {} obstacles, {} segments swept, {} vertices",
        center.x,
        center.y,
        obstacles.len(),
        prepared.live,
        swept.points.len()
    );

    Ok(Visibility {
        polygon: VisibilityPolygon::new(center, size, swept.points),
        diagnostics,
        segment_count: prepared.live,
        stats: SweepStats {
            prepare: prepared,
            sweep: swept.counters,
        },
    })
}

/// A point is lit when any light's polygon contains it.
pub fn lit_by_any<'a, I>(polygons: I, point: Point) -> bool
where
    I: IntoIterator<Item = &'a VisibilityPolygon>,
{
    polygons.into_iter().any(|polygon| polygon.contains(point))
}

// ─────────────────────────────── VisibilitySet ─────────────────────────────────

/// Obstacle set plus the last polygon computed from it.
#[derive(Clone, Debug, Default)]
pub struct VisibilitySet {
    config: VisibilityConfig,
    obstacles: Vec<(Point, Point)>,
    last: Option<Visibility>,
}

impl VisibilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VisibilityConfig) -> Self {
        VisibilitySet {
            config,
            ..Self::default()
        }
    }

    pub fn set_option(&mut self, option: VisibilityOption, value: bool) {
        self.config.set_option(option, value);
    }

    pub fn config(&self) -> &VisibilityConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut VisibilityConfig {
        &mut self.config
    }

    /// Add one obstacle. Zero-length segments are refused and not stored.
    pub fn add_segment(&mut self, start: Point, end: Point) -> Result<(), VisibilityError> {
        if !start.is_finite() || !end.is_finite() || start == end {
            return Err(VisibilityError::DegenerateInput);
        }
        self.obstacles.push((start, end));
        Ok(())
    }

    /// Add an open chain. Returns the number of segments stored.
    pub fn add_polyline(&mut self, points: &[Point]) -> usize {
        self.add_all(polyline_segments(points))
    }

    /// Add a closed outline. Returns the number of segments stored.
    pub fn add_polygon(&mut self, points: &[Point]) -> usize {
        self.add_all(polygon_segments(points))
    }

    pub fn add_box(&mut self, center: Point, half_extents: Point, rotation: Real) -> usize {
        self.add_all(box_segments(center, half_extents, rotation))
    }

    /// Add a circle approximated with `config().circle_steps` edges.
    pub fn add_circle(&mut self, center: Point, radius: Real) -> usize {
        self.add_all(circle_segments(center, radius, self.config.circle_steps))
    }

    fn add_all(&mut self, segments: Vec<(Point, Point)>) -> usize {
        segments
            .into_iter()
            .filter(|&(start, end)| self.add_segment(start, end).is_ok())
            .count()
    }

    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
        self.last = None;
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn obstacles(&self) -> &[(Point, Point)] {
        &self.obstacles
    }

    /// Recompute from scratch. On failure the previous polygon is discarded.
    pub fn compute(
        &mut self,
        center: Point,
        size: Real,
    ) -> Result<&VisibilityPolygon, VisibilityError> {
        self.last = None;
        let visibility = compute_visibility(&self.obstacles, center, size, &self.config)?;
        Ok(&self.last.insert(visibility).polygon)
    }

    pub fn polygon(&self) -> Option<&VisibilityPolygon> {
        self.last.as_ref().map(|v| &v.polygon)
    }

    /// False until a polygon has been computed.
    pub fn contains(&self, point: Point) -> bool {
        self.polygon().map_or(false, |polygon| polygon.contains(point))
    }

    pub fn diagnostics(&self) -> &[VisibilityError] {
        self.last
            .as_ref()
            .map(|v| v.diagnostics.as_slice())
            .unwrap_or(&[])
    }

    pub fn stats(&self) -> Option<SweepStats> {
        self.last.as_ref().map(|v| v.stats)
    }
}
