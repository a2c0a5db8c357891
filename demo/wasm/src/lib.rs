// Copyright 2025 Lars Brubaker
// WASM bindings for shadow2d-rust

use shadow2d_rust::{lit_by_any, Point, VisibilityOption, VisibilityPolygon, VisibilitySet};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

fn points_from_flat(vertices: &[f32]) -> Vec<Point> {
    vertices
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect()
}

/// A stateful light: accumulate obstacles, then compute from any viewpoint.
#[wasm_bindgen]
pub struct VisibilityJs {
    inner: VisibilitySet,
}

#[wasm_bindgen]
impl VisibilityJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> VisibilityJs {
        VisibilityJs {
            inner: VisibilitySet::new(),
        }
    }

    /// Add one wall. Returns false for a zero-length segment.
    pub fn add_segment(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> bool {
        self.inner
            .add_segment(Point::new(x0, y0), Point::new(x1, y1))
            .is_ok()
    }

    /// Add a closed outline from a flat [x0,y0, x1,y1, ...] Float32Array.
    pub fn add_polygon(&mut self, vertices: &[f32]) -> u32 {
        self.inner.add_polygon(&points_from_flat(vertices)) as u32
    }

    /// Add an open chain from a flat [x0,y0, x1,y1, ...] Float32Array.
    pub fn add_polyline(&mut self, vertices: &[f32]) -> u32 {
        self.inner.add_polyline(&points_from_flat(vertices)) as u32
    }

    pub fn add_box(&mut self, cx: f32, cy: f32, half_w: f32, half_h: f32, rotation: f32) -> u32 {
        self.inner
            .add_box(Point::new(cx, cy), Point::new(half_w, half_h), rotation) as u32
    }

    pub fn add_circle(&mut self, cx: f32, cy: f32, radius: f32) -> u32 {
        self.inner.add_circle(Point::new(cx, cy), radius) as u32
    }

    pub fn clear(&mut self) {
        self.inner.clear_obstacles();
    }

    /// Set an option (0 = Clipping, 1 = MergeCollinear).
    pub fn set_option(&mut self, option: u32, value: bool) {
        let opt = match option {
            0 => VisibilityOption::Clipping,
            1 => VisibilityOption::MergeCollinear,
            _ => return,
        };
        self.inner.set_option(opt, value);
    }

    pub fn set_circle_steps(&mut self, steps: u32) {
        self.inner.config_mut().circle_steps = steps as usize;
    }

    /// Compute and return true on success.
    pub fn compute(&mut self, cx: f32, cy: f32, size: f32) -> bool {
        self.inner.compute(Point::new(cx, cy), size).is_ok()
    }

    /// Flat polygon vertices [x0,y0, x1,y1, ...], closed (first == last).
    pub fn get_polygon(&self) -> Vec<f32> {
        self.inner
            .polygon()
            .map(VisibilityPolygon::to_flat)
            .unwrap_or_default()
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.inner.contains(Point::new(x, y))
    }

    pub fn obstacle_count(&self) -> u32 {
        self.inner.obstacle_count() as u32
    }

    /// Diagnostics from the last computation, one message per line.
    pub fn diagnostics(&self) -> String {
        self.inner
            .diagnostics()
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True if this light or `other` can see the point.
    pub fn lit_with(&self, other: &VisibilityJs, x: f32, y: f32) -> bool {
        lit_by_any(
            [&self.inner, &other.inner]
                .into_iter()
                .filter_map(VisibilitySet::polygon),
            Point::new(x, y),
        )
    }
}

impl Default for VisibilityJs {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience: visibility polygon around one point for a flat list of walls
/// [ax,ay,bx,by, ...]. Returns the flat closed loop, empty on failure.
#[wasm_bindgen]
pub fn visibility_polygon(walls: &[f32], cx: f32, cy: f32, size: f32) -> Vec<f32> {
    let mut v = VisibilityJs::new();
    for w in walls.chunks_exact(4) {
        v.add_segment(w[0], w[1], w[2], w[3]);
    }
    if !v.compute(cx, cy, size) {
        return Vec::new();
    }
    v.get_polygon()
}
