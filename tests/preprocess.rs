// Copyright 2025 Lars Brubaker
// Preprocessing invariants: merge idempotence and split termination.

mod helpers;

use helpers::{p, segments_cross};
use pretty_assertions::assert_eq;
use shadow2d_rust::outline::{add_outline, Bounds};
use shadow2d_rust::prepare::{merge_collinear, prepare, split_overlaps};
use shadow2d_rust::segment::SegmentArena;
use shadow2d_rust::shapes::{box_segments, polyline_segments};
use shadow2d_rust::{Point, VisibilityConfig};

fn arena_with(obstacles: &[(Point, Point)]) -> SegmentArena {
    let mut arena = SegmentArena::new();
    add_outline(&mut arena, Point::ZERO, 20.0).unwrap();
    for &(a, b) in obstacles {
        arena.add(a, b, false).unwrap();
    }
    arena
}

fn live_segments(arena: &SegmentArena) -> Vec<(Point, Point)> {
    arena.live().map(|s| arena.points(s)).collect()
}

#[test]
fn merging_twice_equals_merging_once() {
    // A straight fence broken into pieces, plus a bent chain.
    let mut obstacles = polyline_segments(&[
        p(-8.0, 3.0),
        p(-6.0, 3.0),
        p(-3.0, 3.0),
        p(0.0, 3.0),
        p(1.0, 3.0),
    ]);
    obstacles.extend(polyline_segments(&[p(2.0, -2.0), p(3.0, -1.0), p(4.0, 0.0), p(4.0, 2.0)]));
    let mut arena = arena_with(&obstacles);

    assert_eq!(merge_collinear(&mut arena), 4);
    let once = live_segments(&arena);
    assert_eq!(merge_collinear(&mut arena), 0);
    assert_eq!(live_segments(&arena), once);

    assert!(once.contains(&(p(-8.0, 3.0), p(1.0, 3.0))));
    assert!(once.contains(&(p(2.0, -2.0), p(4.0, 0.0))));
    assert!(once.contains(&(p(4.0, 0.0), p(4.0, 2.0))));
}

#[test]
fn splitting_leaves_no_crossings() {
    // A lattice of crossing bars plus a box off to one side.
    let mut obstacles = Vec::new();
    for i in 0..3 {
        let x = -4.0 + 4.0 * i as f32;
        obstacles.push((p(x, -7.0), p(x + 1.0, 7.0)));
        obstacles.push((p(-7.0, x + 0.5), p(7.0, x - 0.5)));
    }
    obstacles.extend(box_segments(p(-6.0, 6.0), p(1.5, 1.0), 0.2));
    let mut arena = arena_with(&obstacles);

    let splits = split_overlaps(&mut arena, p(0.5, 0.5), 300).unwrap();
    assert!(splits >= 9, "expected the 3x3 lattice to split, got {}", splits);

    let live = live_segments(&arena);
    for (i, &(a, b)) in live.iter().enumerate() {
        for &(c, d) in &live[i + 1..] {
            assert!(
                !segments_cross(a, b, c, d),
                "({:?}, {:?}) still crosses ({:?}, {:?})",
                a,
                b,
                c,
                d
            );
        }
    }

    // Already split: a second run is a no-op.
    let count = arena.live_count();
    assert_eq!(split_overlaps(&mut arena, p(0.5, 0.5), 300).unwrap(), 0);
    assert_eq!(arena.live_count(), count);
}

#[test]
fn prepare_reports_every_stage() {
    let obstacles = [
        (p(-3.0, 2.0), p(-1.0, 2.0)),
        (p(-1.0, 2.0), p(1.0, 2.0)),
        (p(2.0, -1.0), p(4.0, 1.0)),
        (p(2.0, 1.0), p(4.0, -1.0)),
        (p(12.0, 0.0), p(13.0, 1.0)),
    ];
    let mut arena = arena_with(&obstacles);
    let bounds = Bounds::around(Point::ZERO, 20.0);
    let stats = prepare(&mut arena, Point::ZERO, &bounds, &VisibilityConfig::default()).unwrap();

    assert_eq!(stats.clipped, 1);
    assert_eq!(stats.merged, 1);
    assert_eq!(stats.splits, 1);
    // Outline, the merged fence and four crossing pieces.
    assert_eq!(stats.live, 4 + 1 + 4);
    assert_eq!(stats.live, arena.live_count());
}
