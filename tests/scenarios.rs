// Copyright 2025 Lars Brubaker
// End-to-end visibility scenarios with area and containment checks.

mod helpers;

use helpers::{assert_well_formed, is_simple, p, parse_segments, signed_area};
use shadow2d_rust::shapes::box_segments;
use shadow2d_rust::{compute_visibility, Point, VisibilityConfig, VisibilitySet};

fn assert_area_approx(actual: f32, expected: f32, tolerance: f32, label: &str) {
    assert!(
        (actual - expected).abs() < tolerance,
        "{}: expected area ~{}, got {} (diff={})",
        label,
        expected,
        actual,
        (actual - expected).abs()
    );
}

fn has_vertex_near(points: &[Point], want: Point) -> bool {
    points.iter().any(|q| (*q - want).length() < 1e-3)
}

#[test]
fn no_obstacles_gives_full_square() {
    let vis = compute_visibility(&[], Point::ZERO, 10.0, &VisibilityConfig::default()).unwrap();
    assert_well_formed(&vis.polygon);
    assert_eq!(vis.polygon.len(), 5);
    assert_area_approx(signed_area(vis.polygon.points()).abs(), 100.0, 1e-2, "square");
    assert!(vis.polygon.contains(p(4.9, -4.9)));
    assert!(!vis.polygon.contains(p(5.1, 0.0)));
}

#[test]
fn single_wall_shadow() {
    let wall = [(p(2.0, -1.0), p(2.0, 1.0))];
    let vis = compute_visibility(&wall, Point::ZERO, 10.0, &VisibilityConfig::default()).unwrap();

    assert_well_formed(&vis.polygon);
    assert!(is_simple(&vis.polygon));
    assert!(has_vertex_near(vis.polygon.points(), p(5.0, 2.5)));
    assert!(has_vertex_near(vis.polygon.points(), p(5.0, -2.5)));
    // Square minus the trapezoid shadow between x = 2 and x = 5.
    assert_area_approx(signed_area(vis.polygon.points()).abs(), 89.5, 1e-2, "wall");

    assert!(!vis.polygon.contains(p(3.0, 0.0)));
    assert!(vis.polygon.contains(p(2.5, 3.0)));
}

#[test]
fn box_obstacle_shadow() {
    let obstacles = box_segments(p(4.0, 0.0), p(1.0, 1.0), 0.0);
    let vis = compute_visibility(&obstacles, Point::ZERO, 20.0, &VisibilityConfig::default())
        .unwrap();
    let pts = vis.polygon.points();

    assert_well_formed(&vis.polygon);
    assert!(is_simple(&vis.polygon));
    for corner in [p(3.0, -1.0), p(3.0, 1.0), p(10.0, -10.0 / 3.0), p(10.0, 10.0 / 3.0)] {
        assert!(has_vertex_near(pts, corner), "missing {:?} in {:?}", corner, pts);
    }
    // Silhouette wedge: width 2 at x = 3 growing to 20/3 at x = 10.
    let shadow = (2.0 + 20.0 / 3.0) / 2.0 * 7.0;
    assert_area_approx(signed_area(pts).abs(), 400.0 - shadow, 1e-1, "box");

    assert!(!vis.polygon.contains(p(8.0, 0.0)));
    assert!(!vis.polygon.contains(p(4.0, 0.0)));
    assert!(vis.polygon.contains(p(8.0, 5.0)));
    assert!(vis.polygon.contains(p(2.0, 0.0)));
}

#[test]
fn rotated_box_matches_shadow_direction() {
    let mut set = VisibilitySet::new();
    set.add_box(p(0.0, 5.0), p(1.0, 1.0), std::f32::consts::FRAC_PI_4);
    let poly = set.compute(Point::ZERO, 20.0).unwrap();

    assert_well_formed(poly);
    assert!(!poly.contains(p(0.0, 8.0)));
    assert!(poly.contains(p(0.0, 3.0)));
    assert!(poly.contains(p(6.0, 8.0)));
    assert!(poly.contains(p(0.0, -8.0)));
}

#[test]
fn circle_obstacle_shadow() {
    let mut set = VisibilitySet::new();
    set.add_circle(p(-4.0, 0.0), 1.0);
    let poly = set.compute(Point::ZERO, 20.0).unwrap();

    assert_well_formed(poly);
    assert!(is_simple(poly));
    assert!(!poly.contains(p(-8.0, 0.0)));
    assert!(poly.contains(p(-8.0, 6.0)));
    assert!(poly.contains(p(-2.5, 0.0)));
}

#[test]
fn parsed_room_layout() {
    let room = parse_segments(
        "# room with a doorway on the right\n\
         -6 -6, 6 -6\n\
         6 -6, 6 -1\n\
         6 1, 6 6\n\
         6 6, -6 6\n\
         -6 6, -6 -6\n",
    );
    assert_eq!(room.len(), 5);

    let vis = compute_visibility(&room, Point::ZERO, 30.0, &VisibilityConfig::default()).unwrap();
    assert_well_formed(&vis.polygon);
    assert!(is_simple(&vis.polygon));

    assert!(vis.polygon.contains(p(5.0, 5.0)));
    // Through the doorway along the axis, but not around the walls.
    assert!(vis.polygon.contains(p(12.0, 0.0)));
    assert!(!vis.polygon.contains(p(12.0, 8.0)));
    assert!(!vis.polygon.contains(p(-10.0, 0.0)));
}

#[test]
fn vertices_round_trip_through_contains() {
    let mut set = VisibilitySet::new();
    for i in 0..4 {
        for j in 0..4 {
            let c = p(-7.5 + 5.0 * i as f32, -7.5 + 5.0 * j as f32);
            set.add_box(c, p(0.8, 0.4), 0.3 * (i + j) as f32);
        }
    }
    let poly = set.compute(p(0.3, -0.2), 24.0).unwrap();

    assert_well_formed(poly);
    for v in poly.points() {
        assert!(poly.contains(*v), "vertex {:?} not contained", v);
    }
}
