use glam::Vec2;
use moon_salvage_core::{Aabb, Hull, WallSet};

fn wall() -> Aabb {
    Aabb::from_center_size(Vec2::new(50.0, 50.0), Vec2::new(20.0, 100.0))
}

#[test]
fn segment_through_wall_is_blocked() {
    let walls = WallSet::from(vec![wall()]);
    assert!(walls.blocks_segment(Vec2::new(0.0, 50.0), Vec2::new(100.0, 50.0)));
    assert!(!walls.blocks_segment(Vec2::new(0.0, 150.0), Vec2::new(100.0, 150.0)));
}

#[test]
fn segment_stopping_short_of_wall_is_clear() {
    let walls = WallSet::from(vec![wall()]);
    assert!(!walls.blocks_segment(Vec2::new(0.0, 50.0), Vec2::new(30.0, 50.0)));
}

#[test]
fn vertical_segment_uses_parallel_slab() {
    let walls = WallSet::from(vec![wall()]);
    assert!(walls.blocks_segment(Vec2::new(45.0, -20.0), Vec2::new(45.0, 10.0)));
    assert!(!walls.blocks_segment(Vec2::new(70.0, -20.0), Vec2::new(70.0, 200.0)));
}

#[test]
fn touching_edges_do_not_intersect() {
    let left = Aabb::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
    let right = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
    assert!(!left.intersects(&right));
    assert!(left.intersects(&right.translated(Vec2::new(-1.0, 0.0))));
}

#[test]
fn hull_bounding_box_encloses_corners() {
    let hull = Hull::new([
        Vec2::new(0.0, -5.0),
        Vec2::new(5.0, 0.0),
        Vec2::new(0.0, 5.0),
        Vec2::new(-5.0, 0.0),
    ]);
    let bounds = hull.bounding_box();
    assert_eq!(bounds.min(), Vec2::new(-5.0, -5.0));
    assert_eq!(bounds.max(), Vec2::new(5.0, 5.0));
}
