use glam::Vec2;
use moon_salvage_core::{Aabb, WallSet};
use moon_salvage_system_perception::{
    angle_delta, can_see, ease_rotation, has_line_of_sight, is_within_facing,
    march_until_collision, rotate_hull,
};

fn corridor_walls() -> WallSet {
    WallSet::from(vec![Aabb::from_center_size(
        Vec2::new(100.0, 0.0),
        Vec2::new(10.0, 200.0),
    )])
}

#[test]
fn field_of_view_is_symmetric_around_facing() {
    let position = Vec2::ZERO;
    let target = Vec2::new(10.0, 10.0);
    assert!(is_within_facing(position, 0.0, target, 46.0));
    assert!(!is_within_facing(position, 0.0, target, 44.0));
    assert!(is_within_facing(position, 90.0, target, 46.0));
    assert!(!is_within_facing(position, 180.0, target, 90.0));
}

#[test]
fn field_of_view_wraps_across_zero() {
    let position = Vec2::ZERO;
    let target = Vec2::new(10.0, -1.0);
    assert!(is_within_facing(position, 5.0, target, 15.0));
    assert!(is_within_facing(position, 355.0, target, 15.0));
}

#[test]
fn wall_between_points_breaks_line_of_sight() {
    let walls = corridor_walls();
    assert!(!has_line_of_sight(Vec2::ZERO, Vec2::new(200.0, 0.0), &walls));
    assert!(has_line_of_sight(Vec2::ZERO, Vec2::new(0.0, 200.0), &walls));
    assert!(!can_see(Vec2::ZERO, 0.0, Vec2::new(200.0, 0.0), 30.0, &walls));
    assert!(can_see(Vec2::ZERO, 90.0, Vec2::new(0.0, 200.0), 30.0, &walls));
}

#[test]
fn laser_stops_before_first_wall() {
    let walls = corridor_walls();
    let laser = march_until_collision(Vec2::ZERO, 0.0, &walls, 1000.0, 2.0);
    assert!((laser.end().x - 94.0).abs() < 1e-3, "stopped at {:?}", laser.end());

    let open = march_until_collision(Vec2::ZERO, 180.0, &walls, 1000.0, 2.0);
    assert!((open.length() - 1000.0).abs() < 1e-2);
}

#[test]
fn quarter_turn_swaps_hull_extents() {
    let hull = rotate_hull(Vec2::new(5.0, 5.0), Vec2::new(20.0, 5.0), 90.0);
    let bounds = hull.bounding_box();
    assert!((bounds.half_extents().x - 5.0).abs() < 1e-3);
    assert!((bounds.half_extents().y - 20.0).abs() < 1e-3);
    assert!((bounds.center() - Vec2::new(5.0, 5.0)).length() < 1e-3);
}

#[test]
fn rotation_easing_converges_without_large_overshoot() {
    for turn_rate in [2.0_f32, 4.0, 8.0] {
        let bound = (180.0 / turn_rate).ceil() as usize + 4;
        for start_step in 0..24 {
            for target_step in 0..24 {
                let start = start_step as f32 * 15.0 + 0.3;
                let target = target_step as f32 * 15.0;
                let mut current = start;
                let mut previous = angle_delta(current, target);

                for _ in 0..bound {
                    current = ease_rotation(current, target, turn_rate);
                    let remaining = angle_delta(current, target);
                    if remaining.signum() != previous.signum() && remaining != 0.0 {
                        assert!(
                            remaining.abs() <= turn_rate / 4.0 + 1e-3,
                            "overshoot {remaining} from {start} toward {target}"
                        );
                    }
                    previous = remaining;
                }

                assert!(
                    angle_delta(current, target).abs() <= turn_rate,
                    "rate {turn_rate}: {start} never reached {target}, stuck at {current}"
                );
            }
        }
    }
}

#[test]
fn aligned_rotation_is_left_untouched() {
    assert_eq!(ease_rotation(42.0, 42.0, 2.0), 42.0);
}
