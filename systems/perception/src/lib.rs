#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Geometry and perception predicates shared by agents, turrets, and hazards.
//!
//! Angles are expressed in degrees, measured counter-clockwise from the
//! positive x axis, and normalised into `[0, 360)` wherever a bearing is
//! produced. All functions are pure; wall sets are borrowed read-only.

use glam::Vec2;
use moon_salvage_core::{Aabb, Hull, Segment, WallSet};

/// Wraps an angle into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in `[-180, 180)`.
#[must_use]
pub fn angle_delta(from: f32, to: f32) -> f32 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}

/// Bearing from `from` toward `to`.
#[must_use]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    normalize_degrees(delta.y.atan2(delta.x).to_degrees())
}

/// Unit vector pointing along `degrees`.
#[must_use]
pub fn heading(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Reports whether `target` lies within `swath` degrees of `facing` as seen
/// from `position`.
#[must_use]
pub fn is_within_facing(position: Vec2, facing: f32, target: Vec2, swath: f32) -> bool {
    angle_delta(facing, bearing(position, target)).abs() <= swath
}

/// Reports whether no wall interrupts the straight line between two points.
#[must_use]
pub fn has_line_of_sight(from: Vec2, to: Vec2, walls: &WallSet) -> bool {
    !walls.blocks_segment(from, to)
}

/// Combined field-of-view and line-of-sight check.
#[must_use]
pub fn can_see(position: Vec2, facing: f32, target: Vec2, swath: f32, walls: &WallSet) -> bool {
    has_line_of_sight(position, target, walls) && is_within_facing(position, facing, target, swath)
}

/// Marches a ray from `origin` along `direction` in `step` increments until it
/// enters a wall or reaches `max_length`.
///
/// The returned segment ends at the last point sampled outside any wall.
#[must_use]
pub fn march_until_collision(
    origin: Vec2,
    direction: f32,
    walls: &WallSet,
    max_length: f32,
    step: f32,
) -> Segment {
    let unit = heading(direction);
    let step = step.max(f32::EPSILON);
    let mut travelled = 0.0;
    let mut end = origin;

    while travelled + step <= max_length {
        let next = origin + unit * (travelled + step);
        if walls.contains_point(next) {
            break;
        }
        travelled += step;
        end = next;
    }

    Segment::new(origin, end)
}

/// Rotates the axis-aligned hull described by `center` and `half_extents` by
/// `degrees` around its centre.
#[must_use]
pub fn rotate_hull(center: Vec2, half_extents: Vec2, degrees: f32) -> Hull {
    let rotation = heading(degrees);
    let base = Hull::from_aabb(&Aabb::from_center_half_extents(Vec2::ZERO, half_extents));
    let corners = (*base.corners()).map(|corner| center + rotation.rotate(corner));
    Hull::new(corners)
}

/// Steps `current` toward `target` by at most `turn_rate` degrees.
///
/// The step halves once the remaining angle drops below `turn_rate` and
/// quarters below half of it, so the result never overshoots by more than a
/// quarter turn rate. Returns `current` unchanged when already aligned.
#[must_use]
pub fn ease_rotation(current: f32, target: f32, turn_rate: f32) -> f32 {
    let clockwise = (target - current).rem_euclid(360.0);
    let counter_clockwise = (current - target).rem_euclid(360.0);
    let (sign, remaining) = if clockwise <= counter_clockwise {
        (1.0, clockwise)
    } else {
        (-1.0, counter_clockwise)
    };

    if remaining == 0.0 {
        return current;
    }

    let step = if remaining < turn_rate / 2.0 {
        turn_rate / 4.0
    } else if remaining < turn_rate {
        turn_rate / 2.0
    } else {
        turn_rate
    };

    normalize_degrees(current + sign * step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearing_is_normalised() {
        assert!((bearing(Vec2::ZERO, Vec2::new(0.0, -1.0)) - 270.0).abs() < 1e-4);
        assert!((bearing(Vec2::ZERO, Vec2::new(-1.0, 0.0)) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn angle_delta_takes_short_way_round() {
        assert!((angle_delta(350.0, 10.0) - 20.0).abs() < 1e-4);
        assert!((angle_delta(10.0, 350.0) + 20.0).abs() < 1e-4);
    }
}
