//! Kinematic state shared by every wall-colliding agent.

use glam::Vec2;
use moon_salvage_core::{Aabb, Hull, WallSet};
use moon_salvage_system_perception::{
    bearing, can_see, ease_rotation, heading, is_within_facing, rotate_hull,
};

const PUSH_OUT_PASSES: usize = 4;

/// Position, heading, speed, and collision hull of an agent.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    position: Vec2,
    half_extents: Vec2,
    rotation: f32,
    speed: f32,
    base_speed: f32,
    local_hull: Hull,
}

impl Body {
    /// Creates a body facing along the positive x axis.
    #[must_use]
    pub fn new(position: Vec2, half_extents: Vec2, base_speed: f32) -> Self {
        Self {
            position,
            half_extents,
            rotation: 0.0,
            speed: base_speed,
            base_speed,
            local_hull: rotate_hull(Vec2::ZERO, half_extents, 0.0),
        }
    }

    /// Centre of the body.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Heading in degrees.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Current speed in world units per tick.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Speed configured for the monster kind.
    #[must_use]
    pub const fn base_speed(&self) -> f32 {
        self.base_speed
    }

    /// Rotated collision hull in world space.
    #[must_use]
    pub fn hull(&self) -> Hull {
        Hull::new((*self.local_hull.corners()).map(|corner| corner + self.position))
    }

    /// Axis-aligned box enclosing the rotated hull.
    #[must_use]
    pub fn hit_box(&self) -> Aabb {
        self.local_hull.bounding_box().translated(self.position)
    }

    /// Moves the body to `position`.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Overrides the current speed, flooring it at zero.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Sets the heading directly and refreshes the hull.
    pub fn set_rotation(&mut self, rotation: f32) {
        if rotation != self.rotation {
            self.rotation = rotation;
            self.local_hull = rotate_hull(Vec2::ZERO, self.half_extents, rotation);
        }
    }

    /// Eases the heading toward `target` by at most `turn_rate` degrees.
    pub fn rotate_toward(&mut self, target: Vec2, turn_rate: f32) {
        let desired = bearing(self.position, target);
        self.set_rotation(ease_rotation(self.rotation, desired, turn_rate));
    }

    /// Moves `distance` units along the current heading.
    pub fn advance(&mut self, distance: f32) {
        self.position += heading(self.rotation) * distance;
    }

    /// Reports whether `target` lies within `swath` degrees of the heading.
    #[must_use]
    pub fn is_facing(&self, target: Vec2, swath: f32) -> bool {
        is_within_facing(self.position, self.rotation, target, swath)
    }

    /// Field-of-view plus line-of-sight check from the body's centre.
    #[must_use]
    pub fn can_see(&self, target: Vec2, swath: f32, walls: &WallSet) -> bool {
        can_see(self.position, self.rotation, target, swath, walls)
    }

    /// Reports whether the hull overlaps any wall.
    #[must_use]
    pub fn touches_wall(&self, walls: &WallSet) -> bool {
        walls.collides(&self.hit_box())
    }

    /// Nudges the speed toward `target` by `rate`, settling on it once
    /// within one step.
    pub fn ease_speed(&mut self, target: f32, rate: f32) {
        if (self.speed - target).abs() <= rate {
            self.speed = target;
        } else if self.speed > target {
            self.set_speed(self.speed - rate);
        } else {
            self.speed += rate;
        }
    }

    /// Pushes the body out of overlapping walls along the axis of least
    /// penetration.
    pub fn resolve_wall_penetration(&mut self, walls: &WallSet) {
        for _ in 0..PUSH_OUT_PASSES {
            let mut moved = false;
            for wall in walls.iter() {
                let shape = self.hit_box();
                if !shape.intersects(wall) {
                    continue;
                }
                let push_right = wall.max().x - shape.min().x;
                let push_left = shape.max().x - wall.min().x;
                let push_up = wall.max().y - shape.min().y;
                let push_down = shape.max().y - wall.min().y;

                let horizontal = if push_right < push_left {
                    push_right
                } else {
                    -push_left
                };
                let vertical = if push_up < push_down {
                    push_up
                } else {
                    -push_down
                };

                if horizontal.abs() < vertical.abs() {
                    self.position.x += horizontal;
                } else {
                    self.position.y += vertical;
                }
                moved = true;
            }
            if !moved {
                break;
            }
        }
    }
}
