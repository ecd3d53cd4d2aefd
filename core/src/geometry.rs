//! World-space geometry shared by the generator, hazards, and agents.

use glam::Vec2;

const PARALLEL_EPSILON: f32 = 1e-6;

/// Axis-aligned rectangle in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    min: Vec2,
    max: Vec2,
}

impl Aabb {
    /// Creates a rectangle from two corners, reordering them when needed.
    #[must_use]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a rectangle centred on `center` with the provided half extents.
    #[must_use]
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Creates a rectangle centred on `center` with the provided full size.
    #[must_use]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self::from_center_half_extents(center, size * 0.5)
    }

    /// Lower-left corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Upper-right corner.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half of the rectangle's width and height.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Returns the rectangle moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Reports whether `point` lies inside or on the rectangle.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Reports whether the two rectangles overlap with a non-zero area.
    ///
    /// Rectangles that merely share an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Reports whether the segment from `start` to `end` touches the rectangle.
    #[must_use]
    pub fn intersects_segment(&self, start: Vec2, end: Vec2) -> bool {
        let delta = end - start;
        let mut entry = 0.0_f32;
        let mut exit = 1.0_f32;

        for axis in 0..2 {
            let origin = start[axis];
            let direction = delta[axis];
            let low = self.min[axis];
            let high = self.max[axis];

            if direction.abs() < PARALLEL_EPSILON {
                if origin < low || origin > high {
                    return false;
                }
                continue;
            }

            let inverse = 1.0 / direction;
            let mut near = (low - origin) * inverse;
            let mut far = (high - origin) * inverse;
            if near > far {
                std::mem::swap(&mut near, &mut far);
            }
            entry = entry.max(near);
            exit = exit.min(far);
            if entry > exit {
                return false;
            }
        }

        true
    }
}

/// Straight line between two world-space points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    start: Vec2,
    end: Vec2,
}

impl Segment {
    /// Creates a segment between the two points.
    #[must_use]
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Point the segment starts from.
    #[must_use]
    pub const fn start(&self) -> Vec2 {
        self.start
    }

    /// Point the segment ends at.
    #[must_use]
    pub const fn end(&self) -> Vec2 {
        self.end
    }

    /// Euclidean length of the segment.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Oriented collision hull stored as four corners in counter-clockwise order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hull {
    corners: [Vec2; 4],
}

impl Hull {
    /// Creates a hull from its corners.
    #[must_use]
    pub const fn new(corners: [Vec2; 4]) -> Self {
        Self { corners }
    }

    /// Unrotated hull covering `aabb`.
    #[must_use]
    pub fn from_aabb(aabb: &Aabb) -> Self {
        let min = aabb.min();
        let max = aabb.max();
        Self::new([
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ])
    }

    /// Corners of the hull.
    #[must_use]
    pub const fn corners(&self) -> &[Vec2; 4] {
        &self.corners
    }

    /// Smallest axis-aligned rectangle enclosing the hull.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        let mut min = self.corners[0];
        let mut max = self.corners[0];
        for corner in &self.corners[1..] {
            min = min.min(*corner);
            max = max.max(*corner);
        }
        Aabb::new(min, max)
    }
}

/// Collection of static wall rectangles shared read-only during a tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WallSet {
    walls: Vec<Aabb>,
}

impl WallSet {
    /// Creates an empty wall set.
    #[must_use]
    pub const fn new() -> Self {
        Self { walls: Vec::new() }
    }

    /// Adds a wall rectangle.
    pub fn push(&mut self, wall: Aabb) {
        self.walls.push(wall);
    }

    /// Number of walls in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    /// Reports whether the set holds no walls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Iterates over every wall rectangle.
    pub fn iter(&self) -> impl Iterator<Item = &Aabb> {
        self.walls.iter()
    }

    /// Reports whether `shape` overlaps any wall.
    #[must_use]
    pub fn collides(&self, shape: &Aabb) -> bool {
        self.walls.iter().any(|wall| wall.intersects(shape))
    }

    /// Reports whether any wall contains `point`.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.walls.iter().any(|wall| wall.contains_point(point))
    }

    /// Reports whether a wall interrupts the straight line between two points.
    #[must_use]
    pub fn blocks_segment(&self, start: Vec2, end: Vec2) -> bool {
        self.walls
            .iter()
            .any(|wall| wall.intersects_segment(start, end))
    }
}

impl From<Vec<Aabb>> for WallSet {
    fn from(walls: Vec<Aabb>) -> Self {
        Self { walls }
    }
}

impl Extend<Aabb> for WallSet {
    fn extend<T: IntoIterator<Item = Aabb>>(&mut self, iter: T) {
        self.walls.extend(iter);
    }
}

impl FromIterator<Aabb> for WallSet {
    fn from_iter<T: IntoIterator<Item = Aabb>>(iter: T) -> Self {
        Self {
            walls: iter.into_iter().collect(),
        }
    }
}
