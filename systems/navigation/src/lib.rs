#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Barrier lattices and A* search over a realm's wall set.
//!
//! A [`Terrain`] bundles the walls of a realm with two precomputed lattices:
//! a fine one used for short hops near the target and a coarse one used for
//! long-range planning. Lattice points are blocked when a probe box centred on
//! them overlaps a wall.

use std::{cmp::Reverse, collections::BinaryHeap};

use glam::Vec2;
use moon_salvage_core::{Aabb, WallSet};

/// Spacing of the fine lattice in world units.
pub const FINE_SPACING: f32 = 32.0;

/// Spacing of the coarse lattice in world units.
pub const COARSE_SPACING: f32 = 64.0;

/// Half extents of the box probed around every lattice point.
pub const PROBE_HALF_EXTENTS: Vec2 = Vec2::new(16.0, 16.0);

const STRAIGHT_COST: u32 = 10;
const DIAGONAL_COST: u32 = 14;
const GOAL_SEARCH_RADIUS: i64 = 2;

/// Which lattice a path is planned on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Tight lattice for short distances.
    Fine,
    /// Sparse lattice for long distances.
    Coarse,
}

/// Lattice of walkable points spanning a rectangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavGrid {
    origin: Vec2,
    spacing: f32,
    columns: u32,
    rows: u32,
    blocked: Vec<bool>,
}

impl NavGrid {
    /// Builds a lattice over `bounds`, marking points whose probe box touches
    /// a wall as blocked.
    #[must_use]
    pub fn build(bounds: &Aabb, spacing: f32, walls: &WallSet, probe_half_extents: Vec2) -> Self {
        let size = bounds.max() - bounds.min();
        if spacing <= 0.0 || size.x < 0.0 || size.y < 0.0 {
            return Self::default();
        }
        let columns = (size.x / spacing).floor() as u32 + 1;
        let rows = (size.y / spacing).floor() as u32 + 1;
        let mut grid = Self {
            origin: bounds.min(),
            spacing,
            columns,
            rows,
            blocked: Vec::with_capacity((columns * rows) as usize),
        };
        for row in 0..rows {
            for column in 0..columns {
                let probe = Aabb::from_center_half_extents(
                    grid.point(column, row),
                    probe_half_extents,
                );
                grid.blocked.push(walls.collides(&probe));
            }
        }
        grid
    }

    /// Distance between neighbouring lattice points.
    #[must_use]
    pub const fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Number of lattice columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of lattice rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// World position of a lattice point.
    #[must_use]
    pub fn point(&self, column: u32, row: u32) -> Vec2 {
        self.origin + Vec2::new(column as f32, row as f32) * self.spacing
    }

    /// Reports whether the lattice point is blocked or outside the lattice.
    #[must_use]
    pub fn is_blocked(&self, column: u32, row: u32) -> bool {
        self.index(column, row)
            .map_or(true, |offset| self.blocked[offset])
    }

    /// Lattice point closest to `position`, clamped into the lattice.
    #[must_use]
    pub fn nearest(&self, position: Vec2) -> Option<(u32, u32)> {
        if self.columns == 0 || self.rows == 0 {
            return None;
        }
        let relative = (position - self.origin) / self.spacing;
        let column = relative.x.round().clamp(0.0, (self.columns - 1) as f32) as u32;
        let row = relative.y.round().clamp(0.0, (self.rows - 1) as f32) as u32;
        Some((column, row))
    }

    /// Plans a path from `from` to `to`.
    ///
    /// The returned waypoints are lattice points, starting after the point
    /// nearest `from` and ending at the free point nearest `to`. Returns `None`
    /// when the target cannot be reached.
    #[must_use]
    pub fn find_path(&self, from: Vec2, to: Vec2) -> Option<Vec<Vec2>> {
        let start = self.nearest(from)?;
        let goal = self.free_point_near(to)?;
        let start_index = self.index(start.0, start.1)?;
        let goal_index = self.index(goal.0, goal.1)?;

        if start_index == goal_index {
            return Some(vec![self.point(goal.0, goal.1)]);
        }

        let node_count = self.blocked.len();
        let mut cost_so_far = vec![u32::MAX; node_count];
        let mut came_from = vec![usize::MAX; node_count];
        let mut frontier = BinaryHeap::new();

        cost_so_far[start_index] = 0;
        frontier.push(Reverse((self.heuristic(start, goal), 0_u32, start_index)));

        while let Some(Reverse((_, cost, current))) = frontier.pop() {
            if current == goal_index {
                return Some(self.reconstruct(&came_from, start_index, goal_index));
            }
            if cost > cost_so_far[current] {
                continue;
            }

            let (column, row) = self.coordinates(current);
            for (next, step_cost) in self.neighbors(column, row) {
                let next_cost = cost.saturating_add(step_cost);
                let Some(next_index) = self.index(next.0, next.1) else {
                    continue;
                };
                if next_cost < cost_so_far[next_index] {
                    cost_so_far[next_index] = next_cost;
                    came_from[next_index] = current;
                    frontier.push(Reverse((
                        next_cost.saturating_add(self.heuristic(next, goal)),
                        next_cost,
                        next_index,
                    )));
                }
            }
        }

        None
    }

    fn index(&self, column: u32, row: u32) -> Option<usize> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        usize::try_from(row * self.columns + column).ok()
    }

    fn coordinates(&self, index: usize) -> (u32, u32) {
        let index = index as u32;
        (index % self.columns, index / self.columns)
    }

    fn heuristic(&self, (column, row): (u32, u32), (goal_column, goal_row): (u32, u32)) -> u32 {
        let dx = column.abs_diff(goal_column);
        let dy = row.abs_diff(goal_row);
        STRAIGHT_COST * dx.max(dy) + (DIAGONAL_COST - STRAIGHT_COST) * dx.min(dy)
    }

    fn neighbors(&self, column: u32, row: u32) -> impl Iterator<Item = ((u32, u32), u32)> + '_ {
        const OFFSETS: [(i64, i64); 8] = [
            (0, 1),
            (1, 0),
            (0, -1),
            (-1, 0),
            (1, 1),
            (1, -1),
            (-1, -1),
            (-1, 1),
        ];

        OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let next = self.offset(column, row, dx, dy)?;
            if self.is_blocked(next.0, next.1) {
                return None;
            }
            if dx != 0 && dy != 0 {
                let horizontal = self.offset(column, row, dx, 0)?;
                let vertical = self.offset(column, row, 0, dy)?;
                if self.is_blocked(horizontal.0, horizontal.1)
                    || self.is_blocked(vertical.0, vertical.1)
                {
                    return None;
                }
                return Some((next, DIAGONAL_COST));
            }
            Some((next, STRAIGHT_COST))
        })
    }

    fn offset(&self, column: u32, row: u32, dx: i64, dy: i64) -> Option<(u32, u32)> {
        let column = u32::try_from(i64::from(column) + dx).ok()?;
        let row = u32::try_from(i64::from(row) + dy).ok()?;
        self.index(column, row).map(|_| (column, row))
    }

    fn free_point_near(&self, position: Vec2) -> Option<(u32, u32)> {
        let (column, row) = self.nearest(position)?;
        if !self.is_blocked(column, row) {
            return Some((column, row));
        }

        let mut best: Option<((u32, u32), f32)> = None;
        for dy in -GOAL_SEARCH_RADIUS..=GOAL_SEARCH_RADIUS {
            for dx in -GOAL_SEARCH_RADIUS..=GOAL_SEARCH_RADIUS {
                let Some(candidate) = self.offset(column, row, dx, dy) else {
                    continue;
                };
                if self.is_blocked(candidate.0, candidate.1) {
                    continue;
                }
                let distance = self.point(candidate.0, candidate.1).distance(position);
                if best.map_or(true, |(_, closest)| distance < closest) {
                    best = Some((candidate, distance));
                }
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    fn reconstruct(&self, came_from: &[usize], start: usize, goal: usize) -> Vec<Vec2> {
        let mut path = Vec::new();
        let mut node = goal;
        while node != start && node != usize::MAX {
            let (column, row) = self.coordinates(node);
            path.push(self.point(column, row));
            node = came_from[node];
        }
        path.reverse();
        path
    }
}

/// Walls and planning lattices of one realm.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Terrain {
    walls: WallSet,
    bounds: Aabb,
    fine: NavGrid,
    coarse: NavGrid,
}

impl Terrain {
    /// Builds both planning lattices over `bounds`.
    #[must_use]
    pub fn new(walls: WallSet, bounds: Aabb) -> Self {
        let fine = NavGrid::build(&bounds, FINE_SPACING, &walls, PROBE_HALF_EXTENTS);
        let coarse = NavGrid::build(&bounds, COARSE_SPACING, &walls, PROBE_HALF_EXTENTS);
        Self {
            walls,
            bounds,
            fine,
            coarse,
        }
    }

    /// Wall set of the realm.
    #[must_use]
    pub const fn walls(&self) -> &WallSet {
        &self.walls
    }

    /// Playable rectangle of the realm.
    #[must_use]
    pub const fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Lattice used for the requested resolution.
    #[must_use]
    pub const fn grid(&self, resolution: Resolution) -> &NavGrid {
        match resolution {
            Resolution::Fine => &self.fine,
            Resolution::Coarse => &self.coarse,
        }
    }

    /// Plans a path on the lattice of the requested resolution.
    #[must_use]
    pub fn find_path(&self, from: Vec2, to: Vec2, resolution: Resolution) -> Option<Vec<Vec2>> {
        self.grid(resolution).find_path(from, to)
    }
}
