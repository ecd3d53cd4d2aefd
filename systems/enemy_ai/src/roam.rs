//! Tile-to-tile patrol shared by the Thumper and the Giant.

use std::collections::HashSet;

use glam::Vec2;
use moon_salvage_core::{CellCoord, Direction};
use moon_salvage_system_navigation::Terrain;
use moon_salvage_system_perception::has_line_of_sight;
use rand::{seq::SliceRandom, Rng};

use crate::body::Body;

/// How a brain walks while roaming.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Gait {
    /// Distance at which a roam target counts as reached.
    pub(crate) arrive_distance: f32,
    /// Cone within which the agent walks at full speed.
    pub(crate) facing_swath: f32,
    /// Speed multiplier while still turning toward the target.
    pub(crate) crawl_factor: f32,
    /// Maximum heading change per tick.
    pub(crate) turn_rate: f32,
}

/// Current roam target and the tiles already patrolled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoamState {
    target: Option<Vec2>,
    visited: HashSet<CellCoord>,
}

impl RoamState {
    /// Point the agent is walking toward.
    #[must_use]
    pub const fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Number of tiles patrolled since the last reset.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub(crate) fn set_target(&mut self, target: Option<Vec2>) {
        self.target = target;
    }

    pub(crate) fn forget_visited(&mut self) {
        self.visited.clear();
    }

    /// Walks toward the current target, or picks an unvisited neighbouring
    /// tile in line of sight when there is none. Stays put when boxed in.
    pub(crate) fn roam<R: Rng + ?Sized>(
        &mut self,
        body: &mut Body,
        terrain: &Terrain,
        rng: &mut R,
        gait: Gait,
    ) {
        if let Some(target) = self.target {
            if body.position().distance(target) <= gait.arrive_distance {
                self.target = None;
            } else {
                step_toward(body, target, gait);
                return;
            }
        }

        let Some(current) = CellCoord::containing(body.position()) else {
            return;
        };

        let mut candidates = self.open_neighbors(current, terrain);
        if candidates.is_empty() {
            self.visited.clear();
            candidates = self.open_neighbors(current, terrain);
        }
        let Some(&next) = candidates.choose(rng) else {
            return;
        };

        let _ = self.visited.insert(next);
        let target = next.center();
        self.target = Some(target);
        step_toward(body, target, gait);
    }

    fn open_neighbors(&self, current: CellCoord, terrain: &Terrain) -> Vec<CellCoord> {
        let origin = current.center();
        Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                let (dx, dy) = direction.offset();
                let column = current.column().checked_add_signed(dx)?;
                let row = current.row().checked_add_signed(dy)?;
                Some(CellCoord::new(column, row))
            })
            .filter(|cell| !self.visited.contains(cell))
            .filter(|cell| terrain.bounds().contains_point(cell.center()))
            .filter(|cell| has_line_of_sight(origin, cell.center(), terrain.walls()))
            .collect()
    }
}

/// Turns toward `target` and walks, crawling while the heading is still off.
pub(crate) fn step_toward(body: &mut Body, target: Vec2, gait: Gait) {
    body.rotate_toward(target, gait.turn_rate);
    let distance = if body.is_facing(target, gait.facing_swath) {
        body.speed()
    } else {
        body.speed() * gait.crawl_factor
    };
    body.advance(distance);
}
