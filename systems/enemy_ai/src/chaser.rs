//! Path-following pursuit used by the basic melee monster.

use std::collections::VecDeque;

use glam::Vec2;
use moon_salvage_core::PlayerView;
use moon_salvage_system_navigation::{Resolution, Terrain};

use crate::body::Body;

/// Remaining path length below which the fine lattice is used every tick.
pub const FINE_PATH_THRESHOLD: f32 = 128.0;

/// Path length covered by one unit of the replanning timer.
pub const REPLAN_TIMER_LENGTH: f32 = 256.0;

/// Ticks added to the replanning timer per [`REPLAN_TIMER_LENGTH`] of path,
/// and the wait after a failed plan.
pub const REPLAN_TIMER_SCALE: i32 = 3;

/// Waypoints toward the player and the countdown to the next coarse plan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChaserState {
    path: VecDeque<Vec2>,
    replan_timer: i32,
}

impl ChaserState {
    /// Waypoints still to be visited.
    pub fn path(&self) -> impl Iterator<Item = &Vec2> {
        self.path.iter()
    }

    /// Ticks until the next coarse replan.
    #[must_use]
    pub const fn replan_timer(&self) -> i32 {
        self.replan_timer
    }

    /// Length of the remaining path from `position`.
    #[must_use]
    pub fn remaining_length(&self, position: Vec2) -> f32 {
        let mut length = 0.0;
        let mut previous = position;
        for waypoint in &self.path {
            length += previous.distance(*waypoint);
            previous = *waypoint;
        }
        length
    }

    pub(crate) fn update(&mut self, body: &mut Body, player: &PlayerView, terrain: &Terrain) {
        let remaining = self.remaining_length(body.position());
        if !self.path.is_empty() && remaining < FINE_PATH_THRESHOLD {
            self.replan(body.position(), player, terrain, Resolution::Fine);
        } else if self.replan_timer <= 0 {
            self.replan(body.position(), player, terrain, Resolution::Coarse);
            self.replan_timer = if self.path.is_empty() {
                REPLAN_TIMER_SCALE
            } else {
                let units = (self.remaining_length(body.position()) / REPLAN_TIMER_LENGTH).floor();
                REPLAN_TIMER_SCALE * units as i32
            };
        }
        self.replan_timer -= 1;

        self.follow(body);
    }

    fn replan(&mut self, from: Vec2, player: &PlayerView, terrain: &Terrain, resolution: Resolution) {
        self.path = terrain
            .find_path(from, player.position(), resolution)
            .map(VecDeque::from)
            .unwrap_or_default();
    }

    /// Moves toward the next waypoint one axis at a time, each clamped to the
    /// remaining distance on that axis.
    fn follow(&mut self, body: &mut Body) {
        let Some(&next) = self.path.front() else {
            return;
        };
        let speed = body.speed();
        let position = body.position();
        let step_axis = |from: f32, to: f32| {
            let delta = to - from;
            if delta.abs() <= speed {
                to
            } else {
                from + delta.signum() * speed
            }
        };
        let moved = Vec2::new(step_axis(position.x, next.x), step_axis(position.y, next.y));
        body.set_position(moved);

        if moved == next {
            let _ = self.path.pop_front();
        }
    }
}
