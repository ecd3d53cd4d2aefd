//! Thumper brain: wander, charge on sight, then search for a while.

use moon_salvage_core::PlayerView;
use moon_salvage_system_navigation::Terrain;
use rand::Rng;
use tracing::trace;

use crate::{
    body::Body,
    roam::{Gait, RoamState},
};

/// Maximum heading change per tick.
pub const ROTATION_RATE: f32 = 2.0;
/// Cone the Thumper notices the player in while wandering.
pub const PASSIVE_FOV: f32 = 10.0;
/// Cone the Thumper re-acquires the player in while searching.
pub const AGRO_FOV: f32 = 30.0;
/// Cone the Thumper keeps tracking the player in while charging.
pub const CHASE_FOV: f32 = 160.0;
/// Search time budget.
pub const AGRO_METER_MAX: f32 = 100.0;
/// Search budget spent per tick.
pub const AGRO_DRAIN: f32 = 0.5;
/// Speed multiplier while turning toward a roam target.
pub const CRAWL_FACTOR: f32 = 1.0 / 3.0;
/// Speed gained per tick while charging at the player.
pub const SPEED_INCREASE_RATE: f32 = 0.1;
/// Speed change per tick while easing toward a resting speed.
pub const SPEED_EASE_RATE: f32 = 0.01;
/// Distance at which a roam target counts as reached.
pub const ARRIVE_DISTANCE: f32 = 32.0;
/// Distance to the player that triggers the overshoot window.
pub const TARGET_DISTANCE: f32 = 32.0;
/// Ticks the Thumper keeps running after reaching the player.
pub const OVERSHOOT_TICKS: u32 = 10;

const GAIT: Gait = Gait {
    arrive_distance: ARRIVE_DISTANCE,
    facing_swath: PASSIVE_FOV,
    crawl_factor: CRAWL_FACTOR,
    turn_rate: ROTATION_RATE,
};

/// Behavioural state of a Thumper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThumperMode {
    /// Patrolling tile to tile.
    Wander,
    /// Charging at the player.
    Aggressive,
    /// Roaming around the last known player position.
    Search,
}

/// State carried by a Thumper between ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct ThumperState {
    mode: ThumperMode,
    agro_meter: f32,
    overshoot: u32,
    in_distance: bool,
    roam: RoamState,
}

impl Default for ThumperState {
    fn default() -> Self {
        Self {
            mode: ThumperMode::Wander,
            agro_meter: AGRO_METER_MAX,
            overshoot: 0,
            in_distance: false,
            roam: RoamState::default(),
        }
    }
}

impl ThumperState {
    /// Creates a state already in `mode` with a full search meter.
    #[must_use]
    pub fn in_mode(mode: ThumperMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Active behavioural state.
    #[must_use]
    pub const fn mode(&self) -> ThumperMode {
        self.mode
    }

    /// Remaining search budget.
    #[must_use]
    pub const fn agro_meter(&self) -> f32 {
        self.agro_meter
    }

    /// Ticks left in the overshoot window.
    #[must_use]
    pub const fn overshoot(&self) -> u32 {
        self.overshoot
    }

    /// Roam target and patrol history.
    #[must_use]
    pub const fn roam(&self) -> &RoamState {
        &self.roam
    }

    fn enter(&mut self, mode: ThumperMode) {
        if self.mode != mode {
            trace!(from = ?self.mode, to = ?mode, "thumper state change");
            self.mode = mode;
        }
    }

    pub(crate) fn update<R: Rng + ?Sized>(
        &mut self,
        body: &mut Body,
        player: &PlayerView,
        terrain: &Terrain,
        rng: &mut R,
    ) {
        let walls = terrain.walls();
        let target = player.position();

        match self.mode {
            ThumperMode::Wander => {
                if body.can_see(target, PASSIVE_FOV, walls) {
                    self.enter(ThumperMode::Aggressive);
                    body.set_speed(body.base_speed() / 2.0);
                }
                self.roam.roam(body, terrain, rng, GAIT);
            }
            ThumperMode::Aggressive => {
                let touching = body.hit_box().intersects(&player.hit_box());
                let close = body.position().distance(target) <= TARGET_DISTANCE;
                if (touching || close) && !self.in_distance {
                    self.overshoot = OVERSHOOT_TICKS;
                    self.in_distance = true;
                } else {
                    self.in_distance = false;
                }

                if self.overshoot > 0 {
                    body.rotate_toward(target, ROTATION_RATE);
                    if body.touches_wall(walls) {
                        body.set_speed(0.0);
                    } else {
                        body.advance(body.speed());
                        if body.speed() > 0.0 && !self.in_distance {
                            body.set_speed(body.speed() - SPEED_INCREASE_RATE / CRAWL_FACTOR);
                        }
                    }
                    self.overshoot -= 1;
                } else if !body.can_see(target, CHASE_FOV, walls) {
                    self.enter(ThumperMode::Search);
                    self.agro_meter = AGRO_METER_MAX;
                    self.roam.forget_visited();
                    self.roam.set_target(Some(target));
                    body.ease_speed(body.base_speed(), SPEED_EASE_RATE);
                } else {
                    charge(body, player, terrain);
                    self.roam.set_target(Some(target));
                }
            }
            ThumperMode::Search => {
                self.agro_meter -= AGRO_DRAIN;
                if body.can_see(target, AGRO_FOV, walls) {
                    charge(body, player, terrain);
                    self.enter(ThumperMode::Aggressive);
                    body.set_speed(body.base_speed() / 2.0);
                    self.roam.forget_visited();
                    self.roam.set_target(Some(target));
                } else if self.agro_meter <= 0.0 {
                    self.roam.roam(body, terrain, rng, GAIT);
                    self.enter(ThumperMode::Wander);
                    body.ease_speed(body.base_speed(), SPEED_EASE_RATE);
                } else {
                    self.roam.roam(body, terrain, rng, GAIT);
                    body.ease_speed(body.base_speed() * 1.5, SPEED_EASE_RATE);
                }
            }
        }
    }
}

/// Runs straight at the player while facing them, braking otherwise.
fn charge(body: &mut Body, player: &PlayerView, terrain: &Terrain) {
    let target = player.position();
    body.rotate_toward(target, ROTATION_RATE);

    if body.touches_wall(terrain.walls()) {
        body.set_speed(0.0);
    } else if body.is_facing(target, AGRO_FOV * 2.0) {
        let direction = (target - body.position()).normalize_or_zero();
        body.set_position(body.position() + direction * body.speed());
        body.set_speed(body.speed() + SPEED_INCREASE_RATE);
    } else {
        body.set_speed(body.speed() - SPEED_EASE_RATE);
    }
}
