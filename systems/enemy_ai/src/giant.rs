//! Giant brain: slow roaming, a doubled-speed pursuit, and a short search.

use moon_salvage_core::{CellCoord, PlayerView};
use moon_salvage_system_navigation::Terrain;
use rand::Rng;
use tracing::trace;

use crate::{
    body::Body,
    roam::{Gait, RoamState},
};

/// Cone the Giant spots the player in while roaming or searching.
pub const SEARCH_SWATH: f32 = 30.0;
/// Speed multiplier while turning toward a target.
pub const TURN_SPEED_FACTOR: f32 = 1.0 / 5.0;
/// Distance at which a roam target counts as reached.
pub const TARGET_DISTANCE: f32 = 24.0;
/// Maximum heading change per tick while roaming.
pub const ROTATION_RATE: f32 = 4.0;
/// Search time budget.
pub const AGRO_METER_MAX: f32 = 25.0;
/// Search budget spent per tick.
pub const AGRO_DRAIN: f32 = 1.0;

const ROAM_GAIT: Gait = Gait {
    arrive_distance: TARGET_DISTANCE,
    facing_swath: SEARCH_SWATH,
    crawl_factor: TURN_SPEED_FACTOR,
    turn_rate: ROTATION_RATE,
};

const PURSUIT_TURN_RATE: f32 = ROTATION_RATE * 2.0;

/// Behavioural state of a Giant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GiantMode {
    /// Patrolling tile to tile.
    Roam,
    /// Pursuing the player at double speed.
    Agro,
    /// Roaming at pursuit speed until the search budget runs out.
    AgroSearch,
}

/// State carried by a Giant between ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct GiantState {
    mode: GiantMode,
    agro_meter: f32,
    roam: RoamState,
}

impl Default for GiantState {
    fn default() -> Self {
        Self {
            mode: GiantMode::Roam,
            agro_meter: 0.0,
            roam: RoamState::default(),
        }
    }
}

impl GiantState {
    /// Active behavioural state.
    #[must_use]
    pub const fn mode(&self) -> GiantMode {
        self.mode
    }

    /// Remaining search budget.
    #[must_use]
    pub const fn agro_meter(&self) -> f32 {
        self.agro_meter
    }

    /// Roam or pursuit target and patrol history.
    #[must_use]
    pub const fn roam(&self) -> &RoamState {
        &self.roam
    }

    fn enter(&mut self, mode: GiantMode) {
        trace!(from = ?self.mode, to = ?mode, "giant state change");
        self.mode = mode;
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
            GiantMode::Roam => {
                if body.can_see(target, SEARCH_SWATH, walls) {
                    self.enter(GiantMode::Agro);
                    body.set_speed(body.speed() * 2.0);
                } else {
                    self.roam.roam(body, terrain, rng, ROAM_GAIT);
                }
            }
            GiantMode::Agro => {
                if body.can_see(target, SEARCH_SWATH * 2.0, walls) {
                    self.roam.set_target(Some(target));
                    self.pursue(body, terrain);
                } else {
                    self.roam.forget_visited();
                    self.agro_meter = AGRO_METER_MAX;
                    self.enter(GiantMode::AgroSearch);
                }
            }
            GiantMode::AgroSearch => {
                self.agro_meter -= AGRO_DRAIN;
                if body.can_see(target, SEARCH_SWATH, walls) {
                    self.enter(GiantMode::Agro);
                } else if self.agro_meter <= 0.0 {
                    body.set_speed(body.speed() / 2.0);
                    self.enter(GiantMode::Roam);
                } else {
                    self.roam.roam(body, terrain, rng, ROAM_GAIT);
                }
            }
        }
    }

    /// Walks at the pursuit target while it is in view, otherwise falls back
    /// to the centre of the tile the target was last seen in.
    fn pursue(&mut self, body: &mut Body, terrain: &Terrain) {
        let Some(target) = self.roam.target() else {
            return;
        };
        body.rotate_toward(target, PURSUIT_TURN_RATE);

        if body.can_see(target, SEARCH_SWATH, terrain.walls()) {
            body.advance(body.speed());
        } else if let Some(cell) = CellCoord::containing(target) {
            self.roam.set_target(Some(cell.center()));
        }
    }
}

