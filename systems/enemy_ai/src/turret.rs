//! Stationary sweep-and-fire turret.

use glam::Vec2;
use moon_salvage_core::{PlayerView, Segment, WallSet};
use moon_salvage_system_hazards::Bullet;
use moon_salvage_system_perception::{
    angle_delta, bearing, has_line_of_sight, is_within_facing, march_until_collision,
    normalize_degrees,
};
use rand::Rng;

/// Half width of the sweep around the base direction.
pub const SWEEP_HALF_ANGLE: f32 = 89.0;
/// Ticks spent paused at each end of the sweep.
pub const EDGE_DELAY: u32 = 20;
/// Detection cone while tracking the player.
pub const AGGRESSIVE_DETECTION_ANGLE: f32 = 45.0;
/// Detection cone while sweeping.
pub const BASE_DETECTION_ANGLE: f32 = 30.0;
/// Ticks in one burst of fire.
pub const BURST_LENGTH: u32 = 100;
/// Ticks the player must stay in the firing cone before the burst starts.
pub const PRE_FIRE_DELAY: u32 = 50;
/// Cone the player must be in for the turret to fire.
pub const FIRING_ANGLE: f32 = 10.0;
/// Ticks between consecutive bullets in a burst.
pub const TICKS_BETWEEN_BULLETS: u32 = 5;
/// Maximum angular jitter applied to each bullet.
pub const BULLET_SPREAD: f32 = 3.0;
/// Damage carried by each bullet.
pub const BULLET_DAMAGE: f32 = 40.0;
/// Sweep speed in degrees per tick.
pub const ROTATE_SPEED: f32 = 0.65;
/// Distance at which tracking speed doubles the sweep speed.
pub const TRACKING_FALLOFF: f32 = 200.0;
/// Maximum length of the aiming laser.
pub const LASER_RANGE: f32 = 1000.0;
/// Sampling step used when marching the aiming laser.
pub const LASER_STEP: f32 = 2.0;

/// Turret state: sweep bounds, burst timers, and the current laser.
///
/// The facing direction is kept unwrapped inside
/// `[base - SWEEP_HALF_ANGLE, base + SWEEP_HALF_ANGLE]` so the bounds never
/// straddle the 0/360 seam.
#[derive(Clone, Debug, PartialEq)]
pub struct Turret {
    position: Vec2,
    base_direction: f32,
    facing: f32,
    rotate_direction: f32,
    delaying: bool,
    edge_delay: u32,
    detection_angle: f32,
    line_of_sight: bool,
    aiming: bool,
    firing: bool,
    pre_fire_delay: u32,
    burst_remaining: u32,
    laser: Option<Segment>,
}

impl Turret {
    /// Mounts a turret looking along `view_direction` with a random initial
    /// facing inside its sweep.
    pub fn new<R: Rng + ?Sized>(position: Vec2, view_direction: Vec2, rng: &mut R) -> Self {
        let base = bearing(Vec2::ZERO, view_direction);
        let sweep = SWEEP_HALF_ANGLE as i32;
        let offset = rng.gen_range(-sweep..=sweep) as f32;
        Self::with_facing(position, base, base + offset)
    }

    /// Mounts a turret with an explicit base and facing direction. The facing
    /// is clamped into the sweep.
    #[must_use]
    pub fn with_facing(position: Vec2, base_direction: f32, facing: f32) -> Self {
        let base_direction = normalize_degrees(base_direction);
        let facing = base_direction + angle_delta(base_direction, normalize_degrees(facing));
        Self {
            position,
            base_direction,
            facing: facing.clamp(
                base_direction - SWEEP_HALF_ANGLE,
                base_direction + SWEEP_HALF_ANGLE,
            ),
            rotate_direction: 1.0,
            delaying: false,
            edge_delay: EDGE_DELAY,
            detection_angle: BASE_DETECTION_ANGLE,
            line_of_sight: false,
            aiming: false,
            firing: false,
            pre_fire_delay: PRE_FIRE_DELAY,
            burst_remaining: BURST_LENGTH,
            laser: None,
        }
    }

    /// Mount point.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Centre of the sweep.
    #[must_use]
    pub const fn base_direction(&self) -> f32 {
        self.base_direction
    }

    /// Current facing in degrees, unwrapped around the base direction.
    #[must_use]
    pub const fn facing(&self) -> f32 {
        self.facing
    }

    /// `1.0` while sweeping counter-clockwise, `-1.0` while sweeping back.
    #[must_use]
    pub const fn rotate_direction(&self) -> f32 {
        self.rotate_direction
    }

    /// Detection cone in use this tick.
    #[must_use]
    pub const fn detection_angle(&self) -> f32 {
        self.detection_angle
    }

    /// Whether the last update had a clear line to the player.
    #[must_use]
    pub const fn has_line_of_sight(&self) -> bool {
        self.line_of_sight
    }

    /// Whether the turret is counting down toward a burst.
    #[must_use]
    pub const fn is_aiming(&self) -> bool {
        self.aiming
    }

    /// Whether a burst is in progress.
    #[must_use]
    pub const fn is_firing(&self) -> bool {
        self.firing
    }

    /// Whether the sweep is paused.
    #[must_use]
    pub const fn is_delaying(&self) -> bool {
        self.delaying
    }

    /// Aiming laser, present only while aiming or firing.
    #[must_use]
    pub const fn laser(&self) -> Option<Segment> {
        self.laser
    }

    /// Advances the turret one tick, appending any bullet fired to `bullets`.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        player: &PlayerView,
        walls: &WallSet,
        rng: &mut R,
        bullets: &mut Vec<Bullet>,
    ) {
        let target = player.position();
        let distance = self.position.distance(target).max(1.0);
        self.line_of_sight = has_line_of_sight(self.position, target, walls);
        self.laser = Some(march_until_collision(
            self.position,
            normalize_degrees(self.facing),
            walls,
            LASER_RANGE,
            LASER_STEP,
        ));

        self.update_trigger(target);
        self.update_burst(rng, bullets);
        self.update_facing(target, distance);
    }

    fn in_cone(&self, target: Vec2, swath: f32) -> bool {
        self.line_of_sight
            && is_within_facing(self.position, normalize_degrees(self.facing), target, swath)
    }

    fn update_trigger(&mut self, target: Vec2) {
        if self.in_cone(target, FIRING_ANGLE) {
            if self.pre_fire_delay > 0 && !self.firing {
                self.pre_fire_delay -= 1;
                self.aiming = true;
            } else {
                self.firing = true;
                self.pre_fire_delay = PRE_FIRE_DELAY;
            }
        } else {
            self.aiming = false;
        }
    }

    fn update_burst<R: Rng + ?Sized>(&mut self, rng: &mut R, bullets: &mut Vec<Bullet>) {
        if self.firing && self.burst_remaining > 0 {
            let fired = (self.burst_remaining - 1) % TICKS_BETWEEN_BULLETS == 0;
            if fired {
                let spread = rng.gen_range(-BULLET_SPREAD..=BULLET_SPREAD);
                let direction = normalize_degrees(self.facing + spread);
                bullets.push(Bullet::new(self.position, direction, BULLET_DAMAGE));
            }
            self.burst_remaining -= 1;
            // Still aimed: keep the burst going at the same cadence.
            if fired && self.aiming {
                self.burst_remaining = BURST_LENGTH;
            }
            self.delaying = true;
        } else if self.burst_remaining == 0 {
            self.pre_fire_delay = PRE_FIRE_DELAY;
            self.firing = false;
            self.burst_remaining = BURST_LENGTH;
            self.laser = None;
        } else if !self.aiming {
            self.laser = None;
        }
    }

    fn update_facing(&mut self, target: Vec2, distance: f32) {
        let lower = self.base_direction - SWEEP_HALF_ANGLE;
        let upper = self.base_direction + SWEEP_HALF_ANGLE;

        if self.in_cone(target, self.detection_angle) {
            let desired = self.facing + angle_delta(self.facing, bearing(self.position, target));
            let step = ROTATE_SPEED * (1.0 + TRACKING_FALLOFF / distance);
            if (desired - self.facing).abs() <= step {
                self.facing = desired;
            } else {
                self.facing += step * (desired - self.facing).signum();
            }

            if self.facing >= upper {
                self.facing = upper;
                self.delaying = true;
                self.rotate_direction = -1.0;
            } else if self.facing <= lower {
                self.facing = lower;
                self.delaying = true;
                self.rotate_direction = 1.0;
            }
            self.detection_angle = AGGRESSIVE_DETECTION_ANGLE;
        } else if !self.delaying {
            self.facing += self.rotate_direction * ROTATE_SPEED;
            if self.facing <= lower || self.facing >= upper {
                self.facing = self.facing.clamp(lower, upper);
                self.rotate_direction = -self.rotate_direction;
                self.delaying = true;
            }
            self.detection_angle = BASE_DETECTION_ANGLE;
        } else {
            if self.edge_delay > 0 {
                self.edge_delay -= 1;
            } else {
                self.delaying = false;
                self.edge_delay = EDGE_DELAY;
            }
            self.detection_angle = BASE_DETECTION_ANGLE;
        }
    }
}
