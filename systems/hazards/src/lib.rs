#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Passive hazards: proximity mines and turret bullets.
//!
//! Both types are plain state holders. The level's hazard pass decides when a
//! mine is armed or a bullet has hit something; the types only advance their
//! own timers and positions.

use glam::Vec2;
use moon_salvage_core::Aabb;
use moon_salvage_system_perception::heading;

/// Damage dealt by an exploding mine.
pub const MINE_DAMAGE: f32 = 100.0;

/// Ticks between arming a mine and its explosion once the trigger leaves.
pub const MINE_EXPLOSION_DELAY: u32 = 10;

/// Distance within which an exploding mine hurts the player.
pub const MINE_EXPLOSION_RADIUS: f32 = 100.0;

/// Half extents of a mine's trigger plate.
pub const MINE_HALF_EXTENTS: Vec2 = Vec2::new(12.0, 12.0);

/// Distance a bullet travels per tick.
pub const BULLET_SPEED: f32 = 10.0;

/// Half extents of a bullet's collision box.
pub const BULLET_HALF_EXTENTS: Vec2 = Vec2::new(3.0, 3.0);

/// Proximity mine with an arm-then-explode fuse.
#[derive(Clone, Debug, PartialEq)]
pub struct Mine {
    position: Vec2,
    armed: bool,
    exploded: bool,
    delay: u32,
}

impl Mine {
    /// Places an unarmed mine.
    #[must_use]
    pub const fn new(position: Vec2) -> Self {
        Self {
            position,
            armed: false,
            exploded: false,
            delay: MINE_EXPLOSION_DELAY,
        }
    }

    /// Centre of the mine.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Trigger plate of the mine.
    #[must_use]
    pub fn hit_box(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, MINE_HALF_EXTENTS)
    }

    /// Starts the fuse.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Reports whether the fuse has been started.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Reports whether the fuse has burnt down.
    #[must_use]
    pub const fn is_exploded(&self) -> bool {
        self.exploded
    }

    /// Ticks left on the fuse.
    #[must_use]
    pub const fn delay(&self) -> u32 {
        self.delay
    }

    /// Burns one tick of an armed fuse; unarmed mines are left alone.
    pub fn tick(&mut self) {
        if !self.armed || self.exploded {
            return;
        }
        self.delay = self.delay.saturating_sub(1);
        if self.delay == 0 {
            self.exploded = true;
        }
    }

    /// Damage dealt to something at `target`, if the mine has exploded within
    /// range of it.
    #[must_use]
    pub fn damage_at(&self, target: Vec2) -> Option<f32> {
        (self.exploded && self.position.distance(target) <= MINE_EXPLOSION_RADIUS)
            .then_some(MINE_DAMAGE)
    }
}

/// Straight-flying projectile released by a turret.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    position: Vec2,
    direction: f32,
    damage: f32,
}

impl Bullet {
    /// Creates a bullet travelling along `direction` degrees.
    #[must_use]
    pub const fn new(position: Vec2, direction: f32, damage: f32) -> Self {
        Self {
            position,
            direction,
            damage,
        }
    }

    /// Current centre of the bullet.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Heading in degrees.
    #[must_use]
    pub const fn direction(&self) -> f32 {
        self.direction
    }

    /// Damage dealt on impact.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Collision box of the bullet.
    #[must_use]
    pub fn hit_box(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, BULLET_HALF_EXTENTS)
    }

    /// Moves the bullet one tick along its heading.
    pub fn update(&mut self) {
        self.position += heading(self.direction) * BULLET_SPEED;
    }
}
