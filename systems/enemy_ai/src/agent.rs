use glam::Vec2;
use moon_salvage_core::{MonsterDefinition, MonsterKind, PlayerView};
use moon_salvage_system_navigation::Terrain;
use rand::Rng;

use crate::{body::Body, chaser::ChaserState, giant::GiantState, thumper::ThumperState};

/// Brain-specific state of an agent.
#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    /// Path-following pursuit.
    Chaser(ChaserState),
    /// Wander, charge, and search.
    Thumper(ThumperState),
    /// Roam, pursue, and search.
    Giant(GiantState),
}

impl Behavior {
    /// Default brain for a monster kind.
    #[must_use]
    pub fn for_kind(kind: MonsterKind) -> Self {
        match kind {
            MonsterKind::Hygrodere => Self::Chaser(ChaserState::default()),
            MonsterKind::Thumper => Self::Thumper(ThumperState::default()),
            MonsterKind::Giant => Self::Giant(GiantState::default()),
        }
    }
}

/// Wall-colliding monster: shared combat state plus its brain.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    kind: MonsterKind,
    body: Body,
    health: f32,
    damage: f32,
    damage_cooldown: u32,
    damage_timer: u32,
    power: u32,
    behavior: Behavior,
}

impl Agent {
    /// Creates a monster of `kind` at `position` from its definition.
    #[must_use]
    pub fn spawn(kind: MonsterKind, definition: &MonsterDefinition, position: Vec2) -> Self {
        Self::with_behavior(kind, definition, position, Behavior::for_kind(kind))
    }

    /// Creates a monster with an explicit brain state.
    #[must_use]
    pub fn with_behavior(
        kind: MonsterKind,
        definition: &MonsterDefinition,
        position: Vec2,
        behavior: Behavior,
    ) -> Self {
        Self {
            kind,
            body: Body::new(
                position,
                definition.half_extents(),
                definition.movement_speed,
            ),
            health: definition.health.max(0.0),
            damage: definition.damage,
            damage_cooldown: definition.damage_cooldown,
            damage_timer: 0,
            power: definition.power,
            behavior,
        }
    }

    /// Monster kind.
    #[must_use]
    pub const fn kind(&self) -> MonsterKind {
        self.kind
    }

    /// Kinematic state.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Mutable kinematic state, for callers that relocate agents.
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Centre of the agent.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.body.position()
    }

    /// Remaining health, never negative.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Contact damage per hit.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Ticks until the next contact hit is allowed.
    #[must_use]
    pub const fn damage_timer(&self) -> u32 {
        self.damage_timer
    }

    /// Power the agent consumed when it spawned.
    #[must_use]
    pub const fn power(&self) -> u32 {
        self.power
    }

    /// Brain state.
    #[must_use]
    pub const fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Whether health has reached zero.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Applies `amount` of damage, clamping health at zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount.max(0.0)).max(0.0);
    }

    /// Advances the agent one tick against the player and returns the contact
    /// damage dealt, if any. Dead agents do nothing.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        player: &PlayerView,
        terrain: &Terrain,
        rng: &mut R,
    ) -> Option<f32> {
        if self.is_dead() {
            return None;
        }

        self.body.resolve_wall_penetration(terrain.walls());

        let body = &mut self.body;
        match &mut self.behavior {
            Behavior::Chaser(state) => state.update(body, player, terrain),
            Behavior::Thumper(state) => state.update(body, player, terrain, rng),
            Behavior::Giant(state) => state.update(body, player, terrain, rng),
        }

        let hit = if self.damage_timer == 0 && self.body.hit_box().intersects(&player.hit_box()) {
            self.damage_timer = self.damage_cooldown;
            Some(self.damage)
        } else {
            None
        };
        self.damage_timer = self.damage_timer.saturating_sub(1);
        hit
    }
}
