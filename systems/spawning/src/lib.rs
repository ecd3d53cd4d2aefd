#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Timed spawn queues gated by a per-realm power budget.
//!
//! Each [`Spawner`] owns an ordered queue of pending monsters. Every tick its
//! cooldown counts down; once it drops below one tick the head of the queue is
//! released, provided the realm still has power to spare. The owner of the
//! realm records the released monster's power with [`PowerBudget::record`].

use glam::Vec2;
use moon_salvage_core::{Event, MonsterKind, Realm};
use tracing::debug;

/// Ticks removed from a spawner cooldown per update.
pub const TICK_DELTA: u32 = 1;

/// Pending monster in a spawn queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnEntry {
    kind: MonsterKind,
    power: u32,
    cooldown: u32,
}

impl SpawnEntry {
    /// Creates a queue entry released `cooldown` ticks after the previous one.
    #[must_use]
    pub const fn new(kind: MonsterKind, power: u32, cooldown: u32) -> Self {
        Self {
            kind,
            power,
            cooldown,
        }
    }

    /// Kind of monster to release.
    #[must_use]
    pub const fn kind(&self) -> MonsterKind {
        self.kind
    }

    /// Power the monster consumes once released.
    #[must_use]
    pub const fn power(&self) -> u32 {
        self.power
    }

    /// Ticks to wait before the entry is released.
    #[must_use]
    pub const fn cooldown(&self) -> u32 {
        self.cooldown
    }
}

/// Monster released by a spawner this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    kind: MonsterKind,
    power: u32,
    position: Vec2,
}

impl SpawnRequest {
    /// Creates a release for `kind` at `position`.
    #[must_use]
    pub const fn new(kind: MonsterKind, power: u32, position: Vec2) -> Self {
        Self {
            kind,
            power,
            position,
        }
    }

    /// Kind of monster to instantiate.
    #[must_use]
    pub const fn kind(&self) -> MonsterKind {
        self.kind
    }

    /// Power cost of the monster.
    #[must_use]
    pub const fn power(&self) -> u32 {
        self.power
    }

    /// World position to instantiate the monster at.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }
}

/// Timed queue of monsters anchored at a world position.
#[derive(Clone, Debug, PartialEq)]
pub struct Spawner {
    queue: Vec<SpawnEntry>,
    cursor: usize,
    cooldown_current: u32,
    position: Vec2,
}

impl Spawner {
    /// Creates a spawner whose first release waits for the head entry's
    /// cooldown.
    #[must_use]
    pub fn new(queue: Vec<SpawnEntry>, position: Vec2) -> Self {
        let cooldown_current = queue.first().map_or(0, SpawnEntry::cooldown);
        Self {
            queue,
            cursor: 0,
            cooldown_current,
            position,
        }
    }

    /// World position monsters are released at.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the spawner, typically once its owning room is materialised.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Ticks left before the next release attempt.
    #[must_use]
    pub const fn cooldown_current(&self) -> u32 {
        self.cooldown_current
    }

    /// Number of entries already released.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Full queue, including released entries.
    #[must_use]
    pub fn queue(&self) -> &[SpawnEntry] {
        &self.queue
    }

    /// Entries still waiting to be released.
    #[must_use]
    pub fn pending(&self) -> &[SpawnEntry] {
        self.queue.get(self.cursor..).unwrap_or(&[])
    }

    /// Reports whether every entry has been released.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.queue.len()
    }

    /// Advances the spawner by one tick.
    ///
    /// Returns the released monster when the cooldown has elapsed, an entry
    /// is pending, and `available_power` is positive. The cooldown keeps
    /// counting down while the queue or the budget is exhausted.
    pub fn tick(&mut self, available_power: u32) -> Option<SpawnRequest> {
        self.cooldown_current = self.cooldown_current.saturating_sub(TICK_DELTA);

        if self.cooldown_current >= 1 || available_power == 0 {
            return None;
        }

        let entry = *self.queue.get(self.cursor)?;
        self.cursor += 1;
        self.cooldown_current = self.queue.get(self.cursor).map_or(0, SpawnEntry::cooldown);

        Some(SpawnRequest {
            kind: entry.kind,
            power: entry.power,
            position: self.position,
        })
    }
}

/// Maximum and consumed power for one realm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerBudget {
    max: u32,
    current: u32,
}

impl PowerBudget {
    /// Creates an unused budget capped at `max`.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self { max, current: 0 }
    }

    /// Power cap of the realm.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Power consumed so far.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Power still available for spawns.
    #[must_use]
    pub const fn available(&self) -> u32 {
        self.max.saturating_sub(self.current)
    }

    /// Records a released monster's power.
    ///
    /// Power is never returned when a monster dies, so the budget caps the
    /// total spawned over a level. Consumption saturates at the cap.
    pub fn record(&mut self, power: u32) {
        self.current = self.current.saturating_add(power).min(self.max);
    }
}

/// Ticks every spawner of a realm in order, charging each release to
/// `budget` before the next spawner is consulted.
pub fn tick_spawners<'a, I>(
    spawners: I,
    realm: Realm,
    budget: &mut PowerBudget,
    events: &mut Vec<Event>,
) -> Vec<SpawnRequest>
where
    I: IntoIterator<Item = &'a mut Spawner>,
{
    let mut released = Vec::new();
    for spawner in spawners {
        let Some(request) = spawner.tick(budget.available()) else {
            continue;
        };
        budget.record(request.power);
        debug!(
            kind = %request.kind,
            %realm,
            x = request.position.x,
            y = request.position.y,
            power_in_use = budget.current(),
            "monster released"
        );
        events.push(Event::MonsterSpawned {
            kind: request.kind,
            realm,
            position: request.position,
            power_in_use: budget.current(),
        });
        released.push(request);
    }
    released
}
