#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Moon Salvage simulation.
//!
//! This crate defines the vocabulary every other crate speaks: grid cell
//! coordinates and maze connection codes, world-space geometry backed by
//! [`glam::Vec2`], the monster and loot identifiers used to key the external
//! configuration tables, and the [`Event`] values the level emits while it is
//! ticked. Systems never share mutable state; they receive immutable views such
//! as [`PlayerView`] and [`WallSet`] and report what happened through event
//! buffers.

mod config;
mod connection;
mod geometry;

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub use config::{
    ConfigError, HazardCaps, ItemCatalog, ItemDefinition, LootWeights, MonsterDefinition,
    MonsterTable, MoonCatalog, MoonDefinition, OutdoorLayout, RoomCatalog, RoomLayout,
    SpawnArea, SpawnRegion, ToolDefinition, WallDefinition,
};
pub use connection::{ConnectionCode, Direction, ParseConnectionCodeError};
pub use geometry::{Aabb, Hull, Segment, WallSet};

/// Edge length of a single maze room in world units.
pub const ROOM_SIZE: f32 = 256.0;

/// Offset from a room's lower-left corner to its centre.
pub const HALF_ROOM_SIZE: f32 = ROOM_SIZE / 2.0;

/// Number of maze rooms per unit of moon size along each axis.
pub const ROOMS_PER_MOON_SIZE: f32 = 5.0;

/// Random source owned by a single level and threaded through every system.
pub type LevelRng = ChaCha8Rng;

/// Advances a 32-bit xorshift state once.
#[must_use]
pub const fn xorshift32(state: u32) -> u32 {
    let mut x = state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    x
}

/// Creates the per-level random source for the provided seed.
///
/// The seed is scrambled through [`xorshift32`] before it reaches the
/// ChaCha stream, so neighbouring seeds produce unrelated levels.
#[must_use]
pub fn level_rng(seed: u32) -> LevelRng {
    LevelRng::seed_from_u64(u64::from(xorshift32(seed)))
}

/// Location of a single maze cell expressed as column and row coordinates.
///
/// Columns grow eastward and rows grow northward, matching world space where
/// the cell's centre lies at `column * ROOM_SIZE + HALF_ROOM_SIZE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// World-space centre of the room occupying this cell.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.column as f32 * ROOM_SIZE + HALF_ROOM_SIZE,
            self.row as f32 * ROOM_SIZE + HALF_ROOM_SIZE,
        )
    }

    /// Cell containing the provided world-space point, if it is not negative.
    #[must_use]
    pub fn containing(point: Vec2) -> Option<Self> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let column = (point.x / ROOM_SIZE).floor();
        let row = (point.y / ROOM_SIZE).floor();
        if column > u32::MAX as f32 || row > u32::MAX as f32 {
            return None;
        }
        Some(Self::new(column as u32, row as u32))
    }

    /// Neighbouring cell one step in `direction`, if it stays within `size`.
    #[must_use]
    pub fn step(&self, direction: Direction, size: u32) -> Option<Self> {
        let (dx, dy) = direction.offset();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        (column < size && row < size).then_some(Self::new(column, row))
    }
}

/// Kinds of spawnable monsters recognised by the monster table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonsterKind {
    /// Slime that slowly paths toward the player.
    Hygrodere,
    /// Fast indoor charger with a wander/aggressive/search cycle.
    Thumper,
    /// Slow outdoor stalker with a roam/agro/agro-search cycle.
    Giant,
}

impl fmt::Display for MonsterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hygrodere => "hygrodere",
            Self::Thumper => "thumper",
            Self::Giant => "giant",
        };
        f.write_str(name)
    }
}

/// Spawning context with an independent power budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Realm {
    /// The generated facility interior.
    Indoors,
    /// The moon surface outside the facility.
    Outdoors,
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Indoors => "indoors",
            Self::Outdoors => "outdoors",
        })
    }
}

/// How many hands a piece of loot occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    /// Carried alongside other items.
    OneHanded,
    /// Occupies both hands while carried.
    TwoHanded,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OneHanded => "one_handed",
            Self::TwoHanded => "two_handed",
        })
    }
}

/// Value bracket a piece of loot is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueTier {
    /// Cheapest bracket, keyed `"0"` in the item table.
    Low,
    /// Middle bracket, keyed `"1"` in the item table.
    Mid,
    /// Most valuable bracket, keyed `"2"` in the item table.
    High,
}

impl ValueTier {
    /// All tiers in ascending value order.
    pub const ALL: [ValueTier; 3] = [ValueTier::Low, ValueTier::Mid, ValueTier::High];

    /// Zero-based index of the tier.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Low => 0,
            Self::Mid => 1,
            Self::High => 2,
        }
    }

    /// Key used by the item table for this tier.
    #[must_use]
    pub const fn table_key(&self) -> &'static str {
        match self {
            Self::Low => "0",
            Self::Mid => "1",
            Self::High => "2",
        }
    }
}

impl fmt::Display for ValueTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_key())
    }
}

/// One of the six loot buckets counted per grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LootCategory {
    handedness: Handedness,
    tier: ValueTier,
}

impl LootCategory {
    /// Every category, one-handed tiers first, in the order loot weights are
    /// listed.
    pub const ALL: [LootCategory; 6] = [
        LootCategory::new(Handedness::OneHanded, ValueTier::Low),
        LootCategory::new(Handedness::OneHanded, ValueTier::Mid),
        LootCategory::new(Handedness::OneHanded, ValueTier::High),
        LootCategory::new(Handedness::TwoHanded, ValueTier::Low),
        LootCategory::new(Handedness::TwoHanded, ValueTier::Mid),
        LootCategory::new(Handedness::TwoHanded, ValueTier::High),
    ];

    /// Creates a category from its two dimensions.
    #[must_use]
    pub const fn new(handedness: Handedness, tier: ValueTier) -> Self {
        Self { handedness, tier }
    }

    /// Handedness dimension of the category.
    #[must_use]
    pub const fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Value tier dimension of the category.
    #[must_use]
    pub const fn tier(&self) -> ValueTier {
        self.tier
    }

    /// Position of the category within [`LootCategory::ALL`].
    #[must_use]
    pub const fn index(&self) -> usize {
        let base = match self.handedness {
            Handedness::OneHanded => 0,
            Handedness::TwoHanded => 3,
        };
        base + self.tier.index()
    }
}

/// Read-only snapshot of the player handed to agents and hazards each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerView {
    position: Vec2,
    half_extents: Vec2,
}

impl PlayerView {
    /// Half extents used when the caller does not supply a player size.
    pub const DEFAULT_HALF_EXTENTS: Vec2 = Vec2::new(16.0, 16.0);

    /// Creates a player snapshot at `position` with the provided half extents.
    #[must_use]
    pub const fn new(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            half_extents,
        }
    }

    /// Creates a default-sized player snapshot at `position`.
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self::new(position, Self::DEFAULT_HALF_EXTENTS)
    }

    /// Centre of the player in world space.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Axis-aligned collision box of the player.
    #[must_use]
    pub fn hit_box(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }
}

/// Origin of damage dealt to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageSource {
    /// Contact damage from a monster of the given kind.
    Monster(MonsterKind),
    /// Blast from an exploding mine.
    Mine,
    /// Turret projectile.
    Bullet,
}

/// Notifications emitted while the level is ticked.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A spawner released a monster into the level.
    MonsterSpawned {
        /// Kind of monster that appeared.
        kind: MonsterKind,
        /// Realm whose power budget paid for the spawn.
        realm: Realm,
        /// World-space spawn position.
        position: Vec2,
        /// Realm power consumed after the spawn was recorded.
        power_in_use: u32,
    },
    /// The player was hurt.
    PlayerDamaged {
        /// Amount of health removed.
        amount: f32,
        /// What dealt the damage.
        source: DamageSource,
    },
    /// The player stepped onto a mine and started its fuse.
    MineArmed {
        /// Position of the mine.
        position: Vec2,
    },
    /// A mine finished its fuse and was removed.
    MineExploded {
        /// Position of the mine.
        position: Vec2,
    },
    /// A turret released a bullet.
    TurretFired {
        /// Position of the turret.
        position: Vec2,
        /// Heading of the bullet in degrees.
        direction: f32,
    },
}
