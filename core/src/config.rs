//! Static configuration tables consumed by level setup.
//!
//! The tables are plain JSON documents. Every lookup that can miss returns a
//! [`ConfigError`] so a broken table stops level setup instead of being
//! papered over with a substitute entry.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{Aabb, ConnectionCode, Handedness, MonsterKind, Realm, ValueTier, ROOMS_PER_MOON_SIZE};

/// Failures raised while loading or querying configuration tables.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A table could not be decoded.
    #[error("failed to parse {table} table")]
    Parse {
        /// Name of the table being decoded.
        table: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// No moon carries the requested identifier.
    #[error("unknown moon `{0}`")]
    UnknownMoon(String),
    /// The monster table has no entry for a kind the level asks for.
    #[error("no {kind} definition for the {realm} realm")]
    MissingMonster {
        /// Realm that was queried.
        realm: Realm,
        /// Kind that was requested.
        kind: MonsterKind,
    },
    /// The room table has no layout for a generated connection code.
    #[error("no room layout for connection code {0}")]
    MissingRoom(ConnectionCode),
    /// The item table has no items for a handedness and tier pair.
    #[error("no {handedness} items in value tier {tier}")]
    MissingItemTier {
        /// Requested handedness.
        handedness: Handedness,
        /// Requested tier.
        tier: ValueTier,
    },
    /// No tool answers to the provided terminal phrase.
    #[error("no tool answers to `{0}`")]
    UnknownTool(String),
    /// A `[low, high]` range is inverted.
    #[error("{field} range is inverted ({low} > {high})")]
    InvalidRange {
        /// Name of the offending field.
        field: &'static str,
        /// Lower bound as configured.
        low: u32,
        /// Upper bound as configured.
        high: u32,
    },
    /// A weight table is empty, negative, or sums to zero.
    #[error("{0} weights must be non-negative and sum to a positive value")]
    InvalidWeights(&'static str),
    /// Difficulty must be strictly positive because cooldowns divide by it.
    #[error("difficulty must be positive, got {0}")]
    InvalidDifficulty(f32),
}

fn parse<T: for<'de> Deserialize<'de>>(table: &'static str, json: &str) -> Result<T, ConfigError> {
    serde_json::from_str(json).map_err(|source| ConfigError::Parse { table, source })
}

fn validate_weights<'a>(
    field: &'static str,
    weights: impl IntoIterator<Item = &'a f32>,
) -> Result<(), ConfigError> {
    let mut total = 0.0;
    for weight in weights {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(ConfigError::InvalidWeights(field));
        }
        total += weight;
    }
    if total > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeights(field))
    }
}

fn default_hit_box() -> [f32; 2] {
    [48.0, 48.0]
}

/// Stats and presentation references for a single monster kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterDefinition {
    /// Power budget consumed when the monster spawns.
    pub power: u32,
    /// Base movement speed in world units per tick.
    pub movement_speed: f32,
    /// Starting health.
    pub health: f32,
    /// Contact damage dealt to the player.
    pub damage: f32,
    /// Ticks between two contact hits.
    pub damage_cooldown: u32,
    /// Sprite reference, passed through for renderers.
    #[serde(default)]
    pub sprite: String,
    /// Texture folder reference, passed through for renderers.
    #[serde(default)]
    pub texture_folder: String,
    /// Width and height of the unrotated collision box.
    #[serde(default = "default_hit_box")]
    pub hit_box: [f32; 2],
}

impl MonsterDefinition {
    /// Half extents of the unrotated collision box.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::from(self.hit_box) * 0.5
    }
}

/// Monster definitions keyed by realm and kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonsterTable {
    /// Monsters that spawn inside the facility.
    #[serde(default)]
    pub indoors: BTreeMap<MonsterKind, MonsterDefinition>,
    /// Monsters that spawn on the surface.
    #[serde(default)]
    pub outdoors: BTreeMap<MonsterKind, MonsterDefinition>,
}

impl MonsterTable {
    /// Decodes the table from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        parse("monster", json)
    }

    /// Looks up the definition of `kind` within `realm`.
    pub fn definition(
        &self,
        realm: Realm,
        kind: MonsterKind,
    ) -> Result<&MonsterDefinition, ConfigError> {
        let realm_table = match realm {
            Realm::Indoors => &self.indoors,
            Realm::Outdoors => &self.outdoors,
        };
        realm_table
            .get(&kind)
            .ok_or(ConfigError::MissingMonster { realm, kind })
    }
}

/// Loot draw weights for the six loot categories.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LootWeights {
    /// Weights of the low, mid, and high one-handed tiers.
    pub one_handed: [f32; 3],
    /// Weights of the low, mid, and high two-handed tiers.
    pub two_handed: [f32; 3],
}

impl LootWeights {
    /// Weights in [`crate::LootCategory::ALL`] order.
    #[must_use]
    pub fn category_weights(&self) -> [f32; 6] {
        let [a, b, c] = self.one_handed;
        let [d, e, f] = self.two_handed;
        [a, b, c, d, e, f]
    }
}

/// Number of each hazard type placed per level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardCaps {
    /// Mines to scatter across the maze.
    pub mines: u32,
    /// Turrets to scatter across the maze.
    pub turrets: u32,
}

/// Rectangle described by its centre and size, relative to its owner.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WallDefinition {
    /// Horizontal offset of the centre.
    pub center_x: f32,
    /// Vertical offset of the centre.
    pub center_y: f32,
    /// Full width.
    pub width: f32,
    /// Full height.
    pub height: f32,
    /// Texture reference, passed through for renderers.
    #[serde(default)]
    pub texture: String,
}

impl WallDefinition {
    /// Collision rectangle of the wall once its owner sits at `origin`.
    #[must_use]
    pub fn to_aabb(&self, origin: Vec2) -> Aabb {
        Aabb::from_center_size(
            origin + Vec2::new(self.center_x, self.center_y),
            Vec2::new(self.width, self.height),
        )
    }
}

/// Rectangle inside a room where entities may be dropped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnArea {
    /// Horizontal offset of the centre from the room centre.
    #[serde(alias = "x")]
    pub center_x: f32,
    /// Vertical offset of the centre from the room centre.
    #[serde(alias = "y")]
    pub center_y: f32,
    /// Full width.
    pub width: f32,
    /// Full height.
    pub height: f32,
}

impl SpawnArea {
    /// Offset of the area's centre from the room centre.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x, self.center_y)
    }

    /// Half of the area's width and height, truncated to whole units.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new((self.width / 2.0).floor(), (self.height / 2.0).floor())
    }
}

/// Geometry template for every room sharing a connection code.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomLayout {
    /// Walls placed relative to the room centre.
    #[serde(default)]
    pub walls: Vec<WallDefinition>,
    /// Areas loot may be dropped into.
    #[serde(default)]
    pub item_spawn_areas: Vec<SpawnArea>,
    /// Areas mines, turrets, and spawners may be placed into.
    #[serde(default)]
    pub hazard_spawn_locations: Vec<SpawnArea>,
    /// Background reference, passed through for renderers.
    #[serde(default)]
    pub background: String,
}

/// Room layouts keyed by the `NESW` connection code string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomCatalog {
    /// Layouts keyed by codes such as `"1010"`.
    pub rooms: BTreeMap<String, RoomLayout>,
}

impl RoomCatalog {
    /// Decodes the catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        parse("room", json)
    }

    /// Looks up the layout used for `code`.
    pub fn layout(&self, code: ConnectionCode) -> Result<&RoomLayout, ConfigError> {
        self.rooms
            .get(&code.to_string())
            .ok_or(ConfigError::MissingRoom(code))
    }
}

/// Named location on the surface where outdoor spawners may sit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnRegion {
    /// Region label from the tile map.
    #[serde(default)]
    pub name: String,
    /// Horizontal world position.
    pub x: f32,
    /// Vertical world position.
    pub y: f32,
}

impl SpawnRegion {
    /// World position of the region.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Collision layer and spawn regions of a moon's surface.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutdoorLayout {
    /// Width of the surface in world units.
    pub width: f32,
    /// Height of the surface in world units.
    pub height: f32,
    /// Walls placed relative to the surface origin.
    #[serde(default)]
    pub walls: Vec<WallDefinition>,
    /// Candidate outdoor spawner locations.
    #[serde(default)]
    pub spawn_regions: Vec<SpawnRegion>,
}

/// Per-level parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoonDefinition {
    /// Identifier used to select the moon.
    pub id: String,
    /// Scale factor of the indoor maze.
    pub size: f32,
    /// Divides every spawner cooldown.
    pub difficulty: f32,
    /// Inclusive `[min, max]` number of loot pieces.
    pub loot_quantity: [u32; 2],
    /// Weights used to pick the category of each loot piece.
    pub loot_weight: LootWeights,
    /// Hazards placed per level.
    #[serde(default)]
    pub hazards: HazardCaps,
    /// Indoor spawn weights per monster kind.
    pub monster_weight: BTreeMap<MonsterKind, f32>,
    /// Outdoor spawn weights per monster kind.
    #[serde(default)]
    pub outdoor_weights: BTreeMap<MonsterKind, f32>,
    /// Number of outdoor spawners.
    #[serde(default)]
    pub outdoor_spawners: u32,
    /// Indoor power budget.
    pub indoor_power: u32,
    /// Outdoor power budget.
    #[serde(default)]
    pub outdoor_power: u32,
    /// Surface collision layer and spawn regions.
    #[serde(default)]
    pub outdoor: OutdoorLayout,
    /// Where the player lands on the surface.
    #[serde(default)]
    pub outdoor_starting_position: [f32; 2],
    /// Main entrance collision box, relative to the indoor player start.
    #[serde(default)]
    pub indoor_main_entrance: WallDefinition,
}

impl MoonDefinition {
    /// Number of rooms along each side of the indoor maze.
    #[must_use]
    pub fn map_size(&self) -> usize {
        (self.size * ROOMS_PER_MOON_SIZE).round().max(0.0) as usize
    }

    /// Checks the ranges and weights the generator divides or samples by.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulty.is_nan() || self.difficulty <= 0.0 {
            return Err(ConfigError::InvalidDifficulty(self.difficulty));
        }
        let [low, high] = self.loot_quantity;
        if low > high {
            return Err(ConfigError::InvalidRange {
                field: "loot_quantity",
                low,
                high,
            });
        }
        validate_weights("loot", self.loot_weight.category_weights().iter())?;
        validate_weights("monster", self.monster_weight.values())?;
        if self.outdoor_spawners > 0 {
            validate_weights("outdoor monster", self.outdoor_weights.values())?;
        }
        Ok(())
    }
}

/// Every moon a level can be generated for.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoonCatalog {
    moons: Vec<MoonDefinition>,
}

impl MoonCatalog {
    /// Decodes and validates the catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let catalog: Self = parse("moon", json)?;
        for moon in &catalog.moons {
            moon.validate()?;
        }
        Ok(catalog)
    }

    /// Looks up the moon with the provided identifier.
    pub fn moon(&self, id: &str) -> Result<&MoonDefinition, ConfigError> {
        self.moons
            .iter()
            .find(|moon| moon.id == id)
            .ok_or_else(|| ConfigError::UnknownMoon(id.to_owned()))
    }

    /// Iterates over every moon in the catalog.
    pub fn iter(&self) -> impl Iterator<Item = &MoonDefinition> {
        self.moons.iter()
    }
}

/// Scrap item template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Carry weight.
    pub weight: f32,
    /// Inclusive `[low, high]` sale value.
    pub value_range: [u32; 2],
    /// World sprite reference.
    #[serde(default)]
    pub sprite_filename: String,
    /// Inventory sprite reference.
    #[serde(default)]
    pub sprite_inventory_filename: String,
}

/// Purchasable tool template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Phrase typed at the terminal to buy the tool.
    pub terminal_phrase: String,
    /// Label shown in the terminal catalogue.
    #[serde(default)]
    pub terminal_print: String,
    /// Purchase price.
    pub cost: u32,
    /// Carry weight.
    pub weight: f32,
    /// World sprite reference.
    #[serde(default)]
    pub sprite_filename: String,
    /// Inventory sprite reference.
    #[serde(default)]
    pub sprite_inventory_filename: String,
}

/// Scrap items keyed by handedness and tier, plus the tool catalogue.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemCatalog {
    /// One-handed items keyed by tier (`"0"`, `"1"`, `"2"`).
    #[serde(default)]
    pub one_handed: BTreeMap<String, Vec<ItemDefinition>>,
    /// Two-handed items keyed by tier (`"0"`, `"1"`, `"2"`).
    #[serde(default)]
    pub two_handed: BTreeMap<String, Vec<ItemDefinition>>,
    /// Tools sold at the terminal.
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
}

impl ItemCatalog {
    /// Decodes and validates the catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let catalog: Self = parse("item", json)?;
        for item in catalog.one_handed.values().chain(catalog.two_handed.values()).flatten() {
            let [low, high] = item.value_range;
            if low > high {
                return Err(ConfigError::InvalidRange {
                    field: "value_range",
                    low,
                    high,
                });
            }
        }
        Ok(catalog)
    }

    /// Items available for a handedness and tier pair.
    pub fn items(
        &self,
        handedness: Handedness,
        tier: ValueTier,
    ) -> Result<&[ItemDefinition], ConfigError> {
        let table = match handedness {
            Handedness::OneHanded => &self.one_handed,
            Handedness::TwoHanded => &self.two_handed,
        };
        table
            .get(tier.table_key())
            .map(Vec::as_slice)
            .filter(|items| !items.is_empty())
            .ok_or(ConfigError::MissingItemTier { handedness, tier })
    }

    /// Tool answering to `phrase`.
    pub fn tool(&self, phrase: &str) -> Result<&ToolDefinition, ConfigError> {
        self.tools
            .iter()
            .find(|tool| tool.terminal_phrase == phrase)
            .ok_or_else(|| ConfigError::UnknownTool(phrase.to_owned()))
    }
}
