#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted placement passes that decide what each maze cell will contain.
//!
//! The passes only count: they write loot, hazard, and spawner allocations
//! into a [`LevelGrid`] and leave the concrete positions to the room
//! populator. Cells with no open side are never chosen.

use std::collections::BTreeMap;

use moon_salvage_core::{
    CellCoord, ConfigError, ConnectionCode, HazardCaps, LootCategory, LootWeights, MonsterKind,
    MonsterTable, MoonDefinition, Realm, SpawnRegion,
};
use moon_salvage_system_maze::MazeLayout;
use moon_salvage_system_spawning::{SpawnEntry, Spawner};
use rand::{
    distributions::{Distribution, WeightedIndex},
    seq::SliceRandom,
    Rng,
};
use tracing::{info, warn};

/// Tuning of generated spawn queues.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnTuning {
    base_cooldown: f32,
    queue_length: usize,
}

impl SpawnTuning {
    /// Cooldown constant the rank-based formula is scaled by.
    pub const DEFAULT_BASE_COOLDOWN: f32 = 1000.0;

    /// Entries drawn into every spawn queue.
    pub const DEFAULT_QUEUE_LENGTH: usize = 4;

    /// Creates a tuning with explicit values.
    #[must_use]
    pub const fn new(base_cooldown: f32, queue_length: usize) -> Self {
        Self {
            base_cooldown,
            queue_length,
        }
    }

    /// Cooldown constant the rank-based formula is scaled by.
    #[must_use]
    pub const fn base_cooldown(&self) -> f32 {
        self.base_cooldown
    }

    /// Entries drawn into every spawn queue.
    #[must_use]
    pub const fn queue_length(&self) -> usize {
        self.queue_length
    }
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_COOLDOWN, Self::DEFAULT_QUEUE_LENGTH)
    }
}

/// Allocation recorded for a single maze cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridCell {
    code: ConnectionCode,
    loot: [u32; 6],
    mines: u32,
    turrets: u32,
    spawner: Option<Vec<SpawnEntry>>,
}

impl GridCell {
    /// Creates an empty allocation for a cell with the given code.
    #[must_use]
    pub fn new(code: ConnectionCode) -> Self {
        Self {
            code,
            ..Self::default()
        }
    }

    /// Connection code of the cell.
    #[must_use]
    pub const fn code(&self) -> ConnectionCode {
        self.code
    }

    /// Reports whether the cell opens toward at least one side.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.code.is_closed()
    }

    /// Pieces of loot allocated for `category`.
    #[must_use]
    pub const fn loot(&self, category: LootCategory) -> u32 {
        self.loot[category.index()]
    }

    /// Total pieces of loot allocated to the cell.
    #[must_use]
    pub fn loot_total(&self) -> u32 {
        self.loot.iter().sum()
    }

    /// Mines allocated to the cell.
    #[must_use]
    pub const fn mines(&self) -> u32 {
        self.mines
    }

    /// Turrets allocated to the cell.
    #[must_use]
    pub const fn turrets(&self) -> u32 {
        self.turrets
    }

    /// Spawn queue of the cell's spawner, if it owns one.
    #[must_use]
    pub fn spawner(&self) -> Option<&[SpawnEntry]> {
        self.spawner.as_deref()
    }
}

/// Maze layout together with the allocations of every cell.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelGrid {
    size: u32,
    start: CellCoord,
    cells: Vec<GridCell>,
}

impl LevelGrid {
    /// Wraps a generated maze with empty allocations.
    #[must_use]
    pub fn from_maze(maze: &MazeLayout) -> Self {
        Self {
            size: maze.size(),
            start: maze.start(),
            cells: maze.cells().map(|(_, code)| GridCell::new(code)).collect(),
        }
    }

    /// Number of cells along each side.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Cell holding the main entrance.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Allocation of `cell`, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<&GridCell> {
        if cell.column() >= self.size || cell.row() >= self.size {
            return None;
        }
        let offset = usize::try_from(cell.column() * self.size + cell.row()).ok()?;
        self.cells.get(offset)
    }

    /// Iterates over every cell in column-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, &GridCell)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(offset, cell)| {
            let offset = offset as u32;
            (CellCoord::new(offset / size, offset % size), cell)
        })
    }

    /// Rejection-samples a cell satisfying `accept`, or `None` when no cell
    /// ever could.
    fn pick_cell<R, F>(&self, rng: &mut R, accept: F) -> Option<usize>
    where
        R: Rng + ?Sized,
        F: Fn(&GridCell) -> bool,
    {
        if !self.cells.iter().any(&accept) {
            return None;
        }
        loop {
            let offset = rng.gen_range(0..self.cells.len());
            if accept(&self.cells[offset]) {
                return Some(offset);
            }
        }
    }
}

/// Cooldown of the entry at 1-based `rank` within a spawn queue.
///
/// Earlier ranks wait longer; `difficulty` shortens every wait and a uniform
/// jitter scales the result by `[1, 2)`.
pub fn spawn_cooldown<R: Rng + ?Sized>(
    base_cooldown: f32,
    rank: usize,
    difficulty: f32,
    rng: &mut R,
) -> u32 {
    let rank = rank.max(1) as f32;
    let jitter: f32 = rng.gen::<f32>() + 1.0;
    let cooldown =
        2.0 * ((1.0 / (rank * base_cooldown)) * base_cooldown.powi(2)) / difficulty * jitter;
    cooldown.round().max(0.0) as u32
}

/// Draws a spawn queue from `weights`, resolving each kind's power through
/// the monster table.
pub fn sample_spawn_queue<R: Rng + ?Sized>(
    weights: &BTreeMap<MonsterKind, f32>,
    monsters: &MonsterTable,
    realm: Realm,
    difficulty: f32,
    tuning: SpawnTuning,
    rng: &mut R,
) -> Result<Vec<SpawnEntry>, ConfigError> {
    let kinds: Vec<MonsterKind> = weights.keys().copied().collect();
    for (kind, weight) in weights {
        if *weight > 0.0 {
            let _ = monsters.definition(realm, *kind)?;
        }
    }
    let distribution = WeightedIndex::new(weights.values().copied())
        .map_err(|_| ConfigError::InvalidWeights("monster"))?;

    let drawn: Vec<MonsterKind> = (0..tuning.queue_length)
        .map(|_| kinds[distribution.sample(rng)])
        .collect();

    drawn
        .into_iter()
        .enumerate()
        .map(|(offset, kind)| {
            let power = monsters.definition(realm, kind)?.power;
            let cooldown = spawn_cooldown(tuning.base_cooldown, offset + 1, difficulty, rng);
            Ok(SpawnEntry::new(kind, power, cooldown))
        })
        .collect()
}

/// Scatters a loot count drawn from `quantity` across open cells.
///
/// Returns the number of pieces allocated.
pub fn distribute_loot<R: Rng + ?Sized>(
    grid: &mut LevelGrid,
    quantity: [u32; 2],
    weights: &LootWeights,
    rng: &mut R,
) -> Result<u32, ConfigError> {
    let [low, high] = quantity;
    if low > high {
        return Err(ConfigError::InvalidRange {
            field: "loot_quantity",
            low,
            high,
        });
    }
    let categories = WeightedIndex::new(weights.category_weights())
        .map_err(|_| ConfigError::InvalidWeights("loot"))?;

    let target = rng.gen_range(low..=high);
    for placed in 0..target {
        let Some(offset) = grid.pick_cell(rng, GridCell::is_open) else {
            warn!(placed, target, "no open cell for loot");
            return Ok(placed);
        };
        let category = categories.sample(rng);
        grid.cells[offset].loot[category] += 1;
    }
    Ok(target)
}

/// Scatters the configured number of mines and turrets across open cells.
///
/// Returns the number of mines and turrets allocated.
pub fn distribute_hazards<R: Rng + ?Sized>(
    grid: &mut LevelGrid,
    caps: HazardCaps,
    rng: &mut R,
) -> (u32, u32) {
    let mut mines = 0;
    for _ in 0..caps.mines {
        let Some(offset) = grid.pick_cell(rng, GridCell::is_open) else {
            warn!(placed = mines, "no open cell for mines");
            break;
        };
        grid.cells[offset].mines += 1;
        mines += 1;
    }

    let mut turrets = 0;
    for _ in 0..caps.turrets {
        let Some(offset) = grid.pick_cell(rng, GridCell::is_open) else {
            warn!(placed = turrets, "no open cell for turrets");
            break;
        };
        grid.cells[offset].turrets += 1;
        turrets += 1;
    }

    (mines, turrets)
}

/// Allocates one spawner per grid row, each to a distinct open cell.
///
/// Returns the number of spawners allocated.
pub fn distribute_spawners<R: Rng + ?Sized>(
    grid: &mut LevelGrid,
    moon: &MoonDefinition,
    monsters: &MonsterTable,
    tuning: SpawnTuning,
    rng: &mut R,
) -> Result<usize, ConfigError> {
    let target = grid.size as usize;
    for placed in 0..target {
        let Some(offset) = grid.pick_cell(rng, |cell| cell.is_open() && cell.spawner.is_none())
        else {
            warn!(placed, target, "no free cell for spawner");
            return Ok(placed);
        };
        let queue = sample_spawn_queue(
            &moon.monster_weight,
            monsters,
            Realm::Indoors,
            moon.difficulty,
            tuning,
            rng,
        )?;
        grid.cells[offset].spawner = Some(queue);
    }
    Ok(target)
}

/// Builds the configured number of outdoor spawners at randomly chosen spawn
/// regions.
pub fn outdoor_spawners<R: Rng + ?Sized>(
    regions: &[SpawnRegion],
    moon: &MoonDefinition,
    monsters: &MonsterTable,
    tuning: SpawnTuning,
    rng: &mut R,
) -> Result<Vec<Spawner>, ConfigError> {
    if moon.outdoor_spawners == 0 {
        return Ok(Vec::new());
    }
    if regions.is_empty() {
        warn!(moon = %moon.id, "no outdoor spawn regions");
        return Ok(Vec::new());
    }

    let mut spawners = Vec::with_capacity(moon.outdoor_spawners as usize);
    for _ in 0..moon.outdoor_spawners {
        let Some(region) = regions.choose(rng) else {
            break;
        };
        let queue = sample_spawn_queue(
            &moon.outdoor_weights,
            monsters,
            Realm::Outdoors,
            moon.difficulty,
            tuning,
            rng,
        )?;
        spawners.push(Spawner::new(queue, region.position()));
    }
    Ok(spawners)
}

/// Runs every indoor placement pass over `grid` in a fixed draw order.
pub fn distribute_all<R: Rng + ?Sized>(
    grid: &mut LevelGrid,
    moon: &MoonDefinition,
    monsters: &MonsterTable,
    tuning: SpawnTuning,
    rng: &mut R,
) -> Result<(), ConfigError> {
    let loot = distribute_loot(grid, moon.loot_quantity, &moon.loot_weight, rng)?;
    let (mines, turrets) = distribute_hazards(grid, moon.hazards, rng);
    let spawners = distribute_spawners(grid, moon, monsters, tuning, rng)?;
    info!(loot, mines, turrets, spawners, size = grid.size, "level allocations distributed");
    Ok(())
}
