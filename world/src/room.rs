use glam::Vec2;
use moon_salvage_core::{
    Aabb, CellCoord, ConfigError, ConnectionCode, ItemCatalog, LootCategory, RoomLayout, SpawnArea,
};
use moon_salvage_system_distribution::GridCell;
use moon_salvage_system_economy::Item;
use moon_salvage_system_enemy_ai::Turret;
use moon_salvage_system_hazards::Mine;
use moon_salvage_system_spawning::Spawner;
use rand::{seq::SliceRandom, Rng};
use tracing::warn;

/// Materialised maze cell: walls, loot, hazards, and an optional spawner.
///
/// Walls are fixed at creation. Loot and hazard counts never exceed what the
/// grid cell allocated.
#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    cell: CellCoord,
    code: ConnectionCode,
    walls: Vec<Aabb>,
    loot: Vec<Item>,
    mines: Vec<Mine>,
    turrets: Vec<Turret>,
    spawner: Option<Spawner>,
    background: String,
}

impl Room {
    /// Builds the room for `cell` from its layout and allocation.
    ///
    /// Loot and hazards land at random whole-unit points inside the layout's
    /// spawn areas. Allocations for a layout without spawn areas are dropped;
    /// a spawner without a hazard area sits at the room centre.
    pub fn populate<R: Rng + ?Sized>(
        cell: CellCoord,
        allocation: &GridCell,
        layout: &RoomLayout,
        items: &ItemCatalog,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let center = cell.center();
        let walls = layout
            .walls
            .iter()
            .map(|wall| wall.to_aabb(center))
            .collect();

        let mut loot = Vec::with_capacity(allocation.loot_total() as usize);
        for category in LootCategory::ALL {
            for _ in 0..allocation.loot(category) {
                let Some(position) = sample_point(center, &layout.item_spawn_areas, rng) else {
                    warn!(?cell, ?category, "room has no item spawn areas");
                    break;
                };
                loot.push(Item::generate(
                    items,
                    category.handedness(),
                    category.tier(),
                    position,
                    rng,
                )?);
            }
        }

        let hazard_areas = &layout.hazard_spawn_locations;
        if hazard_areas.is_empty() && allocation.mines() + allocation.turrets() > 0 {
            warn!(?cell, "room has no hazard spawn locations");
        }

        let mines = (0..allocation.mines())
            .filter_map(|_| sample_point(center, hazard_areas, rng))
            .map(Mine::new)
            .collect();

        let mut turrets = Vec::with_capacity(allocation.turrets() as usize);
        for _ in 0..allocation.turrets() {
            let Some(position) = sample_point(center, hazard_areas, rng) else {
                break;
            };
            let view = Vec2::new(
                rng.gen_range(-1..=1) as f32,
                rng.gen_range(-1..=1) as f32,
            );
            turrets.push(Turret::new(position, view, rng));
        }

        let spawner = allocation.spawner().map(|queue| {
            let position = sample_point(center, hazard_areas, rng).unwrap_or(center);
            Spawner::new(queue.to_vec(), position)
        });

        Ok(Self {
            cell,
            code: allocation.code(),
            walls,
            loot,
            mines,
            turrets,
            spawner,
            background: layout.background.clone(),
        })
    }

    /// Maze cell the room occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Open sides of the room.
    #[must_use]
    pub const fn code(&self) -> ConnectionCode {
        self.code
    }

    /// World-space centre of the room.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.cell.center()
    }

    /// Walls in world space.
    #[must_use]
    pub fn walls(&self) -> &[Aabb] {
        &self.walls
    }

    /// Scrap lying in the room.
    #[must_use]
    pub fn loot(&self) -> &[Item] {
        &self.loot
    }

    /// Mines that have not exploded yet.
    #[must_use]
    pub fn mines(&self) -> &[Mine] {
        &self.mines
    }

    /// Turrets mounted in the room.
    #[must_use]
    pub fn turrets(&self) -> &[Turret] {
        &self.turrets
    }

    /// Spawner owned by the room, if any.
    #[must_use]
    pub const fn spawner(&self) -> Option<&Spawner> {
        self.spawner.as_ref()
    }

    /// Background reference, passed through for renderers.
    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    pub(crate) fn spawner_mut(&mut self) -> Option<&mut Spawner> {
        self.spawner.as_mut()
    }

    pub(crate) fn hazards_mut(&mut self) -> (&mut Vec<Mine>, &mut Vec<Turret>) {
        (&mut self.mines, &mut self.turrets)
    }
}

/// Picks one of `areas` and a whole-unit point inside it, offset by `origin`.
fn sample_point<R: Rng + ?Sized>(origin: Vec2, areas: &[SpawnArea], rng: &mut R) -> Option<Vec2> {
    let area = areas.choose(rng)?;
    let center = origin + area.center();
    let half = area.half_extents().abs();
    let x = rng.gen_range((center.x - half.x).round() as i32..=(center.x + half.x).round() as i32);
    let y = rng.gen_range((center.y - half.y).round() as i32..=(center.y + half.y).round() as i32);
    Some(Vec2::new(x as f32, y as f32))
}
