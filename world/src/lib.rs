#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for a single moon.
//!
//! A [`Map`] owns the generated rooms, the indoor and outdoor terrain, the
//! spawners of both realms with their power budgets, and the bullets in
//! flight. [`Map::setup`] derives everything from the level definitions and
//! the seed; the `update_*` methods advance one tick each and report what
//! happened through an [`Event`] buffer. Read access goes through [`query`].

mod room;

use glam::Vec2;
use moon_salvage_core::{
    level_rng, Aabb, ConfigError, DamageSource, Event, ItemCatalog, LevelRng, MonsterTable,
    MoonDefinition, PlayerView, Realm, RoomCatalog, WallSet, ROOM_SIZE,
};
use moon_salvage_system_distribution::{distribute_all, outdoor_spawners, LevelGrid, SpawnTuning};
use moon_salvage_system_enemy_ai::{instantiate, Agent};
use moon_salvage_system_hazards::Bullet;
use moon_salvage_system_navigation::Terrain;
use moon_salvage_system_spawning::{tick_spawners, PowerBudget, SpawnRequest, Spawner};
use tracing::{info, warn};

pub use room::Room;

/// Base cooldown of outdoor spawn queues; surface monsters arrive much later.
pub const OUTDOOR_BASE_COOLDOWN: f32 = SpawnTuning::DEFAULT_BASE_COOLDOWN * 10.0;

/// Columns on each side of a position reported by [`query::rooms_near`].
pub const NEARBY_COLUMNS: u32 = 3;

/// Rows on each side of a position reported by [`query::rooms_near`].
pub const NEARBY_ROWS: u32 = 2;

/// Static tables a level is generated from.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelDefinitions {
    /// Moon being played.
    pub moon: MoonDefinition,
    /// Monster stats for both realms.
    pub monsters: MonsterTable,
    /// Scrap and tool catalogue.
    pub items: ItemCatalog,
    /// Room geometry keyed by connection code.
    pub rooms: RoomCatalog,
}

/// Generated level and its live hazards, spawners, and power budgets.
#[derive(Clone, Debug)]
pub struct Map {
    definitions: LevelDefinitions,
    rng: LevelRng,
    size: u32,
    player_start: Vec2,
    main_entrance: Aabb,
    rooms: Vec<Room>,
    indoor: Terrain,
    outdoor: Terrain,
    outdoor_spawners: Vec<Spawner>,
    indoor_power: PowerBudget,
    outdoor_power: PowerBudget,
    bullets: Vec<Bullet>,
}

impl Map {
    /// Creates an empty map; nothing exists until [`Map::setup`] runs.
    #[must_use]
    pub fn new(definitions: LevelDefinitions, seed: u32) -> Self {
        let indoor_power = PowerBudget::new(definitions.moon.indoor_power);
        let outdoor_power = PowerBudget::new(definitions.moon.outdoor_power);
        Self {
            definitions,
            rng: level_rng(seed),
            size: 0,
            player_start: Vec2::ZERO,
            main_entrance: Aabb::default(),
            rooms: Vec::new(),
            indoor: Terrain::default(),
            outdoor: Terrain::default(),
            outdoor_spawners: Vec::new(),
            indoor_power,
            outdoor_power,
            bullets: Vec::new(),
        }
    }

    /// Generates the maze, distributes loot, hazards, and spawners, and
    /// materialises every room. Fails on the first missing table entry.
    pub fn setup(&mut self) -> Result<(), ConfigError> {
        let LevelDefinitions {
            moon,
            monsters,
            items,
            rooms: catalog,
        } = &self.definitions;
        moon.validate()?;

        let size = moon.map_size() as u32;
        let maze = moon_salvage_system_maze::generate(size, &mut self.rng);
        let mut grid = LevelGrid::from_maze(&maze);
        distribute_all(&mut grid, moon, monsters, SpawnTuning::default(), &mut self.rng)?;
        let outdoor_spawners = outdoor_spawners(
            &moon.outdoor.spawn_regions,
            moon,
            monsters,
            SpawnTuning::new(OUTDOOR_BASE_COOLDOWN, SpawnTuning::DEFAULT_QUEUE_LENGTH),
            &mut self.rng,
        )?;

        let player_start = grid.start().center();
        let main_entrance = moon.indoor_main_entrance.to_aabb(player_start);

        let mut rooms = Vec::with_capacity(grid.cells().count());
        for (cell, allocation) in grid.cells() {
            if !allocation.is_open() {
                warn!(?cell, "closed cell left without a room");
                continue;
            }
            let layout = catalog.layout(allocation.code())?;
            rooms.push(Room::populate(cell, allocation, layout, items, &mut self.rng)?);
        }

        let mut walls: WallSet = rooms
            .iter()
            .flat_map(|room| room.walls().iter().copied())
            .collect();
        walls.push(main_entrance);
        let extent = size as f32 * ROOM_SIZE;
        let indoor = Terrain::new(walls, Aabb::new(Vec2::ZERO, Vec2::splat(extent)));

        let outdoor_walls: WallSet = moon
            .outdoor
            .walls
            .iter()
            .map(|wall| wall.to_aabb(Vec2::ZERO))
            .collect();
        let outdoor = Terrain::new(
            outdoor_walls,
            Aabb::new(
                Vec2::ZERO,
                Vec2::new(moon.outdoor.width, moon.outdoor.height),
            ),
        );

        info!(
            moon = %moon.id,
            size,
            rooms = rooms.len(),
            loot = rooms.iter().map(|room| room.loot().len()).sum::<usize>(),
            mines = rooms.iter().map(|room| room.mines().len()).sum::<usize>(),
            turrets = rooms.iter().map(|room| room.turrets().len()).sum::<usize>(),
            spawners = rooms.iter().filter(|room| room.spawner().is_some()).count(),
            outdoor_spawners = outdoor_spawners.len(),
            "level set up"
        );

        self.indoor_power = PowerBudget::new(moon.indoor_power);
        self.outdoor_power = PowerBudget::new(moon.outdoor_power);
        self.size = size;
        self.player_start = player_start;
        self.main_entrance = main_entrance;
        self.rooms = rooms;
        self.indoor = indoor;
        self.outdoor = outdoor;
        self.outdoor_spawners = outdoor_spawners;
        self.bullets.clear();
        Ok(())
    }

    /// Ticks every indoor spawner once and instantiates the monsters released.
    pub fn update_spawners(&mut self, events: &mut Vec<Event>) -> Result<Vec<Agent>, ConfigError> {
        let requests = tick_spawners(
            self.rooms.iter_mut().filter_map(Room::spawner_mut),
            Realm::Indoors,
            &mut self.indoor_power,
            events,
        );
        self.release(&requests, Realm::Indoors)
    }

    /// Ticks every outdoor spawner once and instantiates the monsters released.
    pub fn update_outdoor_spawners(
        &mut self,
        events: &mut Vec<Event>,
    ) -> Result<Vec<Agent>, ConfigError> {
        let requests = tick_spawners(
            self.outdoor_spawners.iter_mut(),
            Realm::Outdoors,
            &mut self.outdoor_power,
            events,
        );
        self.release(&requests, Realm::Outdoors)
    }

    fn release(
        &self,
        requests: &[SpawnRequest],
        realm: Realm,
    ) -> Result<Vec<Agent>, ConfigError> {
        requests
            .iter()
            .map(|request| instantiate(request, &self.definitions.monsters, realm))
            .collect()
    }

    /// Advances every agent of `realm` one tick, records contact damage, and
    /// drops agents that have died. Returns the damage dealt to the player.
    pub fn update_agents(
        &mut self,
        agents: &mut Vec<Agent>,
        realm: Realm,
        player: &PlayerView,
        events: &mut Vec<Event>,
    ) -> f32 {
        let terrain = match realm {
            Realm::Indoors => &self.indoor,
            Realm::Outdoors => &self.outdoor,
        };

        let mut dealt = 0.0;
        for agent in agents.iter_mut() {
            if let Some(amount) = agent.update(player, terrain, &mut self.rng) {
                dealt += amount;
                events.push(Event::PlayerDamaged {
                    amount,
                    source: DamageSource::Monster(agent.kind()),
                });
            }
        }
        agents.retain(|agent| !agent.is_dead());
        dealt
    }

    /// Runs the indoor hazard pass: arms and detonates mines, ticks turrets,
    /// and moves bullets. Returns the damage dealt to the player.
    ///
    /// Bullets are dropped when they enter a wall, hit the player, or leave
    /// the maze bounds.
    pub fn update_hazards(&mut self, player: &PlayerView, events: &mut Vec<Event>) -> f32 {
        let player_box = player.hit_box();
        let walls = self.indoor.walls();
        let bounds = *self.indoor.bounds();
        let mut dealt = 0.0;

        for room in &mut self.rooms {
            let (mines, turrets) = room.hazards_mut();

            for mine in mines.iter_mut() {
                let touching = mine.hit_box().intersects(&player_box);
                if touching && !mine.is_armed() {
                    mine.arm();
                    events.push(Event::MineArmed {
                        position: mine.position(),
                    });
                } else if !touching {
                    mine.tick();
                }

                if mine.is_exploded() {
                    events.push(Event::MineExploded {
                        position: mine.position(),
                    });
                    if let Some(amount) = mine.damage_at(player.position()) {
                        dealt += amount;
                        events.push(Event::PlayerDamaged {
                            amount,
                            source: DamageSource::Mine,
                        });
                    }
                }
            }
            mines.retain(|mine| !mine.is_exploded());

            for turret in turrets.iter_mut() {
                let fired = self.bullets.len();
                turret.update(player, walls, &mut self.rng, &mut self.bullets);
                for bullet in &self.bullets[fired..] {
                    events.push(Event::TurretFired {
                        position: turret.position(),
                        direction: bullet.direction(),
                    });
                }
            }
        }

        self.bullets.retain_mut(|bullet| {
            bullet.update();
            if walls.collides(&bullet.hit_box()) || !bounds.intersects(&bullet.hit_box()) {
                return false;
            }
            if bullet.hit_box().intersects(&player_box) {
                dealt += bullet.damage();
                events.push(Event::PlayerDamaged {
                    amount: bullet.damage(),
                    source: DamageSource::Bullet,
                });
                return false;
            }
            true
        });

        dealt
    }
}

/// Query functions that provide read-only access to the level state.
pub mod query {
    use glam::Vec2;
    use moon_salvage_core::{Aabb, CellCoord, MoonDefinition, WallSet};
    use moon_salvage_system_economy::Item;
    use moon_salvage_system_enemy_ai::Turret;
    use moon_salvage_system_hazards::{Bullet, Mine};
    use moon_salvage_system_navigation::Terrain;
    use moon_salvage_system_spawning::{PowerBudget, Spawner};

    use super::{Map, Room, NEARBY_COLUMNS, NEARBY_ROWS};

    /// Moon the map was generated for.
    #[must_use]
    pub fn moon(map: &Map) -> &MoonDefinition {
        &map.definitions.moon
    }

    /// Number of rooms along each side of the maze.
    #[must_use]
    pub fn size(map: &Map) -> u32 {
        map.size
    }

    /// Every indoor wall, including the main entrance.
    #[must_use]
    pub fn walls(map: &Map) -> &WallSet {
        map.indoor.walls()
    }

    /// Indoor walls, bounds, and path grids.
    #[must_use]
    pub fn indoor_terrain(map: &Map) -> &Terrain {
        &map.indoor
    }

    /// Surface walls, bounds, and path grids.
    #[must_use]
    pub fn outdoor_terrain(map: &Map) -> &Terrain {
        &map.outdoor
    }

    /// Rooms in column-major cell order.
    #[must_use]
    pub fn rooms(map: &Map) -> &[Room] {
        &map.rooms
    }

    /// Room occupying `cell`, if one was built there.
    #[must_use]
    pub fn room(map: &Map, cell: CellCoord) -> Option<&Room> {
        map.rooms.iter().find(|room| room.cell() == cell)
    }

    /// Rooms within a few columns and rows of `position`.
    #[must_use]
    pub fn rooms_near(map: &Map, position: Vec2) -> Vec<&Room> {
        let Some(center) = CellCoord::containing(position) else {
            return Vec::new();
        };
        map.rooms
            .iter()
            .filter(|room| {
                room.cell().column().abs_diff(center.column()) <= NEARBY_COLUMNS
                    && room.cell().row().abs_diff(center.row()) <= NEARBY_ROWS
            })
            .collect()
    }

    /// Scrap lying anywhere in the maze.
    pub fn loot(map: &Map) -> impl Iterator<Item = &Item> {
        map.rooms.iter().flat_map(|room| room.loot().iter())
    }

    /// Mines that have not exploded yet.
    pub fn mines(map: &Map) -> impl Iterator<Item = &Mine> {
        map.rooms.iter().flat_map(|room| room.mines().iter())
    }

    /// Every indoor turret.
    pub fn turrets(map: &Map) -> impl Iterator<Item = &Turret> {
        map.rooms.iter().flat_map(|room| room.turrets().iter())
    }

    /// Bullets in flight.
    #[must_use]
    pub fn bullets(map: &Map) -> &[Bullet] {
        &map.bullets
    }

    /// Indoor spawners, one per room that owns one.
    pub fn spawners(map: &Map) -> impl Iterator<Item = &Spawner> {
        map.rooms.iter().filter_map(Room::spawner)
    }

    /// Surface spawners.
    #[must_use]
    pub fn outdoor_spawners(map: &Map) -> &[Spawner] {
        &map.outdoor_spawners
    }

    /// Indoor power budget.
    #[must_use]
    pub fn indoor_power(map: &Map) -> &PowerBudget {
        &map.indoor_power
    }

    /// Outdoor power budget.
    #[must_use]
    pub fn outdoor_power(map: &Map) -> &PowerBudget {
        &map.outdoor_power
    }

    /// Indoor position the player enters at.
    #[must_use]
    pub fn player_start(map: &Map) -> Vec2 {
        map.player_start
    }

    /// Surface position the player lands at.
    #[must_use]
    pub fn outdoor_start(map: &Map) -> Vec2 {
        Vec2::from(map.definitions.moon.outdoor_starting_position)
    }

    /// Collision box of the indoor main entrance.
    #[must_use]
    pub fn main_entrance(map: &Map) -> Aabb {
        map.main_entrance
    }
}

#[cfg(test)]
mod tests {
    use moon_salvage_core::MoonCatalog;

    use super::*;

    fn built() -> Map {
        let moons = MoonCatalog::from_json(include_str!("../../assets/moons.json"))
            .expect("moon table parses");
        let definitions = LevelDefinitions {
            moon: moons.moon("experimentation").expect("moon is listed").clone(),
            monsters: MonsterTable::from_json(include_str!("../../assets/monsters.json"))
                .expect("monster table parses"),
            items: ItemCatalog::from_json(include_str!("../../assets/items.json"))
                .expect("item table parses"),
            rooms: RoomCatalog::from_json(include_str!("../../assets/rooms.json"))
                .expect("room table parses"),
        };
        let mut map = Map::new(definitions, 31);
        map.setup().expect("level sets up");
        map
    }

    // Standing inside the entrance wall hides the player from every turret.
    fn hidden_player(map: &Map) -> PlayerView {
        PlayerView::at(map.main_entrance.center())
    }

    #[test]
    fn bullet_leaving_the_maze_is_dropped() {
        let mut map = built();
        let player = hidden_player(&map);
        let outside = Vec2::new(-20.0, map.player_start.y + 100.0);
        map.bullets.push(Bullet::new(outside, 180.0, 40.0));

        let mut events = Vec::new();
        let dealt = map.update_hazards(&player, &mut events);
        assert_eq!(dealt, 0.0);
        assert!(map.bullets.is_empty());
    }

    #[test]
    fn bullet_entering_a_wall_is_dropped() {
        let mut map = built();
        let player = hidden_player(&map);
        let wall = *map.indoor.walls().iter().next().expect("rooms have walls");
        map.bullets
            .push(Bullet::new(wall.center() - Vec2::new(9.0, 0.0), 0.0, 40.0));

        let mut events = Vec::new();
        let _ = map.update_hazards(&player, &mut events);
        assert!(map.bullets.is_empty());
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::PlayerDamaged { .. })));
    }

    #[test]
    fn bullet_in_open_space_keeps_flying() {
        let mut map = built();
        let player = hidden_player(&map);
        map.bullets.push(Bullet::new(map.player_start, 90.0, 40.0));

        let mut events = Vec::new();
        let _ = map.update_hazards(&player, &mut events);
        assert_eq!(map.bullets.len(), 1);
        let moved = map.bullets[0].position() - map.player_start;
        assert!(moved.abs_diff_eq(Vec2::new(0.0, 10.0), 1e-3));
    }

    #[test]
    fn bullet_hitting_the_player_deals_damage_once() {
        let mut map = built();
        let target = map.player_start;
        map.bullets
            .push(Bullet::new(target - Vec2::new(20.0, 0.0), 0.0, 40.0));

        let mut events = Vec::new();
        let dealt = map.update_hazards(&PlayerView::at(target), &mut events);
        assert_eq!(dealt, 40.0);
        assert!(events.contains(&Event::PlayerDamaged {
            amount: 40.0,
            source: DamageSource::Bullet,
        }));
        assert!(map.bullets.is_empty());
    }
}
