#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line harness that sets up a moon and ticks it without a renderer.
//!
//! The player stands still at the indoor start cell and at the surface
//! landing point while spawners, monsters, and hazards run. A summary of the
//! spawns, power drawn, and damage taken is logged when the run ends.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use moon_salvage_core::{
    DamageSource, Event, ItemCatalog, MonsterTable, MoonCatalog, PlayerView, Realm, RoomCatalog,
};
use moon_salvage_system_enemy_ai::Agent;
use moon_salvage_world::{query, LevelDefinitions, Map};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Headless Moon Salvage level runner", long_about = None)]
struct Args {
    // Directory holding moons.json, monsters.json, items.json, and rooms.json
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    // Moon to generate
    #[arg(long, default_value = "experimentation")]
    moon: String,

    // Level seed
    #[arg(long, default_value_t = 0)]
    seed: u32,

    // Number of ticks to simulate
    #[arg(long, default_value_t = 3_000)]
    ticks: u32,

    // Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log: String,
}

#[derive(Debug, Default)]
struct Tally {
    indoor_spawns: u32,
    outdoor_spawns: u32,
    monster_damage: f32,
    mine_damage: f32,
    bullet_damage: f32,
    mines_exploded: u32,
    shots_fired: u32,
}

impl Tally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::MonsterSpawned {
                    realm: Realm::Indoors,
                    ..
                } => self.indoor_spawns += 1,
                Event::MonsterSpawned {
                    realm: Realm::Outdoors,
                    ..
                } => self.outdoor_spawns += 1,
                Event::PlayerDamaged { amount, source } => match source {
                    DamageSource::Monster(_) => self.monster_damage += amount,
                    DamageSource::Mine => self.mine_damage += amount,
                    DamageSource::Bullet => self.bullet_damage += amount,
                },
                Event::MineExploded { .. } => self.mines_exploded += 1,
                Event::TurretFired { .. } => self.shots_fired += 1,
                Event::MineArmed { .. } => {}
            }
        }
    }
}

fn read_table(assets: &Path, name: &str) -> Result<String> {
    let path = assets.join(name);
    fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

fn load_definitions(assets: &Path, moon: &str) -> Result<LevelDefinitions> {
    let moons = MoonCatalog::from_json(&read_table(assets, "moons.json")?)?;
    Ok(LevelDefinitions {
        moon: moons.moon(moon)?.clone(),
        monsters: MonsterTable::from_json(&read_table(assets, "monsters.json")?)?,
        items: ItemCatalog::from_json(&read_table(assets, "items.json")?)?,
        rooms: RoomCatalog::from_json(&read_table(assets, "rooms.json")?)?,
    })
}

/// Entry point for the Moon Salvage command-line harness.
fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let definitions = load_definitions(&args.assets, &args.moon)
        .with_context(|| format!("loading tables from {}", args.assets.display()))?;
    let mut map = Map::new(definitions, args.seed);
    map.setup()
        .with_context(|| format!("setting up moon `{}`", args.moon))?;

    let indoor_player = PlayerView::at(query::player_start(&map));
    let outdoor_player = PlayerView::at(query::outdoor_start(&map));
    let scrap_value: u32 = query::loot(&map).map(|item| item.value()).sum();
    info!(
        seed = args.seed,
        scrap_value,
        start_x = indoor_player.position().x,
        start_y = indoor_player.position().y,
        "level ready"
    );

    let mut indoor_agents: Vec<Agent> = Vec::new();
    let mut outdoor_agents: Vec<Agent> = Vec::new();
    let mut tally = Tally::default();
    let mut events = Vec::new();

    for tick in 0..args.ticks {
        indoor_agents.extend(map.update_spawners(&mut events)?);
        outdoor_agents.extend(map.update_outdoor_spawners(&mut events)?);
        let _ = map.update_agents(&mut indoor_agents, Realm::Indoors, &indoor_player, &mut events);
        let _ = map.update_agents(
            &mut outdoor_agents,
            Realm::Outdoors,
            &outdoor_player,
            &mut events,
        );
        let _ = map.update_hazards(&indoor_player, &mut events);

        if !events.is_empty() {
            debug!(tick, events = events.len(), "tick produced events");
        }
        tally.record(&events);
        events.clear();
    }

    info!(
        ticks = args.ticks,
        indoor_spawns = tally.indoor_spawns,
        outdoor_spawns = tally.outdoor_spawns,
        indoor_power = query::indoor_power(&map).current(),
        indoor_power_max = query::indoor_power(&map).max(),
        outdoor_power = query::outdoor_power(&map).current(),
        outdoor_power_max = query::outdoor_power(&map).max(),
        monsters_alive = indoor_agents.len() + outdoor_agents.len(),
        "run finished"
    );
    info!(
        monster = tally.monster_damage,
        mine = tally.mine_damage,
        bullet = tally.bullet_damage,
        mines_exploded = tally.mines_exploded,
        shots_fired = tally.shots_fired,
        "damage taken"
    );
    Ok(())
}
