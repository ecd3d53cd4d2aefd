use glam::Vec2;
use moon_salvage_core::{
    level_rng, Aabb, ConfigError, MonsterDefinition, MonsterKind, MonsterTable, PlayerView, Realm,
    WallSet,
};
use moon_salvage_system_enemy_ai::{
    instantiate, Agent, Behavior, GiantMode, ThumperMode, ThumperState,
};
use moon_salvage_system_navigation::Terrain;
use moon_salvage_system_spawning::SpawnRequest;

fn definition(movement_speed: f32) -> MonsterDefinition {
    MonsterDefinition {
        power: 2,
        movement_speed,
        health: 100.0,
        damage: 10.0,
        damage_cooldown: 5,
        sprite: String::new(),
        texture_folder: String::new(),
        hit_box: [48.0, 48.0],
    }
}

fn arena(walls: Vec<Aabb>) -> Terrain {
    Terrain::new(
        WallSet::from(walls),
        Aabb::new(Vec2::ZERO, Vec2::new(1024.0, 1024.0)),
    )
}

/// Closed ring of walls around (800, 800) that nothing outside can see into.
fn enclosure() -> Vec<Aabb> {
    vec![
        Aabb::new(Vec2::new(760.0, 760.0), Vec2::new(770.0, 840.0)),
        Aabb::new(Vec2::new(830.0, 760.0), Vec2::new(840.0, 840.0)),
        Aabb::new(Vec2::new(760.0, 760.0), Vec2::new(840.0, 770.0)),
        Aabb::new(Vec2::new(760.0, 830.0), Vec2::new(840.0, 840.0)),
    ]
}

fn thumper_mode(agent: &Agent) -> ThumperMode {
    match agent.behavior() {
        Behavior::Thumper(state) => state.mode(),
        other => panic!("expected a thumper, found {other:?}"),
    }
}

fn giant_mode(agent: &Agent) -> GiantMode {
    match agent.behavior() {
        Behavior::Giant(state) => state.mode(),
        other => panic!("expected a giant, found {other:?}"),
    }
}

#[test]
fn chaser_closes_in_on_the_player() {
    let terrain = arena(Vec::new());
    let player = PlayerView::at(Vec2::new(600.0, 600.0));
    let mut agent = Agent::spawn(
        MonsterKind::Hygrodere,
        &definition(4.0),
        Vec2::new(100.0, 100.0),
    );
    let mut rng = level_rng(3);

    let start = agent.position().distance(player.position());
    for _ in 0..400 {
        let _ = agent.update(&player, &terrain, &mut rng);
        if agent.position().distance(player.position()) < 40.0 {
            return;
        }
    }
    panic!(
        "chaser stalled at {:?}, started {start} away",
        agent.position()
    );
}

#[test]
fn contact_damage_waits_for_cooldown() {
    let terrain = arena(Vec::new());
    let position = Vec2::new(300.0, 300.0);
    let player = PlayerView::at(position);
    let mut agent = Agent::spawn(MonsterKind::Hygrodere, &definition(0.0), position);
    let mut rng = level_rng(5);

    let hits: Vec<usize> = (0..11)
        .filter(|_| agent.update(&player, &terrain, &mut rng).is_some())
        .collect();

    assert_eq!(hits, vec![0, 5, 10]);
}

#[test]
fn dead_agent_is_inert() {
    let terrain = arena(Vec::new());
    let position = Vec2::new(300.0, 300.0);
    let player = PlayerView::at(position + Vec2::new(10.0, 0.0));
    let mut agent = Agent::spawn(MonsterKind::Thumper, &definition(2.0), position);
    let mut rng = level_rng(9);

    agent.take_damage(250.0);
    assert_eq!(agent.health(), 0.0);
    assert!(agent.is_dead());

    assert_eq!(agent.update(&player, &terrain, &mut rng), None);
    assert_eq!(agent.position(), position);
}

#[test]
fn thumper_charges_once_it_spots_the_player() {
    let terrain = arena(Vec::new());
    let player = PlayerView::at(Vec2::new(500.0, 128.0));
    let mut agent = Agent::spawn(MonsterKind::Thumper, &definition(2.0), Vec2::new(128.0, 128.0));
    let mut rng = level_rng(11);

    let _ = agent.update(&player, &terrain, &mut rng);

    assert_eq!(thumper_mode(&agent), ThumperMode::Aggressive);
    assert_eq!(agent.body().speed(), 1.0);
}

#[test]
fn thumper_search_gives_up_when_meter_runs_dry() {
    let terrain = arena(enclosure());
    let player = PlayerView::at(Vec2::new(800.0, 800.0));
    let mut agent = Agent::with_behavior(
        MonsterKind::Thumper,
        &definition(2.0),
        Vec2::new(128.0, 128.0),
        Behavior::Thumper(ThumperState::in_mode(ThumperMode::Search)),
    );
    let mut rng = level_rng(21);

    for tick in 1..200 {
        let _ = agent.update(&player, &terrain, &mut rng);
        assert_eq!(
            thumper_mode(&agent),
            ThumperMode::Search,
            "left search early on tick {tick}"
        );
    }

    let _ = agent.update(&player, &terrain, &mut rng);
    assert_eq!(thumper_mode(&agent), ThumperMode::Wander);
}

#[test]
fn giant_doubles_speed_while_agro_and_restores_it_after_search() {
    let terrain = arena(enclosure());
    let visible = PlayerView::at(Vec2::new(500.0, 128.0));
    let hidden = PlayerView::at(Vec2::new(800.0, 800.0));
    let mut agent = Agent::spawn(MonsterKind::Giant, &definition(2.0), Vec2::new(128.0, 128.0));
    let mut rng = level_rng(33);

    let _ = agent.update(&visible, &terrain, &mut rng);
    assert_eq!(giant_mode(&agent), GiantMode::Agro);
    assert_eq!(agent.body().speed(), 4.0);

    let _ = agent.update(&hidden, &terrain, &mut rng);
    assert_eq!(giant_mode(&agent), GiantMode::AgroSearch);

    for _ in 1..25 {
        let _ = agent.update(&hidden, &terrain, &mut rng);
        assert_eq!(giant_mode(&agent), GiantMode::AgroSearch);
    }

    let _ = agent.update(&hidden, &terrain, &mut rng);
    assert_eq!(giant_mode(&agent), GiantMode::Roam);
    assert_eq!(agent.body().speed(), 2.0);
}

#[test]
fn instantiate_selects_brain_by_kind() {
    let mut monsters = MonsterTable::default();
    let _ = monsters.outdoors.insert(MonsterKind::Giant, definition(1.5));
    let request = SpawnRequest::new(MonsterKind::Giant, 2, Vec2::new(64.0, 64.0));

    let agent = instantiate(&request, &monsters, Realm::Outdoors).expect("giant is defined");

    assert!(matches!(agent.behavior(), Behavior::Giant(_)));
    assert_eq!(agent.position(), Vec2::new(64.0, 64.0));
    assert_eq!(agent.power(), 2);
}

#[test]
fn instantiate_rejects_undefined_monster() {
    let monsters = MonsterTable::default();
    let request = SpawnRequest::new(MonsterKind::Thumper, 3, Vec2::ZERO);

    let error = instantiate(&request, &monsters, Realm::Indoors).unwrap_err();

    assert!(matches!(
        error,
        ConfigError::MissingMonster {
            realm: Realm::Indoors,
            kind: MonsterKind::Thumper,
        }
    ));
}
