use moon_salvage_core::{
    ConfigError, ConnectionCode, Direction, Handedness, ItemCatalog, MonsterKind, MonsterTable,
    MoonCatalog, Realm, RoomCatalog, ValueTier,
};

const MONSTERS: &str = r#"{
    "indoors": {
        "hygrodere": { "power": 1, "movement_speed": 0.5, "health": 1000, "damage": 35, "damage_cooldown": 60 },
        "thumper": { "power": 3, "movement_speed": 1.0, "health": 120, "damage": 40, "damage_cooldown": 45, "hit_box": [64, 64] }
    },
    "outdoors": {
        "giant": { "power": 2, "movement_speed": 1.5, "health": 5000, "damage": 100, "damage_cooldown": 120 }
    }
}"#;

fn moon_json(difficulty: f32, loot: [u32; 2]) -> String {
    format!(
        r#"[{{
            "id": "experimentation",
            "size": 1.0,
            "difficulty": {difficulty},
            "loot_quantity": [{}, {}],
            "loot_weight": {{ "one_handed": [5, 3, 1], "two_handed": [4, 2, 1] }},
            "hazards": {{ "mines": 4, "turrets": 2 }},
            "monster_weight": {{ "hygrodere": 3, "thumper": 1 }},
            "indoor_power": 6
        }}]"#,
        loot[0], loot[1]
    )
}

#[test]
fn monster_lookup_is_keyed_by_realm() {
    let table = MonsterTable::from_json(MONSTERS).expect("monster table parses");

    let thumper = table
        .definition(Realm::Indoors, MonsterKind::Thumper)
        .expect("thumper is an indoor monster");
    assert_eq!(thumper.power, 3);
    assert_eq!(thumper.hit_box, [64.0, 64.0]);

    let hygrodere = table
        .definition(Realm::Indoors, MonsterKind::Hygrodere)
        .expect("hygrodere is an indoor monster");
    assert_eq!(hygrodere.hit_box, [48.0, 48.0], "hit box falls back to default");

    let missing = table.definition(Realm::Outdoors, MonsterKind::Thumper);
    assert!(matches!(
        missing,
        Err(ConfigError::MissingMonster {
            realm: Realm::Outdoors,
            kind: MonsterKind::Thumper
        })
    ));
}

#[test]
fn moon_catalog_resolves_ids_and_map_size() {
    let catalog = MoonCatalog::from_json(&moon_json(1.5, [10, 14])).expect("moon parses");
    let moon = catalog.moon("experimentation").expect("moon exists");
    assert_eq!(moon.map_size(), 5);
    assert_eq!(moon.hazards.mines, 4);
    assert!(matches!(
        catalog.moon("titan"),
        Err(ConfigError::UnknownMoon(id)) if id == "titan"
    ));
}

#[test]
fn moon_catalog_rejects_bad_difficulty_and_ranges() {
    assert!(matches!(
        MoonCatalog::from_json(&moon_json(0.0, [1, 2])),
        Err(ConfigError::InvalidDifficulty(_))
    ));
    assert!(matches!(
        MoonCatalog::from_json(&moon_json(1.0, [9, 2])),
        Err(ConfigError::InvalidRange { low: 9, high: 2, .. })
    ));
}

#[test]
fn malformed_json_reports_the_table() {
    let error = MonsterTable::from_json("{ not json").expect_err("parse must fail");
    assert!(matches!(error, ConfigError::Parse { table: "monster", .. }));
}

#[test]
fn item_catalog_fails_fast_on_missing_entries() {
    let catalog = ItemCatalog::from_json(
        r#"{
            "one_handed": { "0": [ { "weight": 3, "value_range": [10, 20] } ], "1": [] },
            "tools": [ { "terminal_phrase": "shovel", "cost": 30, "weight": 8 } ]
        }"#,
    )
    .expect("item catalog parses");

    assert_eq!(
        catalog
            .items(Handedness::OneHanded, ValueTier::Low)
            .expect("tier 0 is populated")
            .len(),
        1
    );
    assert!(matches!(
        catalog.items(Handedness::OneHanded, ValueTier::Mid),
        Err(ConfigError::MissingItemTier { .. })
    ));
    assert!(matches!(
        catalog.items(Handedness::TwoHanded, ValueTier::Low),
        Err(ConfigError::MissingItemTier { .. })
    ));
    assert_eq!(catalog.tool("shovel").expect("shovel exists").cost, 30);
    assert!(matches!(catalog.tool("jetpack"), Err(ConfigError::UnknownTool(_))));
}

#[test]
fn item_catalog_rejects_inverted_value_range() {
    let result = ItemCatalog::from_json(
        r#"{ "two_handed": { "2": [ { "weight": 1, "value_range": [90, 40] } ] } }"#,
    );
    assert!(matches!(result, Err(ConfigError::InvalidRange { field: "value_range", .. })));
}

#[test]
fn room_catalog_is_keyed_by_code_string() {
    let catalog = RoomCatalog::from_json(
        r#"{ "rooms": { "0101": {
            "walls": [ { "center_x": 0, "center_y": 120, "width": 256, "height": 16 } ],
            "hazard_spawn_locations": [ { "x": 10, "y": -10, "width": 40, "height": 40 } ]
        } } }"#,
    )
    .expect("room catalog parses");

    let code = ConnectionCode::CLOSED
        .with_open(Direction::East)
        .with_open(Direction::West);
    let layout = catalog.layout(code).expect("layout exists");
    assert_eq!(layout.walls.len(), 1);
    assert_eq!(layout.hazard_spawn_locations[0].center_x, 10.0);

    let missing = ConnectionCode::CLOSED.with_open(Direction::North);
    assert!(matches!(catalog.layout(missing), Err(ConfigError::MissingRoom(code)) if code == missing));
}
