use std::collections::BTreeMap;

use glam::Vec2;
use moon_salvage_core::{
    level_rng, ConfigError, Handedness, ItemCatalog, ItemDefinition, ToolDefinition, ValueTier,
};
use moon_salvage_system_economy::{
    increase_quota, Item, Lantern, Ledger, PurchaseError, QuotaOutcome, Shovel, Tool,
    INITIAL_QUOTA, LANTERN_LIGHT_RADIUS, SHOVEL_DAMAGE,
};

fn catalog() -> ItemCatalog {
    let scrap = |low, high| ItemDefinition {
        weight: 4.0,
        value_range: [low, high],
        sprite_filename: "scrap.png".to_owned(),
        sprite_inventory_filename: String::new(),
    };
    let tool = |phrase: &str, cost| ToolDefinition {
        terminal_phrase: phrase.to_owned(),
        terminal_print: phrase.to_uppercase(),
        cost,
        weight: 5.0,
        sprite_filename: String::new(),
        sprite_inventory_filename: String::new(),
    };

    let mut one_handed = BTreeMap::new();
    let _ = one_handed.insert("0".to_owned(), vec![scrap(10, 30), scrap(12, 14)]);
    let _ = one_handed.insert("2".to_owned(), vec![scrap(60, 100)]);

    ItemCatalog {
        one_handed,
        two_handed: BTreeMap::new(),
        tools: vec![tool("lan", 20), tool("sho", 30)],
    }
}

#[test]
fn generated_value_stays_in_template_range() {
    let catalog = catalog();
    let mut rng = level_rng(8);
    for _ in 0..100 {
        let item = Item::generate(
            &catalog,
            Handedness::OneHanded,
            ValueTier::High,
            Vec2::new(5.0, 6.0),
            &mut rng,
        )
        .expect("tier is stocked");
        assert!((60..=100).contains(&item.value()));
        assert_eq!(item.position(), Vec2::new(5.0, 6.0));
        assert!(item.is_on_ground());
    }
}

#[test]
fn generating_from_empty_tier_fails() {
    let catalog = catalog();
    let mut rng = level_rng(8);
    let error = Item::generate(
        &catalog,
        Handedness::TwoHanded,
        ValueTier::Low,
        Vec2::ZERO,
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(error, ConfigError::MissingItemTier { .. }));
}

#[test]
fn unknown_tool_phrase_is_rejected() {
    let catalog = catalog();
    let error = Tool::from_catalog(&catalog, "jet").unwrap_err();
    assert!(matches!(error, ConfigError::UnknownTool(phrase) if phrase == "jet"));
}

#[test]
fn lantern_lights_only_when_on() {
    let tool = Tool::from_catalog(&catalog(), "lan").expect("lantern is stocked");
    let mut lantern = Lantern::new(tool);
    assert_eq!(lantern.light_radius(), None);
    lantern.turn_on();
    assert_eq!(lantern.light_radius(), Some(LANTERN_LIGHT_RADIUS));
    lantern.turn_off();
    assert!(!lantern.is_on());
}

#[test]
fn shovel_swings_out_and_back_and_hits_once() {
    let tool = Tool::from_catalog(&catalog(), "sho").expect("shovel is stocked");
    let mut shovel = Shovel::new(tool);

    assert!(shovel.swing());
    assert!(!shovel.swing(), "cannot restart mid-swing");

    assert_eq!(shovel.strike(), Some(SHOVEL_DAMAGE));
    assert_eq!(shovel.strike(), None);

    let turned: f32 = (0..25).map(|_| shovel.update()).sum();
    assert_eq!(turned, 125.0);
    assert!(!shovel.is_swinging());
    assert_eq!(shovel.strike(), None, "no damage on the back stroke");

    let returned: f32 = (0..25).map(|_| shovel.update()).sum();
    assert_eq!(returned, -125.0);
    assert!(!shovel.is_busy());
    assert!(shovel.swing());
}

#[test]
fn quota_grows_within_the_jitter_envelope() {
    let mut rng = level_rng(12);
    for fulfilled in 1..6 {
        let base = 100.0 * (1.0 + (fulfilled * fulfilled) as f64 / 16.0);
        for _ in 0..50 {
            let next = increase_quota(INITIAL_QUOTA, fulfilled, &mut rng);
            let growth = f64::from(next - INITIAL_QUOTA);
            assert!(growth >= base * 0.6 - 1.0, "growth {growth} too small");
            assert!(growth <= base * 1.4, "growth {growth} too large");
        }
    }
}

#[test]
fn sale_value_rises_as_days_run_out() {
    let catalog = catalog();
    let mut rng = level_rng(2);
    let item = Item::generate(
        &catalog,
        Handedness::OneHanded,
        ValueTier::High,
        Vec2::ZERO,
        &mut rng,
    )
    .expect("tier is stocked");

    let mut ledger = Ledger::new();
    assert_eq!(ledger.sell([&item]), 0, "nothing is paid on the first day");

    ledger.end_day();
    ledger.end_day();
    ledger.end_day();
    assert_eq!(ledger.sell([&item]), item.value());
    assert_eq!(ledger.money(), 60 + item.value());
}

#[test]
fn purchase_requires_funds() {
    let catalog = catalog();
    let shovel = Tool::from_catalog(&catalog, "sho").expect("shovel is stocked");
    let mut ledger = Ledger::new();

    ledger.buy(&shovel).expect("60 covers 30");
    ledger.buy(&shovel).expect("30 covers 30");
    assert_eq!(ledger.money(), 0);
    assert_eq!(
        ledger.buy(&shovel),
        Err(PurchaseError::InsufficientFunds {
            tool: "sho".to_owned(),
            cost: 30,
            money: 0,
        })
    );
}

#[test]
fn quota_settles_only_when_due() {
    let mut rng = level_rng(6);
    let mut ledger = Ledger::new();
    assert_eq!(ledger.settle_quota(&mut rng), QuotaOutcome::Pending);

    for _ in 0..3 {
        ledger.end_day();
    }
    assert_eq!(ledger.settle_quota(&mut rng), QuotaOutcome::Missed);
}

#[test]
fn meeting_quota_resets_the_period() {
    let catalog = catalog();
    let mut rng = level_rng(6);
    let items: Vec<Item> = (0..4)
        .map(|_| {
            Item::generate(
                &catalog,
                Handedness::OneHanded,
                ValueTier::High,
                Vec2::ZERO,
                &mut rng,
            )
            .expect("tier is stocked")
        })
        .collect();

    let mut ledger = Ledger::new();
    for _ in 0..3 {
        ledger.end_day();
    }
    assert!(ledger.sell(&items) >= INITIAL_QUOTA);

    let QuotaOutcome::Met { next_quota } = ledger.settle_quota(&mut rng) else {
        panic!("quota of {INITIAL_QUOTA} should be met");
    };
    assert!(next_quota > INITIAL_QUOTA);
    assert_eq!(ledger.days_left(), 3);
    assert_eq!(ledger.scrap_sold(), 0);
    assert_eq!(ledger.quotas_met(), 1);
}
