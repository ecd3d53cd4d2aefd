use glam::Vec2;
use moon_salvage_core::{level_rng, Aabb, PlayerView, WallSet};
use moon_salvage_system_enemy_ai::Turret;
use moon_salvage_system_hazards::Bullet;
use moon_salvage_system_perception::angle_delta;

#[test]
fn sweep_reverses_at_the_upper_bound() {
    let mut turret = Turret::with_facing(Vec2::ZERO, 0.0, 89.0);
    let behind = PlayerView::at(Vec2::new(-500.0, 0.0));
    let walls = WallSet::default();
    let mut rng = level_rng(1);
    let mut bullets = Vec::new();

    assert_eq!(turret.rotate_direction(), 1.0);
    turret.update(&behind, &walls, &mut rng, &mut bullets);

    assert_eq!(turret.rotate_direction(), -1.0);
    assert_eq!(turret.facing(), 89.0);
    assert!(turret.is_delaying());
}

#[test]
fn sweep_pauses_at_the_edge_before_turning_back() {
    let mut turret = Turret::with_facing(Vec2::ZERO, 0.0, 89.0);
    let behind = PlayerView::at(Vec2::new(-500.0, 0.0));
    let walls = WallSet::default();
    let mut rng = level_rng(1);
    let mut bullets = Vec::new();

    turret.update(&behind, &walls, &mut rng, &mut bullets);
    for _ in 0..21 {
        turret.update(&behind, &walls, &mut rng, &mut bullets);
        assert_eq!(turret.facing(), 89.0);
    }

    turret.update(&behind, &walls, &mut rng, &mut bullets);
    assert!(turret.facing() < 89.0);
    assert!(bullets.is_empty());
}

#[test]
fn initial_facing_stays_inside_the_sweep() {
    let mut rng = level_rng(77);
    for _ in 0..50 {
        let turret = Turret::new(Vec2::ZERO, Vec2::new(0.0, -1.0), &mut rng);
        assert_eq!(turret.base_direction(), 270.0);
        assert!((turret.facing() - 270.0).abs() <= 89.0);
    }
}

#[test]
fn fires_after_pre_fire_delay_while_aimed() {
    let mut turret = Turret::with_facing(Vec2::ZERO, 0.0, 0.0);
    let player = PlayerView::at(Vec2::new(300.0, 0.0));
    let walls = WallSet::default();
    let mut rng = level_rng(4);
    let mut bullets: Vec<Bullet> = Vec::new();

    for _ in 0..50 {
        turret.update(&player, &walls, &mut rng, &mut bullets);
        assert!(turret.is_aiming());
        assert!(!turret.is_firing());
    }
    let laser = turret.laser().expect("laser is shown while aiming");
    assert!((laser.length() - 1000.0).abs() < 1e-3);

    for _ in 0..4 {
        turret.update(&player, &walls, &mut rng, &mut bullets);
    }
    assert!(turret.is_firing());
    assert!(bullets.is_empty());

    turret.update(&player, &walls, &mut rng, &mut bullets);
    assert_eq!(bullets.len(), 1);
    assert!(angle_delta(0.0, bullets[0].direction()).abs() <= 3.0);
    assert_eq!(bullets[0].damage(), 40.0);

    for _ in 0..20 {
        turret.update(&player, &walls, &mut rng, &mut bullets);
    }
    assert_eq!(bullets.len(), 5, "one bullet every five ticks");
}

#[test]
fn wall_blocks_detection_and_hides_laser() {
    let mut turret = Turret::with_facing(Vec2::ZERO, 0.0, 0.0);
    let player = PlayerView::at(Vec2::new(300.0, 0.0));
    let walls = WallSet::from(vec![Aabb::new(
        Vec2::new(100.0, -50.0),
        Vec2::new(120.0, 50.0),
    )]);
    let mut rng = level_rng(4);
    let mut bullets = Vec::new();

    for _ in 0..80 {
        turret.update(&player, &walls, &mut rng, &mut bullets);
        assert!(!turret.has_line_of_sight());
        assert!(!turret.is_aiming());
        assert_eq!(turret.laser(), None);
    }
    assert!(bullets.is_empty());
}
