use glam::Vec2;
use moon_salvage_core::{Aabb, WallSet};
use moon_salvage_system_navigation::{Resolution, Terrain, PROBE_HALF_EXTENTS};

fn arena(walls: Vec<Aabb>) -> Terrain {
    Terrain::new(
        WallSet::from(walls),
        Aabb::new(Vec2::ZERO, Vec2::new(512.0, 512.0)),
    )
}

fn assert_path_clear(terrain: &Terrain, path: &[Vec2]) {
    for point in path {
        let probe = Aabb::from_center_half_extents(*point, PROBE_HALF_EXTENTS);
        assert!(!terrain.walls().collides(&probe), "waypoint {point:?} inside a wall");
    }
}

#[test]
fn open_field_path_runs_diagonally() {
    let terrain = arena(Vec::new());
    let path = terrain
        .find_path(Vec2::new(0.0, 0.0), Vec2::new(256.0, 256.0), Resolution::Fine)
        .expect("open field is reachable");

    assert_eq!(path.len(), 8, "eight diagonal steps of 32 units");
    assert_eq!(path.last().copied(), Some(Vec2::new(256.0, 256.0)));
}

#[test]
fn path_detours_around_a_wall() {
    let wall = Aabb::new(Vec2::new(240.0, 0.0), Vec2::new(272.0, 400.0));
    let terrain = arena(vec![wall]);
    let from = Vec2::new(128.0, 128.0);
    let to = Vec2::new(384.0, 128.0);

    for resolution in [Resolution::Fine, Resolution::Coarse] {
        let path = terrain
            .find_path(from, to, resolution)
            .expect("gap above the wall is reachable");
        assert_path_clear(&terrain, &path);
        assert!(
            path.iter().any(|point| point.y > 400.0),
            "{resolution:?} path must climb over the wall"
        );
        let last = *path.last().expect("path is not empty");
        assert!(last.distance(to) < 1.0);
    }
}

#[test]
fn enclosed_target_has_no_path() {
    let walls = vec![
        Aabb::new(Vec2::new(300.0, 300.0), Vec2::new(500.0, 320.0)),
        Aabb::new(Vec2::new(300.0, 480.0), Vec2::new(500.0, 500.0)),
        Aabb::new(Vec2::new(300.0, 300.0), Vec2::new(320.0, 500.0)),
        Aabb::new(Vec2::new(480.0, 300.0), Vec2::new(500.0, 500.0)),
    ];
    let terrain = arena(walls);
    assert_eq!(
        terrain.find_path(Vec2::new(64.0, 64.0), Vec2::new(400.0, 400.0), Resolution::Fine),
        None
    );
}

#[test]
fn target_on_blocked_point_snaps_to_free_neighbor() {
    let wall = Aabb::new(Vec2::new(250.0, 250.0), Vec2::new(262.0, 262.0));
    let terrain = arena(vec![wall]);
    let path = terrain
        .find_path(Vec2::new(64.0, 64.0), Vec2::new(256.0, 256.0), Resolution::Fine)
        .expect("neighbor of the blocked point is reachable");
    let last = *path.last().expect("path is not empty");
    assert!(last.distance(Vec2::new(256.0, 256.0)) <= 64.0);
    assert_path_clear(&terrain, &path);
}

#[test]
fn coarse_lattice_is_sparser() {
    let terrain = arena(Vec::new());
    assert_eq!(terrain.grid(Resolution::Fine).columns(), 17);
    assert_eq!(terrain.grid(Resolution::Coarse).columns(), 9);
}
