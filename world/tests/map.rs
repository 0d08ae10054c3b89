use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};

use grid_tactics_core::{MoveError, TerrainKind, UnitKind, Vector2};
use grid_tactics_world::{query, LoadMode, Map, MapError};

const SAMPLE: &str = "3 2\np p m\nf f w\n";

fn counting_listener(map: &Map) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let _ = map.register_listener(Arc::new(move || {
        let _ = counter.fetch_add(1, Ordering::SeqCst);
    }));
    calls
}

#[test]
fn sample_description_resolves_expected_terrain() {
    let map = Map::from_description(SAMPLE, LoadMode::Lenient).expect("sample loads");

    assert_eq!(query::terrain_at(&map, Vector2::new(1, 0)), Some(TerrainKind::Plain));
    assert_eq!(query::terrain_at(&map, Vector2::new(2, 1)), Some(TerrainKind::Wall));
    assert_eq!(query::terrain_at(&map, Vector2::new(2, 0)), Some(TerrainKind::Mountain));
    assert_eq!(query::terrain_at(&map, Vector2::new(0, 1)), Some(TerrainKind::Forest));
}

#[test]
fn validity_holds_exactly_inside_bounds() {
    let map = Map::new(4, 3);
    for x in -3..7 {
        for y in -3..6 {
            let expected = (0..4).contains(&x) && (0..3).contains(&y);
            assert_eq!(map.is_valid_position(x, y), expected, "({x}, {y})");
            assert_eq!(map.place_at(Vector2::new(x, y)).is_some(), expected);
        }
    }
}

#[test]
fn place_at_out_of_bounds_is_absent() {
    let map = Map::new(2, 2);
    assert!(map.place_at(Vector2::new(-1, -1)).is_none());
    assert!(map.place_at(Vector2::new(i32::MAX, 0)).is_none());
    assert!(map.place_at(Vector2::new(0, i32::MIN)).is_none());
}

#[test]
fn neighbor_positions_are_distinct_in_bounds_and_exclude_origin() {
    let map = Map::new(4, 3);
    for x in 0..4 {
        for y in 0..3 {
            let origin = Vector2::new(x, y);
            let neighbors = map.neighbor_positions(origin);
            let unique: HashSet<_> = neighbors.iter().copied().collect();

            assert!(neighbors.len() <= 4);
            assert_eq!(unique.len(), neighbors.len());
            assert!(!neighbors.contains(&origin));
            for neighbor in &neighbors {
                assert!(map.contains(*neighbor));
                assert_eq!(neighbor.manhattan_distance(origin), 1);
            }
        }
    }
}

#[test]
fn neighbor_places_follow_neighbor_positions() {
    let map = Map::from_description(SAMPLE, LoadMode::Strict).expect("sample loads");
    let origin = Vector2::new(1, 0);
    let positions: Vec<_> = map
        .neighbor_places(origin)
        .iter()
        .map(|place| place.position())
        .collect();
    assert_eq!(positions, map.neighbor_positions(origin));
    assert_eq!(
        positions,
        vec![Vector2::new(1, 1), Vector2::new(0, 0), Vector2::new(2, 0)]
    );
}

#[test]
fn single_cell_map_has_no_neighbors() {
    let map = Map::new(1, 1);
    assert!(map.neighbor_positions(Vector2::new(0, 0)).is_empty());
}

#[test]
fn places_at_different_coordinates_are_never_equal() {
    let map = Map::from_description("2 1\np p", LoadMode::Strict).expect("loads");
    let left = map.place_at(Vector2::new(0, 0)).expect("left place");
    let right = map.place_at(Vector2::new(1, 0)).expect("right place");
    assert_eq!(
        left.terrain().map(|terrain| terrain.kind()),
        right.terrain().map(|terrain| terrain.kind())
    );
    assert_ne!(left, right);
}

#[test]
fn placement_respects_occupancy_and_terrain() {
    let map = Map::from_description(SAMPLE, LoadMode::Strict).expect("sample loads");

    let first = map
        .place_unit(UnitKind::Swordsman, Vector2::new(0, 0))
        .expect("plain is walkable");
    assert_eq!(
        map.place_unit(UnitKind::Swordsman, Vector2::new(0, 0)),
        Err(MoveError::Occupied)
    );
    assert_eq!(
        map.place_unit(UnitKind::Swordsman, Vector2::new(2, 1)),
        Err(MoveError::Untraversable)
    );
    assert_eq!(
        map.place_unit(UnitKind::Swordsman, Vector2::new(3, 0)),
        Err(MoveError::OutOfBounds)
    );
    assert_eq!(map.unit_at(Vector2::new(0, 0)).map(|unit| unit.id()), Some(first));
}

#[test]
fn move_updates_both_places_and_the_unit() {
    let map = Map::from_description(SAMPLE, LoadMode::Strict).expect("sample loads");
    let unit = map
        .place_unit(UnitKind::Swordsman, Vector2::new(0, 0))
        .expect("placement succeeds");

    assert_eq!(map.move_unit(unit, Vector2::new(1, 1)), Ok(Vector2::new(0, 0)));

    let vacated = map.place_at(Vector2::new(0, 0)).expect("in bounds");
    let entered = map.place_at(Vector2::new(1, 1)).expect("in bounds");
    assert!(vacated.is_vacant());
    assert_eq!(entered.occupant(), Some(unit));
    assert_eq!(map.unit(unit).map(|unit| unit.position()), Some(Vector2::new(1, 1)));
}

#[test]
fn rejected_moves_leave_state_untouched() {
    let map = Map::from_description(SAMPLE, LoadMode::Strict).expect("sample loads");
    let mover = map
        .place_unit(UnitKind::Swordsman, Vector2::new(0, 0))
        .expect("placement succeeds");
    let blocker = map
        .place_unit(UnitKind::Swordsman, Vector2::new(1, 0))
        .expect("placement succeeds");

    assert_eq!(map.move_unit(mover, Vector2::new(1, 0)), Err(MoveError::Occupied));
    assert_eq!(map.move_unit(mover, Vector2::new(2, 1)), Err(MoveError::Untraversable));
    assert_eq!(map.move_unit(mover, Vector2::new(0, 2)), Err(MoveError::OutOfBounds));
    assert_eq!(
        map.move_unit(grid_tactics_core::UnitId::new(99), Vector2::new(0, 1)),
        Err(MoveError::MissingUnit)
    );

    assert_eq!(query::occupant(&map, Vector2::new(0, 0)), Some(mover));
    assert_eq!(query::occupant(&map, Vector2::new(1, 0)), Some(blocker));
    assert_eq!(map.unit(mover).map(|unit| unit.position()), Some(Vector2::new(0, 0)));
}

#[test]
fn removal_vacates_the_place() {
    let map = Map::from_description(SAMPLE, LoadMode::Strict).expect("sample loads");
    let unit = map
        .place_unit(UnitKind::Swordsman, Vector2::new(1, 1))
        .expect("placement succeeds");

    assert_eq!(map.remove_unit(unit), Ok(Vector2::new(1, 1)));
    assert_eq!(map.remove_unit(unit), Err(MoveError::MissingUnit));
    assert!(query::occupant(&map, Vector2::new(1, 1)).is_none());
    assert!(map.units().into_vec().is_empty());
}

#[test]
fn listeners_fire_once_per_successful_mutation() {
    let map = Map::from_description(SAMPLE, LoadMode::Strict).expect("sample loads");
    let calls = counting_listener(&map);

    let unit = map
        .place_unit(UnitKind::Swordsman, Vector2::new(0, 0))
        .expect("placement succeeds");
    let _ = map.move_unit(unit, Vector2::new(1, 0)).expect("move succeeds");
    assert!(map.move_unit(unit, Vector2::new(2, 1)).is_err());
    map.set_terrain(Vector2::new(0, 0), Some(TerrainKind::River))
        .expect("terrain update succeeds");
    map.set_unit_alpha(unit, 0).expect("alpha update succeeds");
    let _ = map.remove_unit(unit).expect("removal succeeds");

    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[test]
fn unregistered_listener_is_not_notified() {
    let map = Map::new(2, 2);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let id = map.register_listener(Arc::new(move || {
        let _ = counter.fetch_add(1, Ordering::SeqCst);
    }));

    assert!(map.unregister_listener(id));
    map.set_terrain(Vector2::new(1, 1), Some(TerrainKind::Plain))
        .expect("terrain update succeeds");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn listeners_may_query_the_map_during_notification() {
    let map = Arc::new(Map::from_description(SAMPLE, LoadMode::Strict).expect("sample loads"));
    let observed = Arc::new(AtomicUsize::new(0));

    let weak = Arc::downgrade(&map);
    let seen = Arc::clone(&observed);
    let _ = map.register_listener(Arc::new(move || {
        if let Some(map) = weak.upgrade() {
            let _ = seen.fetch_add(map.units().iter().count(), Ordering::SeqCst);
        }
    }));

    let _ = map
        .place_unit(UnitKind::Swordsman, Vector2::new(0, 0))
        .expect("placement succeeds");
    assert_eq!(observed.load(Ordering::SeqCst), 1);
}

#[test]
fn load_terrain_replaces_terrain_and_notifies() {
    let map = Map::new(3, 2);
    let calls = counting_listener(&map);
    assert!(query::terrain_at(&map, Vector2::new(0, 0)).is_none());

    map.load_terrain(SAMPLE, LoadMode::Strict).expect("dimensions match");
    assert_eq!(query::terrain_at(&map, Vector2::new(2, 1)), Some(TerrainKind::Wall));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(
        map.load_terrain("1 1\np", LoadMode::Strict),
        Err(MapError::DimensionMismatch {
            width: 3,
            height: 2,
            found_width: 1,
            found_height: 1,
        })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_readers_always_see_one_consistent_occupant() {
    let map = Arc::new(Map::from_description("2 1\np p", LoadMode::Strict).expect("loads"));
    let unit = map
        .place_unit(UnitKind::Swordsman, Vector2::new(0, 0))
        .expect("placement succeeds");

    let reader = {
        let map = Arc::clone(&map);
        thread::spawn(move || {
            for _ in 0..500 {
                let grid = map.snapshot();
                let occupied = grid
                    .places()
                    .iter()
                    .filter(|place| place.occupant().is_some())
                    .count();
                assert_eq!(occupied, 1);
            }
        })
    };

    for step in 0..500 {
        let to = Vector2::new((step + 1) % 2, 0);
        let _ = map.move_unit(unit, to).expect("neighbor place is free");
    }

    reader.join().expect("reader thread completes");
}
