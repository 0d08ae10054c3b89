use grid_tactics_core::{Command, Event, MoveError, UnitId, UnitKind, Vector2};
use grid_tactics_system_movement::{Movement, ReachPolicy};
use grid_tactics_world::{self as world, query, LoadMode, Map};

const VALLEY_CROSSING: &str = "\
5 5
p p p p p
p f v f p
p v p v p
p m v r p
p p bv br p
";

fn place_swordsman(map: &Map, at: Vector2) -> UnitId {
    let mut events = Vec::new();
    world::apply(
        map,
        Command::PlaceUnit {
            kind: UnitKind::Swordsman,
            position: at,
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::UnitPlaced { unit, .. }] => *unit,
        other => panic!("placement failed: {other:?}"),
    }
}

#[test]
fn reachable_cells_stay_within_the_diamond_and_on_walkable_terrain() {
    let map = Map::from_description(VALLEY_CROSSING, LoadMode::Strict).expect("map loads");
    let unit = place_swordsman(&map, Vector2::new(2, 2));

    let reachable = Movement::default()
        .reachable_on(&map, unit)
        .expect("unit exists");

    assert!(reachable.contains(&Vector2::new(2, 2)));
    for cell in &reachable {
        assert!(cell.manhattan_distance(Vector2::new(2, 2)) <= 2);
        let terrain = query::terrain_at(&map, *cell).expect("terrain present");
        assert!(
            UnitKind::Swordsman.can_traverse_kind(terrain),
            "{cell:?} holds {terrain:?}"
        );
    }
    assert!(!reachable.contains(&Vector2::new(2, 1)), "valley must be excluded");
    assert!(reachable.contains(&Vector2::new(2, 0)), "shape jumps the valley");
}

#[test]
fn connected_policy_is_blocked_by_surrounding_valleys() {
    let map = Map::from_description(VALLEY_CROSSING, LoadMode::Strict).expect("map loads");
    let unit = place_swordsman(&map, Vector2::new(2, 2));

    let reachable = Movement::new(ReachPolicy::Connected, true)
        .reachable_on(&map, unit)
        .expect("unit exists");

    assert_eq!(reachable, vec![Vector2::new(2, 2)]);
}

#[test]
fn connected_policy_walks_around_obstacles() {
    let map = Map::from_description("3 3\np w p\np w p\np p p", LoadMode::Strict).expect("map loads");
    let unit = place_swordsman(&map, Vector2::new(0, 0));

    let reachable = Movement::new(ReachPolicy::Connected, true)
        .reachable_on(&map, unit)
        .expect("unit exists");

    assert_eq!(
        reachable,
        vec![Vector2::new(0, 0), Vector2::new(0, 1), Vector2::new(0, 2)]
    );
}

#[test]
fn occupied_cells_are_excluded_only_when_configured() {
    let map = Map::from_description("3 1\np p p", LoadMode::Strict).expect("map loads");
    let mover = place_swordsman(&map, Vector2::new(0, 0));
    let _blocker = place_swordsman(&map, Vector2::new(1, 0));

    let respecting = Movement::new(ReachPolicy::Shape, true)
        .reachable_on(&map, mover)
        .expect("unit exists");
    assert_eq!(respecting, vec![Vector2::new(0, 0), Vector2::new(2, 0)]);

    let ignoring = Movement::new(ReachPolicy::Shape, false)
        .reachable_on(&map, mover)
        .expect("unit exists");
    assert_eq!(
        ignoring,
        vec![Vector2::new(0, 0), Vector2::new(1, 0), Vector2::new(2, 0)]
    );

    let connected = Movement::new(ReachPolicy::Connected, true)
        .reachable_on(&map, mover)
        .expect("unit exists");
    assert_eq!(connected, vec![Vector2::new(0, 0)]);
}

#[test]
fn planned_moves_apply_cleanly() {
    let map = Map::from_description(VALLEY_CROSSING, LoadMode::Strict).expect("map loads");
    let unit = place_swordsman(&map, Vector2::new(0, 0));
    let movement = Movement::default();

    let command = movement
        .plan_move(&map, unit, Vector2::new(1, 1))
        .expect("forest within range");
    assert_eq!(
        command,
        Command::MoveUnit {
            unit,
            to: Vector2::new(1, 1),
        }
    );

    let mut events = Vec::new();
    world::apply(&map, command, &mut events);
    assert_eq!(
        events,
        vec![Event::UnitMoved {
            unit,
            from: Vector2::new(0, 0),
            to: Vector2::new(1, 1),
        }]
    );
}

#[test]
fn plan_move_explains_rejections() {
    let map = Map::from_description(VALLEY_CROSSING, LoadMode::Strict).expect("map loads");
    let unit = place_swordsman(&map, Vector2::new(1, 1));
    let _other = place_swordsman(&map, Vector2::new(0, 1));
    let movement = Movement::default();

    assert_eq!(
        movement.plan_move(&map, unit, Vector2::new(-1, 1)),
        Err(MoveError::OutOfBounds)
    );
    assert_eq!(
        movement.plan_move(&map, unit, Vector2::new(4, 4)),
        Err(MoveError::Unreachable)
    );
    assert_eq!(
        movement.plan_move(&map, unit, Vector2::new(0, 1)),
        Err(MoveError::Occupied)
    );
    assert_eq!(
        movement.plan_move(&map, unit, Vector2::new(2, 1)),
        Err(MoveError::Untraversable)
    );
    assert_eq!(
        movement.plan_move(&map, UnitId::new(77), Vector2::new(0, 0)),
        Err(MoveError::MissingUnit)
    );
}

#[test]
fn reachability_is_deterministic() {
    let map = Map::from_description(VALLEY_CROSSING, LoadMode::Strict).expect("map loads");
    let unit = place_swordsman(&map, Vector2::new(4, 4));
    let movement = Movement::new(ReachPolicy::Connected, true);

    let first = movement.reachable_on(&map, unit).expect("unit exists");
    let second = movement.reachable_on(&map, unit).expect("unit exists");
    assert_eq!(first, second);
    assert!(first.contains(&Vector2::new(2, 4)), "bridges are walkable");
}

#[test]
fn reachability_follows_a_unit_moved_from_another_thread() {
    let map = std::sync::Arc::new(
        Map::from_description("5 1\np p p p p", LoadMode::Strict).expect("map loads"),
    );
    let unit = place_swordsman(&map, Vector2::new(0, 0));
    let west: Vec<Vector2> = (0..=2).map(|x| Vector2::new(x, 0)).collect();
    let east: Vec<Vector2> = (2..=4).map(|x| Vector2::new(x, 0)).collect();

    let mover = {
        let map = std::sync::Arc::clone(&map);
        std::thread::spawn(move || {
            for step in 0..200 {
                let to = if step % 2 == 0 { 4 } else { 0 };
                let _ = map.move_unit(unit, Vector2::new(to, 0)).expect("row is open");
            }
        })
    };

    let movement = Movement::default();
    for _ in 0..200 {
        let reachable = movement.reachable_on(&map, unit).expect("unit exists");
        assert!(reachable == west || reachable == east, "{reachable:?}");
    }
    mover.join().expect("mover thread finished");
}
