use proptest::prelude::*;
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use seabattle::{
    attack, place, place_random, select_target, AiMemory, AttackResult, Coord, Difficulty,
    EngineError, Fleet, Grid, HuntDirection, Orientation, FLEET_COMPOSITION,
};

/// Fire at `targets` in order, ignoring the results.
fn fire_all(grid: &Grid, fleet: &Fleet, targets: &[(usize, usize)]) -> (Grid, Fleet) {
    let (mut grid, mut fleet) = (*grid, fleet.clone());
    for &t in targets {
        let shot = attack(&grid, &fleet, Coord::from(t));
        grid = shot.grid;
        fleet = shot.fleet;
    }
    (grid, fleet)
}

fn memory(last_hit: (usize, usize), hunt_direction: HuntDirection) -> AiMemory {
    AiMemory {
        last_hit: Some(Coord::from(last_hit)),
        hunt_direction,
    }
}

#[test]
fn test_medium_skips_fired_neighbour() {
    let mut rng = SmallRng::seed_from_u64(5);
    let (grid, _) = fire_all(&Grid::new(), &Fleet::new(), &[(5, 6)]);
    let mem = memory((5, 5), HuntDirection::Unknown);
    let pick = select_target(Difficulty::Medium, &mem, &grid, &mut rng).unwrap();
    assert_eq!(pick.coord, Coord::new(6, 5));
    assert_eq!(pick.memory, mem);
}

#[test]
fn test_medium_scan_order() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mem = memory((5, 5), HuntDirection::Unknown);
    let order = [(5, 6), (6, 5), (5, 4), (4, 5)];
    let mut fired = Vec::new();
    for expected in order {
        let (grid, _) = fire_all(&Grid::new(), &Fleet::new(), &fired);
        let pick = select_target(Difficulty::Medium, &mem, &grid, &mut rng).unwrap();
        assert_eq!(pick.coord, Coord::from(expected));
        fired.push(expected);
    }
    // All four neighbours gone: random, but never a fired cell.
    let (grid, _) = fire_all(&Grid::new(), &Fleet::new(), &fired);
    let pick = select_target(Difficulty::Medium, &mem, &grid, &mut rng).unwrap();
    assert!(grid.is_targetable(pick.coord));
}

#[test]
fn test_medium_at_edge_ignores_off_grid_neighbours() {
    let mut rng = SmallRng::seed_from_u64(9);
    let mem = memory((9, 9), HuntDirection::Unknown);
    let pick = select_target(Difficulty::Medium, &mem, &Grid::new(), &mut rng).unwrap();
    assert_eq!(pick.coord, Coord::new(9, 8));
}

#[test]
fn test_hard_locks_onto_horizontal_axis() {
    let mut rng = SmallRng::seed_from_u64(11);
    let (grid, ship) = place(&Grid::new(), Coord::new(5, 3), 4, Orientation::Horizontal).unwrap();
    let fleet = Fleet::new().with_ship(ship);
    let (grid, _) = fire_all(&grid, &fleet, &[(5, 4), (5, 5)]);

    let mem = memory((5, 5), HuntDirection::Unknown);
    let pick = select_target(Difficulty::Hard, &mem, &grid, &mut rng).unwrap();
    assert_eq!(pick.coord, Coord::new(5, 6));
    assert_eq!(pick.memory.hunt_direction, HuntDirection::Horizontal);
}

#[test]
fn test_hard_detects_vertical_axis() {
    let mut rng = SmallRng::seed_from_u64(11);
    let (grid, ship) = place(&Grid::new(), Coord::new(2, 2), 3, Orientation::Vertical).unwrap();
    let fleet = Fleet::new().with_ship(ship);
    let (grid, _) = fire_all(&grid, &fleet, &[(2, 2), (3, 2)]);

    let mem = memory((3, 2), HuntDirection::Unknown);
    let pick = select_target(Difficulty::Hard, &mem, &grid, &mut rng).unwrap();
    assert_eq!(pick.coord, Coord::new(4, 2));
    assert_eq!(pick.memory.hunt_direction, HuntDirection::Vertical);
}

#[test]
fn test_hard_stays_on_locked_axis() {
    let mut rng = SmallRng::seed_from_u64(2);
    let mem = memory((5, 5), HuntDirection::Vertical);
    // +col is open, but the axis is vertical.
    let pick = select_target(Difficulty::Hard, &mem, &Grid::new(), &mut rng).unwrap();
    assert_eq!(pick.coord, Coord::new(6, 5));

    let (grid, _) = fire_all(&Grid::new(), &Fleet::new(), &[(6, 5)]);
    let pick = select_target(Difficulty::Hard, &mem, &grid, &mut rng).unwrap();
    assert_eq!(pick.coord, Coord::new(4, 5));
    assert_eq!(pick.memory.hunt_direction, HuntDirection::Vertical);
}

#[test]
fn test_hard_exhausted_axis_falls_back_to_neighbours() {
    let mut rng = SmallRng::seed_from_u64(3);
    let (grid, ship) = place(&Grid::new(), Coord::new(5, 4), 2, Orientation::Horizontal).unwrap();
    let fleet = Fleet::new().with_ship(ship);
    // (5,4) hit, (5,5) hit, (5,6) missed: both horizontal neighbours of (5,5) are used up.
    let (grid, _) = fire_all(&grid, &fleet, &[(5, 4), (5, 5), (5, 6)]);

    let mem = memory((5, 5), HuntDirection::Horizontal);
    let pick = select_target(Difficulty::Hard, &mem, &grid, &mut rng).unwrap();
    assert_eq!(pick.coord, Coord::new(6, 5));
    assert_eq!(pick.memory.hunt_direction, HuntDirection::Unknown);
}

#[test]
fn test_no_targets_remaining() {
    let mut rng = SmallRng::seed_from_u64(0);
    let all: Vec<(usize, usize)> = (0..10).flat_map(|r| (0..10).map(move |c| (r, c))).collect();
    let (grid, _) = fire_all(&Grid::new(), &Fleet::new(), &all);
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let mem = memory((5, 5), HuntDirection::Horizontal);
        assert_eq!(
            select_target(difficulty, &mem, &grid, &mut rng).unwrap_err(),
            EngineError::NoTargetsRemaining
        );
    }
}

#[test]
fn test_memory_update_rule() {
    let at = Coord::new(3, 3);
    let locked = memory((2, 3), HuntDirection::Vertical);

    assert_eq!(locked.observe(at, AttackResult::Miss), AiMemory::default());
    assert_eq!(locked.observe(at, AttackResult::Invalid), locked);
    assert_eq!(
        locked.observe(at, AttackResult::Hit),
        memory((3, 3), HuntDirection::Vertical)
    );
    assert_eq!(
        locked.observe(at, AttackResult::HitAndSunk),
        memory((3, 3), HuntDirection::Unknown)
    );
    assert_eq!(locked.observe(at, AttackResult::FleetDefeated), AiMemory::default());
}

#[test]
fn test_difficulty_parsing() {
    assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
    assert_eq!(" Medium ".parse::<Difficulty>(), Ok(Difficulty::Medium));
    assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
    assert_eq!(
        "extreme".parse::<Difficulty>(),
        Err(EngineError::UnknownDifficulty("extreme".to_string()))
    );
    assert_eq!(Difficulty::Hard.to_string(), "hard");
    assert_eq!(Difficulty::default(), Difficulty::Medium);
}

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard)
    ]
}

fn direction() -> impl Strategy<Value = HuntDirection> {
    prop_oneof![
        Just(HuntDirection::Unknown),
        Just(HuntDirection::Horizontal),
        Just(HuntDirection::Vertical)
    ]
}

/// A random fleet with `shots` random cells already fired upon.
fn battered(seed: u64, shots: usize) -> (Grid, SmallRng) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let (grid, fleet) = place_random(&FLEET_COMPOSITION, &mut rng).unwrap();
    let mut targets = grid.targetable();
    targets.shuffle(&mut rng);
    let targets: Vec<(usize, usize)> = targets
        .into_iter()
        .take(shots)
        .map(|c| (c.row, c.col))
        .collect();
    let (grid, _) = fire_all(&grid, &fleet, &targets);
    (grid, rng)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn ai_never_picks_a_fired_cell(
        seed in any::<u64>(),
        shots in 0..100usize,
        level in difficulty(),
        dir in direction(),
        last in proptest::option::of((0..10usize, 0..10usize)),
    ) {
        let (grid, mut rng) = battered(seed, shots);
        let mem = AiMemory { last_hit: last.map(Coord::from), hunt_direction: dir };
        let pick = select_target(level, &mem, &grid, &mut rng).unwrap();
        prop_assert!(grid.is_targetable(pick.coord));
    }

    #[test]
    fn locked_axis_is_kept_while_it_has_open_cells(
        seed in any::<u64>(),
        shots in 0..90usize,
        row in 0..10usize,
        col in 0..10usize,
        horizontal in any::<bool>(),
    ) {
        let (grid, mut rng) = battered(seed, shots);
        let last = Coord::new(row, col);
        let (dir, steps) = if horizontal {
            (HuntDirection::Horizontal, [(0, 1), (0, -1)])
        } else {
            (HuntDirection::Vertical, [(1, 0), (-1, 0)])
        };
        let axis: Vec<Coord> = steps
            .iter()
            .filter_map(|&(dr, dc)| last.offset(dr, dc))
            .filter(|&c| grid.is_targetable(c))
            .collect();
        let mem = AiMemory { last_hit: Some(last), hunt_direction: dir };
        let pick = select_target(Difficulty::Hard, &mem, &grid, &mut rng).unwrap();
        if axis.is_empty() {
            prop_assert_eq!(pick.memory.hunt_direction, HuntDirection::Unknown);
        } else {
            prop_assert_eq!(pick.coord, axis[0]);
            prop_assert_eq!(pick.memory.hunt_direction, dir);
        }
    }
}
