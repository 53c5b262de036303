//! Property tests for level generation and reachability repair.

use delve::generation::utils::create_rng;
use delve::{
    Difficulty, Direction, GenerationConfig, Generator, Item, LevelGenerator,
    ReachabilityEngine, RoomGraph, RoomId,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Normal),
        Just(Difficulty::Hard),
    ]
}

fn size_range(difficulty: Difficulty) -> std::ops::RangeInclusive<i32> {
    match difficulty {
        Difficulty::Easy => 4..=7,
        Difficulty::Normal => 5..=10,
        Difficulty::Hard => 7..=12,
    }
}

/// A full lattice with a barrier in roughly `percent` of the rooms.
fn barrier_lattice(width: i32, height: i32, percent: u32, rng: &mut StdRng) -> RoomGraph {
    let mut graph = RoomGraph::new();
    for y in 0..height {
        for x in 0..width {
            graph.create_room(x, y).unwrap();
        }
    }
    for y in 0..height {
        for x in 0..width {
            let id = RoomId::new(x, y);
            for direction in Direction::all() {
                graph.connect(id, direction, id.step(direction));
            }
            if id != RoomId::origin() && rng.gen_range(0..100) < percent {
                graph
                    .room_mut(id)
                    .unwrap()
                    .set_barrier(Item::barrier("Magical Barrier", "Shimmering", 15));
            }
        }
    }
    graph
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_levels_are_solvable(seed in any::<u64>(), difficulty in difficulty()) {
        let config = GenerationConfig::for_difficulty(seed, difficulty, 1);
        let mut rng = create_rng(&config);
        let level = LevelGenerator::for_difficulty(difficulty).generate(&config, &mut rng).unwrap();

        let engine = ReachabilityEngine::new();
        prop_assert!(engine.is_reachable(&level.graph, level.start, level.treasure));
    }

    #[test]
    fn grid_bounds_follow_difficulty(seed in any::<u64>(), difficulty in difficulty()) {
        let config = GenerationConfig::for_difficulty(seed, difficulty, 1);
        let mut rng = create_rng(&config);
        let level = LevelGenerator::for_difficulty(difficulty).generate(&config, &mut rng).unwrap();

        prop_assert!(size_range(difficulty).contains(&level.width));
        prop_assert!(size_range(difficulty).contains(&level.height));
        prop_assert_eq!(level.graph.len(), (level.width * level.height) as usize);
    }

    #[test]
    fn treasure_is_far_from_start(seed in any::<u64>(), difficulty in difficulty()) {
        let config = GenerationConfig::for_difficulty(seed, difficulty, 2);
        let mut rng = create_rng(&config);
        let level = LevelGenerator::for_difficulty(difficulty).generate(&config, &mut rng).unwrap();

        let min_distance = (level.width.max(level.height) / 2) as u32;
        prop_assert!(level.treasure.manhattan_distance(RoomId::origin()) >= min_distance);
        prop_assert_eq!(level.graph.rooms().filter(|r| r.has_treasure).count(), 1);
        prop_assert!(level.treasure_room().unwrap().has_treasure);
    }

    #[test]
    fn every_edge_has_a_target(seed in any::<u64>(), difficulty in difficulty()) {
        let config = GenerationConfig::for_difficulty(seed, difficulty, 1);
        let mut rng = create_rng(&config);
        let level = LevelGenerator::for_difficulty(difficulty).generate(&config, &mut rng).unwrap();

        for room in level.graph.rooms() {
            for target in room.exits.values() {
                prop_assert!(level.graph.contains(*target));
            }
        }
    }

    #[test]
    fn same_seed_reproduces_level(seed in any::<u64>(), difficulty in difficulty()) {
        let config = GenerationConfig::for_difficulty(seed, difficulty, 1);
        let generator = LevelGenerator::for_difficulty(difficulty);
        let a = generator.generate(&config, &mut create_rng(&config)).unwrap();
        let b = generator.generate(&config, &mut create_rng(&config)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn repaired_corridor_is_barrier_free(
        seed in any::<u64>(),
        width in 4i32..=12,
        height in 4i32..=12,
        percent in 40u32..=90,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = barrier_lattice(width, height, percent, &mut rng);
        let start = RoomId::origin();
        let target = RoomId::new(width - 1, height - 1);
        let engine = ReachabilityEngine::new();
        let before = engine.is_reachable(&graph, start, target);

        let repair = engine
            .ensure_reachable(&mut graph, start, target, width, height, &mut rng)
            .unwrap();

        prop_assert_eq!(repair.was_reachable, before);
        if !before {
            prop_assert_eq!(repair.corridor.first().copied(), Some(start));
            prop_assert_eq!(repair.corridor.last().copied(), Some(target));
            for id in &repair.corridor {
                prop_assert!(!graph.has_active_barrier(*id));
            }
        }
        prop_assert!(engine.is_reachable(&graph, start, target));
    }
}

#[test]
fn test_heavy_barriers_force_repair() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut graph = barrier_lattice(8, 8, 100, &mut rng);
    let start = RoomId::origin();
    let target = RoomId::new(7, 7);
    let engine = ReachabilityEngine::new();
    assert!(!engine.is_reachable(&graph, start, target));

    let repair = engine
        .ensure_reachable(&mut graph, start, target, 8, 8, &mut rng)
        .unwrap();
    assert!(!repair.was_reachable);
    assert!(repair.barriers_cleared > 0);
    assert!(engine.is_reachable(&graph, start, target));
}
