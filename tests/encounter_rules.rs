//! Encounter resolution rules: barrier thresholds, trap single-fire, puzzle
//! idempotence and hazard monotonicity.

use delve::{
    Difficulty, EncounterResolver, Item, Player, Puzzle, PuzzleAttempt, Room, RoomId,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn room() -> Room {
    Room::new(RoomId::new(3, 2), "A cold draft blows through this shadowy room.", "Dust.")
}

#[test]
fn test_barrier_threshold_exact() {
    for damage in [1u32, 10, 15, 19] {
        let mut pass = room();
        pass.set_barrier(Item::barrier("Magical Barrier", "Shimmering", damage));
        let mut player = Player::new("Tester", Difficulty::Normal);
        player.power = (2 * damage) as i32;
        let outcome = pass.enter(&mut player);
        assert!(outcome.barrier.as_ref().unwrap().cleared);
        assert!(!pass.has_active_barrier());

        let mut fail = room();
        fail.set_barrier(Item::barrier("Magical Barrier", "Shimmering", damage));
        let mut player = Player::new("Tester", Difficulty::Normal);
        player.power = (2 * damage) as i32 - 1;
        let outcome = fail.enter(&mut player);
        let check = outcome.barrier.unwrap();
        assert!(!check.cleared);
        assert_eq!(check.shortfall, 1);
        assert_eq!(player.power, (2 * damage) as i32 - 1);
    }
}

#[test]
fn test_trap_single_fire() {
    let mut room = room();
    room.add_item(Item::trap("Thorny Vines", "Sharp thorns", 10));
    let mut player = Player::new("Tester", Difficulty::Easy);

    room.enter(&mut player);
    room.enter(&mut player);
    assert_eq!(player.power, 90);
}

#[test]
fn test_puzzle_idempotence() {
    let resolver = EncounterResolver::new();
    let mut room = room();
    room.puzzle = Some(Puzzle::new(
        "What color am I thinking of? It rhymes with: bed",
        "red",
        "A color-guessing puzzle",
    ));
    let mut player = Player::new("Tester", Difficulty::Hard);
    let mut rng = StdRng::seed_from_u64(8);

    let first = resolver.attempt_puzzle(&mut room, &mut player, "RED", &mut rng);
    assert!(matches!(first, PuzzleAttempt::Solved { reward: 10, bonus_item: None }));
    let power = player.power;

    for _ in 0..3 {
        assert_eq!(
            resolver.attempt_puzzle(&mut room, &mut player, "red", &mut rng),
            PuzzleAttempt::AlreadySolved
        );
        assert_eq!(
            resolver.attempt_puzzle(&mut room, &mut player, "blue", &mut rng),
            PuzzleAttempt::AlreadySolved
        );
    }
    assert_eq!(player.power, power);
}

#[test]
fn test_unsolved_puzzle_surfaces_every_visit() {
    let mut room = room();
    room.puzzle = Some(Puzzle::new("What is 1 + 2?", "3", "A math puzzle"));
    let mut player = Player::new("Tester", Difficulty::Normal);

    for _ in 0..3 {
        let outcome = room.enter(&mut player);
        assert_eq!(outcome.puzzle.unwrap().question, "What is 1 + 2?");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn hazards_never_reactivate(
        damages in proptest::collection::vec(1u32..30, 1..5),
        barrier_damage in 1u32..60,
        powers in proptest::collection::vec(-20i32..150, 1..8),
    ) {
        let mut room = room();
        room.set_barrier(Item::barrier("Magical Barrier", "Shimmering", barrier_damage));
        for damage in &damages {
            room.add_item(Item::trap("Poison Trap", "Toxic", *damage));
        }

        let mut barrier_down = false;
        let mut fired = 0u32;
        for power in powers {
            let mut player = Player::new("Tester", Difficulty::Normal);
            player.power = power;
            let outcome = room.enter(&mut player);
            fired += outcome.damage_taken();

            let defeated = room.barrier.as_ref().unwrap().hazard().unwrap().is_defeated();
            prop_assert!(!(barrier_down && !defeated));
            barrier_down = defeated;
            prop_assert!(room.contents.iter().all(|item| item.is_active_hazard()));
        }
        prop_assert_eq!(fired, damages.iter().sum::<u32>());
    }
}
