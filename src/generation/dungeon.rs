//! # Dungeon Generation
//!
//! Builds a full rectangular grid of rooms, decorates it, places the
//! treasure and then proves (or repairs) that the treasure can be reached
//! from the start despite the barriers laid over the grid.

use crate::{
    generation::utils::roll_percent, DelveError, DelveResult, Difficulty, Direction,
    GenerationConfig, Generator, Item, ItemFactory, ItemSource, Level, PuzzleGenerator,
    ReachabilityEngine, Room, RoomGraph, RoomId,
};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

const DESCRIPTIONS: &[&str] = &[
    "You are in a dark room.",
    "You find yourself in a dimly lit chamber.",
    "You enter a mysterious room with ancient markings.",
    "This room is filled with echoes of the past.",
    "A cold draft blows through this shadowy room.",
];

const DETAILED_DESCRIPTIONS: &[&str] = &[
    "This is a dimly lit room with rough stone walls. You can barely make out the outlines of the room in the flickering light.",
    "Ancient runes cover the walls of this chamber, glowing faintly in the darkness.",
    "Cobwebs hang from the ceiling, and the air is thick with dust and mystery.",
    "The stone floor is worn smooth by countless footsteps of those who came before.",
    "Strange symbols are etched into the walls, their meaning lost to time.",
];

/// Grid level generator.
///
/// Generation runs in a fixed order so a seed always yields the same level:
/// size, rooms, treasure position, decorations, lattice edges, treasure
/// loot, barrier overlay and finally path repair.
#[derive(Debug, Clone)]
pub struct LevelGenerator<S: ItemSource = ItemFactory> {
    pub items: S,
    pub reachability: ReachabilityEngine,
    pub puzzles: PuzzleGenerator,
}

impl LevelGenerator<ItemFactory> {
    /// Creates a generator whose items are tuned for `difficulty`.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::with_items(ItemFactory::for_difficulty(difficulty))
    }
}

impl<S: ItemSource> LevelGenerator<S> {
    /// Creates a generator drawing items from `items`.
    pub fn with_items(items: S) -> Self {
        Self {
            items,
            reachability: ReachabilityEngine::new(),
            puzzles: PuzzleGenerator::new(),
        }
    }

    fn pick_size(&self, config: &GenerationConfig, rng: &mut StdRng) -> (i32, i32) {
        let width = rng.gen_range(config.min_size..=config.max_size);
        let height = rng.gen_range(config.min_size..=config.max_size);
        (width, height)
    }

    fn build_grid(&self, width: i32, height: i32, rng: &mut StdRng) -> DelveResult<RoomGraph> {
        let mut graph = RoomGraph::new();
        for y in 0..height {
            for x in 0..width {
                let description = DESCRIPTIONS.choose(rng).copied().unwrap_or_default();
                let detailed = DETAILED_DESCRIPTIONS
                    .choose(rng)
                    .copied()
                    .unwrap_or_default();
                graph.insert_room(Room::new(RoomId::new(x, y), description, detailed))?;
            }
        }
        Ok(graph)
    }

    /// Rejection-samples a treasure cell far enough from the start.
    fn pick_treasure(&self, width: i32, height: i32, rng: &mut StdRng) -> RoomId {
        let min_distance = (width.max(height) / 2) as u32;
        loop {
            let candidate = RoomId::new(rng.gen_range(0..width), rng.gen_range(0..height));
            if candidate.manhattan_distance(RoomId::origin()) >= min_distance {
                return candidate;
            }
        }
    }

    fn decorate(
        &self,
        graph: &mut RoomGraph,
        skip: [RoomId; 2],
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<()> {
        let ids: Vec<RoomId> = graph.ids().filter(|id| !skip.contains(id)).collect();
        for id in ids {
            let item = if roll_percent(rng, config.item_chance) {
                if roll_percent(rng, config.hazard_item_chance) {
                    Some(self.items.random_negative(rng))
                } else {
                    Some(self.items.random_item(rng))
                }
            } else {
                None
            };
            let puzzle = if roll_percent(rng, config.puzzle_chance) {
                Some(self.puzzles.generate(config, rng)?)
            } else {
                None
            };
            let hidden = roll_percent(rng, config.hidden_chance);

            if let Some(room) = graph.room_mut(id) {
                room.contents.extend(item);
                room.puzzle = puzzle;
                room.has_hidden_passages = hidden;
            }
        }
        Ok(())
    }

    fn connect_lattice(&self, graph: &mut RoomGraph, width: i32, height: i32) {
        for y in 0..height {
            for x in 0..width {
                let id = RoomId::new(x, y);
                for direction in Direction::all() {
                    graph.connect(id, direction, id.step(direction));
                }
            }
        }
    }

    fn seed_treasure(&self, graph: &mut RoomGraph, treasure: RoomId) {
        if let Some(room) = graph.room_mut(treasure) {
            room.has_treasure = true;
            room.add_item(Item::healing(
                "Legendary Healing Crystal",
                "A rare crystal pulsing with restorative energy",
                50,
                false,
            ));
            room.add_item(Item::tool(
                "Ancient Mystic Staff",
                "A powerful magical artifact from a forgotten age",
                30,
                false,
                true,
            ));
        }
    }

    /// Lays barriers and extra traps, harder in the middle of the grid.
    fn overlay_barriers(
        &self,
        graph: &mut RoomGraph,
        skip: [RoomId; 2],
        width: i32,
        height: i32,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> usize {
        let strength = config.difficulty.barrier_strength();
        let mut placed = 0;
        let ids: Vec<RoomId> = graph.ids().filter(|id| !skip.contains(id)).collect();

        for id in ids {
            let middle = id.x > width / 4
                && id.x < 3 * width / 4
                && id.y > height / 4
                && id.y < 3 * height / 4;
            let (blocked_chance, negative_chance) = if middle {
                (
                    config.blocked_chance + config.middle_boost,
                    config.negative_chance + config.middle_negative_boost,
                )
            } else {
                (config.blocked_chance, config.negative_chance)
            };

            let barrier = roll_percent(rng, blocked_chance).then(|| self.items.barrier(strength));
            let trap = roll_percent(rng, negative_chance).then(|| self.items.random_negative(rng));

            if let Some(room) = graph.room_mut(id) {
                if let Some(barrier) = barrier {
                    room.set_barrier(barrier);
                    placed += 1;
                }
                room.contents.extend(trap);
            }
        }
        placed
    }
}

impl Default for LevelGenerator<ItemFactory> {
    fn default() -> Self {
        Self::with_items(ItemFactory::default())
    }
}

impl<S: ItemSource> Generator<Level> for LevelGenerator<S> {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Level> {
        config.validate()?;

        let (width, height) = self.pick_size(config, rng);
        let mut graph = self.build_grid(width, height, rng)?;
        let start = RoomId::origin();
        let treasure = self.pick_treasure(width, height, rng);
        debug!(
            "Level {} ({}): {}x{} grid, treasure at {}",
            config.level_number, config.difficulty, width, height, treasure
        );

        self.decorate(&mut graph, [start, treasure], config, rng)?;
        self.connect_lattice(&mut graph, width, height);
        self.seed_treasure(&mut graph, treasure);
        let barriers = self.overlay_barriers(&mut graph, [start, treasure], width, height, config, rng);
        debug!("Placed {} barriers", barriers);

        let mut reachability = self.reachability.clone();
        reachability.detour_chance = config.detour_chance;
        let repair = reachability.ensure_reachable(&mut graph, start, treasure, width, height, rng)?;
        if !repair.was_reachable {
            debug!(
                "Repaired level {}: corridor of {} rooms",
                config.level_number,
                repair.corridor.len()
            );
        }

        let level = Level {
            number: config.level_number,
            difficulty: config.difficulty,
            width,
            height,
            graph,
            start,
            treasure,
        };
        debug_assert!(level.is_solvable());
        self.validate(&level, config)?;
        Ok(level)
    }

    fn validate(&self, level: &Level, config: &GenerationConfig) -> DelveResult<()> {
        let sizes = config.min_size..=config.max_size;
        if !sizes.contains(&level.width) || !sizes.contains(&level.height) {
            return Err(DelveError::GenerationFailed(format!(
                "Grid {}x{} is outside {}..={}",
                level.width, level.height, config.min_size, config.max_size
            )));
        }

        let treasures = level.graph.rooms().filter(|r| r.has_treasure).count();
        if treasures != 1 || !level.treasure_room().is_some_and(|r| r.has_treasure) {
            return Err(DelveError::GenerationFailed(format!(
                "Expected exactly one treasure room, found {}",
                treasures
            )));
        }

        let min_distance = (level.width.max(level.height) / 2) as u32;
        if level.treasure.manhattan_distance(level.start) < min_distance {
            return Err(DelveError::GenerationFailed(format!(
                "Treasure {} is closer than {} to the start",
                level.treasure, min_distance
            )));
        }

        if !self.reachability.is_reachable(&level.graph, level.start, level.treasure) {
            return Err(DelveError::GenerationFailed(
                "Treasure room is unreachable from the start".to_string(),
            ));
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "LevelGenerator"
    }
}

/// Generates a level with the default item factory for `difficulty`.
///
/// # Examples
///
/// ```
/// use delve::{generate_level, Difficulty};
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let level = generate_level(Difficulty::Easy, 1, &mut rng).unwrap();
/// assert!((4..=7).contains(&level.width));
/// assert!(level.is_solvable());
/// ```
pub fn generate_level(
    difficulty: Difficulty,
    level_number: u32,
    rng: &mut StdRng,
) -> DelveResult<Level> {
    let config = GenerationConfig::for_difficulty(rng.gen(), difficulty, level_number);
    LevelGenerator::for_difficulty(difficulty).generate(&config, rng)
}
