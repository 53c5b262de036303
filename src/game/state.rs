//! # Adventure Session
//!
//! The explicitly constructed session that sequences player commands,
//! turns and progression across levels.
//!
//! A session moves through `Unset -> Selecting -> Running`, drops to
//! `Restarting` when the player's power is depleted and ends in `Ended`
//! after victory, quitting or declining a restart.

use crate::{
    config, Command, DelveError, DelveResult, Difficulty, Direction, EncounterOutcome,
    EncounterResolver, GenerationConfig, Generator, ItemFactory, Level, LevelGenerator, Player,
    PuzzleAttempt, Room,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

const TIPS: &[&str] = &[
    "Remember to check your inventory often!",
    "Some puzzles might require specific items to solve.",
    "Exploring thoroughly can reveal hidden passages and treasures.",
    "Your choices matter - they might affect the game's outcome!",
    "Don't forget to save your progress regularly.",
    "Use the 'look' command to examine your surroundings in detail.",
    "Stuck? Try using the 'hint' command for a random tip!",
    "The 'map' command shows where you've been - use it to avoid getting lost!",
    "Negative items can be dangerous, but sometimes risk brings great rewards.",
    "Solving puzzles can often yield valuable rewards or reveal secrets.",
];

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Unset,
    Selecting,
    Running,
    /// Power depleted; waiting for a restart or the end of the game
    Restarting,
    Ended,
}

/// How the adventure finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionState {
    Playing,
    /// Every level's treasure was found
    Victory,
    /// The player declined to restart after depletion
    Depleted,
    Quit,
}

/// Progress counters for the whole session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub moves: u32,
    pub rooms_discovered: u32,
    pub traps_triggered: u32,
    pub damage_taken: u64,
    pub barriers_cleared: u32,
    pub puzzles_solved: u32,
    pub wrong_answers: u32,
    pub items_collected: u32,
    pub secrets_found: u32,
    pub restarts: u32,
    pub levels_completed: u32,
}

impl SessionStatistics {
    /// Creates zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts what happened during a room entry.
    pub fn update_from_encounter(&mut self, outcome: &EncounterOutcome) {
        if outcome.first_visit {
            self.rooms_discovered += 1;
        }
        self.traps_triggered += outcome.traps_triggered.len() as u32;
        self.damage_taken += outcome.damage_taken() as u64;
        if outcome.barrier.as_ref().is_some_and(|b| b.cleared) {
            self.barriers_cleared += 1;
        }
    }

    /// Counts the result of a puzzle answer.
    pub fn update_from_puzzle(&mut self, attempt: &PuzzleAttempt) {
        match attempt {
            PuzzleAttempt::Solved { .. } => self.puzzles_solved += 1,
            PuzzleAttempt::Wrong { .. } => self.wrong_answers += 1,
            _ => {}
        }
    }
}

/// What a session call produced for the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub message: String,
    pub phase: SessionPhase,
    /// The room encounter this call triggered, if any
    pub encounter: Option<EncounterOutcome>,
}

/// A single adventure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdventureSession {
    /// Seed the session RNG was created from
    pub seed: u64,
    pub phase: SessionPhase,
    pub completion: CompletionState,
    pub player: Option<Player>,
    pub level: Option<Level>,
    /// One-based index of the current level
    pub level_index: u32,
    pub level_count: u32,
    /// Commands executed so far
    pub turn: u64,
    pub statistics: SessionStatistics,
    pub items: ItemFactory,
    #[serde(skip, default = "unseeded_rng")]
    rng: StdRng,
}

fn unseeded_rng() -> StdRng {
    StdRng::seed_from_u64(0)
}

impl AdventureSession {
    /// Creates a session with the default number of levels.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{AdventureSession, Difficulty, SessionPhase};
    ///
    /// let mut session = AdventureSession::new(7);
    /// session.begin().unwrap();
    /// session.select_difficulty(Difficulty::Easy).unwrap();
    /// assert_eq!(session.phase, SessionPhase::Running);
    /// assert_eq!(session.level_index, 1);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self::with_level_count(seed, config::DEFAULT_LEVEL_COUNT)
    }

    /// Creates a session with a custom number of levels.
    pub fn with_level_count(seed: u64, level_count: u32) -> Self {
        Self {
            seed,
            phase: SessionPhase::Unset,
            completion: CompletionState::Playing,
            player: None,
            level: None,
            level_index: 0,
            level_count: level_count.max(1),
            turn: 0,
            statistics: SessionStatistics::new(),
            items: ItemFactory::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Moves to difficulty selection.
    pub fn begin(&mut self) -> DelveResult<String> {
        self.expect_phase(SessionPhase::Unset)?;
        self.phase = SessionPhase::Selecting;
        Ok([
            "Welcome to the dungeon!",
            "Select your difficulty:",
            "1. EASY   - more healing, weaker barriers, easier puzzles",
            "2. NORMAL - the intended challenge",
            "3. HARD   - scarce healing, stronger barriers, harder puzzles",
            "Enter difficulty (1-3):",
        ]
        .join("\n"))
    }

    /// Creates the player, builds the first level and enters its start room.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> DelveResult<CommandOutcome> {
        self.expect_phase(SessionPhase::Selecting)?;

        self.items = ItemFactory::for_difficulty(difficulty);
        self.player = Some(Player::new("Adventurer", difficulty));
        self.level_index = 1;
        self.level = Some(self.generate_level(difficulty)?);
        self.phase = SessionPhase::Running;
        info!("Difficulty set to {}, starting level 1 of {}", difficulty, self.level_count);

        let power = self.player.as_ref().map_or(0, |p| p.power);
        let encounter = self.enter_start()?;
        let message = format!(
            "Difficulty set to: {}\nYour adventure begins with {} Power Points.\n\n{}\n\nTip: {}",
            difficulty,
            power,
            encounter.message,
            self.tip()
        );
        Ok(self.outcome(message, Some(encounter)))
    }

    /// Executes one command while the adventure is running.
    pub fn execute(&mut self, command: Command) -> DelveResult<CommandOutcome> {
        self.expect_phase(SessionPhase::Running)?;
        self.turn += 1;

        match command {
            Command::Move(direction) => self.handle_move(direction),
            Command::Look => {
                let text = self.current_room()?.look();
                Ok(self.outcome(text, None))
            }
            Command::Take(name) => self.handle_take(&name),
            Command::Use(name) => self.handle_use(&name),
            Command::Drop(name) => self.handle_drop(&name),
            Command::Inventory => {
                let text = self.inventory_text()?;
                Ok(self.outcome(text, None))
            }
            Command::Solve(None) => self.show_puzzle(),
            Command::Solve(Some(answer)) => self.handle_answer(&answer),
            Command::Reveal => self.handle_reveal(),
            Command::Status => {
                let text = self.status_text()?;
                Ok(self.outcome(text, None))
            }
            Command::Map => {
                let text = self.map_text()?;
                Ok(self.outcome(text, None))
            }
            Command::Help => Ok(self.outcome(Command::help_text(), None)),
            Command::Hint => {
                let text = format!("Tip: {}", self.tip());
                Ok(self.outcome(text, None))
            }
            Command::Quit => Ok(self.end_game()),
        }
    }

    /// Replaces the current level with a freshly generated one for the same
    /// index and resets the player.
    pub fn restart_level(&mut self) -> DelveResult<CommandOutcome> {
        self.expect_phase(SessionPhase::Restarting)?;

        let difficulty = self.player()?.difficulty;
        self.level = Some(self.generate_level(difficulty)?);
        if let Some(player) = self.player.as_mut() {
            player.reset_for_restart();
        }
        self.statistics.restarts += 1;
        self.phase = SessionPhase::Running;
        info!("Restarted level {}", self.level_index);

        let power = self.player()?.power;
        let encounter = self.enter_start()?;
        let message = format!(
            "=== Level Restarted ===\nYour power has been restored to {} points.\n{}\n\nTip: {}",
            power,
            encounter.message,
            self.tip()
        );
        Ok(self.outcome(message, Some(encounter)))
    }

    /// Ends the adventure and reports the final score.
    pub fn end_game(&mut self) -> CommandOutcome {
        self.completion = match self.phase {
            SessionPhase::Restarting => CompletionState::Depleted,
            _ if self.completion == CompletionState::Victory => CompletionState::Victory,
            _ => CompletionState::Quit,
        };
        self.phase = SessionPhase::Ended;
        info!("Game ended: {:?}, score {}", self.completion, self.score());

        let message = format!("{}\nThanks for playing! Goodbye!", self.summary());
        self.outcome(message, None)
    }

    /// Power plus ten per visited room plus five per carried item.
    pub fn score(&self) -> i32 {
        self.player.as_ref().map_or(0, |p| {
            p.power + p.visited_rooms.len() as i32 * 10 + p.inventory.len() as i32 * 5
        })
    }

    /// Whether the adventure has ended.
    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    /// The room the player is standing in.
    pub fn current_room(&self) -> DelveResult<&Room> {
        let id = self
            .player()?
            .location
            .ok_or_else(|| DelveError::InvalidState("Player location not initialized".to_string()))?;
        self.level()?
            .room(id)
            .ok_or_else(|| DelveError::InvalidState(format!("Room {} does not exist", id)))
    }

    /// The current player.
    pub fn player(&self) -> DelveResult<&Player> {
        self.player
            .as_ref()
            .ok_or_else(|| DelveError::InvalidState("No player found".to_string()))
    }

    /// The current level.
    pub fn level(&self) -> DelveResult<&Level> {
        self.level
            .as_ref()
            .ok_or_else(|| DelveError::InvalidState("No level loaded".to_string()))
    }

    /// A random gameplay tip.
    pub fn tip(&mut self) -> &'static str {
        TIPS.choose(&mut self.rng).copied().unwrap_or(TIPS[0])
    }

    /// Final summary lines.
    pub fn summary(&self) -> String {
        let (power, rooms, items) = self.player.as_ref().map_or((0, 0, 0), |p| {
            (p.power, p.visited_rooms.len(), p.inventory.len())
        });
        let title = match self.completion {
            CompletionState::Victory => "=== GAME COMPLETE! ===",
            _ => "=== GAME OVER ===",
        };
        format!(
            "{}\nFinal Score: {}\nPower Points: {}\nRooms Explored: {}\nItems Collected: {}\nLevels Completed: {}/{}",
            title,
            self.score(),
            power,
            rooms,
            items,
            self.statistics.levels_completed,
            self.level_count
        )
    }

    /// Serializes the session to JSON. The RNG is not included.
    pub fn save_to_json(&self) -> DelveResult<String> {
        serde_json::to_string_pretty(self).map_err(DelveError::from)
    }

    /// Restores a session from JSON and reseeds its RNG from the stored
    /// seed and turn counter.
    pub fn load_from_json(json: &str) -> DelveResult<Self> {
        let mut session: AdventureSession = serde_json::from_str(json)?;
        session.check_loaded()?;
        session.rng = StdRng::seed_from_u64(session.seed.wrapping_add(session.turn));
        Ok(session)
    }

    /// Writes the session as JSON to `path`.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> DelveResult<()> {
        std::fs::write(path, self.save_to_json()?)?;
        Ok(())
    }

    /// Reads a session saved with [`AdventureSession::save_to_path`].
    pub fn load_from_path(path: impl AsRef<Path>) -> DelveResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::load_from_json(&json)
    }

    fn check_loaded(&self) -> DelveResult<()> {
        if !matches!(self.phase, SessionPhase::Running | SessionPhase::Restarting) {
            return Ok(());
        }
        let located = match (&self.player, &self.level) {
            (Some(player), Some(level)) => player.location.is_some_and(|id| level.room(id).is_some()),
            _ => false,
        };
        if !located {
            warn!("Rejected saved session: player is not inside the saved level");
            return Err(DelveError::InvalidState(
                "Saved session has no valid player location".to_string(),
            ));
        }
        Ok(())
    }

    fn expect_phase(&self, phase: SessionPhase) -> DelveResult<()> {
        if self.phase != phase {
            return Err(DelveError::InvalidState(format!(
                "Expected session phase {:?}, found {:?}",
                phase, self.phase
            )));
        }
        Ok(())
    }

    fn outcome(&self, message: String, encounter: Option<EncounterOutcome>) -> CommandOutcome {
        CommandOutcome {
            message,
            phase: self.phase,
            encounter,
        }
    }

    fn generate_level(&mut self, difficulty: Difficulty) -> DelveResult<Level> {
        let config = GenerationConfig::for_difficulty(self.rng.gen(), difficulty, self.level_index);
        LevelGenerator::with_items(self.items.clone()).generate(&config, &mut self.rng)
    }

    fn enter_start(&mut self) -> DelveResult<EncounterOutcome> {
        let (player, level) = match (self.player.as_mut(), self.level.as_mut()) {
            (Some(player), Some(level)) => (player, level),
            _ => return Err(DelveError::InvalidState("No adventure in progress".to_string())),
        };
        let start = level.start;
        let room = level
            .room_mut(start)
            .ok_or_else(|| DelveError::InvalidState("Level has no start room".to_string()))?;
        let encounter = EncounterResolver::new().on_enter(room, player);
        self.statistics.update_from_encounter(&encounter);
        Ok(encounter)
    }

    fn handle_move(&mut self, direction: Direction) -> DelveResult<CommandOutcome> {
        let (player, level) = match (self.player.as_mut(), self.level.as_mut()) {
            (Some(player), Some(level)) => (player, level),
            _ => return Err(DelveError::InvalidState("No adventure in progress".to_string())),
        };
        let here = player
            .location
            .ok_or_else(|| DelveError::InvalidState("Player location not initialized".to_string()))?;
        let room = level
            .room(here)
            .ok_or_else(|| DelveError::InvalidState(format!("Room {} does not exist", here)))?;

        let target = match room.exit(direction) {
            Some(target) => target,
            None => {
                let message = format!(
                    "You cannot go {} from here. Available exits: {}",
                    direction,
                    room.exit_names().join(", ")
                );
                return Ok(self.outcome(message, None));
            }
        };

        if let Some(notice) = room.barrier_notice() {
            if !player.visited_rooms.contains(&target) {
                let message = format!("{}\nYou can only retreat the way you came.", notice);
                return Ok(self.outcome(message, None));
            }
        }

        let room = level
            .room_mut(target)
            .ok_or_else(|| DelveError::InvalidState(format!("Room {} does not exist", target)))?;
        let encounter = EncounterResolver::new().on_enter(room, player);
        self.statistics.moves += 1;
        self.statistics.update_from_encounter(&encounter);

        if encounter.depleted {
            player.location = Some(here);
            self.phase = SessionPhase::Restarting;
            info!("Player depleted on level {}", self.level_index);
            let message = format!(
                "{}\n\n=== GAME OVER ===\nWould you like to restart the level? (yes/no)",
                encounter.message
            );
            return Ok(self.outcome(message, Some(encounter)));
        }

        if encounter.has_treasure {
            let message = self.handle_treasure(&encounter.message)?;
            return Ok(self.outcome(message, Some(encounter)));
        }

        let message = encounter.message.clone();
        Ok(self.outcome(message, Some(encounter)))
    }

    fn handle_treasure(&mut self, entry_message: &str) -> DelveResult<String> {
        let player = self
            .player
            .as_mut()
            .ok_or_else(|| DelveError::InvalidState("No player found".to_string()))?;
        let bonus = config::TREASURE_BONUS_BASE + player.power / 2;
        player.adjust_power(bonus);
        self.statistics.levels_completed += 1;

        let mut message = format!(
            "{}\n\n=== TREASURE ROOM DISCOVERED! ===\nCongratulations! You've found the treasure room!\nYou receive {} bonus power points!",
            entry_message, bonus
        );

        if self.level_index >= self.level_count {
            self.completion = CompletionState::Victory;
            message.push_str("\n\nCONGRATULATIONS! You've completed all levels!\n");
            message.push_str(&self.end_game().message);
            return Ok(message);
        }

        self.level_index += 1;
        let difficulty = self.player()?.difficulty;
        self.level = Some(self.generate_level(difficulty)?);
        if let Some(player) = self.player.as_mut() {
            player.visited_rooms.clear();
        }
        info!("Advanced to level {} of {}", self.level_index, self.level_count);

        let encounter = self.enter_start()?;
        let tip = self.tip();
        message.push_str(&format!(
            "\n\n=== LEVEL {} ===\nYou enter a new section of the dungeon...\n{}\n\nTip: {}",
            self.level_index, encounter.message, tip
        ));
        Ok(message)
    }

    fn handle_take(&mut self, name: &str) -> DelveResult<CommandOutcome> {
        let (player, level) = match (self.player.as_mut(), self.level.as_mut()) {
            (Some(player), Some(level)) => (player, level),
            _ => return Err(DelveError::InvalidState("No adventure in progress".to_string())),
        };
        let room = player
            .location
            .and_then(|id| level.room_mut(id))
            .ok_or_else(|| DelveError::InvalidState("Player location not initialized".to_string()))?;

        let message = match room.take_item(name) {
            None => format!("There is no {} here.", name),
            Some(item) => match player.add_item(item) {
                Ok(()) => {
                    self.statistics.items_collected += 1;
                    format!("You pick up the {}.", name)
                }
                Err(item) => {
                    room.add_item(item);
                    "Your inventory is full.".to_string()
                }
            },
        };
        Ok(self.outcome(message, None))
    }

    fn handle_use(&mut self, name: &str) -> DelveResult<CommandOutcome> {
        let player = self
            .player
            .as_mut()
            .ok_or_else(|| DelveError::InvalidState("No player found".to_string()))?;
        let before = player.inventory.len();

        let message = match player.use_item(name) {
            None => format!("You don't have a {} in your inventory.", name),
            Some(outcome) => {
                let mut lines = vec![format!("Using {}...", name), outcome.message];
                if outcome.power_delta > 0 {
                    lines.push(format!("You gained {} power points!", outcome.power_delta));
                }
                if player.inventory.len() < before {
                    lines.push(format!("The {} was consumed.", name));
                }
                lines.join("\n")
            }
        };
        Ok(self.outcome(message, None))
    }

    fn handle_drop(&mut self, name: &str) -> DelveResult<CommandOutcome> {
        let (player, level) = match (self.player.as_mut(), self.level.as_mut()) {
            (Some(player), Some(level)) => (player, level),
            _ => return Err(DelveError::InvalidState("No adventure in progress".to_string())),
        };
        let room = player
            .location
            .and_then(|id| level.room_mut(id))
            .ok_or_else(|| DelveError::InvalidState("Player location not initialized".to_string()))?;

        let message = match player.remove_item(name) {
            Some(item) => {
                let text = format!("You drop the {}.", item.name);
                room.add_item(item);
                text
            }
            None => format!("You don't have a {} in your inventory.", name),
        };
        Ok(self.outcome(message, None))
    }

    fn show_puzzle(&mut self) -> DelveResult<CommandOutcome> {
        let room = self.current_room()?;
        let message = match &room.puzzle {
            None => "There's no puzzle in this room.".to_string(),
            Some(puzzle) if puzzle.is_solved() => "You've already solved this puzzle!".to_string(),
            Some(puzzle) => format!(
                "=== Puzzle Challenge ===\n{}\nQuestion: {}\n\nType 'solve [your answer]' to submit your answer",
                puzzle.description, puzzle.question
            ),
        };
        Ok(self.outcome(message, None))
    }

    fn handle_answer(&mut self, answer: &str) -> DelveResult<CommandOutcome> {
        let Self {
            player,
            level,
            rng,
            statistics,
            ..
        } = self;
        let (player, level) = match (player.as_mut(), level.as_mut()) {
            (Some(player), Some(level)) => (player, level),
            _ => return Err(DelveError::InvalidState("No adventure in progress".to_string())),
        };
        let room = player
            .location
            .and_then(|id| level.room_mut(id))
            .ok_or_else(|| DelveError::InvalidState("Player location not initialized".to_string()))?;

        let attempt = EncounterResolver::new().attempt_puzzle(room, player, answer, rng);
        statistics.update_from_puzzle(&attempt);

        let mut message = attempt.message();
        if let PuzzleAttempt::Wrong { depleted: true, .. } = attempt {
            self.phase = SessionPhase::Restarting;
            info!("Player depleted by a wrong answer on level {}", self.level_index);
            message.push_str(
                "\n\n=== GAME OVER ===\nYour power has been depleted!\nWould you like to restart the level? (yes/no)",
            );
        }
        Ok(self.outcome(message, None))
    }

    fn handle_reveal(&mut self) -> DelveResult<CommandOutcome> {
        let Self {
            player,
            level,
            rng,
            items,
            statistics,
            ..
        } = self;
        let (player, level) = match (player.as_mut(), level.as_mut()) {
            (Some(player), Some(level)) => (player, level),
            _ => return Err(DelveError::InvalidState("No adventure in progress".to_string())),
        };
        let here = player
            .location
            .ok_or_else(|| DelveError::InvalidState("Player location not initialized".to_string()))?;

        let result = level.reveal_hidden_passage(here, player, &*items, rng);
        if result.success {
            statistics.secrets_found += 1;
        }
        Ok(self.outcome(result.message, None))
    }

    fn inventory_text(&self) -> DelveResult<String> {
        let player = self.player()?;
        if player.inventory.is_empty() {
            return Ok("Your inventory is empty.".to_string());
        }
        let mut text = String::from("Your inventory contains:");
        for item in &player.inventory {
            text.push_str(&format!("\n- {}", item.name));
        }
        Ok(text)
    }

    fn status_text(&self) -> DelveResult<String> {
        let player = self.player()?;
        let location = player
            .location
            .map_or_else(|| "unknown".to_string(), |id| id.to_string());
        let effects = player.active_effects();
        Ok(format!(
            "=== Player Status ===\nHealth: {} HP\nStatus: {}\nCurrent Location: Room {}\nDifficulty: {}\nLevel: {}/{}\nRooms Explored: {}\nItems in Inventory: {}\nActive Effects: {}",
            player.power,
            player.status(),
            location,
            player.difficulty,
            self.level_index,
            self.level_count,
            player.visited_rooms.len(),
            player.inventory.len(),
            if effects.is_empty() { "None".to_string() } else { effects.join(", ") }
        ))
    }

    fn map_text(&self) -> DelveResult<String> {
        let player = self.player()?;
        let room = self.current_room()?;
        let visited: Vec<String> = player.visited_rooms.iter().map(|id| id.to_string()).collect();
        Ok(format!(
            "=== Map Information ===\nCurrent Position: Room {}\nExplored Rooms: {} ({})\nAvailable Exits: {}",
            room.id,
            visited.len(),
            visited.join("; "),
            room.exit_names().join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Item, Puzzle, RoomGraph, RoomId};

    /// A 3x1 corridor: start, a middle room, treasure.
    fn corridor_level() -> Level {
        let mut graph = RoomGraph::new();
        for x in 0..3 {
            graph
                .insert_room(Room::new(RoomId::new(x, 0), format!("Room number {}.", x), "Walls."))
                .unwrap();
        }
        for x in 0..2 {
            graph.connect_both(RoomId::new(x, 0), Direction::East, RoomId::new(x + 1, 0));
        }
        graph.room_mut(RoomId::new(2, 0)).unwrap().has_treasure = true;
        Level {
            number: 1,
            difficulty: Difficulty::Normal,
            width: 3,
            height: 1,
            graph,
            start: RoomId::origin(),
            treasure: RoomId::new(2, 0),
        }
    }

    fn running_session(level_count: u32) -> AdventureSession {
        let mut session = AdventureSession::with_level_count(11, level_count);
        session.begin().unwrap();
        session.select_difficulty(Difficulty::Normal).unwrap();
        let mut level = corridor_level();
        level.room_mut(RoomId::origin()).unwrap().visited = true;
        session.level = Some(level);
        let player = session.player.as_mut().unwrap();
        player.visited_rooms.clear();
        player.record_visit(RoomId::origin());
        session
    }

    #[test]
    fn test_phase_transitions() {
        let mut session = AdventureSession::new(1);
        assert_eq!(session.phase, SessionPhase::Unset);
        assert!(session.execute(Command::Look).is_err());
        assert!(session.select_difficulty(Difficulty::Easy).is_err());

        session.begin().unwrap();
        assert_eq!(session.phase, SessionPhase::Selecting);
        assert!(session.begin().is_err());

        let outcome = session.select_difficulty(Difficulty::Hard).unwrap();
        assert_eq!(outcome.phase, SessionPhase::Running);
        assert!(outcome.message.contains("HARD"));
        assert_eq!(session.player().unwrap().power, 150);
        assert_eq!(session.current_room().unwrap().id, RoomId::origin());
    }

    #[test]
    fn test_move_without_exit() {
        let mut session = running_session(1);
        let outcome = session.execute(Command::Move(Direction::North)).unwrap();
        assert!(outcome.message.contains("You cannot go north"));
        assert!(outcome.encounter.is_none());
    }

    #[test]
    fn test_barrier_room_only_allows_retreat() {
        let mut session = running_session(1);
        let middle = RoomId::new(1, 0);
        session
            .level
            .as_mut()
            .unwrap()
            .room_mut(middle)
            .unwrap()
            .set_barrier(Item::barrier("Magical Barrier", "Shimmering", 100));

        let outcome = session.execute(Command::Move(Direction::East)).unwrap();
        assert!(outcome.encounter.unwrap().is_blocked());
        assert_eq!(session.current_room().unwrap().id, middle);

        let blocked = session.execute(Command::Move(Direction::East)).unwrap();
        assert!(blocked.message.contains("blocks further progress"));
        assert_eq!(session.current_room().unwrap().id, middle);

        session.execute(Command::Move(Direction::West)).unwrap();
        assert_eq!(session.current_room().unwrap().id, RoomId::origin());
    }

    #[test]
    fn test_depletion_then_restart() {
        let mut session = running_session(1);
        session
            .level
            .as_mut()
            .unwrap()
            .room_mut(RoomId::new(1, 0))
            .unwrap()
            .add_item(Item::trap("Curse Rune", "Drains", 200));

        let outcome = session.execute(Command::Move(Direction::East)).unwrap();
        assert_eq!(outcome.phase, SessionPhase::Restarting);
        assert_eq!(session.player().unwrap().location, Some(RoomId::origin()));
        assert!(session.execute(Command::Look).is_err());

        let restarted = session.restart_level().unwrap();
        assert_eq!(restarted.phase, SessionPhase::Running);
        assert_eq!(session.player().unwrap().power, 75);
        assert_eq!(session.statistics.restarts, 1);
        assert!(session.level().unwrap().is_solvable());
    }

    #[test]
    fn test_declining_restart_ends_game() {
        let mut session = running_session(1);
        session.phase = SessionPhase::Restarting;
        let outcome = session.end_game();
        assert_eq!(outcome.phase, SessionPhase::Ended);
        assert_eq!(session.completion, CompletionState::Depleted);
    }

    #[test]
    fn test_treasure_on_last_level_is_victory() {
        let mut session = running_session(1);
        session.execute(Command::Move(Direction::East)).unwrap();
        let outcome = session.execute(Command::Move(Direction::East)).unwrap();

        assert_eq!(outcome.phase, SessionPhase::Ended);
        assert_eq!(session.completion, CompletionState::Victory);
        assert_eq!(session.player().unwrap().power, 75 + 50 + 37);
        assert!(outcome.message.contains("GAME COMPLETE"));
    }

    #[test]
    fn test_treasure_advances_to_fresh_level() {
        let mut session = running_session(2);
        session.execute(Command::Move(Direction::East)).unwrap();
        let outcome = session.execute(Command::Move(Direction::East)).unwrap();

        assert_eq!(outcome.phase, SessionPhase::Running);
        assert_eq!(session.level_index, 2);
        assert_eq!(session.level().unwrap().number, 2);
        assert_eq!(session.current_room().unwrap().id, RoomId::origin());
        assert_eq!(session.player().unwrap().visited_rooms.len(), 1);
        assert!(outcome.message.contains("=== LEVEL 2 ==="));
    }

    #[test]
    fn test_take_use_and_drop() {
        let mut session = running_session(1);
        session
            .level
            .as_mut()
            .unwrap()
            .room_mut(RoomId::origin())
            .unwrap()
            .add_item(Item::healing("Health Potion", "Red", 8, false));

        let taken = session.execute(Command::Take("health potion".into())).unwrap();
        assert!(taken.message.contains("pick up"));
        assert_eq!(session.statistics.items_collected, 1);
        assert_eq!(session.score(), 75 + 10 + 5);

        let used = session.execute(Command::Use("Health Potion".into())).unwrap();
        assert!(used.message.contains("gained 8"));
        assert!(used.message.contains("consumed"));
        assert_eq!(session.player().unwrap().power, 83);

        let dropped = session.execute(Command::Drop("Health Potion".into())).unwrap();
        assert!(dropped.message.contains("don't have"));
    }

    #[test]
    fn test_solve_flow() {
        let mut session = running_session(1);
        session
            .level
            .as_mut()
            .unwrap()
            .room_mut(RoomId::origin())
            .unwrap()
            .puzzle = Some(Puzzle::new("What is 2 + 3?", "5", "A math puzzle"));

        let shown = session.execute(Command::Solve(None)).unwrap();
        assert!(shown.message.contains("Question: What is 2 + 3?"));

        session.execute(Command::Solve(Some("4".into()))).unwrap();
        assert_eq!(session.player().unwrap().power, 70);
        session.execute(Command::Solve(Some("5".into()))).unwrap();
        assert_eq!(session.player().unwrap().power, 80);
        session.execute(Command::Solve(Some("5".into()))).unwrap();
        assert_eq!(session.player().unwrap().power, 80);
        assert_eq!(session.statistics.puzzles_solved, 1);
        assert_eq!(session.statistics.wrong_answers, 1);
    }

    #[test]
    fn test_json_round_trip() {
        let mut session = running_session(2);
        session.execute(Command::Move(Direction::East)).unwrap();

        let json = session.save_to_json().unwrap();
        let loaded = AdventureSession::load_from_json(&json).unwrap();
        assert_eq!(loaded.phase, SessionPhase::Running);
        assert_eq!(loaded.turn, session.turn);
        assert_eq!(loaded.level, session.level);
        assert_eq!(loaded.current_room().unwrap().id, RoomId::new(1, 0));
    }

    #[test]
    fn test_load_rejects_player_outside_level() {
        let mut session = running_session(1);
        session.player.as_mut().unwrap().location = Some(RoomId::new(40, 40));
        let json = session.save_to_json().unwrap();
        assert!(matches!(
            AdventureSession::load_from_json(&json),
            Err(DelveError::InvalidState(_))
        ));
    }
}
