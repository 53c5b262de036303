//! # Encounters
//!
//! What happens when the player walks into a room or answers its puzzle.
//!
//! The resolver mutates only the room and the player it is handed and
//! reports everything else as plain values. Deciding between a restart and
//! the end of the game is left to the caller.

use crate::{config, Player, Room, RoomId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Outcome of a barrier check on entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarrierCheck {
    pub name: String,
    pub required_power: u32,
    /// True when the barrier fell during this encounter
    pub cleared: bool,
    /// Power still missing; zero when cleared
    pub shortfall: u32,
}

/// A trap that fired during an encounter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrapTrigger {
    pub name: String,
    pub damage: u32,
}

/// An unsolved puzzle waiting in the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleNotice {
    pub description: String,
    pub question: String,
}

/// Everything an entry into a room produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncounterOutcome {
    pub room: RoomId,
    pub first_visit: bool,
    pub barrier: Option<BarrierCheck>,
    pub traps_triggered: Vec<TrapTrigger>,
    pub puzzle: Option<PuzzleNotice>,
    pub has_treasure: bool,
    /// The player's power is at or below zero after this encounter
    pub depleted: bool,
    pub message: String,
}

impl EncounterOutcome {
    /// Total damage dealt by traps in this encounter.
    pub fn damage_taken(&self) -> u32 {
        self.traps_triggered.iter().map(|t| t.damage).sum()
    }

    /// Whether an active barrier still stands after this encounter.
    pub fn is_blocked(&self) -> bool {
        self.barrier.as_ref().is_some_and(|b| !b.cleared)
    }
}

/// Result of answering a room's puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleAttempt {
    NoPuzzle,
    /// The puzzle was solved earlier; nothing changed
    AlreadySolved,
    Solved {
        reward: i32,
        /// Name of a room item the solution revealed
        bonus_item: Option<String>,
    },
    Wrong {
        penalty: i32,
        depleted: bool,
    },
}

impl PuzzleAttempt {
    /// Player-facing text for the attempt.
    pub fn message(&self) -> String {
        match self {
            PuzzleAttempt::NoPuzzle => "There's no puzzle in this room.".to_string(),
            PuzzleAttempt::AlreadySolved => "This puzzle has already been solved!".to_string(),
            PuzzleAttempt::Solved { reward, bonus_item } => {
                let mut message = format!(
                    "Correct! You've solved the puzzle!\nYou gain {} power points as a reward.",
                    reward
                );
                if let Some(name) = bonus_item {
                    message.push_str(&format!(
                        "\nThe puzzle solution revealed a hidden {}!",
                        name
                    ));
                }
                message
            }
            PuzzleAttempt::Wrong { penalty, .. } => format!(
                "That's not the correct answer. Try again!\nYou lose {} power points.",
                penalty
            ),
        }
    }
}

/// Applies room effects to the player.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncounterResolver;

impl EncounterResolver {
    /// Creates a resolver.
    pub fn new() -> Self {
        Self
    }

    /// Resolves an entry into `room`.
    ///
    /// A barrier falls once the player's power reaches twice its damage and
    /// never costs power. Every active trap fires once and is then removed
    /// from the room. The first visit yields the full description; later
    /// visits only repeat what is still outstanding.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Difficulty, EncounterResolver, Item, Player, Room, RoomId};
    ///
    /// let mut room = Room::new(RoomId::new(1, 0), "A dark room.", "Stone walls.");
    /// room.add_item(Item::trap("Thorny Vines", "Sharp thorns", 10));
    /// let mut player = Player::new("Hero", Difficulty::Normal);
    ///
    /// let outcome = EncounterResolver::new().on_enter(&mut room, &mut player);
    /// assert!(outcome.first_visit);
    /// assert_eq!(outcome.damage_taken(), 10);
    /// assert_eq!(player.power, 65);
    /// ```
    pub fn on_enter(&self, room: &mut Room, player: &mut Player) -> EncounterOutcome {
        let first_visit = !room.visited;
        let mut lines = Vec::new();

        if first_visit {
            room.visited = true;
            lines.push(room.describe());
            lines.extend(
                room.active_contents()
                    .filter(|item| item.is_notable())
                    .map(|item| format!("You discovered a {}!", item.name)),
            );
        } else {
            lines.extend(room.barrier_notice());
            lines.extend(room.puzzle_notice());
        }
        player.record_visit(room.id);

        let barrier = self.resolve_barrier(room, player);
        match &barrier {
            Some(check) if check.cleared => {
                lines.push(format!("You overcome the {} with your power!", check.name));
            }
            Some(check) => lines.push(format!(
                "You need {} more power points to pass.",
                check.shortfall
            )),
            None => {}
        }

        let traps_triggered = self.trigger_traps(room, player);
        for trap in &traps_triggered {
            lines.push(format!(
                "The {} harms you! You lose {} power points.",
                trap.name, trap.damage
            ));
        }

        let puzzle = room.unsolved_puzzle().map(|puzzle| PuzzleNotice {
            description: puzzle.description.clone(),
            question: puzzle.question.clone(),
        });

        let depleted = player.is_depleted();
        if depleted {
            lines.push("Your power has been depleted!".to_string());
        }

        EncounterOutcome {
            room: room.id,
            first_visit,
            barrier,
            traps_triggered,
            puzzle,
            has_treasure: room.has_treasure,
            depleted,
            message: lines.join("\n"),
        }
    }

    fn resolve_barrier(&self, room: &mut Room, player: &Player) -> Option<BarrierCheck> {
        let barrier = room.barrier.as_mut().filter(|b| b.is_active_hazard())?;
        let required_power = barrier.hazard().map_or(0, |h| h.required_power());
        let power = player.power.max(0) as u32;
        let cleared = power >= required_power;

        if cleared {
            if let Some(hazard) = barrier.hazard_mut() {
                hazard.defeat();
            }
        }

        Some(BarrierCheck {
            name: barrier.name.clone(),
            required_power,
            cleared,
            shortfall: required_power.saturating_sub(power),
        })
    }

    fn trigger_traps(&self, room: &mut Room, player: &mut Player) -> Vec<TrapTrigger> {
        let mut triggered = Vec::new();
        room.contents.retain_mut(|item| {
            if !item.is_active_trap() {
                return true;
            }
            let name = item.name.clone();
            if let Some(hazard) = item.hazard_mut() {
                player.adjust_power(-(hazard.damage as i32));
                hazard.defeat();
                triggered.push(TrapTrigger {
                    name,
                    damage: hazard.damage,
                });
            }
            false
        });
        triggered
    }

    /// Answers the puzzle in `room`.
    ///
    /// A correct answer solves it, grants the puzzle reward and may reveal
    /// one of the room's items. A wrong answer costs power. Answering a
    /// solved puzzle changes nothing.
    pub fn attempt_puzzle(
        &self,
        room: &mut Room,
        player: &mut Player,
        answer: &str,
        rng: &mut StdRng,
    ) -> PuzzleAttempt {
        let puzzle = match room.puzzle.as_mut() {
            Some(puzzle) => puzzle,
            None => return PuzzleAttempt::NoPuzzle,
        };

        if puzzle.is_solved() {
            return PuzzleAttempt::AlreadySolved;
        }

        if puzzle.check_answer(answer) {
            puzzle.mark_solved();
            player.adjust_power(config::PUZZLE_REWARD);
            let visible: Vec<&str> = room.active_contents().map(|i| i.name.as_str()).collect();
            let bonus_item = visible.choose(rng).map(|name| name.to_string());
            PuzzleAttempt::Solved {
                reward: config::PUZZLE_REWARD,
                bonus_item,
            }
        } else {
            player.adjust_power(-config::WRONG_ANSWER_PENALTY);
            PuzzleAttempt::Wrong {
                penalty: config::WRONG_ANSWER_PENALTY,
                depleted: player.is_depleted(),
            }
        }
    }
}

impl Room {
    /// Enters the room through the [`EncounterResolver`].
    pub fn enter(&mut self, player: &mut Player) -> EncounterOutcome {
        EncounterResolver::new().on_enter(self, player)
    }
}
