//! # Levels
//!
//! A generated dungeon floor: the room graph plus its start and treasure
//! rooms. Levels are never reset in place; a restart builds a new one.

use crate::{
    DelveError, DelveResult, Difficulty, Direction, ItemSource, Player, ReachabilityEngine, Room,
    RoomGraph, RoomId,
};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// One dungeon level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// One-based level index
    pub number: u32,
    pub difficulty: Difficulty,
    pub width: i32,
    pub height: i32,
    pub graph: RoomGraph,
    pub start: RoomId,
    pub treasure: RoomId,
}

/// Result of searching a room for hidden passages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealResult {
    pub success: bool,
    pub message: String,
    pub new_room: Option<RoomId>,
    pub direction: Option<Direction>,
}

impl RevealResult {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            new_room: None,
            direction: None,
        }
    }
}

impl Level {
    /// The room the player starts in.
    pub fn start_room(&self) -> Option<&Room> {
        self.graph.room(self.start)
    }

    /// The room holding the treasure.
    pub fn treasure_room(&self) -> Option<&Room> {
        self.graph.room(self.treasure)
    }

    /// Looks a room up by its `"x,y"` key.
    ///
    /// Blank or malformed keys find nothing.
    pub fn room_by_id(&self, key: &str) -> Option<&Room> {
        let id: RoomId = key.trim().parse().ok()?;
        self.graph.room(id)
    }

    /// Returns the room with the given id.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.graph.room(id)
    }

    /// Returns the room with the given id mutably.
    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.graph.room_mut(id)
    }

    /// Whether `id` lies on the generated grid. Hidden rooms may not.
    pub fn in_bounds(&self, id: RoomId) -> bool {
        (0..self.width).contains(&id.x) && (0..self.height).contains(&id.y)
    }

    /// Whether the treasure can currently be reached from the start.
    pub fn is_solvable(&self) -> bool {
        ReachabilityEngine::new().is_reachable(&self.graph, self.start, self.treasure)
    }

    /// Uses the player's first passage-revealing tool in room `id`.
    ///
    /// On success a hidden room holding a healing item appears next to the
    /// room and a one-way exit leads into it. Every failure is reported in
    /// the result; nothing is spent unless a passage is found.
    pub fn reveal_hidden_passage(
        &mut self,
        id: RoomId,
        player: &mut Player,
        items: &impl ItemSource,
        rng: &mut StdRng,
    ) -> RevealResult {
        let room = match self.graph.room(id) {
            Some(room) => room,
            None => return RevealResult::failure("You are nowhere in this level."),
        };

        if !room.has_hidden_passages {
            return RevealResult::failure(
                "There don't seem to be any hidden passages in this room.",
            );
        }

        let tool_index = match player.passage_revealer() {
            Some(index) => index,
            None => {
                return RevealResult::failure(
                    "You need a Torch or similar item to reveal hidden passages.",
                )
            }
        };

        let candidates: Vec<Direction> = Direction::all()
            .into_iter()
            .filter(|d| room.exit(*d).is_none() && !self.graph.contains(id.step(*d)))
            .collect();
        let direction = match candidates.choose(rng) {
            Some(direction) => *direction,
            None => return RevealResult::failure("You search but find no new passages."),
        };

        let tool_name = player.inventory[tool_index].name.clone();
        if player.use_item_at(tool_index).is_none() {
            return RevealResult::failure("The item failed to reveal any passages.");
        }

        let target = id.step(direction);
        let mut hidden = Room::new(
            target,
            "You discovered a secret room!",
            format!("This hidden chamber was revealed by your {}.", tool_name),
        );
        hidden.name = "Hidden Room".to_string();
        hidden.add_item(items.random_healing(rng));

        if let Err(err) = self.graph.insert_room(hidden) {
            return RevealResult::failure(err.to_string());
        }
        self.graph.connect(id, direction, target);

        if let Some(room) = self.graph.room_mut(id) {
            room.has_hidden_passages = false;
            room.secrets_revealed = true;
        }

        debug!("Revealed hidden room {} {} of {}", target, direction, id);

        RevealResult {
            success: true,
            message: format!(
                "The {} reveals a hidden passage to the {}!",
                tool_name, direction
            ),
            new_room: Some(target),
            direction: Some(direction),
        }
    }

    /// Serializes the level to JSON.
    pub fn save_to_json(&self) -> DelveResult<String> {
        serde_json::to_string_pretty(self).map_err(DelveError::from)
    }

    /// Loads a level from JSON, rejecting one whose start or treasure room is
    /// missing.
    pub fn load_from_json(json: &str) -> DelveResult<Self> {
        let level: Level = serde_json::from_str(json)?;
        if !level.graph.contains(level.start) || !level.graph.contains(level.treasure) {
            return Err(DelveError::InvalidState(
                "Level is missing its start or treasure room".to_string(),
            ));
        }
        Ok(level)
    }
}
