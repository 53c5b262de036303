//! # Rooms
//!
//! A single grid cell of the dungeon and everything attached to it.

use crate::{Direction, Item, Puzzle, RoomId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One room of a level.
///
/// Exits are directed: an east exit from A to B says nothing about a west
/// exit from B, although generation creates both for grid neighbours.
/// A room carries at most one barrier and at most one puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub description: String,
    pub detailed_description: String,
    /// Items in insertion order; defeated hazards are filtered from views
    pub contents: Vec<Item>,
    pub exits: BTreeMap<Direction, RoomId>,
    pub barrier: Option<Item>,
    pub puzzle: Option<Puzzle>,
    pub visited: bool,
    pub has_treasure: bool,
    pub has_hidden_passages: bool,
    pub secrets_revealed: bool,
}

impl Room {
    /// Creates an empty, unvisited room.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Room, RoomId};
    ///
    /// let room = Room::new(RoomId::new(2, 3), "A dark room.", "Stone walls.");
    /// assert_eq!(room.name, "Room 2,3");
    /// assert!(room.exits.is_empty());
    /// assert!(!room.visited);
    /// ```
    pub fn new(
        id: RoomId,
        description: impl Into<String>,
        detailed_description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: format!("Room {}", id),
            description: description.into(),
            detailed_description: detailed_description.into(),
            contents: Vec::new(),
            exits: BTreeMap::new(),
            barrier: None,
            puzzle: None,
            visited: false,
            has_treasure: false,
            has_hidden_passages: false,
            secrets_revealed: false,
        }
    }

    /// The room an exit leads to, if any.
    pub fn exit(&self, direction: Direction) -> Option<RoomId> {
        self.exits.get(&direction).copied()
    }

    /// Names of the available exits.
    pub fn exit_names(&self) -> Vec<&'static str> {
        self.exits.keys().map(|d| d.name()).collect()
    }

    /// The barrier if it is still standing.
    pub fn active_barrier(&self) -> Option<&Item> {
        self.barrier.as_ref().filter(|b| b.is_active_hazard())
    }

    /// Whether an undefeated barrier guards the room.
    pub fn has_active_barrier(&self) -> bool {
        self.active_barrier().is_some()
    }

    /// Installs a barrier, replacing any previous one.
    pub fn set_barrier(&mut self, barrier: Item) {
        self.barrier = Some(barrier);
    }

    /// Removes the barrier outright, returning it if there was one.
    pub fn clear_barrier(&mut self) -> Option<Item> {
        self.barrier.take()
    }

    /// Whether the room has a puzzle, solved or not.
    pub fn has_puzzle(&self) -> bool {
        self.puzzle.is_some()
    }

    /// The puzzle if it still awaits an answer.
    pub fn unsolved_puzzle(&self) -> Option<&Puzzle> {
        self.puzzle.as_ref().filter(|p| !p.is_solved())
    }

    /// Places an item in the room.
    pub fn add_item(&mut self, item: Item) {
        self.contents.push(item);
    }

    /// Contents without defeated hazards.
    pub fn active_contents(&self) -> impl Iterator<Item = &Item> {
        self.contents.iter().filter(|item| item.is_visible())
    }

    /// Whether any active items lie in the room.
    pub fn has_items(&self) -> bool {
        self.active_contents().next().is_some()
    }

    /// Takes a non-hazard item out of the room by name.
    pub fn take_item(&mut self, name: &str) -> Option<Item> {
        let name = name.trim();
        let index = self
            .contents
            .iter()
            .position(|item| !item.is_hazard() && item.name.eq_ignore_ascii_case(name))?;
        Some(self.contents.remove(index))
    }

    /// The first active item with this name, ignoring case.
    pub fn find_item(&self, name: &str) -> Option<&Item> {
        let name = name.trim();
        self.active_contents()
            .find(|item| item.name.eq_ignore_ascii_case(name))
    }

    /// Notice for a barrier that still blocks the way.
    pub fn barrier_notice(&self) -> Option<String> {
        self.active_barrier().map(|barrier| {
            let required = barrier.hazard().map_or(0, |h| h.required_power());
            format!(
                "A {} blocks further progress. (Required Power: {})",
                barrier.name, required
            )
        })
    }

    /// Notice for a puzzle that still awaits an answer.
    pub fn puzzle_notice(&self) -> Option<String> {
        self.unsolved_puzzle().map(|puzzle| {
            format!(
                "There's an unsolved puzzle in this room: {}",
                puzzle.description
            )
        })
    }

    /// Full description shown on the first visit.
    pub fn describe(&self) -> String {
        let mut lines = vec![
            self.description.clone(),
            format!("Exits: {}", self.exit_names().join(", ")),
        ];

        lines.extend(self.barrier_notice());
        lines.extend(self.puzzle_notice());

        if self.has_items() {
            lines.push("You see the following items in the room:".to_string());
            for item in self.active_contents() {
                lines.push(format!("- {}: {}", item.name, item.description));
            }
        }

        if self.has_hidden_passages && !self.secrets_revealed {
            lines.push("You sense there might be hidden secrets in this room...".to_string());
        }

        if self.has_treasure {
            lines.push("There is a treasure here!".to_string());
        }

        lines.join("\n")
    }

    /// Detailed view for the `look` command.
    pub fn look(&self) -> String {
        let mut text = self.detailed_description.clone();
        if self.has_items() {
            text.push_str("\n\nYou see the following items:");
            for item in self.active_contents() {
                text.push_str(&format!("\n- {}: {}", item.name, item.description));
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Room {
        Room::new(RoomId::new(1, 1), "A dark room.", "Rough stone walls.")
    }

    #[test]
    fn test_active_contents_hide_defeated_hazards() {
        let mut room = room();
        room.add_item(Item::healing("Health Potion", "Red", 8, false));
        room.add_item(Item::trap("Thorny Vines", "Sharp", 10));
        assert_eq!(room.active_contents().count(), 2);

        room.contents[1].hazard_mut().unwrap().defeat();
        assert_eq!(room.active_contents().count(), 1);
        assert!(room.find_item("thorny vines").is_none());
    }

    #[test]
    fn test_hazards_cannot_be_taken() {
        let mut room = room();
        room.add_item(Item::trap("Poison Trap", "Toxic", 15));
        assert!(room.take_item("Poison Trap").is_none());
        assert_eq!(room.contents.len(), 1);
    }

    #[test]
    fn test_barrier_lifecycle() {
        let mut room = room();
        assert!(!room.has_active_barrier());

        room.set_barrier(Item::barrier("Magical Barrier", "Shimmering", 15));
        assert!(room.has_active_barrier());
        assert_eq!(
            room.barrier_notice().unwrap(),
            "A Magical Barrier blocks further progress. (Required Power: 30)"
        );

        room.barrier.as_mut().unwrap().hazard_mut().unwrap().defeat();
        assert!(!room.has_active_barrier());
        assert!(room.barrier_notice().is_none());
        assert!(room.barrier.is_some());
    }

    #[test]
    fn test_describe_mentions_outstanding_features() {
        let mut room = room();
        room.exits.insert(Direction::East, RoomId::new(2, 1));
        room.puzzle = Some(Puzzle::new("What is 1 + 1?", "2", "A math puzzle"));
        room.has_hidden_passages = true;
        room.has_treasure = true;

        let text = room.describe();
        assert!(text.starts_with("A dark room."));
        assert!(text.contains("Exits: east"));
        assert!(text.contains("unsolved puzzle in this room: A math puzzle"));
        assert!(text.contains("hidden secrets"));
        assert!(text.contains("treasure here"));
    }
}
