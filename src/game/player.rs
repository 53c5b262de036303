//! # Player
//!
//! The adventurer: a single power pool, a bounded inventory and the set of
//! rooms seen on the current level.

use crate::{config, Difficulty, Item, RoomId, UseOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The player character.
///
/// Holds the id of its current room rather than the room itself; the level
/// owns every room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Power points; at or below zero the player is depleted
    pub power: i32,
    pub difficulty: Difficulty,
    pub inventory: Vec<Item>,
    pub capacity: usize,
    pub visited_rooms: BTreeSet<RoomId>,
    pub location: Option<RoomId>,
}

impl Player {
    /// Creates a player with the starting power of the chosen difficulty.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Difficulty, Player};
    ///
    /// let player = Player::new("Hero", Difficulty::Hard);
    /// assert_eq!(player.power, 150);
    /// assert!(player.inventory.is_empty());
    /// ```
    pub fn new(name: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            name: name.into(),
            power: difficulty.starting_power(),
            difficulty,
            inventory: Vec::new(),
            capacity: config::INVENTORY_CAPACITY,
            visited_rooms: BTreeSet::new(),
            location: None,
        }
    }

    /// Adds `delta` to the player's power.
    pub fn adjust_power(&mut self, delta: i32) {
        self.power += delta;
    }

    /// Whether power has dropped to zero or below.
    pub fn is_depleted(&self) -> bool {
        self.power <= 0
    }

    /// Human readable condition derived from power.
    pub fn status(&self) -> &'static str {
        match self.power {
            p if p >= 75 => "Healthy",
            p if p >= 50 => "Wounded",
            p if p >= 25 => "Critical",
            _ => "Near Death",
        }
    }

    /// Effects implied by low power.
    pub fn active_effects(&self) -> Vec<&'static str> {
        let mut effects = Vec::new();
        if self.power < 25 {
            effects.push("Weakened");
        }
        if self.power < 50 {
            effects.push("Slowed");
        }
        effects
    }

    /// Whether the inventory is at capacity.
    pub fn is_inventory_full(&self) -> bool {
        self.inventory.len() >= self.capacity
    }

    /// Adds an item, handing it back when the inventory is full.
    pub fn add_item(&mut self, item: Item) -> Result<(), Item> {
        if self.is_inventory_full() {
            return Err(item);
        }
        self.inventory.push(item);
        Ok(())
    }

    /// Index of the first item with this name, ignoring case.
    pub fn find_item(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.inventory
            .iter()
            .position(|item| item.name.eq_ignore_ascii_case(name))
    }

    /// Removes the first item with this name from the inventory.
    pub fn remove_item(&mut self, name: &str) -> Option<Item> {
        self.find_item(name).map(|index| self.inventory.remove(index))
    }

    /// Uses an inventory item by name, dropping it if it was consumed.
    pub fn use_item(&mut self, name: &str) -> Option<UseOutcome> {
        let index = self.find_item(name)?;
        self.use_item_at(index)
    }

    /// Uses the inventory item at `index`, dropping it if it was consumed.
    pub fn use_item_at(&mut self, index: usize) -> Option<UseOutcome> {
        if index >= self.inventory.len() {
            return None;
        }
        let mut item = self.inventory.remove(index);
        let outcome = item.apply(self);
        if !outcome.consumed {
            self.inventory.insert(index, item);
        }
        Some(outcome)
    }

    /// Index of the first tool able to reveal hidden passages.
    pub fn passage_revealer(&self) -> Option<usize> {
        self.inventory.iter().position(Item::can_reveal_passages)
    }

    /// Moves the player into `room` and remembers it as visited.
    pub fn record_visit(&mut self, room: RoomId) {
        self.location = Some(room);
        self.visited_rooms.insert(room);
    }

    /// Restores the player for a restarted level.
    pub fn reset_for_restart(&mut self) {
        self.power = self.difficulty.starting_power();
        self.inventory.clear();
        self.visited_rooms.clear();
        self.location = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_status_thresholds() {
        let mut player = Player::new("Tester", Difficulty::Easy);
        assert_eq!(player.status(), "Healthy");
        player.power = 50;
        assert_eq!(player.status(), "Wounded");
        player.power = 25;
        assert_eq!(player.status(), "Critical");
        assert_eq!(player.active_effects(), vec!["Slowed"]);
        player.power = 3;
        assert_eq!(player.status(), "Near Death");
        assert_eq!(player.active_effects(), vec!["Weakened", "Slowed"]);
    }

    #[test]
    fn test_inventory_capacity() {
        let mut player = Player::new("Tester", Difficulty::Normal);
        player.capacity = 1;
        assert!(player
            .add_item(Item::healing("Bandages", "Cloth", 5, false))
            .is_ok());
        let rejected = player.add_item(Item::healing("Medkit", "Kit", 5, false));
        assert_eq!(rejected.unwrap_err().name, "Medkit");
    }

    #[test]
    fn test_use_item_by_name_is_case_insensitive() {
        let mut player = Player::new("Tester", Difficulty::Normal);
        player
            .add_item(Item::healing("Health Potion", "Red", 8, false))
            .unwrap();

        let outcome = player.use_item("health potion").unwrap();
        assert_eq!(outcome.power_delta, 8);
        assert_eq!(player.power, 83);
        assert!(player.inventory.is_empty());
        assert!(player.use_item("health potion").is_none());
    }

    #[test]
    fn test_tool_stays_in_inventory_until_spent() {
        let mut player = Player::new("Tester", Difficulty::Normal);
        player
            .add_item(Item::tool("Torch", "Bright", 2, false, true))
            .unwrap();
        player.use_item("torch");
        assert_eq!(player.inventory.len(), 1);
        player.use_item("torch");
        assert!(player.inventory.is_empty());
    }

    #[test]
    fn test_reset_for_restart() {
        let mut player = Player::new("Tester", Difficulty::Hard);
        player.power = -4;
        player.record_visit(RoomId::new(1, 0));
        player
            .add_item(Item::tool("Rope", "Long", 3, false, false))
            .unwrap();

        player.reset_for_restart();
        assert_eq!(player.power, 150);
        assert!(player.inventory.is_empty());
        assert!(player.visited_rooms.is_empty());
        assert!(player.location.is_none());
    }
}
