//! # Room Graph
//!
//! Directed adjacency over grid-addressed rooms.

use crate::{DelveError, DelveResult, Direction, Item, Puzzle, Room, RoomId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All rooms of a level keyed by id.
///
/// Every exit points at a room that exists in the graph. Rooms are never
/// removed, so an edge can only become dangling if it was inserted that way,
/// which [`RoomGraph::connect`] refuses to do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomGraph {
    rooms: BTreeMap<RoomId, Room>,
}

impl RoomGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a blank room at `(x, y)`.
    ///
    /// Fails if a room with that key already exists.
    pub fn create_room(&mut self, x: i32, y: i32) -> DelveResult<&mut Room> {
        let id = RoomId::new(x, y);
        self.insert_room(Room::new(id, "", ""))
    }

    /// Inserts a prepared room under its own id.
    pub fn insert_room(&mut self, room: Room) -> DelveResult<&mut Room> {
        use std::collections::btree_map::Entry;

        match self.rooms.entry(room.id) {
            Entry::Occupied(entry) => Err(DelveError::InvalidState(format!(
                "Room {} already exists",
                entry.key()
            ))),
            Entry::Vacant(entry) => Ok(entry.insert(room)),
        }
    }

    /// Inserts or overwrites the directed edge `from --direction--> to`.
    ///
    /// Returns false and leaves the graph untouched if either room is missing.
    pub fn connect(&mut self, from: RoomId, direction: Direction, to: RoomId) -> bool {
        if !self.rooms.contains_key(&to) {
            return false;
        }
        match self.rooms.get_mut(&from) {
            Some(room) => {
                room.exits.insert(direction, to);
                true
            }
            None => false,
        }
    }

    /// Like [`RoomGraph::connect`], with the direction given as text.
    ///
    /// Only the four full names are accepted, in any case; anything else is
    /// a no-op.
    pub fn connect_by_name(&mut self, from: RoomId, direction: &str, to: RoomId) -> bool {
        let direction = direction.trim();
        match Direction::all()
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(direction))
        {
            Some(direction) => self.connect(from, direction, to),
            None => false,
        }
    }

    /// Connects two rooms in both directions.
    pub fn connect_both(&mut self, from: RoomId, direction: Direction, to: RoomId) -> bool {
        self.connect(from, direction, to) && self.connect(to, direction.opposite(), from)
    }

    /// Outgoing edges of a room. Unknown ids have none.
    pub fn neighbors_of(&self, id: RoomId) -> Vec<(Direction, RoomId)> {
        self.rooms
            .get(&id)
            .map(|room| room.exits.iter().map(|(d, to)| (*d, *to)).collect())
            .unwrap_or_default()
    }

    /// Returns the room with the given id.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    /// Returns the room with the given id mutably.
    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    /// Whether a room exists at `id`.
    pub fn contains(&self, id: RoomId) -> bool {
        self.rooms.contains_key(&id)
    }

    /// Number of rooms in the graph.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether the graph holds no rooms.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Rooms in key order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Iterates over all rooms mutably.
    pub fn rooms_mut(&mut self) -> impl Iterator<Item = &mut Room> {
        self.rooms.values_mut()
    }

    /// Iterates over room ids in coordinate order.
    pub fn ids(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.rooms.keys().copied()
    }

    /// Whether the room at `id` has an undefeated barrier.
    pub fn has_active_barrier(&self, id: RoomId) -> bool {
        self.room(id).is_some_and(Room::has_active_barrier)
    }

    /// The puzzle in room `id`, solved or not.
    pub fn puzzle(&self, id: RoomId) -> Option<&Puzzle> {
        self.room(id).and_then(|room| room.puzzle.as_ref())
    }

    /// Active items lying in room `id`.
    pub fn items_in(&self, id: RoomId) -> Vec<&Item> {
        self.room(id)
            .map(|room| room.active_contents().collect())
            .unwrap_or_default()
    }

    /// Number of rooms whose barrier is still standing.
    pub fn active_barrier_count(&self) -> usize {
        self.rooms().filter(|room| room.has_active_barrier()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_graph() -> RoomGraph {
        let mut graph = RoomGraph::new();
        for x in 0..3 {
            graph.create_room(x, 0).unwrap();
        }
        graph
    }

    #[test]
    fn test_create_room_rejects_duplicates() {
        let mut graph = line_graph();
        assert_eq!(graph.len(), 3);
        assert!(graph.create_room(1, 0).is_err());
        assert_eq!(graph.room(RoomId::new(1, 0)).unwrap().name, "Room 1,0");
    }

    #[test]
    fn test_connect_is_directed() {
        let mut graph = line_graph();
        let a = RoomId::new(0, 0);
        let b = RoomId::new(1, 0);

        assert!(graph.connect(a, Direction::East, b));
        assert_eq!(graph.neighbors_of(a), vec![(Direction::East, b)]);
        assert!(graph.neighbors_of(b).is_empty());
    }

    #[test]
    fn test_connect_overwrites_existing_edge() {
        let mut graph = line_graph();
        let a = RoomId::new(0, 0);
        graph.connect(a, Direction::East, RoomId::new(1, 0));
        graph.connect(a, Direction::East, RoomId::new(2, 0));
        assert_eq!(graph.room(a).unwrap().exit(Direction::East), Some(RoomId::new(2, 0)));
    }

    #[test]
    fn test_connect_ignores_unknown_rooms_and_directions() {
        let mut graph = line_graph();
        let a = RoomId::new(0, 0);
        assert!(!graph.connect(a, Direction::East, RoomId::new(9, 9)));
        assert!(!graph.connect(RoomId::new(9, 9), Direction::East, a));
        assert!(!graph.connect_by_name(a, "up", RoomId::new(1, 0)));
        assert!(!graph.connect_by_name(a, "e", RoomId::new(1, 0)));
        assert!(graph.neighbors_of(a).is_empty());

        assert!(graph.connect_by_name(a, "EAST", RoomId::new(1, 0)));
        assert_eq!(graph.neighbors_of(a), vec![(Direction::East, RoomId::new(1, 0))]);
    }

    #[test]
    fn test_connect_both() {
        let mut graph = line_graph();
        let a = RoomId::new(0, 0);
        let b = RoomId::new(1, 0);
        assert!(graph.connect_both(a, Direction::East, b));
        assert_eq!(graph.neighbors_of(b), vec![(Direction::West, a)]);
    }

    #[test]
    fn test_presence_queries_delegate_to_room() {
        let mut graph = line_graph();
        let id = RoomId::new(2, 0);
        let room = graph.room_mut(id).unwrap();
        room.set_barrier(Item::barrier("Magical Barrier", "Shimmering", 10));
        room.puzzle = Some(Puzzle::new("Q", "A", "D"));
        room.add_item(Item::healing("Medkit", "Kit", 5, false));

        assert!(graph.has_active_barrier(id));
        assert!(graph.puzzle(id).is_some());
        assert_eq!(graph.items_in(id).len(), 1);
        assert_eq!(graph.active_barrier_count(), 1);
        assert!(!graph.has_active_barrier(RoomId::new(7, 7)));
    }
}
