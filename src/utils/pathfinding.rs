//! # Reachability
//!
//! Barrier-aware reachability over a [`RoomGraph`] and corridor repair for
//! levels that come out unsolvable.

use crate::{DelveError, DelveResult, Direction, RoomGraph, RoomId};
use log::debug;
use ::pathfinding::prelude::dfs_reach;
use rand::rngs::StdRng;
use rand::Rng;

/// Chance per step that a synthesized corridor wanders one cell vertically.
pub const DEFAULT_DETOUR_CHANCE: f64 = 0.3;

/// Proves or repairs a barrier-free route between two rooms.
///
/// A room with an active barrier is treated as a blocked node: the walk may
/// start there, but it never steps into one, including the target.
#[derive(Debug, Clone)]
pub struct ReachabilityEngine {
    /// Probability of a one-cell vertical detour after each corridor step
    pub detour_chance: f64,
}

/// What [`ReachabilityEngine::ensure_reachable`] had to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRepair {
    /// True when a route already existed and nothing was touched
    pub was_reachable: bool,
    /// Rooms of the synthesized walk, start first
    pub corridor: Vec<RoomId>,
    /// Active barriers removed along the corridor
    pub barriers_cleared: usize,
}

impl ReachabilityEngine {
    /// Creates an engine with the default detour chance.
    pub fn new() -> Self {
        Self {
            detour_chance: DEFAULT_DETOUR_CHANCE,
        }
    }

    /// Depth-first search from `start` over exits into rooms without an
    /// active barrier.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Direction, ReachabilityEngine, RoomGraph, RoomId};
    ///
    /// let mut graph = RoomGraph::new();
    /// graph.create_room(0, 0).unwrap();
    /// graph.create_room(1, 0).unwrap();
    /// let (a, b) = (RoomId::new(0, 0), RoomId::new(1, 0));
    ///
    /// let engine = ReachabilityEngine::new();
    /// assert!(!engine.is_reachable(&graph, a, b));
    /// graph.connect(a, Direction::East, b);
    /// assert!(engine.is_reachable(&graph, a, b));
    /// ```
    pub fn is_reachable(&self, graph: &RoomGraph, start: RoomId, target: RoomId) -> bool {
        if !graph.contains(start) || !graph.contains(target) {
            return false;
        }
        if start == target {
            return true;
        }

        dfs_reach(start, |id: &RoomId| {
            graph
                .neighbors_of(*id)
                .into_iter()
                .map(|(_, next)| next)
                .filter(|next| !graph.has_active_barrier(*next))
                .collect::<Vec<_>>()
        })
        .any(|id| id == target)
    }

    /// Guarantees a barrier-free route from `start` to `target`.
    ///
    /// When none exists a winding corridor is walked between the two rooms
    /// inside a `width` x `height` grid; every room on it loses its barrier
    /// and consecutive rooms are linked both ways. Afterwards
    /// [`ReachabilityEngine::is_reachable`] holds; failing that is a defect
    /// and is reported as [`DelveError::GenerationFailed`].
    pub fn ensure_reachable(
        &self,
        graph: &mut RoomGraph,
        start: RoomId,
        target: RoomId,
        width: i32,
        height: i32,
        rng: &mut StdRng,
    ) -> DelveResult<PathRepair> {
        if self.is_reachable(graph, start, target) {
            return Ok(PathRepair {
                was_reachable: true,
                ..PathRepair::default()
            });
        }

        let corridor = self.synthesize_path(start, target, width, height, rng)?;
        let barriers_cleared = carve_corridor(graph, &corridor)?;

        debug!(
            "Carved corridor of {} rooms from {} to {}, cleared {} barriers",
            corridor.len(),
            start,
            target,
            barriers_cleared
        );

        if !self.is_reachable(graph, start, target) {
            return Err(DelveError::GenerationFailed(format!(
                "Treasure room {} still unreachable from {} after path repair",
                target, start
            )));
        }

        Ok(PathRepair {
            was_reachable: false,
            corridor,
            barriers_cleared,
        })
    }

    /// Walks from `start` to `target` one cell at a time.
    ///
    /// Each step closes the x or y gap, choosing by coin flip while both are
    /// open, and may be followed by a one-cell vertical detour that stays
    /// inside the grid. Detours stop after a bounded number of steps so the
    /// walk always finishes. Consecutive cells of the result are grid
    /// neighbours.
    pub fn synthesize_path(
        &self,
        start: RoomId,
        target: RoomId,
        width: i32,
        height: i32,
        rng: &mut StdRng,
    ) -> DelveResult<Vec<RoomId>> {
        let in_bounds = |id: RoomId| id.x >= 0 && id.y >= 0 && id.x < width && id.y < height;
        if !in_bounds(start) || !in_bounds(target) {
            return Err(DelveError::InvalidConfig(format!(
                "Corridor endpoints {} and {} must lie inside a {}x{} grid",
                start, target, width, height
            )));
        }

        let mut walk = vec![start];
        let mut current = start;
        let mut detour_budget = 4 * (width + height);

        while current != target {
            let x_open = current.x != target.x;
            let y_open = current.y != target.y;

            current = if x_open && (!y_open || rng.gen_bool(0.5)) {
                RoomId::new(current.x + (target.x - current.x).signum(), current.y)
            } else {
                RoomId::new(current.x, current.y + (target.y - current.y).signum())
            };
            walk.push(current);

            if detour_budget > 0 && rng.gen_bool(self.detour_chance) {
                detour_budget -= 1;
                let detour = if rng.gen_bool(0.5) && current.y > 0 {
                    Some(current.step(Direction::North))
                } else if current.y < height - 1 {
                    Some(current.step(Direction::South))
                } else {
                    None
                };
                if let Some(next) = detour {
                    current = next;
                    walk.push(current);
                }
            }
        }

        Ok(walk)
    }
}

impl Default for ReachabilityEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears barriers on every room of the walk and links neighbours both ways.
///
/// Returns how many active barriers were removed.
fn carve_corridor(graph: &mut RoomGraph, walk: &[RoomId]) -> DelveResult<usize> {
    let mut cleared = 0;

    for id in walk {
        let room = graph.room_mut(*id).ok_or_else(|| {
            DelveError::GenerationFailed(format!("Corridor passes through missing room {}", id))
        })?;
        if room.has_active_barrier() {
            cleared += 1;
        }
        room.clear_barrier();
    }

    for pair in walk.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let direction = Direction::all()
            .into_iter()
            .find(|d| from.step(*d) == to)
            .ok_or_else(|| {
                DelveError::GenerationFailed(format!(
                    "Corridor step {} -> {} is not between neighbours",
                    from, to
                ))
            })?;
        graph.connect_both(from, direction, to);
    }

    Ok(cleared)
}
