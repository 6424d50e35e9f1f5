//! A* search over the tile grid, used by ghosts to plan routes cell by cell.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use glam::IVec2;
use smallvec::SmallVec;

use crate::constants::GHOST_BLOCKING_CODE;
use crate::map::direction::Direction;
use crate::map::grid::TileGrid;

/// Distance estimate used to order the search frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Straight-line distance, rounded to the nearest whole cell.
    Euclidean,
    Manhattan,
}

impl Heuristic {
    pub fn estimate(self, a: IVec2, b: IVec2) -> u32 {
        let delta = (a - b).abs();
        match self {
            Heuristic::Euclidean => (delta.as_dvec2().length().round()) as u32,
            Heuristic::Manhattan => (delta.x + delta.y) as u32,
        }
    }
}

/// Neighbor expansion order. Affects which of several equal-cost routes is returned.
const EXPANSION_ORDER: [Direction; 4] = [Direction::Right, Direction::Left, Direction::Up, Direction::Down];

/// Cells a ghost can step to from `tile`. Only the sideways neighbors exist inside the warp corridor.
pub fn neighbors(grid: &TileGrid, tile: IVec2) -> SmallVec<[IVec2; 4]> {
    let horizontal_only = grid.is_warp_column(tile.x);
    EXPANSION_ORDER
        .iter()
        .filter(|direction| !horizontal_only || direction.is_horizontal())
        .map(|direction| tile + direction.as_ivec2())
        .filter(|next| grid.is_passable(*next, GHOST_BLOCKING_CODE))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frontier {
    priority: u32,
    /// Insertion counter; breaks priority ties first-in first-out.
    sequence: u64,
    cost: u32,
    tile: IVec2,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert so the lowest priority pops first.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a shortest route from `start` to `goal`, every step costing one.
///
/// The returned cells begin with the cell after `start` and end with `goal`; an empty route means
/// the two are the same cell. `None` means `goal` cannot be reached. Results are deterministic
/// for a given grid and inputs.
pub fn find_path(grid: &TileGrid, start: IVec2, goal: IVec2, heuristic: Heuristic) -> Option<Vec<IVec2>> {
    if start == goal {
        return Some(Vec::new());
    }

    let mut frontier = BinaryHeap::new();
    let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();
    let mut cost_so_far: HashMap<IVec2, u32> = HashMap::new();
    let mut sequence = 0u64;

    frontier.push(Frontier {
        priority: 0,
        sequence,
        cost: 0,
        tile: start,
    });
    cost_so_far.insert(start, 0);

    while let Some(current) = frontier.pop() {
        if current.tile == goal {
            break;
        }
        // Superseded by a cheaper entry for the same cell.
        if cost_so_far.get(&current.tile).is_some_and(|&best| current.cost > best) {
            continue;
        }

        for next in neighbors(grid, current.tile) {
            let cost = current.cost + 1;
            if cost_so_far.get(&next).is_none_or(|&known| cost < known) {
                cost_so_far.insert(next, cost);
                came_from.insert(next, current.tile);
                sequence += 1;
                frontier.push(Frontier {
                    priority: cost + heuristic.estimate(goal, next),
                    sequence,
                    cost,
                    tile: next,
                });
            }
        }
    }

    reconstruct(&came_from, start, goal)
}

fn reconstruct(came_from: &HashMap<IVec2, IVec2>, start: IVec2, goal: IVec2) -> Option<Vec<IVec2>> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&previous) = came_from.get(&current) {
        if previous == start {
            path.reverse();
            return Some(path);
        }
        path.push(previous);
        current = previous;
    }
    None
}
