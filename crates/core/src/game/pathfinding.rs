//! Shortest-route search over a tile grid.
//! This module exists so navigation policy and the search primitive stay separate.
//! It does not own the bot's knowledge map or any per-turn decision flow.

use std::collections::{BTreeMap, BTreeSet};

use crate::state::Map;
use crate::types::{Pos, TileKind};

/// Frontier entry. `BTreeSet::pop_first` yields the lowest `f`, and `seq`
/// breaks ties in insertion order, so equal-priority cells are expanded
/// first-discovered-first-served.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    seq: u32,
    y: i32,
    x: i32,
}

/// Best-first search with a Manhattan heuristic over 4-connected neighbors.
///
/// Returns the route from `start` (exclusive) to `goal` (inclusive), or
/// `None` when the goal is unreachable. `None` is a normal answer, not an
/// error; callers fall back to exploration or forfeit the turn.
///
/// A cell is claimed the first time it is discovered and never re-enqueued,
/// so an already-queued cell keeps its first recorded distance even if a
/// shorter approach is found later. With unit step costs and an admissible
/// heuristic this still returns a length-optimal route; it only pins which
/// of several equally short routes wins. Known limitation, kept deliberately
/// so route choices stay reproducible.
///
/// `start` and `goal` must be in bounds and `start` must not be a wall;
/// both are caller contract violations, not runtime conditions.
pub fn find_path(map: &Map, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
    debug_assert!(map.in_bounds(start) && map.in_bounds(goal), "search endpoints must be in bounds");
    debug_assert!(map.tile_at(start) != TileKind::Wall, "search origin must be passable");

    if start == goal {
        return Some(Vec::new());
    }

    let mut open = BTreeSet::new();
    let mut came_from: BTreeMap<Pos, Pos> = BTreeMap::new();
    let mut g_score: BTreeMap<Pos, u32> = BTreeMap::new();
    let mut claimed = vec![false; map.width * map.height];
    let mut next_seq = 0u32;

    claimed[map.index(start)] = true;
    g_score.insert(start, 0);
    open.insert(OpenNode { f: manhattan(start, goal), seq: next_seq, y: start.y, x: start.x });
    next_seq += 1;

    while let Some(node) = open.pop_first() {
        let current = Pos { y: node.y, x: node.x };
        if current == goal {
            return Some(reconstruct_route(&came_from, start, goal));
        }

        let current_g = *g_score.get(&current).expect("expanded node must have a recorded distance");

        for neighbor in neighbors(current) {
            if !map.in_bounds(neighbor) || map.tile_at(neighbor) == TileKind::Wall {
                continue;
            }
            let idx = map.index(neighbor);
            if claimed[idx] {
                continue;
            }
            claimed[idx] = true;

            let g = current_g + 1;
            came_from.insert(neighbor, current);
            g_score.insert(neighbor, g);
            open.insert(OpenNode {
                f: g + manhattan(neighbor, goal),
                seq: next_seq,
                y: neighbor.y,
                x: neighbor.x,
            });
            next_seq += 1;
        }
    }

    None
}

fn reconstruct_route(came_from: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut route = vec![goal];
    let mut current = goal;
    while current != start {
        current = *came_from.get(&current).expect("route must be reconstructible");
        route.push(current);
    }
    route.reverse();
    route.remove(0);
    route
}

pub(crate) fn neighbors(pos: Pos) -> [Pos; 4] {
    [
        Pos { y: pos.y - 1, x: pos.x },
        Pos { y: pos.y, x: pos.x + 1 },
        Pos { y: pos.y + 1, x: pos.x },
        Pos { y: pos.y, x: pos.x - 1 },
    ]
}

pub(crate) fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}
