//! Bot navigation: private partial-knowledge map and per-mode decision policy.
//! This module exists to keep the behavior state machine separate from the
//! search primitive. It does not own the authoritative world map or turn order.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::RngCore;

use super::pathfinding::find_path;
use crate::state::Map;
use crate::types::{BotAction, BotMode, Pos, TileKind};

/// Cap on rejection-sampling draws. Beyond this the bot forfeits the turn
/// instead of spinning on an unlucky random stream.
const MAX_RANDOM_DRAWS: u32 = 64;

/// The autonomous player's navigation state. Owns a private copy of the map
/// plus a knowledge bitmap; the driver feeds observations in through
/// `record_tile` and polls `decide` once per bot turn.
pub struct BotBrain {
    mode: BotMode,
    map: Map,
    known: Vec<bool>,
    route: VecDeque<Pos>,
    destination: Option<Pos>,
    turns_since_look: u32,
}

impl BotBrain {
    /// Modes 1-3 start with an optimistic map: known wall border, interior
    /// assumed open and unknown. Omniscient clones the whole world, targets
    /// the human immediately and plans its first route at construction.
    pub fn new(pos: Pos, mode: BotMode, world: &Map) -> Self {
        if mode == BotMode::Omniscient {
            let destination = world.find_tile(TileKind::Human);
            let mut brain = Self {
                mode,
                map: world.clone(),
                known: vec![true; world.width * world.height],
                route: VecDeque::new(),
                destination,
                turns_since_look: 0,
            };
            brain.plan_route(pos);
            return brain;
        }

        let map = Map::new(world.width, world.height);
        let mut known = vec![false; world.width * world.height];
        for (idx, tile) in map.tiles.iter().enumerate() {
            if *tile == TileKind::Wall {
                known[idx] = true;
            }
        }
        Self { mode, map, known, route: VecDeque::new(), destination: None, turns_since_look: 0 }
    }

    pub fn mode(&self) -> BotMode {
        self.mode
    }

    pub fn destination(&self) -> Option<Pos> {
        self.destination
    }

    pub fn route_len(&self) -> usize {
        self.route.len()
    }

    pub fn is_known(&self, pos: Pos) -> bool {
        self.map.in_bounds(pos) && self.known[self.map.index(pos)]
    }

    /// One observed cell, pushed by the driver from a look window or a
    /// player move. A sighted human becomes the destination and forces an
    /// immediate re-plan; the bot's own marker on the destination cell means
    /// arrival. Erratic ignores knowledge entirely.
    pub fn record_tile(&mut self, pos: Pos, tile: TileKind, self_pos: Pos) {
        debug_assert!(self.map.in_bounds(pos), "recorded cell must be in bounds");
        self.map.set_tile(pos, tile);
        let idx = self.map.index(pos);
        self.known[idx] = true;

        if self.mode == BotMode::Erratic {
            return;
        }
        if tile == TileKind::Human {
            self.destination = Some(pos);
            self.plan_route(self_pos);
        } else if tile == TileKind::Bot && self.destination == Some(pos) {
            self.destination = None;
        }
    }

    /// Decide what to do with this turn. `Wait` means the bot found no valid
    /// move; the driver treats it as a forfeited turn, never as an error.
    pub fn decide(&mut self, pos: Pos, rng: &mut ChaCha8Rng) -> BotAction {
        if self.route.is_empty() {
            match self.mode {
                BotMode::Erratic => return self.random_adjacent_step(pos, rng),
                BotMode::Cautious | BotMode::Reckless => self.pick_exploration_target(pos, rng),
                // Omniscient only re-plans on human sightings; an empty route
                // here means the last plan failed, so the turn is forfeited.
                BotMode::Omniscient => {}
            }
        }

        if self.mode == BotMode::Cautious
            && let Some(&head) = self.route.front()
            && (!self.is_known(head) || self.turns_since_look > 3)
        {
            // Withhold the move and ask for a look; the route survives.
            self.turns_since_look = 0;
            return BotAction::Look;
        }

        let Some(next) = self.route.pop_front() else {
            return BotAction::Wait;
        };
        self.turns_since_look += 1;

        if self.mode == BotMode::Reckless && self.turns_since_look > 1 {
            // The terrain under the rest of the route was observed two turns
            // ago; drop it so the next turn plans against a fresh look.
            self.turns_since_look = 0;
            self.route.clear();
            self.destination = None;
        }

        BotAction::Move(next)
    }

    /// Exploration used by Cautious and Reckless when the route runs out:
    /// head for the first unknown cell in the 8-cell window around the bot,
    /// otherwise for a random interior cell assumed open.
    fn pick_exploration_target(&mut self, pos: Pos, rng: &mut ChaCha8Rng) {
        let y_lo = (pos.y - 4).max(1);
        let y_hi = (pos.y + 4).min(self.map.height as i32 - 1);
        let x_lo = (pos.x - 4).max(1);
        let x_hi = (pos.x + 4).min(self.map.width as i32 - 1);

        'scan: for y in y_lo..y_hi {
            for x in x_lo..x_hi {
                let candidate = Pos { y, x };
                if !self.is_known(candidate) {
                    self.destination = Some(candidate);
                    self.plan_route(pos);
                    break 'scan;
                }
            }
        }

        let mut draws = 0;
        while self.route.is_empty() && draws < MAX_RANDOM_DRAWS {
            draws += 1;
            let target = self.random_interior_cell(rng);
            if target == pos {
                continue;
            }
            // Assume the unseen target is open so the search cannot fail on
            // a wall the bot has never observed. It stays unknown, which
            // makes Cautious look before actually stepping onto it.
            self.known[self.map.index(target)] = false;
            self.map.set_tile(target, TileKind::Floor);
            self.destination = Some(target);
            self.plan_route(pos);
        }
        // Still empty after the cap: no destination this turn, decide()
        // degrades to Wait.
    }

    fn random_adjacent_step(&self, pos: Pos, rng: &mut ChaCha8Rng) -> BotAction {
        for _ in 0..MAX_RANDOM_DRAWS {
            let dy = (rng.next_u64() % 3) as i32 - 1;
            let dx = (rng.next_u64() % 3) as i32 - 1;
            // Exactly one axis moves: rejects the zero step and diagonals.
            if (dy == 0) != (dx == 0) {
                return BotAction::Move(Pos { y: pos.y + dy, x: pos.x + dx });
            }
        }
        BotAction::Wait
    }

    fn random_interior_cell(&self, rng: &mut ChaCha8Rng) -> Pos {
        let y = 1 + (rng.next_u64() % (self.map.height as u64 - 2)) as i32;
        let x = 1 + (rng.next_u64() % (self.map.width as u64 - 2)) as i32;
        Pos { y, x }
    }

    /// Replace the route wholesale with a fresh plan toward the destination.
    /// A failed search leaves the route empty; the next `decide` falls back
    /// to exploration (or `Wait` for Omniscient).
    fn plan_route(&mut self, pos: Pos) {
        self.route.clear();
        let Some(destination) = self.destination else {
            return;
        };
        if let Some(path) = find_path(&self.map, pos, destination) {
            self.route = path.into();
        }
    }
}
