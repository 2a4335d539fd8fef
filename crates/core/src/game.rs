//! Turn driver: authoritative map, both players, the human command protocol
//! and the bot turn orchestration.

mod bot;
mod pathfinding;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};

pub use bot::BotBrain;
pub use pathfinding::find_path;

use crate::map_file::MapData;
use crate::state::{Map, Player, Role};
use crate::types::{
    BotAction, BotMode, Command, Direction, LogEvent, LossCause, Pos, RunOutcome, TileKind,
};

/// Radius of the look window (a 5x5 square, clamped at the map edge).
const LOOK_RADIUS: i32 = 2;

/// Spawn draws before giving up on rejection sampling and scanning instead.
const MAX_SPAWN_DRAWS: u32 = 1024;

/// Snapshot of the visible window around a player, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookWindow {
    pub center: Pos,
    pub cells: Vec<(Pos, TileKind)>,
}

/// Protocol reply to a human command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    GoldRequired(u32),
    GoldOwned(u32),
    PickupOk { owned: u32 },
    PickupFail { owned: u32 },
    MoveOk,
    MoveFail,
    Window(LookWindow),
    GameOver(RunOutcome),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mover {
    Human,
    Bot,
}

enum MoveOutcome {
    Moved,
    Blocked,
    Caught,
}

pub struct Game {
    seed: u64,
    turn: u64,
    rng: ChaCha8Rng,
    map: Map,
    map_name: String,
    gold_required: u32,
    human: Player,
    bot: Player,
    log: Vec<LogEvent>,
    outcome: Option<RunOutcome>,
}

impl Game {
    /// Spawns the human on a random non-wall, non-gold tile and the bot on a
    /// random non-wall, non-human tile, then builds the bot's brain against
    /// the world as it looks at that moment (human marker placed, bot marker
    /// not yet).
    pub fn new(seed: u64, map_data: &MapData, mode: BotMode) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut map = map_data.map.clone();

        let human_pos = random_spawn(&mut rng, &map, |tile| {
            tile != TileKind::Wall && tile != TileKind::Gold
        });
        let human = Player {
            pos: human_pos,
            on_gold: false,
            on_exit: map.tile_at(human_pos) == TileKind::Exit,
            gold: 0,
            role: Role::Human,
        };
        map.set_tile(human_pos, TileKind::Human);

        let bot_pos = random_spawn(&mut rng, &map, |tile| {
            tile != TileKind::Wall && tile != TileKind::Human
        });
        let brain = BotBrain::new(bot_pos, mode, &map);
        let bot = Player {
            pos: bot_pos,
            on_gold: map.tile_at(bot_pos) == TileKind::Gold,
            on_exit: map.tile_at(bot_pos) == TileKind::Exit,
            gold: 0,
            role: Role::Bot(brain),
        };
        map.set_tile(bot_pos, TileKind::Bot);

        Self {
            seed,
            turn: 0,
            rng,
            map,
            map_name: map_data.name.clone(),
            gold_required: map_data.gold_required,
            human,
            bot,
            log: Vec::new(),
            outcome: None,
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn gold_required(&self) -> u32 {
        self.gold_required
    }

    pub fn human(&self) -> &Player {
        &self.human
    }

    pub fn bot(&self) -> &Player {
        &self.bot
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn current_turn(&self) -> u64 {
        self.turn
    }

    /// Execute one human command. Invalid input never reaches this method;
    /// the caller simply forfeits the turn on a parse failure.
    pub fn process_command(&mut self, command: Command) -> Reply {
        if let Some(outcome) = self.outcome {
            return Reply::GameOver(outcome);
        }

        match command {
            Command::Hello => Reply::GoldRequired(self.gold_required),
            Command::Gold => Reply::GoldOwned(self.human.gold),
            Command::Pickup => self.pickup(),
            Command::Move(dir) => self.move_human(dir),
            Command::Look => Reply::Window(self.look_window(self.human.pos)),
            Command::Quit => {
                let outcome = if self.human.on_exit && self.human.gold >= self.gold_required {
                    RunOutcome::Won
                } else {
                    RunOutcome::Lost(LossCause::GaveUp)
                };
                self.outcome = Some(outcome);
                Reply::GameOver(outcome)
            }
        }
    }

    /// Execute the bot's turn. Reckless is force-fed a look before every
    /// move so its short-lived routes always run against fresh terrain;
    /// Cautious looks only when its brain asks to.
    pub fn bot_turn(&mut self) {
        if self.outcome.is_some() {
            return;
        }

        let Role::Bot(brain) = &self.bot.role else {
            return;
        };
        if brain.mode() == BotMode::Reckless {
            self.feed_bot_look();
        }

        let action = {
            let pos = self.bot.pos;
            let Role::Bot(brain) = &mut self.bot.role else {
                return;
            };
            brain.decide(pos, &mut self.rng)
        };

        match action {
            BotAction::Move(to) => {
                self.resolve_move(Mover::Bot, to);
            }
            BotAction::Look => self.feed_bot_look(),
            BotAction::Wait => {}
        }
        self.turn += 1;
    }

    /// The 5x5 window around `center`, clamped at the map edge.
    pub fn look_window(&self, center: Pos) -> LookWindow {
        let y_lo = (center.y - LOOK_RADIUS).max(0);
        let y_hi = (center.y + LOOK_RADIUS).min(self.map.height as i32 - 1);
        let x_lo = (center.x - LOOK_RADIUS).max(0);
        let x_hi = (center.x + LOOK_RADIUS).min(self.map.width as i32 - 1);

        let mut cells = Vec::new();
        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                let pos = Pos { y, x };
                cells.push((pos, self.map.tile_at(pos)));
            }
        }
        LookWindow { center, cells }
    }

    /// Seed, turn and player state digested with xxh3 for determinism tests.
    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::Hasher;
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.turn);

        hasher.write_i32(self.human.pos.y);
        hasher.write_i32(self.human.pos.x);
        hasher.write_u32(self.human.gold);
        hasher.write_u8(u8::from(self.human.on_exit));
        hasher.write_u8(u8::from(self.human.on_gold));

        hasher.write_i32(self.bot.pos.y);
        hasher.write_i32(self.bot.pos.x);
        if let Role::Bot(brain) = &self.bot.role {
            hasher.write_u8(brain.mode().level());
            if let Some(destination) = brain.destination() {
                hasher.write_i32(destination.y);
                hasher.write_i32(destination.x);
            }
            hasher.write_u64(brain.route_len() as u64);
        }

        hasher.write_u8(match self.outcome {
            None => 0,
            Some(RunOutcome::Won) => 1,
            Some(RunOutcome::Lost(LossCause::Caught)) => 2,
            Some(RunOutcome::Lost(LossCause::GaveUp)) => 3,
        });
        hasher.finish()
    }

    fn pickup(&mut self) -> Reply {
        if self.human.on_gold {
            self.human.gold += 1;
            self.human.on_gold = false;
            self.log.push(LogEvent::GoldPickedUp { total: self.human.gold });
            Reply::PickupOk { owned: self.human.gold }
        } else {
            Reply::PickupFail { owned: self.human.gold }
        }
    }

    fn move_human(&mut self, dir: Direction) -> Reply {
        let to = self.human.pos.step(dir);
        match self.resolve_move(Mover::Human, to) {
            MoveOutcome::Moved => Reply::MoveOk,
            MoveOutcome::Blocked => Reply::MoveFail,
            MoveOutcome::Caught => Reply::GameOver(RunOutcome::Lost(LossCause::Caught)),
        }
    }

    /// Shared move resolution. Stepping onto the opposing player's marker is
    /// a capture and ends the game; stepping into a wall forfeits the move.
    /// The target cell is taken as given, with no adjacency check against
    /// the mover's current position.
    fn resolve_move(&mut self, who: Mover, to: Pos) -> MoveOutcome {
        let target = self.map.tile_at(to);
        if target == TileKind::Human || target == TileKind::Bot {
            self.outcome = Some(RunOutcome::Lost(LossCause::Caught));
            self.log.push(LogEvent::PlayerCaught { at: to });
            return MoveOutcome::Caught;
        }
        if target == TileKind::Wall {
            self.log.push(LogEvent::MoveBlocked { to });
            return MoveOutcome::Blocked;
        }

        let (old_pos, vacated, marker) = {
            let player = self.player_mut(who);
            let vacated = player.vacated_tile();
            player.on_exit = false;
            player.on_gold = false;
            (player.pos, vacated, player.marker())
        };
        self.map.set_tile(old_pos, vacated);

        match target {
            TileKind::Gold => self.player_mut(who).on_gold = true,
            TileKind::Exit => self.player_mut(who).on_exit = true,
            _ => {}
        }
        self.map.set_tile(to, marker);

        // Keep the bot's private map in sync: an Omniscient bot is told every
        // human move, and every bot feeds its own marker back (which is also
        // how arrival at the destination is detected).
        let bot_pos = self.bot.pos;
        if let Role::Bot(brain) = &mut self.bot.role {
            match who {
                Mover::Human if brain.mode() == BotMode::Omniscient => {
                    brain.record_tile(to, TileKind::Human, bot_pos);
                }
                Mover::Bot => brain.record_tile(to, TileKind::Bot, bot_pos),
                _ => {}
            }
        }

        self.player_mut(who).pos = to;
        MoveOutcome::Moved
    }

    fn feed_bot_look(&mut self) {
        let center = self.bot.pos;
        let window = self.look_window(center);
        let Role::Bot(brain) = &mut self.bot.role else {
            return;
        };
        for (pos, tile) in window.cells {
            brain.record_tile(pos, tile, center);
        }
    }

    fn player_mut(&mut self, who: Mover) -> &mut Player {
        match who {
            Mover::Human => &mut self.human,
            Mover::Bot => &mut self.bot,
        }
    }
}

/// Rejection sampling over the interior; falls back to a row-major scan if
/// the random stream is unlucky for too long. Panics only on maps with no
/// acceptable tile at all, which valid map files cannot produce.
fn random_spawn(rng: &mut ChaCha8Rng, map: &Map, accept: impl Fn(TileKind) -> bool) -> Pos {
    for _ in 0..MAX_SPAWN_DRAWS {
        let pos = Pos {
            y: 1 + (rng.next_u64() % (map.height as u64 - 2)) as i32,
            x: 1 + (rng.next_u64() % (map.width as u64 - 2)) as i32,
        };
        if accept(map.tile_at(pos)) {
            return pos;
        }
    }
    for (idx, tile) in map.tiles.iter().enumerate() {
        let pos = Pos { y: (idx / map.width) as i32, x: (idx % map.width) as i32 };
        if tile.is_walkable() && accept(*tile) {
            return pos;
        }
    }
    panic!("map has no spawnable tile");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_file::MapData;

    fn open_arena() -> MapData {
        // 12x8 all-floor arena with one gold and one exit in fixed spots.
        let mut map = Map::new(12, 8);
        map.set_tile(Pos { y: 2, x: 9 }, TileKind::Gold);
        map.set_tile(Pos { y: 5, x: 2 }, TileKind::Exit);
        MapData { name: "arena".to_string(), gold_required: 1, map }
    }

    fn new_game(seed: u64, mode: BotMode) -> Game {
        Game::new(seed, &open_arena(), mode)
    }

    /// Pin both players to known floor cells so tests do not depend on the
    /// random spawns.
    fn place_players(game: &mut Game, human_to: Pos, bot_to: Pos) {
        let human_old = game.human.pos;
        let bot_old = game.bot.pos;
        game.map.set_tile(human_old, TileKind::Floor);
        game.map.set_tile(bot_old, TileKind::Floor);
        game.human.pos = human_to;
        game.human.on_gold = false;
        game.human.on_exit = false;
        game.bot.pos = bot_to;
        game.bot.on_gold = false;
        game.bot.on_exit = false;
        game.map.set_tile(human_to, TileKind::Human);
        game.map.set_tile(bot_to, TileKind::Bot);
    }

    #[test]
    fn spawns_respect_tile_rules() {
        for seed in 0..20 {
            let game = new_game(seed, BotMode::Cautious);
            assert_eq!(game.map.tile_at(game.human.pos), TileKind::Human);
            assert_eq!(game.map.tile_at(game.bot.pos), TileKind::Bot);
            assert_ne!(game.human.pos, game.bot.pos);
            assert!(!game.human.on_gold, "human never spawns on gold");
        }
    }

    #[test]
    fn smallest_playable_maps_spawn_both_players() {
        // 3x3 is the parser's minimum; a single interior row still has to
        // host both spawns without the samplers degenerating.
        let data = MapData::parse("name Cell\nwin 0\n####\n#..#\n####").expect("minimal map");
        for seed in 0..10 {
            let game = Game::new(seed, &data, BotMode::Erratic);
            assert_ne!(game.human.pos, game.bot.pos);
            assert_eq!(game.map.tile_at(game.human.pos), TileKind::Human);
            assert_eq!(game.map.tile_at(game.bot.pos), TileKind::Bot);
        }
    }

    #[test]
    fn hello_and_gold_report_the_protocol_numbers() {
        let mut game = new_game(3, BotMode::Erratic);
        assert_eq!(game.process_command(Command::Hello), Reply::GoldRequired(1));
        assert_eq!(game.process_command(Command::Gold), Reply::GoldOwned(0));
    }

    #[test]
    fn pickup_only_works_on_gold() {
        let mut game = new_game(3, BotMode::Erratic);
        assert_eq!(game.process_command(Command::Pickup), Reply::PickupFail { owned: 0 });

        game.human.on_gold = true;
        assert_eq!(game.process_command(Command::Pickup), Reply::PickupOk { owned: 1 });
        assert_eq!(game.human.gold, 1);
        assert!(!game.human.on_gold);
        assert!(game.log.contains(&LogEvent::GoldPickedUp { total: 1 }));
    }

    #[test]
    fn moving_into_a_wall_fails_and_stays_put() {
        let mut game = new_game(3, BotMode::Erratic);
        place_players(&mut game, Pos { y: 1, x: 1 }, Pos { y: 6, x: 10 });

        assert_eq!(game.process_command(Command::Move(Direction::North)), Reply::MoveFail);
        assert_eq!(game.human.pos, Pos { y: 1, x: 1 });
        assert!(game.log.contains(&LogEvent::MoveBlocked { to: Pos { y: 0, x: 1 } }));
    }

    #[test]
    fn vacated_gold_tile_is_restored() {
        let mut game = new_game(3, BotMode::Erratic);
        place_players(&mut game, Pos { y: 4, x: 4 }, Pos { y: 6, x: 10 });
        game.human.on_gold = true;

        assert_eq!(game.process_command(Command::Move(Direction::East)), Reply::MoveOk);
        assert_eq!(
            game.map.tile_at(Pos { y: 4, x: 4 }),
            TileKind::Gold,
            "unpicked gold stays on the map"
        );
        assert!(!game.human.on_gold);
    }

    #[test]
    fn walking_into_the_bot_is_a_capture() {
        let mut game = new_game(3, BotMode::Erratic);
        place_players(&mut game, Pos { y: 3, x: 3 }, Pos { y: 3, x: 4 });

        let reply = game.process_command(Command::Move(Direction::East));
        assert_eq!(reply, Reply::GameOver(RunOutcome::Lost(LossCause::Caught)));
        assert_eq!(game.outcome(), Some(RunOutcome::Lost(LossCause::Caught)));
        assert!(game.log.contains(&LogEvent::PlayerCaught { at: Pos { y: 3, x: 4 } }));
    }

    #[test]
    fn quit_wins_only_on_exit_with_enough_gold() {
        let mut game = new_game(3, BotMode::Erratic);
        assert_eq!(
            game.process_command(Command::Quit),
            Reply::GameOver(RunOutcome::Lost(LossCause::GaveUp))
        );

        let mut game = new_game(3, BotMode::Erratic);
        game.human.on_exit = true;
        game.human.gold = 1;
        assert_eq!(game.process_command(Command::Quit), Reply::GameOver(RunOutcome::Won));
    }

    #[test]
    fn commands_after_game_over_repeat_the_outcome() {
        let mut game = new_game(3, BotMode::Erratic);
        game.process_command(Command::Quit);
        assert_eq!(
            game.process_command(Command::Hello),
            Reply::GameOver(RunOutcome::Lost(LossCause::GaveUp))
        );
    }

    #[test]
    fn look_window_is_clamped_at_the_corner() {
        let game = new_game(3, BotMode::Erratic);
        let window = game.look_window(Pos { y: 1, x: 1 });
        // 4x4 instead of 5x5: rows 0..=3, cols 0..=3.
        assert_eq!(window.cells.len(), 16);
        assert_eq!(window.cells[0].0, Pos { y: 0, x: 0 });
        assert_eq!(window.cells.last().expect("cells").0, Pos { y: 3, x: 3 });
    }

    #[test]
    fn omniscient_bot_is_told_every_human_move() {
        let mut game = new_game(5, BotMode::Omniscient);
        place_players(&mut game, Pos { y: 3, x: 3 }, Pos { y: 6, x: 10 });

        assert_eq!(game.process_command(Command::Move(Direction::East)), Reply::MoveOk);
        let Role::Bot(brain) = &game.bot.role else { panic!("bot role") };
        assert_eq!(brain.destination(), Some(Pos { y: 3, x: 4 }));
        assert!(brain.route_len() > 0, "the retarget re-plans immediately");
    }

    #[test]
    fn cautious_bot_is_not_told_human_moves() {
        let mut game = new_game(5, BotMode::Cautious);
        place_players(&mut game, Pos { y: 3, x: 3 }, Pos { y: 6, x: 10 });

        game.process_command(Command::Move(Direction::East));
        let Role::Bot(brain) = &game.bot.role else { panic!("bot role") };
        assert_eq!(brain.destination(), None);
    }

    #[test]
    fn bot_turns_keep_exactly_one_marker_of_each_player() {
        let mut game = new_game(11, BotMode::Reckless);
        for _ in 0..60 {
            if game.outcome().is_some() {
                break;
            }
            game.bot_turn();
            let bots =
                game.map.tiles.iter().filter(|tile| **tile == TileKind::Bot).count();
            let humans =
                game.map.tiles.iter().filter(|tile| **tile == TileKind::Human).count();
            assert_eq!(bots, 1);
            assert_eq!(humans, 1);
            assert_eq!(game.map.tile_at(game.bot.pos), TileKind::Bot);
        }
    }

    #[test]
    fn erratic_bot_moves_at_most_one_step_per_turn() {
        let mut game = new_game(9, BotMode::Erratic);
        for _ in 0..50 {
            if game.outcome().is_some() {
                break;
            }
            let before = game.bot.pos;
            game.bot_turn();
            let after = game.bot.pos;
            assert!(before.y.abs_diff(after.y) + before.x.abs_diff(after.x) <= 1);
        }
    }
}
