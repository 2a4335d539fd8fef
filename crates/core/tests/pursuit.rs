use core::map_file::MapData;
use core::state::Map;
use core::{BotMode, Game, LossCause, Pos, RunOutcome, TileKind};

fn open_arena() -> MapData {
    let mut map = Map::new(12, 8);
    map.set_tile(Pos { y: 2, x: 9 }, TileKind::Gold);
    map.set_tile(Pos { y: 5, x: 2 }, TileKind::Exit);
    MapData { name: "arena".to_string(), gold_required: 1, map }
}

#[test]
fn test_omniscient_bot_catches_an_idle_human() {
    for seed in [1u64, 8, 21, 55] {
        let mut game = Game::new(seed, &open_arena(), BotMode::Omniscient);
        for _ in 0..100 {
            if game.outcome().is_some() {
                break;
            }
            game.bot_turn();
        }
        assert_eq!(
            game.outcome(),
            Some(RunOutcome::Lost(LossCause::Caught)),
            "seed {seed}: a full-knowledge chaser must reach a stationary target"
        );
    }
}

#[test]
fn test_omniscient_bot_catches_on_the_labyrinth_too() {
    let mut game = Game::new(4242, &MapData::default_labyrinth(), BotMode::Omniscient);
    for _ in 0..200 {
        if game.outcome().is_some() {
            break;
        }
        game.bot_turn();
    }
    assert_eq!(game.outcome(), Some(RunOutcome::Lost(LossCause::Caught)));
}

#[test]
fn test_long_runs_keep_marker_and_position_invariants() {
    for mode in [BotMode::Erratic, BotMode::Cautious, BotMode::Reckless] {
        let mut game = Game::new(31, &MapData::default_labyrinth(), mode);
        for _ in 0..200 {
            if game.outcome().is_some() {
                break;
            }
            game.bot_turn();

            let bots = game.map().tiles.iter().filter(|tile| **tile == TileKind::Bot).count();
            let humans =
                game.map().tiles.iter().filter(|tile| **tile == TileKind::Human).count();
            assert_eq!(bots, 1, "{mode:?}: exactly one bot marker");
            assert_eq!(humans, 1, "{mode:?}: exactly one human marker");
            assert_eq!(game.map().tile_at(game.bot().pos), TileKind::Bot);
            assert_eq!(game.map().tile_at(game.human().pos), TileKind::Human);
        }
    }
}

#[test]
fn test_bot_never_ends_a_turn_inside_a_wall() {
    for mode in [BotMode::Erratic, BotMode::Cautious, BotMode::Reckless, BotMode::Omniscient] {
        let mut game = Game::new(97, &MapData::default_labyrinth(), mode);
        for _ in 0..150 {
            if game.outcome().is_some() {
                break;
            }
            game.bot_turn();
            assert_ne!(game.map().tile_at(game.bot().pos), TileKind::Wall, "{mode:?}");
        }
    }
}
