pub mod game;
pub mod journal;
pub mod map_file;
pub mod state;
pub mod types;

pub use game::{BotBrain, Game, LookWindow, Reply, find_path};
pub use journal::{CommandJournal, CommandRecord, ReplayError, ReplayResult, replay_to_end};
pub use map_file::{MapData, MapFileError};
pub use state::{Map, Player, Role};
pub use types::*;
