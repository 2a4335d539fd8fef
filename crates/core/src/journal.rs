//! Command journal: the raw human input lines of a run plus everything
//! needed to replay them deterministically (seed, difficulty, map name).
//! Replays re-run the real driver, they never shortcut through state.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::Game;
use crate::map_file::MapData;
use crate::types::{BotMode, Command, RunOutcome};

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommandRecord {
    pub seq: u64,
    pub line: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommandJournal {
    pub format_version: u16,
    pub seed: u64,
    pub difficulty: u8,
    pub map_name: String,
    pub commands: Vec<CommandRecord>,
}

#[derive(Debug)]
pub enum ReplayError {
    /// The recorded difficulty is outside 1-4.
    UnknownDifficulty(u8),
    /// The journal was recorded on a different map; replaying it here would
    /// produce an unrelated run and a mismatched hash.
    MapMismatch { recorded: String, supplied: String },
}

/// Where a replayed run ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub final_outcome: Option<RunOutcome>,
    pub final_snapshot_hash: u64,
    pub final_turn: u64,
}

impl CommandJournal {
    pub fn new(seed: u64, mode: BotMode, map_name: &str) -> Self {
        Self {
            format_version: JOURNAL_FORMAT_VERSION,
            seed,
            difficulty: mode.level(),
            map_name: map_name.to_string(),
            commands: Vec::new(),
        }
    }

    /// Record one raw input line, valid or not. Invalid lines cost a turn at
    /// replay time exactly as they did live, so they must be kept.
    pub fn append(&mut self, line: &str) {
        let seq = self.commands.len() as u64;
        self.commands.push(CommandRecord { seq, line: line.to_string() });
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(io::Error::other)
    }
}

/// Replay a journal against a map from scratch. Each record is one human
/// turn followed by one bot turn, the same loop the live driver runs; an
/// unparseable line forfeits the human half but the bot still moves.
pub fn replay_to_end(
    map_data: &MapData,
    journal: &CommandJournal,
) -> Result<ReplayResult, ReplayError> {
    let mode = BotMode::from_level(journal.difficulty)
        .ok_or(ReplayError::UnknownDifficulty(journal.difficulty))?;
    if journal.map_name != map_data.name {
        return Err(ReplayError::MapMismatch {
            recorded: journal.map_name.clone(),
            supplied: map_data.name.clone(),
        });
    }
    let mut game = Game::new(journal.seed, map_data, mode);

    for record in &journal.commands {
        if game.outcome().is_some() {
            break;
        }
        if let Some(command) = Command::parse(&record.line) {
            game.process_command(command);
        }
        game.bot_turn();
    }

    Ok(ReplayResult {
        final_outcome: game.outcome(),
        final_snapshot_hash: game.snapshot_hash(),
        final_turn: game.current_turn(),
    })
}
