use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use app::{format_reply, generate_runtime_seed, outcome_text, parse_difficulty};
use clap::Parser;
use game_core::{Command, CommandJournal, Game, MapData};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map file to play; the built-in labyrinth when omitted
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// EASY, NORMAL, HARD or NIGHTMARE (or 1-4)
    #[arg(short, long, default_value = "NORMAL")]
    difficulty: String,

    /// Fixed RNG seed; generated when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the command journal here when the run ends
    #[arg(short, long)]
    journal: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let map_data = match &args.map {
        Some(path) => MapData::load(path)
            .map_err(|err| anyhow!("failed to load map {}: {err:?}", path.display()))?,
        None => MapData::default_labyrinth(),
    };
    let mode = parse_difficulty(&args.difficulty)
        .ok_or_else(|| anyhow!("unknown difficulty '{}'", args.difficulty))?;
    let seed = args.seed.unwrap_or_else(generate_runtime_seed);

    println!("Playing {} (seed {seed})", map_data.name);

    let mut journal = CommandJournal::new(seed, mode, &map_data.name);
    let mut game = Game::new(seed, &map_data, mode);

    // One human line, one bot turn. Every raw line goes to the journal so a
    // replay forfeits the same turns the live run did.
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        journal.append(&line);

        match Command::parse(&line) {
            Some(command) => {
                let reply = game.process_command(command);
                println!("{}", format_reply(&reply));
            }
            None => println!("FAIL"),
        }
        if game.outcome().is_some() {
            break;
        }

        game.bot_turn();
        if let Some(outcome) = game.outcome() {
            println!("{}", outcome_text(outcome));
            break;
        }
    }

    if let Some(path) = &args.journal {
        journal
            .save(path)
            .with_context(|| format!("failed to write journal {}", path.display()))?;
    }
    Ok(())
}
