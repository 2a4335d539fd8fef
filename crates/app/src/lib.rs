//! Console front end helpers: difficulty parsing, protocol reply formatting
//! and look-window rendering. Kept free of terminal I/O so the formatting is
//! unit-testable; `main` only wires stdin and stdout to these.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use game_core::{BotMode, LookWindow, LossCause, Reply, RunOutcome};

pub fn parse_difficulty(text: &str) -> Option<BotMode> {
    match text.trim().to_ascii_uppercase().as_str() {
        "EASY" | "1" => Some(BotMode::Erratic),
        "NORMAL" | "2" => Some(BotMode::Cautious),
        "HARD" | "3" => Some(BotMode::Reckless),
        "NIGHTMARE" | "4" => Some(BotMode::Omniscient),
        _ => None,
    }
}

/// One string per visible row, using the map glyphs. The window arrives
/// row-major, so a row break is simply a change of `y`.
pub fn render_window(window: &LookWindow) -> Vec<String> {
    let mut rows: Vec<String> = Vec::new();
    let mut row_y = None;
    for (pos, tile) in &window.cells {
        if row_y != Some(pos.y) {
            rows.push(String::new());
            row_y = Some(pos.y);
        }
        if let Some(row) = rows.last_mut() {
            row.push(tile.glyph());
        }
    }
    rows
}

pub fn format_reply(reply: &Reply) -> String {
    match reply {
        Reply::GoldRequired(amount) => format!("Gold to win: {amount}"),
        Reply::GoldOwned(amount) => format!("Gold owned: {amount}"),
        Reply::PickupOk { owned } => format!("SUCCESS. Gold owned: {owned}"),
        Reply::PickupFail { owned } => format!("FAIL. Gold owned: {owned}"),
        Reply::MoveOk => "SUCCESS".to_string(),
        Reply::MoveFail => "FAIL".to_string(),
        Reply::Window(window) => render_window(window).join("\n"),
        Reply::GameOver(outcome) => outcome_text(*outcome).to_string(),
    }
}

pub fn outcome_text(outcome: RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Won => "WIN. CONGRATULATIONS, YOU ARE THE BEST!",
        RunOutcome::Lost(LossCause::Caught) => "LOSE. YOU HAVE BEEN CAUGHT.",
        RunOutcome::Lost(LossCause::GaveUp) => "LOSE.",
    }
}

static GENERATED_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Seed for runs that did not pass `--seed`. Mixes wall clock, pid and a
/// per-process counter so rapid consecutive launches still differ.
pub fn generate_runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(std::process::id());
    let counter = GENERATED_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);

    mix_seed(entropy)
}

fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
