use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn step(self, dir: Direction) -> Pos {
        match dir {
            Direction::North => Pos { y: self.y - 1, x: self.x },
            Direction::South => Pos { y: self.y + 1, x: self.x },
            Direction::East => Pos { y: self.y, x: self.x + 1 },
            Direction::West => Pos { y: self.y, x: self.x - 1 },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileKind {
    Wall,
    Floor,
    Exit,
    Gold,
    Human,
    Bot,
}

impl TileKind {
    /// Every tile except a wall can be stepped onto (stepping onto another
    /// player's marker is a capture, resolved by the driver).
    pub fn is_walkable(self) -> bool {
        self != TileKind::Wall
    }

    pub fn glyph(self) -> char {
        match self {
            TileKind::Wall => '#',
            TileKind::Floor => '.',
            TileKind::Exit => 'E',
            TileKind::Gold => 'G',
            TileKind::Human => 'P',
            TileKind::Bot => 'B',
        }
    }

    /// Tile glyphs allowed in map files. Player markers are placed by the
    /// driver at spawn time and never appear on disk.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(TileKind::Wall),
            '.' => Some(TileKind::Floor),
            'E' => Some(TileKind::Exit),
            'G' => Some(TileKind::Gold),
            _ => None,
        }
    }
}

/// Bot behavior mode, fixed at construction from the difficulty level 1-4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotMode {
    Erratic,
    Cautious,
    Reckless,
    Omniscient,
}

impl BotMode {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(BotMode::Erratic),
            2 => Some(BotMode::Cautious),
            3 => Some(BotMode::Reckless),
            4 => Some(BotMode::Omniscient),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            BotMode::Erratic => 1,
            BotMode::Cautious => 2,
            BotMode::Reckless => 3,
            BotMode::Omniscient => 4,
        }
    }
}

/// What the bot wants to do with its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotAction {
    Move(Pos),
    Look,
    Wait,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

/// The human command protocol. Parsing is strict: anything that is not an
/// exact protocol line is rejected and costs the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Hello,
    Gold,
    Pickup,
    Move(Direction),
    Look,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        match line.trim() {
            "HELLO" => Some(Command::Hello),
            "GOLD" => Some(Command::Gold),
            "PICKUP" => Some(Command::Pickup),
            "MOVE N" => Some(Command::Move(Direction::North)),
            "MOVE S" => Some(Command::Move(Direction::South)),
            "MOVE E" => Some(Command::Move(Direction::East)),
            "MOVE W" => Some(Command::Move(Direction::West)),
            "LOOK" => Some(Command::Look),
            "QUIT" => Some(Command::Quit),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LossCause {
    Caught,
    GaveUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Won,
    Lost(LossCause),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogEvent {
    GoldPickedUp { total: u32 },
    MoveBlocked { to: Pos },
    PlayerCaught { at: Pos },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_parse_accepts_exact_protocol_lines() {
        assert_eq!(Command::parse("HELLO"), Some(Command::Hello));
        assert_eq!(Command::parse("MOVE N"), Some(Command::Move(Direction::North)));
        assert_eq!(Command::parse("MOVE W"), Some(Command::Move(Direction::West)));
        assert_eq!(Command::parse("QUIT"), Some(Command::Quit));
        assert_eq!(Command::parse("  LOOK\n"), Some(Command::Look));
    }

    #[test]
    fn command_parse_rejects_everything_else() {
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse("MOVE"), None);
        assert_eq!(Command::parse("MOVE NE"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn mode_levels_round_trip() {
        for level in 1..=4 {
            let mode = BotMode::from_level(level).expect("levels 1-4 are valid");
            assert_eq!(mode.level(), level);
        }
        assert_eq!(BotMode::from_level(0), None);
        assert_eq!(BotMode::from_level(5), None);
    }

    #[test]
    fn step_moves_exactly_one_axis() {
        let origin = Pos { y: 5, x: 5 };
        assert_eq!(origin.step(Direction::North), Pos { y: 4, x: 5 });
        assert_eq!(origin.step(Direction::South), Pos { y: 6, x: 5 });
        assert_eq!(origin.step(Direction::East), Pos { y: 5, x: 6 });
        assert_eq!(origin.step(Direction::West), Pos { y: 5, x: 4 });
    }
}
