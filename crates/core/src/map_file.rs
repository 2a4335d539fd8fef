//! Text map parsing: a `name` line, a `win` line, then a rectangular tile
//! grid. The built-in labyrinth goes through the same parser as files do.

use std::fs;
use std::io;
use std::path::Path;

use crate::state::Map;
use crate::types::TileKind;

/// A parsed map plus its win condition, ready to start a game from.
#[derive(Clone, Debug)]
pub struct MapData {
    pub name: String,
    pub gold_required: u32,
    pub map: Map,
}

#[derive(Debug)]
pub enum MapFileError {
    Io(io::Error),
    /// First line is missing or does not start with `name `.
    MissingHeader,
    /// Second line is missing, does not start with `win `, or the amount is
    /// not a number.
    BadGoldLine,
    EmptyGrid,
    /// Grids below 3x3 have no interior for spawns and targets.
    TooSmall { width: usize, height: usize },
    NonRectangular { row: usize },
    UnknownTile { row: usize, col: usize, glyph: char },
}

impl From<io::Error> for MapFileError {
    fn from(err: io::Error) -> Self {
        MapFileError::Io(err)
    }
}

const DEFAULT_MAP: &str = "\
name Very small Labyrinth of Doom
win 2
####################
#..................#
#......G.........E.#
#..................#
#..E...............#
#...........G......#
#..................#
#..................#
####################";

impl MapData {
    pub fn load(path: &Path) -> Result<Self, MapFileError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, MapFileError> {
        let mut lines = text.lines();

        let name = lines
            .next()
            .and_then(|line| line.strip_prefix("name "))
            .ok_or(MapFileError::MissingHeader)?
            .to_string();
        let gold_required = lines
            .next()
            .and_then(|line| line.strip_prefix("win "))
            .and_then(|amount| amount.trim().parse::<u32>().ok())
            .ok_or(MapFileError::BadGoldLine)?;

        let rows: Vec<&str> = lines.filter(|line| !line.trim().is_empty()).collect();
        let Some(first) = rows.first() else {
            return Err(MapFileError::EmptyGrid);
        };
        let width = first.chars().count();
        if width == 0 {
            return Err(MapFileError::EmptyGrid);
        }
        // Spawning and exploration sample the interior, so a playable map
        // needs at least one cell inside the border on both axes.
        if width < 3 || rows.len() < 3 {
            return Err(MapFileError::TooSmall { width, height: rows.len() });
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(MapFileError::NonRectangular { row });
            }
            for (col, glyph) in line.chars().enumerate() {
                let tile = TileKind::from_glyph(glyph)
                    .ok_or(MapFileError::UnknownTile { row, col, glyph })?;
                tiles.push(tile);
            }
        }

        Ok(Self { name, gold_required, map: Map::from_tiles(width, rows.len(), tiles) })
    }

    /// The original's built-in default map.
    pub fn default_labyrinth() -> Self {
        Self::parse(DEFAULT_MAP).expect("built-in map must parse")
    }
}
