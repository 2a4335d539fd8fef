use crate::game::BotBrain;
use crate::types::{Pos, TileKind};

/// A rectangular tile grid. Two independent instances exist per game: the
/// authoritative world map owned by the driver, and the bot's private
/// partial-knowledge copy. They are only synchronized through
/// `BotBrain::record_tile`, never by sharing.
#[derive(Clone, Debug)]
pub struct Map {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileKind>,
}

impl Map {
    /// An all-floor map enclosed by a wall border. This is also the shape of
    /// the bot's initial world assumption: border known, interior optimistic.
    pub fn new(width: usize, height: usize) -> Self {
        let mut tiles = vec![TileKind::Floor; width * height];
        for x in 0..width {
            tiles[x] = TileKind::Wall;
            tiles[(height - 1) * width + x] = TileKind::Wall;
        }
        for y in 0..height {
            tiles[y * width] = TileKind::Wall;
            tiles[y * width + (width - 1)] = TileKind::Wall;
        }
        Self { width, height, tiles }
    }

    pub fn from_tiles(width: usize, height: usize, tiles: Vec<TileKind>) -> Self {
        debug_assert_eq!(tiles.len(), width * height, "tile vector must fill the grid");
        Self { width, height, tiles }
    }

    /// Out-of-bounds reads answer `Wall` so movement and search code can
    /// treat the map edge uniformly.
    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles[self.index(pos)]
    }

    pub fn set_tile(&mut self, pos: Pos, tile: TileKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height
    }

    /// First tile of the given kind in row-major order, if any.
    pub fn find_tile(&self, kind: TileKind) -> Option<Pos> {
        self.tiles.iter().position(|tile| *tile == kind).map(|idx| Pos {
            y: (idx / self.width) as i32,
            x: (idx % self.width) as i32,
        })
    }

    pub(crate) fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

/// One participant. The human and the bot share the same capability set;
/// bot-only navigation state lives in the `Role` payload.
pub struct Player {
    pub pos: Pos,
    pub on_gold: bool,
    pub on_exit: bool,
    pub gold: u32,
    pub role: Role,
}

pub enum Role {
    Human,
    Bot(BotBrain),
}

impl Player {
    pub fn marker(&self) -> TileKind {
        match self.role {
            Role::Human => TileKind::Human,
            Role::Bot(_) => TileKind::Bot,
        }
    }

    /// The tile to restore under this player when it steps away.
    pub fn vacated_tile(&self) -> TileKind {
        if self.on_exit {
            TileKind::Exit
        } else if self.on_gold {
            TileKind::Gold
        } else {
            TileKind::Floor
        }
    }
}
