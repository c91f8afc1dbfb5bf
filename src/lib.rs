pub mod clock;
pub mod config;
pub mod food;
pub mod grid;
pub mod input;
pub mod render;
pub mod rules;
pub mod session;
pub mod snake;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock, TickPacer};
pub use config::{ConfigError, GameConfig};
pub use food::FoodPlacer;
pub use grid::{EdgePolicy, Grid, PixelRect};
pub use input::{Command, InputBuffer};
pub use rules::{Collision, Outcome, Scoreboard, SpeedCurve};
pub use session::{EndReason, GameSession, GameState, Segment, Snapshot, TickReport};
pub use snake::{AdvanceResult, Snake};
pub use store::{HighScoreStore, JsonFileStore, MemoryStore, StoreError};

use serde::{Deserialize, Serialize};

/// Integer coordinate type for grid cells (not pixels)
pub type Coord = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: Coord,
    pub y: Coord,
}

impl Cell {
    #[inline]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `dir`, without any bounds handling.
    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.dx_dy();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn dx_dy(self) -> (Coord, Coord) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }
}
