use serde::{Deserialize, Serialize};

use crate::{Cell, Coord};

/// What happens when the head leaves the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Edges connect to the opposite edge (toroidal board).
    Wrap,
    /// Leaving the board is a fatal collision.
    Wall,
}

/// Pixel-space rectangle covered by one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Square board of `dimension` x `dimension` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    dimension: Coord,
    cell_px: u32,
    policy: EdgePolicy,
}

impl Grid {
    pub const DEFAULT_CELL_PX: u32 = 30;

    pub fn new(dimension: Coord, policy: EdgePolicy) -> Self {
        Self::with_cell_px(dimension, Self::DEFAULT_CELL_PX, policy)
    }

    pub fn with_cell_px(dimension: Coord, cell_px: u32, policy: EdgePolicy) -> Self {
        Self {
            dimension: dimension.max(1),
            cell_px: cell_px.max(1),
            policy,
        }
    }

    #[inline]
    pub fn dimension(&self) -> Coord {
        self.dimension
    }

    #[inline]
    pub fn policy(&self) -> EdgePolicy {
        self.policy
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.dimension as usize) * (self.dimension as usize)
    }

    #[inline]
    pub fn contains(&self, c: Cell) -> bool {
        (0..self.dimension).contains(&c.x) && (0..self.dimension).contains(&c.y)
    }

    /// Maps any coordinate back into `[0, dimension)` on both axes.
    #[inline]
    pub fn wrap(&self, c: Cell) -> Cell {
        Cell::new(c.x.rem_euclid(self.dimension), c.y.rem_euclid(self.dimension))
    }

    /// Applies the edge policy to a freshly stepped cell.
    ///
    /// Under [`EdgePolicy::Wall`] the cell is returned untouched, so an
    /// out-of-bounds head stays visible to the collision rules.
    #[inline]
    pub fn resolve(&self, c: Cell) -> Cell {
        match self.policy {
            EdgePolicy::Wrap => self.wrap(c),
            EdgePolicy::Wall => c,
        }
    }

    /// Row-major iterator over every cell on the board.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let d = self.dimension;
        (0..d).flat_map(move |y| (0..d).map(move |x| Cell::new(x, y)))
    }

    pub fn to_pixel(&self, c: Cell) -> PixelRect {
        PixelRect {
            x: (c.x.max(0) as u32).saturating_mul(self.cell_px),
            y: (c.y.max(0) as u32).saturating_mul(self.cell_px),
            width: self.cell_px,
            height: self.cell_px,
        }
    }

    /// The cell under a pixel, if the pixel lies on the board.
    pub fn from_pixel(&self, x: u32, y: u32) -> Option<Cell> {
        let x = Coord::try_from(x / self.cell_px).ok()?;
        let y = Coord::try_from(y / self.cell_px).ok()?;
        let c = Cell::new(x, y);
        self.contains(c).then_some(c)
    }
}
