use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::grid::Grid;
use crate::snake::Snake;
use crate::Cell;

/// Picks food cells uniformly among the cells the snake does not occupy.
#[derive(Debug, Clone)]
pub struct FoodPlacer {
    rng: ChaCha8Rng,
}

impl FoodPlacer {
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    /// Non-deterministic placer seeded from the OS.
    pub fn from_os_rng() -> Self {
        Self::with_rng(ChaCha8Rng::from_os_rng())
    }

    /// Chooses a new food cell, or `None` if the snake fills the board.
    ///
    /// Rejection sampling is tried first; once the retry budget runs out the
    /// free cells are enumerated and one is drawn directly.
    pub fn relocate(&mut self, snake: &Snake, grid: &Grid) -> Option<Cell> {
        let max_attempts = grid.cell_count().saturating_mul(2).max(8);
        let d = grid.dimension();

        for _ in 0..max_attempts {
            let c = Cell::new(self.rng.random_range(0..d), self.rng.random_range(0..d));
            if !snake.occupies(c) {
                return Some(c);
            }
        }

        debug!("food sampling exhausted {max_attempts} attempts, scanning free cells");
        let free: Vec<Cell> = grid.cells().filter(|&c| !snake.occupies(c)).collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.random_range(0..free.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::EdgePolicy;

    #[test]
    fn never_lands_on_snake() {
        let g = Grid::new(6, EdgePolicy::Wrap);
        let s = Snake::from_segments(g.cells().take(30)).expect("non-empty");
        let mut placer = FoodPlacer::with_seed(7);
        for _ in 0..200 {
            let c = placer.relocate(&s, &g).expect("free cells remain");
            assert!(g.contains(c));
            assert!(!s.occupies(c));
        }
    }

    #[test]
    fn finds_the_last_free_cell() {
        let g = Grid::new(4, EdgePolicy::Wall);
        let last = Cell::new(3, 3);
        let s = Snake::from_segments(g.cells().filter(|&c| c != last)).expect("non-empty");
        let mut placer = FoodPlacer::with_seed(1);
        assert_eq!(placer.relocate(&s, &g), Some(last));
    }

    #[test]
    fn full_board_yields_none() {
        let g = Grid::new(3, EdgePolicy::Wall);
        let s = Snake::from_segments(g.cells()).expect("non-empty");
        let mut placer = FoodPlacer::with_seed(1);
        assert_eq!(placer.relocate(&s, &g), None);
    }

    #[test]
    fn same_seed_same_sequence() {
        let g = Grid::new(20, EdgePolicy::Wrap);
        let s = Snake::new(Cell::new(10, 10));
        let mut a = FoodPlacer::with_seed(42);
        let mut b = FoodPlacer::with_seed(42);
        for _ in 0..10 {
            assert_eq!(a.relocate(&s, &g), b.relocate(&s, &g));
        }
    }
}
