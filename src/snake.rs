use std::collections::VecDeque;

use crate::grid::Grid;
use crate::{Cell, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvanceResult {
    pub ate_food: bool,
}

/// Occupied cells, head first. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    pub fn new(start: Cell) -> Self {
        Self {
            body: VecDeque::from([start]),
        }
    }

    /// Builds a snake from explicit segments, head first.
    ///
    /// Returns `None` for an empty segment list.
    pub fn from_segments(segments: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let body: VecDeque<Cell> = segments.into_iter().collect();
        (!body.is_empty()).then_some(Self { body })
    }

    pub fn head(&self) -> Cell {
        // `body` is never empty: construction requires a cell and `advance`
        // pushes before it pops.
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    /// Every segment except the head.
    pub fn body(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter().skip(1)
    }

    pub fn occupies(&self, c: Cell) -> bool {
        self.body.contains(&c)
    }

    /// Moves one cell in `dir`, growing when the new head lands on `food`.
    ///
    /// The food check happens before the tail is dropped, so the snake may
    /// legally follow its own tail into the cell it vacates this tick.
    pub fn advance(&mut self, dir: Option<Direction>, grid: &Grid, food: Cell) -> AdvanceResult {
        let Some(dir) = dir else {
            return AdvanceResult::default();
        };

        let new_head = grid.resolve(self.head().step(dir));
        self.body.push_front(new_head);

        let ate_food = new_head == food;
        if !ate_food {
            self.body.pop_back();
        }
        AdvanceResult { ate_food }
    }
}
