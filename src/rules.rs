use std::time::Duration;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::grid::{EdgePolicy, Grid};
use crate::snake::Snake;
use crate::store::HighScoreStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Head ran into its own body.
    Body,
    /// Head left a walled board.
    Wall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Alive,
    Dead(Collision),
}

/// Checks the snake's head after it has advanced.
///
/// The bounds check only applies to walled boards; a wrapping grid has
/// already folded the head back onto the board.
pub fn evaluate(snake: &Snake, grid: &Grid) -> Outcome {
    let head = snake.head();
    if grid.policy() == EdgePolicy::Wall && !grid.contains(head) {
        return Outcome::Dead(Collision::Wall);
    }
    if snake.body().any(|&c| c == head) {
        return Outcome::Dead(Collision::Body);
    }
    Outcome::Alive
}

/// Tick interval as a function of score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SpeedCurve {
    Fixed { interval_ms: u64 },
    /// `max(min_ms, base_ms - score * step_ms)`
    Linear {
        base_ms: u64,
        step_ms: u64,
        min_ms: u64,
    },
}

impl SpeedCurve {
    pub fn interval_ms(&self, score: u32) -> u64 {
        match *self {
            Self::Fixed { interval_ms } => interval_ms,
            Self::Linear {
                base_ms,
                step_ms,
                min_ms,
            } => base_ms
                .saturating_sub(u64::from(score).saturating_mul(step_ms))
                .max(min_ms),
        }
    }

    pub fn interval(&self, score: u32) -> Duration {
        Duration::from_millis(self.interval_ms(score))
    }

    /// Smallest interval the curve can produce.
    pub fn floor_ms(&self) -> u64 {
        self.interval_ms(u32::MAX)
    }
}

/// Current score and the best score seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    score: u32,
    high_score: u32,
}

impl Scoreboard {
    pub fn new(high_score: u32) -> Self {
        Self {
            score: 0,
            high_score,
        }
    }

    /// Reads the stored high score; storage problems count as no score.
    pub fn load<S: HighScoreStore + ?Sized>(store: &S) -> Self {
        let high_score = match store.load() {
            Ok(v) => v.unwrap_or(0),
            Err(e) => {
                warn!("could not load high score, starting from 0: {e}");
                0
            }
        };
        Self::new(high_score)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Counts one food. Returns true when this sets a new high score, which is
    /// then written to `store`.
    pub fn award<S: HighScoreStore + ?Sized>(&mut self, store: &mut S) -> bool {
        self.score += 1;
        if self.score <= self.high_score {
            return false;
        }
        self.high_score = self.score;
        info!("new high score {}", self.high_score);
        if let Err(e) = store.save(self.high_score) {
            error!("could not save high score: {e}");
        }
        true
    }

    /// Starts a new life. The high score is kept.
    pub fn reset(&mut self) {
        self.score = 0;
    }
}
