use std::time::Duration;

use log::{debug, info};

use crate::clock::{Clock, TickPacer};
use crate::config::GameConfig;
use crate::food::FoodPlacer;
use crate::grid::Grid;
use crate::input::InputBuffer;
use crate::rules::{self, Collision, Outcome, Scoreboard};
use crate::snake::Snake;
use crate::store::HighScoreStore;
use crate::{Cell, Coord, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Collision(Collision),
    /// The snake covers every cell; there is nowhere left for food.
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    Running,
    Paused,
    Over(EndReason),
}

impl GameState {
    pub fn is_over(self) -> bool {
        matches!(self, Self::Over(_))
    }
}

/// UI-agnostic result of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub ate_food: bool,
    pub state: GameState,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub cell: Cell,
    pub head: bool,
}

/// Read-only view of a session for renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub dimension: Coord,
    pub segments: Vec<Segment>,
    /// `None` once the board is full.
    pub food: Option<Cell>,
    pub score: u32,
    pub high_score: u32,
    /// The snake grew on the most recent tick.
    pub grew: bool,
    pub state: GameState,
    pub direction: Option<Direction>,
    pub interval: Duration,
    pub supports_pause: bool,
}

/// One game of snake: all entities, the lifecycle state machine and the
/// ports it talks to.
#[derive(Debug)]
pub struct GameSession<C, S> {
    cfg: GameConfig,
    grid: Grid,
    snake: Snake,
    food: Cell,
    committed: Option<Direction>,
    input: InputBuffer,
    placer: FoodPlacer,
    board: Scoreboard,
    state: GameState,
    pacer: TickPacer,
    grew: bool,
    clock: C,
    store: S,
}

impl<C: Clock, S: HighScoreStore> GameSession<C, S> {
    /// Create a new session with a non-deterministic food sequence.
    pub fn new(cfg: GameConfig, clock: C, store: S) -> Self {
        Self::with_placer(cfg, FoodPlacer::from_os_rng(), clock, store)
    }

    pub fn with_seed(cfg: GameConfig, seed: u64, clock: C, store: S) -> Self {
        Self::with_placer(cfg, FoodPlacer::with_seed(seed), clock, store)
    }

    /// The high score is read from `store` here, once.
    pub fn with_placer(cfg: GameConfig, placer: FoodPlacer, clock: C, store: S) -> Self {
        let grid = cfg.grid();
        let board = Scoreboard::load(&store);
        let pacer = TickPacer::new(clock.now());
        Self {
            grid,
            snake: Snake::new(cfg.start),
            food: cfg.first_food,
            committed: None,
            input: InputBuffer::new(),
            placer,
            board,
            state: GameState::NotStarted,
            pacer,
            grew: false,
            clock,
            store,
            cfg,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.board.score()
    }

    pub fn high_score(&self) -> u32 {
        self.board.high_score()
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    /// Direction applied on the most recent tick.
    pub fn direction(&self) -> Option<Direction> {
        self.committed
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.input.pending()
    }

    pub fn interval(&self) -> Duration {
        self.cfg.speed.interval(self.board.score())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// NotStarted -> Running. Returns false in any other state.
    pub fn start(&mut self) -> bool {
        if self.state != GameState::NotStarted {
            return false;
        }
        self.state = GameState::Running;
        self.pacer.reset(self.clock.now());
        debug!("game started");
        true
    }

    /// Queues a turn for the next tick. The first accepted turn starts the
    /// game; turns while paused or after game over are dropped.
    pub fn propose(&mut self, dir: Direction) -> bool {
        if matches!(self.state, GameState::Paused | GameState::Over(_)) {
            return false;
        }
        let accepted = self.input.propose(dir, self.committed);
        if accepted && self.state == GameState::NotStarted {
            self.start();
        }
        accepted
    }

    /// Running <-> Paused, when the configuration allows pausing.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.cfg.supports_pause {
            return false;
        }
        match self.state {
            GameState::Running => {
                self.state = GameState::Paused;
                debug!("paused");
                true
            }
            GameState::Paused => {
                self.state = GameState::Running;
                // Time spent paused must not turn into a burst of ticks.
                self.pacer.reset(self.clock.now());
                debug!("resumed");
                true
            }
            _ => false,
        }
    }

    /// Resets every entity and returns to NotStarted. Valid from any state.
    pub fn restart(&mut self) {
        self.snake = Snake::new(self.cfg.start);
        self.food = self.cfg.first_food;
        self.committed = None;
        self.input.clear();
        self.board.reset();
        self.grew = false;
        self.state = GameState::NotStarted;
        self.pacer.reset(self.clock.now());
        debug!("restarted");
    }

    /// Per-frame entry point: runs at most one tick if one is due.
    pub fn frame(&mut self) -> Option<TickReport> {
        if self.state != GameState::Running {
            return None;
        }
        let interval = self.interval();
        if self.pacer.poll(self.clock.now(), interval) {
            Some(self.tick())
        } else {
            None
        }
    }

    /// Runs one simulation step immediately, ignoring the clock.
    ///
    /// Order within a tick: commit the pending turn, advance, check for
    /// collisions, then score and relocate food.
    pub fn tick(&mut self) -> TickReport {
        if self.state != GameState::Running {
            return self.report(false);
        }

        self.input.commit(&mut self.committed);
        self.grew = false;

        let res = self.snake.advance(self.committed, &self.grid, self.food);

        if let Outcome::Dead(collision) = rules::evaluate(&self.snake, &self.grid) {
            self.state = GameState::Over(EndReason::Collision(collision));
            info!(
                "game over ({collision:?}) with score {}, high score {}",
                self.board.score(),
                self.board.high_score()
            );
            return self.report(false);
        }

        if res.ate_food {
            self.grew = true;
            self.board.award(&mut self.store);
            match self.placer.relocate(&self.snake, &self.grid) {
                Some(c) => {
                    debug!("food moved to ({}, {})", c.x, c.y);
                    self.food = c;
                }
                None => {
                    self.state = GameState::Over(EndReason::BoardFull);
                    info!("board full with score {}", self.board.score());
                }
            }
        }

        self.report(res.ate_food)
    }

    fn report(&self, ate_food: bool) -> TickReport {
        TickReport {
            ate_food,
            state: self.state,
            score: self.board.score(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let segments = self
            .snake
            .segments()
            .enumerate()
            .map(|(i, &cell)| Segment { cell, head: i == 0 })
            .collect();
        let food = (self.state != GameState::Over(EndReason::BoardFull)).then_some(self.food);
        Snapshot {
            dimension: self.grid.dimension(),
            segments,
            food,
            score: self.board.score(),
            high_score: self.board.high_score(),
            grew: self.grew,
            state: self.state,
            direction: self.committed,
            interval: self.interval(),
            supports_pause: self.cfg.supports_pause,
        }
    }
}
