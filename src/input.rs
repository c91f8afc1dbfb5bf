use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::Direction;

/// Logical operations reachable from keys and on-screen buttons alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Restart,
    Quit,
}

/// Single-slot buffer for the next direction.
///
/// Proposals are validated against the direction committed at the start of
/// the current tick, never against an earlier proposal, so two quick turns
/// within one tick cannot fold the snake back onto itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputBuffer {
    pending: Option<Direction>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    /// Stores `dir` unless it shares an axis with `committed`.
    /// Returns whether the proposal was accepted.
    pub fn propose(&mut self, dir: Direction, committed: Option<Direction>) -> bool {
        if committed.is_some_and(|c| c.axis() == dir.axis()) {
            return false;
        }
        self.pending = Some(dir);
        true
    }

    /// Moves the pending direction, if any, into `committed`.
    pub fn commit(&mut self, committed: &mut Option<Direction>) {
        if let Some(dir) = self.pending.take() {
            *committed = Some(dir);
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// Key bindings: arrows, WASD and hjkl for movement.
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    let cmd = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,

        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Command::Turn(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Command::Turn(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Command::Turn(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => {
            Command::Turn(Direction::Right)
        }

        KeyCode::Char('p') | KeyCode::Char(' ') => Command::TogglePause,
        KeyCode::Char('r') => Command::Restart,

        _ => return None,
    };
    Some(cmd)
}
