//! Decoded game commands.

use echo_core::Direction;

/// A direction or control instruction decoded from keyboard or speech input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant)]
pub enum Command {
    /// Move the blank (or the player) one cell.
    #[display("move {_0}")]
    Move(Direction),
    /// Start a new round.
    #[display("reshuffle")]
    Reshuffle,
    /// Switch between keyboard and voice input.
    #[display("toggle input mode")]
    ToggleInputMode,
    /// Leave the game.
    #[display("quit")]
    Quit,
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        Self::Move(direction)
    }
}

impl Command {
    /// Returns the direction if this is a move.
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Move(direction) => Some(direction),
            _ => None,
        }
    }
}
