//! Core data structures for the Echo sliding puzzle.
//!
//! This crate provides the value types shared by the generator, the input
//! router, and the game sessions.
//!
//! # Overview
//!
//! 1. **Directions** - [`direction`]: the four cardinal moves of the blank
//! 2. **Positions** - [`position`]: `(row, col)` coordinates derived from a cell index
//! 3. **Grid state** - [`grid`]: a permutation of `side²` labels with one blank,
//!    including move legality, move application, and win detection
//!
//! # Examples
//!
//! ```
//! use echo_core::{Direction, GridState};
//!
//! let mut grid = GridState::solved(3)?;
//! assert!(grid.is_solved());
//!
//! // The blank starts in the bottom-right corner, so it cannot move down.
//! assert!(grid.apply(Direction::Down).is_blocked());
//! assert!(grid.apply(Direction::Up).is_moved());
//! assert!(!grid.is_solved());
//! # Ok::<(), echo_core::GridError>(())
//! ```

pub mod direction;
pub mod grid;
pub mod position;

pub use self::{
    direction::Direction,
    grid::{GridError, GridState, MoveOutcome},
    position::Position,
};
