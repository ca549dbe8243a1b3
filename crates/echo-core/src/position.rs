//! Grid coordinates.

use crate::Direction;

/// A `(row, col)` coordinate on a square grid.
///
/// Positions are never stored in a [`GridState`]; they are derived from a
/// row-major cell index whenever adjacency has to be checked.
///
/// [`GridState`]: crate::GridState
///
/// # Examples
///
/// ```
/// use echo_core::Position;
///
/// let pos = Position::from_index(5, 3);
/// assert_eq!(pos, Position::new(1, 2));
/// assert_eq!(pos.to_index(3), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Row, counted from the top.
    pub row: usize,
    /// Column, counted from the left.
    pub col: usize,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Converts a row-major index on a grid of the given side.
    #[must_use]
    pub const fn from_index(index: usize, side: usize) -> Self {
        Self {
            row: index / side,
            col: index % side,
        }
    }

    /// Converts back to a row-major index on a grid of the given side.
    #[must_use]
    pub const fn to_index(self, side: usize) -> usize {
        self.row * side + self.col
    }

    /// Returns the adjacent position in `direction`, or `None` if it would
    /// leave a `width` × `height` area.
    #[must_use]
    pub fn step(self, direction: Direction, width: usize, height: usize) -> Option<Self> {
        let (dr, dc) = direction.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < height && col < width).then_some(Self { row, col })
    }
}
